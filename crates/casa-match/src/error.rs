use crate::assistant::AssistantError;
use crate::config::ConfigError;
use crate::housing::listings::ListingImportError;
use crate::housing::profile::{ProfileError, ProfileStoreError};
use crate::housing::search::{SearchError, SEARCH_FAILURE_MESSAGE};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Listings(ListingImportError),
    Search(SearchError),
    Profile(ProfileError),
    Assistant(AssistantError),
    NotFound(String),
    InvalidInput(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Listings(err) => write!(f, "listing data error: {}", err),
            AppError::Search(err) => write!(f, "search error: {}", err),
            AppError::Profile(err) => write!(f, "profile error: {}", err),
            AppError::Assistant(err) => write!(f, "assistant error: {}", err),
            AppError::NotFound(message) | AppError::InvalidInput(message) => {
                f.write_str(message)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Listings(err) => Some(err),
            AppError::Search(err) => Some(err),
            AppError::Profile(err) => Some(err),
            AppError::Assistant(err) => Some(err),
            AppError::NotFound(_) | AppError::InvalidInput(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, payload) = match &self {
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            AppError::InvalidInput(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": message }))
            }
            AppError::Profile(ProfileError::Intake(violation)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": violation.to_string(),
                    "step": violation.step().label(),
                }),
            ),
            // Malformed search parameters are a server error on the listing contract.
            AppError::Search(SearchError::InvalidQuery(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
            AppError::Search(err) => (
                StatusCode::BAD_GATEWAY,
                json!({
                    "error": SEARCH_FAILURE_MESSAGE,
                    "retryable": err.is_retryable(),
                }),
            ),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Listings(_)
            | AppError::Profile(_)
            | AppError::Assistant(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(payload)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ListingImportError> for AppError {
    fn from(value: ListingImportError) -> Self {
        Self::Listings(value)
    }
}

impl From<SearchError> for AppError {
    fn from(value: SearchError) -> Self {
        Self::Search(value)
    }
}

impl From<ProfileError> for AppError {
    fn from(value: ProfileError) -> Self {
        Self::Profile(value)
    }
}

impl From<AssistantError> for AppError {
    fn from(value: AssistantError) -> Self {
        Self::Assistant(value)
    }
}

impl From<ProfileStoreError> for AppError {
    fn from(value: ProfileStoreError) -> Self {
        Self::Profile(ProfileError::Store(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::housing::listings::ListingStore;
    use crate::housing::matching::SearchParams;
    use crate::housing::profile::IntakeViolation;
    use crate::housing::search::MockListingService;
    use serde_json::Value;

    async fn parts(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json payload"))
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_search_parameters_are_server_errors() {
        let service = MockListingService::new(ListingStore::bundled().expect("bundled dataset"));
        let params = SearchParams {
            income: Some("abc".to_string()),
            ..SearchParams::default()
        };
        let err = service
            .resolve_params(&params)
            .await
            .expect_err("income rejected");

        let (status, body) = parts(AppError::from(err)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().expect("message").contains("income"));
    }

    #[tokio::test]
    async fn unreachable_listing_service_uses_fixed_message() {
        let (status, body) =
            parts(AppError::from(SearchError::Transport("refused".to_string()))).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], SEARCH_FAILURE_MESSAGE);
        assert_eq!(body["retryable"], true);
    }

    #[tokio::test]
    async fn intake_violation_names_the_step() {
        let (status, body) =
            parts(AppError::from(ProfileError::Intake(IntakeViolation::MissingName))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "full name is required");
        assert_eq!(body["step"], "contact");
    }

    #[tokio::test]
    async fn not_found_keeps_message() {
        let (status, body) = parts(AppError::NotFound("nothing here".to_string())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "nothing here");
    }
}
