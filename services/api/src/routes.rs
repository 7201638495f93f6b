use crate::infra::{AppState, CasaServices};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use casa_match::assistant::assistant_router;
use casa_match::error::AppError;
use casa_match::housing::ami::{income_position, IncomePosition};
use casa_match::housing::profile::{profile_router, MAX_HOUSEHOLD_SIZE, MIN_HOUSEHOLD_SIZE};
use casa_match::housing::search::listing_router;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AmiRequest {
    pub(crate) household_size: u8,
    #[serde(default)]
    pub(crate) income: Option<u32>,
}

pub(crate) fn with_casa_routes(services: CasaServices) -> axum::Router {
    listing_router(services.listings)
        .merge(profile_router(services.profile))
        .merge(assistant_router(services.conversation))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/ami", axum::routing::get(ami_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn ami_endpoint(
    Query(request): Query<AmiRequest>,
) -> Result<Json<IncomePosition>, AppError> {
    if !(MIN_HOUSEHOLD_SIZE..=MAX_HOUSEHOLD_SIZE).contains(&request.household_size) {
        return Err(AppError::InvalidInput(format!(
            "householdSize must be between {MIN_HOUSEHOLD_SIZE} and {MAX_HOUSEHOLD_SIZE}"
        )));
    }

    Ok(Json(income_position(request.household_size, request.income)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use casa_match::assistant::UnconfiguredProvider;
    use casa_match::housing::listings::ListingStore;
    use casa_match::housing::profile::InMemoryProfileStore;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let services = CasaServices::new(
            ListingStore::bundled().expect("bundled dataset"),
            Arc::new(InMemoryProfileStore::default()),
            Arc::new(UnconfiguredProvider),
        )
        .expect("services build");
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_casa_routes(services).layer(Extension(state))
    }

    async fn call(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("body readable");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let (status, body) = call(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = call(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn ami_endpoint_positions_income() {
        let (status, body) = call(app(true), "/api/v1/ami?householdSize=3&income=45000").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bands"].as_array().map(Vec::len), Some(8));
        assert_eq!(body["bracket"], 40);
    }

    #[tokio::test]
    async fn ami_endpoint_without_income_claims_no_bracket() {
        let (status, body) = call(app(true), "/api/v1/ami?householdSize=3").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["bracket"].is_null());
        assert!(body["annual_income"].is_null());
        assert_eq!(body["bands"][3]["income_limit"], 83_800);
    }

    #[tokio::test]
    async fn ami_endpoint_rejects_empty_household() {
        let (status, body) = call(app(true), "/api/v1/ami?householdSize=0").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string());
    }

    #[tokio::test(start_paused = true)]
    async fn listing_search_is_mounted() {
        let (status, body) = call(app(true), "/api/listings?borough=Queens&income=0").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn assistant_transcript_is_mounted() {
        let (status, body) = call(app(true), "/api/v1/assistant/messages").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["role"], "model");
    }
}
