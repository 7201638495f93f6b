use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::housing::listings::Listing;
use crate::housing::matching::SearchQuery;

use super::client::{ListingSearchClient, SearchError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to a listing backend that serves `GET /api/listings`.
#[derive(Debug, Clone)]
pub struct HttpListingClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpListingClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| SearchError::Transport(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn listings_url(&self) -> String {
        format!("{}/api/listings", self.base_url)
    }
}

#[async_trait]
impl ListingSearchClient for HttpListingClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, SearchError> {
        let response = self
            .client
            .get(self.listings_url())
            .query(&query.to_params())
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    SearchError::Transport(format!(
                        "request timed out after {}s",
                        REQUEST_TIMEOUT.as_secs()
                    ))
                } else {
                    SearchError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|parsed| parsed.error)
                .unwrap_or(body);
            return Err(SearchError::Server {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<Listing>>()
            .await
            .map_err(|err| SearchError::Decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = HttpListingClient::new("http://127.0.0.1:3000/").unwrap();
        assert_eq!(client.listings_url(), "http://127.0.0.1:3000/api/listings");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        // Port 9 (discard) is closed on test hosts.
        let client = HttpListingClient::new("http://127.0.0.1:9").unwrap();
        let err = client.search(&SearchQuery::default()).await.unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)));
        assert!(err.is_retryable());
    }
}
