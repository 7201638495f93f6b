use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::housing::listings::{Listing, ListingStore};
use crate::housing::matching::{match_listings, SearchParams, SearchQuery};

use super::client::{ListingSearchClient, SearchError};

/// Artificial latency applied to every search.
pub const SEARCH_LATENCY: Duration = Duration::from_millis(600);

/// In-process stand-in for a listing backend: waits, then filters and ranks
/// the static store.
#[derive(Debug, Clone)]
pub struct MockListingService {
    store: ListingStore,
}

impl MockListingService {
    pub fn new(store: ListingStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ListingStore {
        &self.store
    }

    /// Resolve raw wire parameters. Malformed values surface as
    /// [`SearchError::InvalidQuery`] after the usual delay.
    pub async fn resolve_params(&self, params: &SearchParams) -> Result<Vec<Listing>, SearchError> {
        tokio::time::sleep(SEARCH_LATENCY).await;
        let query = SearchQuery::try_from(params)?;
        Ok(self.resolve(&query))
    }

    fn resolve(&self, query: &SearchQuery) -> Vec<Listing> {
        let results = match_listings(self.store.all(), query);
        debug!(
            borough = query.borough.as_deref().unwrap_or("All"),
            income = ?query.income,
            max_rent = ?query.max_rent,
            household_size = ?query.household_size,
            matches = results.len(),
            "resolved listing search"
        );
        results
    }
}

#[async_trait]
impl ListingSearchClient for MockListingService {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, SearchError> {
        tokio::time::sleep(SEARCH_LATENCY).await;
        Ok(self.resolve(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn service() -> MockListingService {
        MockListingService::new(ListingStore::bundled().expect("bundled dataset"))
    }

    #[tokio::test(start_paused = true)]
    async fn search_waits_for_fixed_latency() {
        let started = Instant::now();
        let results = service().search(&SearchQuery::default()).await.unwrap();
        assert!(started.elapsed() >= SEARCH_LATENCY);
        assert_eq!(results.len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_params_fail_after_delay() {
        let params = SearchParams {
            income: Some("lots".to_string()),
            ..SearchParams::default()
        };
        let started = Instant::now();
        let err = service().resolve_params(&params).await.unwrap_err();
        assert!(started.elapsed() >= SEARCH_LATENCY);
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_searches_are_identical() {
        let service = service();
        let query = SearchQuery {
            income: Some(50_000),
            max_rent: Some(1_500),
            ..SearchQuery::default()
        };
        let first = service.search(&query).await.unwrap();
        let second = service.search(&query).await.unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
