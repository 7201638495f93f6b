use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, warn};

use crate::housing::listings::Listing;
use crate::housing::matching::SearchQuery;

use super::client::{ListingSearchClient, SEARCH_FAILURE_MESSAGE};

/// Lifecycle of the most recent search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchState {
    Idle,
    Pending {
        query: SearchQuery,
    },
    Resolved {
        query: SearchQuery,
        listings: Vec<Listing>,
    },
    Failed {
        query: SearchQuery,
        message: String,
        retryable: bool,
    },
}

impl SearchState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SearchState::Pending { .. })
    }

    pub fn listings(&self) -> Option<&[Listing]> {
        match self {
            SearchState::Resolved { listings, .. } => Some(listings),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct FeedInner {
    generation: u64,
    state: SearchState,
    last_query: Option<SearchQuery>,
}

/// Tracks the latest search and drops results from superseded requests.
///
/// Every [`SearchFeed::load`] starts a new generation. When a response arrives
/// for an older generation it is discarded, so only the newest request ever
/// reaches [`SearchFeed::state`].
pub struct SearchFeed<C: ?Sized> {
    client: Arc<C>,
    inner: Mutex<FeedInner>,
}

impl<C> SearchFeed<C>
where
    C: ListingSearchClient + ?Sized,
{
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            inner: Mutex::new(FeedInner {
                generation: 0,
                state: SearchState::Idle,
                last_query: None,
            }),
        }
    }

    /// Run a search. Returns `None` when a newer request superseded this one.
    pub async fn load(&self, query: SearchQuery) -> Option<SearchState> {
        let generation = {
            let mut inner = self.inner.lock().expect("feed mutex poisoned");
            inner.generation += 1;
            inner.state = SearchState::Pending {
                query: query.clone(),
            };
            inner.last_query = Some(query.clone());
            inner.generation
        };

        let outcome = self.client.search(&query).await;

        let mut inner = self.inner.lock().expect("feed mutex poisoned");
        if inner.generation != generation {
            debug!(
                generation,
                latest = inner.generation,
                "discarding superseded search result"
            );
            return None;
        }

        inner.state = match outcome {
            Ok(listings) => SearchState::Resolved { query, listings },
            Err(err) => {
                warn!(error = %err, "listing search failed");
                SearchState::Failed {
                    query,
                    message: SEARCH_FAILURE_MESSAGE.to_string(),
                    retryable: err.is_retryable(),
                }
            }
        };
        Some(inner.state.clone())
    }

    /// Re-issue the most recent query, if any.
    pub async fn retry(&self) -> Option<SearchState> {
        let query = self
            .inner
            .lock()
            .expect("feed mutex poisoned")
            .last_query
            .clone()?;
        self.load(query).await
    }

    pub fn state(&self) -> SearchState {
        self.inner.lock().expect("feed mutex poisoned").state.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().expect("feed mutex poisoned").generation
    }
}
