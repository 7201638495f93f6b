use async_trait::async_trait;

use crate::housing::listings::Listing;
use crate::housing::matching::{QueryError, SearchQuery};

/// Shown to applicants whenever a search cannot be completed.
pub const SEARCH_FAILURE_MESSAGE: &str = "We are having trouble connecting to the listing service. Please check your internet connection and try again.";

/// Single entry point between callers and whatever backend serves listings.
#[async_trait]
pub trait ListingSearchClient: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, SearchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("invalid search parameters: {0}")]
    InvalidQuery(#[from] QueryError),
    #[error("listing service unreachable: {0}")]
    Transport(String),
    #[error("listing service responded with {status}: {message}")]
    Server { status: u16, message: String },
    #[error("listing service returned an unreadable payload: {0}")]
    Decode(String),
}

impl SearchError {
    /// Whether asking again could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SearchError::Transport(_) => true,
            SearchError::Server { status, .. } => *status >= 500,
            SearchError::InvalidQuery(_) | SearchError::Decode(_) => false,
        }
    }
}
