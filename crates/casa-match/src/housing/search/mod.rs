//! Listing search boundary: the client trait, its mock and HTTP
//! implementations, and the feed that suppresses stale responses.

mod client;
mod feed;
mod http;
mod mock;
pub mod router;

pub use client::{ListingSearchClient, SearchError, SEARCH_FAILURE_MESSAGE};
pub use feed::{SearchFeed, SearchState};
pub use http::HttpListingClient;
pub use mock::{MockListingService, SEARCH_LATENCY};
pub use router::listing_router;
