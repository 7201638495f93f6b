//! Eligibility filtering and partner ranking over the listing store.

mod filter;
mod query;
mod ranking;

pub use filter::{EligibilityFilter, EligibilityMode};
pub use query::{QueryError, SearchParams, SearchQuery, ALL_BOROUGHS};
pub use ranking::rank_partner_first;

use crate::housing::listings::Listing;

/// Filter then rank. Deterministic for a given dataset and query.
pub fn match_listings(listings: &[Listing], query: &SearchQuery) -> Vec<Listing> {
    let eligible = EligibilityFilter::from_query(query).apply(listings);
    rank_partner_first(eligible)
}
