//! Affordable-housing matching for New York City households.
//!
//! The [`housing`] module holds the listing store, eligibility filtering and
//! ranking, the search boundary, and the household profile session.
//! [`assistant`] wraps the conversational helper.

pub mod assistant;
pub mod config;
pub mod error;
pub mod housing;
pub mod telemetry;
