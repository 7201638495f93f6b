use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::error::AppError;
use crate::housing::listings::Listing;
use crate::housing::matching::SearchParams;

use super::mock::MockListingService;

/// Router serving `GET /api/listings` from the in-process listing service.
pub fn listing_router(service: Arc<MockListingService>) -> Router {
    Router::new()
        .route("/api/listings", get(search_handler))
        .with_state(service)
}

pub(crate) async fn search_handler(
    State(service): State<Arc<MockListingService>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Listing>>, AppError> {
    let listings = service.resolve_params(&params).await?;
    Ok(Json(listings))
}
