use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::housing::listings::Listing;
use crate::housing::matching::SearchQuery;
use crate::housing::search::ListingSearchClient;

use super::domain::HouseholdProfile;
use super::session::ProfileSession;

/// Shared handles for the profile endpoints.
#[derive(Clone)]
pub struct ProfileRoutes {
    pub session: Arc<Mutex<ProfileSession>>,
    pub listings: Arc<dyn ListingSearchClient>,
}

/// Router exposing the household profile lifecycle and profile-driven matches.
pub fn profile_router(routes: ProfileRoutes) -> Router {
    Router::new()
        .route(
            "/api/v1/profile",
            get(get_handler).put(put_handler).delete(delete_handler),
        )
        .route("/api/v1/profile/matches", get(matches_handler))
        .with_state(routes)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MatchesParams {
    #[serde(default)]
    pub(crate) borough: Option<String>,
}

/// Dashboard payload: greeting data plus ranked matches.
#[derive(Debug, Serialize)]
pub struct MatchesView {
    pub first_name: String,
    pub household_size: u8,
    pub annual_income: u32,
    pub count: usize,
    pub matches: Vec<Listing>,
}

fn no_profile() -> AppError {
    AppError::NotFound("no household profile has been saved".to_string())
}

pub(crate) async fn get_handler(
    State(routes): State<ProfileRoutes>,
) -> Result<Json<HouseholdProfile>, AppError> {
    let session = routes.session.lock().await;
    session.current().cloned().map(Json).ok_or_else(no_profile)
}

pub(crate) async fn put_handler(
    State(routes): State<ProfileRoutes>,
    Json(profile): Json<HouseholdProfile>,
) -> Result<Json<HouseholdProfile>, AppError> {
    let mut session = routes.session.lock().await;
    let stored = session.complete_intake(profile)?;
    Ok(Json(stored.clone()))
}

pub(crate) async fn delete_handler(
    State(routes): State<ProfileRoutes>,
) -> Result<StatusCode, AppError> {
    routes.session.lock().await.reset()?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn matches_handler(
    State(routes): State<ProfileRoutes>,
    Query(params): Query<MatchesParams>,
) -> Result<Json<MatchesView>, AppError> {
    let profile = routes
        .session
        .lock()
        .await
        .current()
        .cloned()
        .ok_or_else(no_profile)?;

    let query = SearchQuery::for_profile(&profile, params.borough.as_deref());
    let matches = routes.listings.search(&query).await?;

    Ok(Json(MatchesView {
        first_name: profile.first_name().to_string(),
        household_size: profile.household_size,
        annual_income: profile.annual_income,
        count: matches.len(),
        matches,
    }))
}
