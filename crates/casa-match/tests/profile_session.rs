use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use casa_match::housing::listings::ListingStore;
use casa_match::housing::profile::{
    profile_router, FileProfileStore, InMemoryProfileStore, ProfileRoutes, ProfileSession,
    ProfileStore,
};
use casa_match::housing::search::MockListingService;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;

fn intake_payload() -> Value {
    json!({
        "fullName": "  Ana Lopez ",
        "email": "ana@example.com",
        "phone": "718-555-0100",
        "contactMethod": "email",
        "boroughs": ["Queens", "Bronx"],
        "householdSize": 3,
        "annualIncome": 45000,
        "employmentStatus": "Full-time",
        "bedroomPreference": "2BR",
        "minRent": 0,
        "maxRent": 1500,
        "hasVoucher": false,
        "voucherDetails": "ignored without a voucher",
        "moveTimeline": "1-3 months",
        "accessibilityRequired": false,
        "accessibilityFeatures": ["Elevator"]
    })
}

fn router_for(store: Arc<dyn ProfileStore>) -> Router {
    let mut session = ProfileSession::new(store);
    session.restore().expect("profile restores");
    let listings = MockListingService::new(ListingStore::bundled().expect("bundled dataset"));
    profile_router(ProfileRoutes {
        session: Arc::new(Mutex::new(session)),
        listings: Arc::new(listings),
    })
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("body readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn put(payload: &Value) -> Request<Body> {
    Request::put("/api/v1/profile")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn profile_is_absent_until_intake_completes() {
    let router = router_for(Arc::new(InMemoryProfileStore::default()));

    let (status, body) = send(&router, get("/api/v1/profile")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn completed_intake_is_normalized_and_persisted() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store: Arc<dyn ProfileStore> = Arc::new(FileProfileStore::new(dir.path()));
    let router = router_for(store);

    let (status, body) = send(&router, put(&intake_payload())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullName"], "Ana Lopez");
    assert!(body.get("voucherDetails").is_none());
    assert_eq!(body["accessibilityFeatures"], json!([]));

    // A fresh session over the same directory sees the saved profile.
    let reopened = router_for(Arc::new(FileProfileStore::new(dir.path())));
    let (status, body) = send(&reopened, get("/api/v1/profile")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["householdSize"], 3);
    assert_eq!(body["boroughs"], json!(["Queens", "Bronx"]));
}

#[tokio::test]
async fn invalid_intake_reports_the_failing_step() {
    let router = router_for(Arc::new(InMemoryProfileStore::default()));
    let mut payload = intake_payload();
    payload["minRent"] = json!(2000);

    let (status, body) = send(&router, put(&payload)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["step"], "finances");
    assert_eq!(send(&router, get("/api/v1/profile")).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_clears_session_and_storage() {
    let store = Arc::new(InMemoryProfileStore::default());
    let router = router_for(store.clone());
    send(&router, put(&intake_payload())).await;

    let (status, _) = send(
        &router,
        Request::delete("/api/v1/profile").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.load().expect("store readable").is_none());
    assert_eq!(send(&router, get("/api/v1/profile")).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn matches_use_profile_income_and_rent_ceiling() {
    let router = router_for(Arc::new(InMemoryProfileStore::default()));
    send(&router, put(&intake_payload())).await;

    let (status, body) = send(&router, get("/api/v1/profile/matches?borough=Queens")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Ana");
    assert_eq!(body["count"], 2);
    let ids: Vec<&str> = body["matches"]
        .as_array()
        .expect("matches array")
        .iter()
        .map(|listing| listing["id"].as_str().expect("listing id"))
        .collect();
    assert_eq!(ids, vec!["L-1002", "L-1008"]);
}

#[tokio::test]
async fn matches_require_a_profile() {
    let router = router_for(Arc::new(InMemoryProfileStore::default()));

    let (status, _) = send(&router, get("/api/v1/profile/matches")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
