use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use caravan_api::state::{AppState, ProviderHealth};
use caravan_api::app;
use caravan_core::flights::{FlightPassenger, FlightSearchData, FlightSlice};
use caravan_core::search::{RatehawkSuggestions, SearchRequest, Suggestion, TboSearchRequest};
use caravan_core::store::{HotelPage, HotelStore};
use caravan_core::supplier::{FlightSupplier, RatehawkSupplier, TboSupplier};
use caravan_core::{CoreError, CoreResult};

// ============================================================================
// Mock suppliers
// ============================================================================

#[derive(Default)]
struct MockStore {
    calls: AtomicUsize,
    items: Vec<Value>,
}

#[async_trait]
impl HotelStore for MockStore {
    async fn list(&self, _cursor: Option<&str>) -> CoreResult<HotelPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HotelPage {
            items: self.items.clone(),
            next_cursor: None,
        })
    }

    async fn search_by_name(&self, _name: &str) -> CoreResult<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.clone())
    }

    async fn filter_by_region(&self, _region: &str) -> CoreResult<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.clone())
    }
}

#[derive(Default)]
struct MockRatehawk {
    calls: AtomicUsize,
    fail_search: bool,
}

#[async_trait]
impl RatehawkSupplier for MockRatehawk {
    async fn suggest(
        &self,
        _query: &str,
        _language: &str,
        _limit: u32,
    ) -> CoreResult<RatehawkSuggestions> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RatehawkSuggestions::default())
    }

    async fn search(&self, _req: &SearchRequest) -> CoreResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(CoreError::Upstream(
                "Ratehawk API error: 503 - unavailable".to_string(),
            ));
        }
        Ok(json!({ "hotels": [] }))
    }
}

#[derive(Default)]
struct MockTbo {
    calls: AtomicUsize,
    last_search: Mutex<Option<TboSearchRequest>>,
}

#[async_trait]
impl TboSupplier for MockTbo {
    async fn suggest(&self, _query: &str, _country_code: &str) -> CoreResult<Vec<Suggestion>> {
        Ok(Vec::new())
    }

    async fn hotel_codes(&self, _city_code: &str, _detailed: Value) -> CoreResult<Value> {
        Ok(json!({}))
    }

    async fn search(&self, req: &TboSearchRequest) -> CoreResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_search.lock().unwrap() = Some(req.clone());
        Ok(json!({ "Status": { "Code": 200, "Description": "Successful" } }))
    }
}

struct MockFlights;

#[async_trait]
impl FlightSupplier for MockFlights {
    async fn search_flights(
        &self,
        slices: &[FlightSlice],
        _passengers: &[FlightPassenger],
        _cabin_class: &str,
        _max_connections: u32,
    ) -> CoreResult<FlightSearchData> {
        Ok(FlightSearchData {
            offer_request_id: "orq_1".to_string(),
            offers: Vec::new(),
            slices: serde_json::to_value(slices).unwrap(),
        })
    }

    async fn offer_details(&self, offer_id: &str) -> CoreResult<Value> {
        Ok(json!({ "id": offer_id }))
    }

    async fn search_airports(&self, _query: &str) -> CoreResult<Vec<Value>> {
        Ok(Vec::new())
    }

    async fn airline(&self, airline_id: &str) -> CoreResult<Value> {
        Ok(json!({ "id": airline_id }))
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    store: Arc<MockStore>,
    ratehawk: Arc<MockRatehawk>,
    tbo: Arc<MockTbo>,
}

fn build(store: MockStore, ratehawk: MockRatehawk, tbo: MockTbo) -> (axum::Router, Harness) {
    let store = Arc::new(store);
    let ratehawk = Arc::new(ratehawk);
    let tbo = Arc::new(tbo);

    let state = AppState {
        store: store.clone(),
        ratehawk: ratehawk.clone(),
        tbo: tbo.clone(),
        flights: Arc::new(MockFlights),
        health: ProviderHealth {
            store: "connected",
            ratehawk: "configured",
            tbo: "configured",
            duffel: "configured",
        },
    };

    (app(state), Harness { store, ratehawk, tbo })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Hotel store routes
// ============================================================================

#[tokio::test]
async fn hotels_search_without_name_is_rejected_before_the_store() {
    let (app, harness) = build(MockStore::default(), MockRatehawk::default(), MockTbo::default());

    let response = app.oneshot(get("/hotels/search")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing ?name param");
    assert_eq!(harness.store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn hotels_list_returns_page_envelope() {
    let store = MockStore {
        items: vec![json!({ "id": "h1", "name": "Palm Inn" }), json!({ "id": "h2" })],
        ..Default::default()
    };
    let (app, _) = build(store, MockRatehawk::default(), MockTbo::default());

    let response = app.oneshot(get("/hotels")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["items"][0]["name"], "Palm Inn");
    assert_eq!(body["nextPageToken"], Value::Null);
}

// ============================================================================
// Ratehawk routes
// ============================================================================

#[tokio::test]
async fn ratehawk_search_requires_all_parameters() {
    let (app, harness) = build(MockStore::default(), MockRatehawk::default(), MockTbo::default());

    let missing_region = post_json(
        "/ratehawk/search",
        json!({ "checkin": "2025-12-01", "checkout": "2025-12-05" }),
    );
    let response = app.clone().oneshot(missing_region).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Missing required parameters: checkin, checkout, region_id"
    );

    let missing_checkin = post_json(
        "/ratehawk/search",
        json!({ "checkout": "2025-12-05", "region_id": 965847972i64 }),
    );
    let response = app.oneshot(missing_checkin).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(harness.ratehawk.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn ratehawk_suggest_requires_query() {
    let (app, harness) = build(MockStore::default(), MockRatehawk::default(), MockTbo::default());

    let response = app.oneshot(post_json("/ratehawk/suggest", json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Query parameter is required");
    assert_eq!(harness.ratehawk.calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Combined search
// ============================================================================

#[tokio::test]
async fn combined_search_isolates_a_failing_branch() {
    let ratehawk = MockRatehawk {
        fail_search: true,
        ..Default::default()
    };
    let (app, harness) = build(MockStore::default(), ratehawk, MockTbo::default());

    let request = post_json(
        "/search/hotels",
        json!({
            "checkin": "2025-12-01",
            "checkout": "2025-12-05",
            "region_id": "965847972",
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["results"]["ratehawk"], Value::Null);
    assert_eq!(body["results"]["tbo"], Value::Null);

    let errors = body["results"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["provider"], "ratehawk");
    assert_eq!(errors[0]["error"], "Ratehawk API error: 503 - unavailable");

    // No TBO city hint, so that branch never ran.
    assert_eq!(harness.tbo.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn combined_search_requires_both_dates() {
    let (app, harness) = build(MockStore::default(), MockRatehawk::default(), MockTbo::default());

    let response = app
        .oneshot(post_json("/search/hotels", json!({ "checkin": "2025-12-01" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing required parameters: checkin, checkout");
    assert_eq!(harness.ratehawk.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.tbo.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn combined_search_runs_both_branches_when_requested() {
    let (app, harness) = build(MockStore::default(), MockRatehawk::default(), MockTbo::default());

    let request = post_json(
        "/search/hotels",
        json!({
            "checkin": "2025-12-01",
            "checkout": "2025-12-05",
            "region_id": 965847972i64,
            "tbo_city_code": "100765",
            "country_code": "AE",
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["results"]["ratehawk"].is_object());
    assert!(body["results"]["tbo"].is_object());
    assert_eq!(body["results"]["errors"], json!([]));
    assert_eq!(body["searchParams"]["tbo_city_code"], "100765");

    assert_eq!(harness.ratehawk.calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.tbo.calls.load(Ordering::SeqCst), 1);

    let tbo_req = harness.tbo.last_search.lock().unwrap().clone().unwrap();
    assert_eq!(tbo_req.city_hint.as_deref(), Some("100765"));
    assert_eq!(tbo_req.country_code.as_deref(), Some("AE"));
}

// ============================================================================
// TBO routes
// ============================================================================

#[tokio::test]
async fn tbo_search_translates_the_free_form_body() {
    let (app, harness) = build(MockStore::default(), MockRatehawk::default(), MockTbo::default());

    let request = post_json(
        "/tbo/search",
        json!({
            "tbo_city_code": "100765",
            "CheckIn": "2025-12-01",
            "CheckOut": "2025-12-05",
            "country_code": "AE",
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["provider"], "tbo");
    assert_eq!(body["data"]["Status"]["Code"], 200);

    let tbo_req = harness.tbo.last_search.lock().unwrap().clone().unwrap();
    assert_eq!(tbo_req.city_hint.as_deref(), Some("100765"));
    assert_eq!(tbo_req.checkin.as_deref(), Some("2025-12-01"));
    assert_eq!(tbo_req.checkout.as_deref(), Some("2025-12-05"));
    assert_eq!(tbo_req.country_code.as_deref(), Some("AE"));
    assert!(tbo_req.hotel_codes.is_none());
}

#[tokio::test]
async fn tbo_hotel_codes_requires_city_code() {
    let (app, _) = build(MockStore::default(), MockRatehawk::default(), MockTbo::default());

    let response = app
        .oneshot(post_json("/tbo/hotel-codes", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "CityCode parameter is required");
}

// ============================================================================
// Flights routes
// ============================================================================

#[tokio::test]
async fn flights_search_requires_core_fields() {
    let (app, _) = build(MockStore::default(), MockRatehawk::default(), MockTbo::default());

    let response = app
        .oneshot(post_json("/flights/search", json!({ "origin": "JFK" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Origin, destination, and departure date are required");
}

#[tokio::test]
async fn flights_search_builds_a_return_slice() {
    let (app, _) = build(MockStore::default(), MockRatehawk::default(), MockTbo::default());

    let request = post_json(
        "/flights/search",
        json!({
            "origin": "JFK",
            "destination": "LHR",
            "departureDate": "2025-12-10",
            "returnDate": "2025-12-20",
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["offerRequestId"], "orq_1");
    // MockFlights echoes the slices it was handed.
    let slices = body["data"]["slices"].as_array().unwrap();
    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0]["origin"], "JFK");
    assert_eq!(slices[1]["origin"], "LHR");
    assert_eq!(slices[1]["departure_date"], "2025-12-20");
}

#[tokio::test]
async fn flights_airports_requires_query() {
    let (app, _) = build(MockStore::default(), MockRatehawk::default(), MockTbo::default());

    let response = app.oneshot(get("/flights/airports")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn flights_offer_details_pass_through() {
    let (app, _) = build(MockStore::default(), MockRatehawk::default(), MockTbo::default());

    let response = app.oneshot(get("/flights/offers/off_123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], "off_123");
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_reports_service_state() {
    let (app, _) = build(MockStore::default(), MockRatehawk::default(), MockTbo::default());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["services"]["store"], "connected");
    assert_eq!(body["services"]["tbo"], "configured");
    assert!(body["timestamp"].is_string());
}
