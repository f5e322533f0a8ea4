use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use caravan_core::flights::{FlightPassenger, FlightSlice};
use caravan_core::CoreError;

use crate::state::AppState;

fn default_passengers() -> Vec<FlightPassenger> {
    vec![FlightPassenger {
        kind: "adult".to_string(),
    }]
}

fn default_cabin_class() -> String {
    "economy".to_string()
}

fn default_max_connections() -> u32 {
    2
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    #[serde(default = "default_passengers")]
    pub passengers: Vec<FlightPassenger>,
    #[serde(default = "default_cabin_class")]
    pub cabin_class: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct AirportParams {
    pub q: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/search", post(search_flights))
        .route("/offers/{offer_id}", get(offer_details))
        .route("/airports", get(search_airports))
        .route("/airlines/{airline_id}", get(airline))
}

// ============================================================================
// Response Shapers
// ============================================================================

fn shape_segment(segment: &Value) -> Value {
    json!({
        "id": segment["id"],
        "origin": segment["origin"],
        "destination": segment["destination"],
        "departureTime": segment["departing_at"],
        "arrivalTime": segment["arriving_at"],
        "duration": segment["duration"],
        "aircraft": segment["aircraft"],
        "airline": segment["marketing_carrier"],
        "flightNumber": segment["marketing_carrier_flight_number"],
        "cabinClass": segment["cabin_class"],
        "passengerIdentityDocumentsRequired": segment["passenger_identity_documents_required"],
    })
}

fn shape_slice(slice: &Value) -> Value {
    json!({
        "origin": slice["origin"],
        "destination": slice["destination"],
        "segments": slice["segments"]
            .as_array()
            .map(|segments| segments.iter().map(shape_segment).collect::<Vec<_>>())
            .unwrap_or_default(),
    })
}

fn shape_passenger(passenger: &Value) -> Value {
    json!({
        "id": passenger["id"],
        "type": passenger["type"],
        "givenName": passenger["given_name"],
        "familyName": passenger["family_name"],
        "age": passenger["age"],
    })
}

fn shape_offer(offer: &Value) -> Value {
    json!({
        "id": offer["id"],
        "totalAmount": offer["total_amount"],
        "totalCurrency": offer["total_currency"],
        "slices": offer["slices"]
            .as_array()
            .map(|slices| slices.iter().map(shape_slice).collect::<Vec<_>>())
            .unwrap_or_default(),
        "passengers": offer["passengers"]
            .as_array()
            .map(|passengers| passengers.iter().map(shape_passenger).collect::<Vec<_>>())
            .unwrap_or_default(),
        "owner": offer["owner"],
        "expiresAt": offer["expires_at"],
        "createdAt": offer["created_at"],
    })
}

fn shape_airport(airport: &Value) -> Value {
    json!({
        "id": airport["id"],
        "name": airport["name"],
        "city": airport["city_name"],
        "country": airport["country_name"],
        "iataCode": airport["iata_code"],
        "icaoCode": airport["icao_code"],
        "latitude": airport["latitude"],
        "longitude": airport["longitude"],
        "timeZone": airport["time_zone"],
    })
}

// Provider rejections surface as 400 with the provider's own wording;
// anything else is a plain 500.
fn provider_error(context: &str, err: CoreError) -> (StatusCode, Json<Value>) {
    match err {
        CoreError::Upstream(message) => {
            tracing::error!("{}: {}", context, message);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": message })),
            )
        }
        other => {
            tracing::error!("{}: {}", context, other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Internal server error" })),
            )
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /flights/search
async fn search_flights(
    State(state): State<AppState>,
    Json(req): Json<FlightSearchRequest>,
) -> (StatusCode, Json<Value>) {
    let (origin, destination, departure_date) = match (
        req.origin.filter(|s| !s.is_empty()),
        req.destination.filter(|s| !s.is_empty()),
        req.departure_date.filter(|s| !s.is_empty()),
    ) {
        (Some(o), Some(d), Some(date)) => (o, d, date),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "Origin, destination, and departure date are required",
                })),
            )
        }
    };

    let mut slices = vec![FlightSlice {
        origin: origin.clone(),
        destination: destination.clone(),
        departure_date,
    }];
    if let Some(return_date) = req.return_date.filter(|s| !s.is_empty()) {
        slices.push(FlightSlice {
            origin: destination,
            destination: origin,
            departure_date: return_date,
        });
    }

    match state
        .flights
        .search_flights(&slices, &req.passengers, &req.cabin_class, req.max_connections)
        .await
    {
        Ok(data) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "offerRequestId": data.offer_request_id,
                    "offers": data.offers.iter().map(shape_offer).collect::<Vec<_>>(),
                    "slices": data.slices,
                },
            })),
        ),
        Err(err) => provider_error("Flight search failed", err),
    }
}

/// GET /flights/offers/{offer_id}
async fn offer_details(
    State(state): State<AppState>,
    Path(offer_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.flights.offer_details(&offer_id).await {
        Ok(offer) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": offer })),
        ),
        Err(err) => provider_error("Failed to get offer details", err),
    }
}

/// GET /flights/airports?q=
async fn search_airports(
    State(state): State<AppState>,
    Query(params): Query<AirportParams>,
) -> (StatusCode, Json<Value>) {
    let Some(query) = params.q.filter(|q| !q.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Query parameter is required" })),
        );
    };

    match state.flights.search_airports(&query).await {
        Ok(airports) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": airports.iter().map(shape_airport).collect::<Vec<_>>(),
            })),
        ),
        Err(err) => provider_error("Airport search failed", err),
    }
}

/// GET /flights/airlines/{airline_id}
async fn airline(
    State(state): State<AppState>,
    Path(airline_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.flights.airline(&airline_id).await {
        Ok(airline) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": airline })),
        ),
        Err(err) => provider_error("Failed to get airline info", err),
    }
}
