use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use caravan_core::search::{code_string, TboSearchRequest};

use crate::error::AppError;
use crate::state::AppState;

// Keys a caller may use for the city hint, checked in this order.
const CITY_HINT_KEYS: [&str; 5] = ["tbo_city_code", "CityId", "CityCode", "RegionId", "region_id"];

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub query: Option<String>,
    pub country_code: Option<String>,
}

fn default_detailed() -> Value {
    Value::String("true".to_string())
}

#[derive(Debug, Deserialize)]
pub struct HotelCodesRequest {
    #[serde(rename = "CityCode")]
    pub city_code: Option<Value>,
    #[serde(rename = "IsDetailedResponse", default = "default_detailed")]
    pub is_detailed_response: Value,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tbo/suggest", post(suggest))
        .route("/tbo/hotel-codes", post(hotel_codes))
        .route("/tbo/search", post(search))
}

// ============================================================================
// Request Translator
// ============================================================================

fn string_field(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| body.get(*k).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Picks the TBO search inputs out of a free-form request body. Caller-given
/// `HotelCodes` arrays are respected; resolution only runs on the city hint.
fn translate_search(body: &Value) -> TboSearchRequest {
    let city_hint = CITY_HINT_KEYS
        .iter()
        .find_map(|k| body.get(*k).and_then(code_string));

    let hotel_codes = body
        .get("HotelCodes")
        .and_then(Value::as_array)
        .map(|codes| codes.iter().filter_map(code_string).collect());

    TboSearchRequest {
        city_hint,
        hotel_codes,
        checkin: string_field(body, &["CheckIn", "checkin"]),
        checkout: string_field(body, &["CheckOut", "checkout"]),
        country_code: string_field(body, &["CountryCode", "country_code"]),
        guests: body
            .get("guests")
            .and_then(|g| serde_json::from_value(g.clone()).ok()),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /tbo/suggest
async fn suggest(
    State(state): State<AppState>,
    Json(req): Json<SuggestRequest>,
) -> Result<Json<Value>, AppError> {
    let query = req
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::MissingParameter("Query parameter is required".to_string()))?;
    let country = req.country_code.as_deref().unwrap_or("AE");

    let regions = state
        .tbo
        .suggest(&query, country)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch TBO suggestions", e))?;

    Ok(Json(json!({
        "success": true,
        "regions": regions,
        "hotels": [],
        "provider": "tbo",
    })))
}

/// POST /tbo/hotel-codes
async fn hotel_codes(
    State(state): State<AppState>,
    Json(req): Json<HotelCodesRequest>,
) -> Result<Json<Value>, AppError> {
    let city = req
        .city_code
        .as_ref()
        .and_then(code_string)
        .ok_or_else(|| AppError::MissingParameter("CityCode parameter is required".to_string()))?;

    let data = state
        .tbo
        .hotel_codes(&city, req.is_detailed_response.clone())
        .await
        .map_err(|e| AppError::upstream("Failed to fetch hotel codes", e))?;

    Ok(Json(json!({ "success": true, "provider": "tbo", "data": data })))
}

/// POST /tbo/search — free-form body, translated then searched.
async fn search(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    tracing::debug!(body = %body, "tbo search request");
    let req = translate_search(&body);

    let data = state
        .tbo
        .search(&req)
        .await
        .map_err(|e| AppError::upstream("Failed to search TBO hotels", e))?;

    Ok(Json(json!({ "success": true, "provider": "tbo", "data": data })))
}
