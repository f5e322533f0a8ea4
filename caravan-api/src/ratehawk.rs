use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use caravan_core::search::{SearchRequest, Suggestion};

use crate::error::AppError;
use crate::state::AppState;

fn default_language() -> String {
    "en".to_string()
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub query: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ratehawk/suggest", post(suggest))
        .route("/ratehawk/search", post(search))
}

// ============================================================================
// Response Shapers
// ============================================================================

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn shape_region(region: &Value) -> Suggestion {
    Suggestion {
        id: present(region.get("id"))
            .or_else(|| present(region.get("region_id")))
            .cloned()
            .unwrap_or(Value::Null),
        name: region
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        kind: region
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("City")
            .to_string(),
        country_code: region
            .get("country_code")
            .and_then(Value::as_str)
            .map(str::to_string),
        provider: "ratehawk".to_string(),
    }
}

fn shape_hotel(hotel: &Value) -> Suggestion {
    Suggestion {
        id: present(hotel.get("id"))
            .or_else(|| present(hotel.get("hotel_id")))
            .cloned()
            .unwrap_or(Value::Null),
        name: hotel
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        kind: "Hotel".to_string(),
        country_code: hotel
            .get("country_code")
            .and_then(Value::as_str)
            .map(str::to_string),
        provider: "ratehawk".to_string(),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /ratehawk/suggest
async fn suggest(
    State(state): State<AppState>,
    Json(req): Json<SuggestRequest>,
) -> Result<Json<Value>, AppError> {
    let query = req
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::MissingParameter("Query parameter is required".to_string()))?;

    let suggestions = state
        .ratehawk
        .suggest(&query, &req.language, req.limit)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch suggestions", e))?;

    Ok(Json(json!({
        "success": true,
        "regions": suggestions.regions.iter().map(shape_region).collect::<Vec<_>>(),
        "hotels": suggestions.hotels.iter().map(shape_hotel).collect::<Vec<_>>(),
        "provider": "ratehawk",
    })))
}

/// POST /ratehawk/search
async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Value>, AppError> {
    let has_checkin = req.checkin.as_deref().is_some_and(|s| !s.is_empty());
    let has_checkout = req.checkout.as_deref().is_some_and(|s| !s.is_empty());
    let has_region = req.region_id.as_ref().is_some_and(|v| !v.is_null());
    if !has_checkin || !has_checkout || !has_region {
        return Err(AppError::MissingParameter(
            "Missing required parameters: checkin, checkout, region_id".to_string(),
        ));
    }

    let data = state
        .ratehawk
        .search(&req)
        .await
        .map_err(|e| AppError::upstream("Failed to search hotels", e))?;

    Ok(Json(json!({ "success": true, "provider": "ratehawk", "data": data })))
}
