use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Accepted for compatibility; paging is driven by `lastKey`.
    #[allow(dead_code)]
    pub page: Option<u32>,
    #[serde(rename = "lastKey")]
    pub last_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameParams {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegionParams {
    pub region: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hotels", get(list_hotels))
        .route("/hotels/search", get(search_hotels))
        .route("/hotels/location", get(filter_by_location))
}

/// GET /hotels — one page of the inventory scan, ten items at a time.
async fn list_hotels(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, AppError> {
    let page = state
        .store
        .list(params.last_key.as_deref())
        .await
        .map_err(|e| AppError::store("Failed to fetch hotels", e))?;

    Ok(Json(json!({
        "success": true,
        "count": page.items.len(),
        "items": page.items,
        "nextPageToken": page.next_cursor,
    })))
}

/// GET /hotels/search?name= — contains filter on the hotel name.
async fn search_hotels(
    State(state): State<AppState>,
    Query(params): Query<NameParams>,
) -> Result<Json<Value>, AppError> {
    let name = params
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::MissingParameter("Missing ?name param".to_string()))?;

    let items = state
        .store
        .search_by_name(&name)
        .await
        .map_err(|e| AppError::store("Failed to search hotels", e))?;

    Ok(Json(json!({ "success": true, "count": items.len(), "items": items })))
}

/// GET /hotels/location?region= — contains filter on the region name.
async fn filter_by_location(
    State(state): State<AppState>,
    Query(params): Query<RegionParams>,
) -> Result<Json<Value>, AppError> {
    let region = params
        .region
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::MissingParameter("Missing ?region param".to_string()))?;

    let items = state
        .store
        .filter_by_region(&region)
        .await
        .map_err(|e| AppError::store("Failed to filter hotels", e))?;

    Ok(Json(json!({ "success": true, "count": items.len(), "items": items })))
}
