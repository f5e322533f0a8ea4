use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use caravan_core::search::{
    code_string, CombinedResults, CombinedSearchRequest, ProviderFailure, SearchRequest,
    TboSearchRequest,
};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/search/hotels", post(combined_search))
}

/// POST /search/hotels — fan-out to Ratehawk and TBO, best effort per branch.
///
/// Always answers 200 with `success: true`; a branch that was not requested
/// stays null and a branch that failed lands in `results.errors`. Callers
/// must inspect `errors`, not the status code.
async fn combined_search(
    State(state): State<AppState>,
    Json(req): Json<CombinedSearchRequest>,
) -> Result<Json<Value>, AppError> {
    let has_checkin = req.checkin.as_deref().is_some_and(|s| !s.is_empty());
    let has_checkout = req.checkout.as_deref().is_some_and(|s| !s.is_empty());
    if !has_checkin || !has_checkout {
        return Err(AppError::MissingParameter(
            "Missing required parameters: checkin, checkout".to_string(),
        ));
    }

    let mut results = CombinedResults::default();

    if let Some(region_id) = req.region_id.clone().filter(|v| !v.is_null()) {
        let search_req = SearchRequest {
            checkin: req.checkin.clone(),
            checkout: req.checkout.clone(),
            residency: req.residency.clone(),
            language: req.language.clone(),
            guests: req.guests.clone(),
            currency: req.currency.clone(),
            region_id: Some(region_id),
        };
        match state.ratehawk.search(&search_req).await {
            Ok(data) => results.ratehawk = Some(data),
            Err(err) => {
                tracing::error!(error = %err, "combined search: ratehawk branch failed");
                results.errors.push(ProviderFailure {
                    provider: "ratehawk".to_string(),
                    error: err.to_string(),
                });
            }
        }
    }

    if let Some(city) = req.tbo_city_code.as_ref().and_then(code_string) {
        let tbo_req = TboSearchRequest {
            city_hint: Some(city),
            hotel_codes: None,
            checkin: req.checkin.clone(),
            checkout: req.checkout.clone(),
            country_code: Some(req.country_code.clone().unwrap_or_else(|| "AE".to_string())),
            guests: Some(req.guests.clone()),
        };
        match state.tbo.search(&tbo_req).await {
            Ok(data) => results.tbo = Some(data),
            Err(err) => {
                tracing::error!(error = %err, "combined search: tbo branch failed");
                results.errors.push(ProviderFailure {
                    provider: "tbo".to_string(),
                    error: err.to_string(),
                });
            }
        }
    }

    Ok(Json(json!({
        "success": true,
        "results": results,
        "searchParams": {
            "checkin": req.checkin,
            "checkout": req.checkout,
            "residency": req.residency,
            "language": req.language,
            "guests": req.guests,
            "currency": req.currency,
            "region_id": req.region_id,
            "tbo_city_code": req.tbo_city_code,
            "country_code": req.country_code,
        },
    })))
}
