use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "services": {
            "store": state.health.store,
            "ratehawk": state.health.ratehawk,
            "tbo": state.health.tbo,
            "duffel": state.health.duffel,
        },
    }))
}
