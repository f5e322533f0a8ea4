use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use caravan_core::CoreError;

/// API-boundary errors. Every variant renders as a JSON body with at least
/// an `error` field; upstream messages ride along unsanitized in `details`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    MissingParameter(String),
    #[error("{context}: {details}")]
    Upstream { context: String, details: String },
    #[error("{context}: {details}")]
    Store { context: String, details: String },
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Provider call failed; the route's fixed message plus the upstream text.
    pub fn upstream(context: &str, err: CoreError) -> Self {
        Self::Upstream {
            context: context.to_string(),
            details: err.to_string(),
        }
    }

    /// Hotel-table call failed; logged in full, reported generically.
    pub fn store(context: &str, err: CoreError) -> Self {
        Self::Store {
            context: context.to_string(),
            details: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingParameter(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            AppError::Upstream { context, details } => {
                tracing::error!("{}: {}", context, details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": context, "details": details }),
                )
            }
            AppError::Store { context, details } => {
                tracing::error!("{}: {}", context, details);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": context }))
            }
            AppError::Anyhow(err) => {
                tracing::error!("Unhandled error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "details": err.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
