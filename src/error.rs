// src/error.rs
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::services::gemini::UpstreamError;
use crate::services::language::Language;

/// Everything a handler or the guard can fail with. Validation and policy
/// errors carry their own status; upstream and internal failures collapse
/// to a generic 500 with the detail logged, never returned.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("not allowed by CORS")]
    ForbiddenOrigin,

    #[error("rate limit exceeded")]
    TooManyRequests,

    #[error("generative upstream failed")]
    Upstream {
        language: Language,
        apology: String,
        #[source]
        source: UpstreamError,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ForbiddenOrigin => {
                (StatusCode::FORBIDDEN, "Not allowed by CORS".to_string())
            }
            AppError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests from this IP, please try again later.".to_string(),
            ),
            AppError::Upstream { language, apology, source } => {
                tracing::error!(language = %language, error = %source, "upstream request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, apology)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "unexpected internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
