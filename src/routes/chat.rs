use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;
use tracing::debug;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, HealthResponse},
    services::language::{self, Language},
    state::SharedState,
};

const SERVICE_NAME: &str = "MIRASENS Chatbot API";

pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest(
            "Message is required and must be a string".to_string(),
        ));
    }

    // Resolved once and reused everywhere, including the failure path.
    let language = resolve_language(&payload, message);

    if let Some(response) = state.knowledge.find_scenario(message, language) {
        debug!(%language, "scenario matched, generative path skipped");
        return Ok(Json(ChatResponse { response: response.to_string(), language }));
    }

    let table = state.knowledge.table(language);
    let response = state
        .generative
        .complete(message, language, &payload.conversation_history, table)
        .await
        .map_err(|source| AppError::Upstream {
            language,
            apology: table.apology.clone(),
            source,
        })?;

    Ok(Json(ChatResponse { response, language }))
}

/// A valid client hint wins; otherwise run the heuristic detector.
fn resolve_language(payload: &ChatRequest, message: &str) -> Language {
    payload
        .language_hint()
        .unwrap_or_else(|| language::detect(message))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: SERVICE_NAME.to_string(),
    })
}

pub async fn not_found_handler() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Endpoint not found" })))
}
