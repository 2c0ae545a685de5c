//! Chat endpoints

use std::time::Instant;

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::{AppState, DEFAULT_SESSION};
use crate::types::query::{ChatRequest, ClearHistoryRequest};
use crate::types::response::ChatResponse;

/// POST /api/chat - ask a question against the ingested corpus
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let start = Instant::now();
    let session_id = request
        .session_id
        .unwrap_or_else(|| DEFAULT_SESSION.to_string());

    tracing::info!(session = %session_id, question = %request.question, "Chat turn");

    let session = state.session(&session_id);
    let mut session = session.lock().await;
    let turn = session.ask(&request.question).await?;

    Ok(Json(ChatResponse {
        answer: turn.answer,
        session_id,
        chunks_retrieved: turn.chunks_retrieved,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}

/// POST /api/chat/clear - reset one session's conversation memory.
/// The vector index is not touched.
pub async fn clear_history(
    State(state): State<AppState>,
    Json(request): Json<ClearHistoryRequest>,
) -> Json<serde_json::Value> {
    let session_id = request
        .session_id
        .unwrap_or_else(|| DEFAULT_SESSION.to_string());

    let session = state.session(&session_id);
    session.lock().await.clear_history();

    Json(serde_json::json!({
        "session_id": session_id,
        "cleared": true,
    }))
}
