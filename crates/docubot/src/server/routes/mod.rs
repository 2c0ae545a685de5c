//! API routes

pub mod chat;
pub mod index;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Ingestion - with larger body limit for file uploads
        .route(
            "/upload",
            post(upload::upload_files).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Chat
        .route("/chat", post(chat::chat))
        .route("/chat/clear", post(chat::clear_history))
        // Index management
        .route("/index/clear", post(index::clear_index))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "docubot",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document Q&A with ingestion, image captioning, and retrieval-augmented chat",
        "formats": ["pdf", "docx", "txt", "ppt", "pptx"],
        "endpoints": {
            "POST /api/upload": "Upload and ingest documents",
            "POST /api/chat": "Ask a question (optionally scoped to a session_id)",
            "POST /api/chat/clear": "Clear one session's conversation history",
            "POST /api/index/clear": "Delete all vectors from the index",
        }
    }))
}
