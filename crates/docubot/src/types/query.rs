//! Request bodies for the HTTP API

use serde::{Deserialize, Serialize};

/// POST /api/chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Session identifier; omitted means the shared default session
    #[serde(default)]
    pub session_id: Option<String>,
    /// The user's question
    pub question: String,
}

/// POST /api/chat/clear request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearHistoryRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}
