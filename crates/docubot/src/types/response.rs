//! Response bodies for the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUploadResult {
    /// Uploaded filename
    pub filename: String,
    /// Whether extraction + upsert succeeded end to end
    pub success: bool,
    /// Human-readable status message
    pub message: String,
    /// Number of chunks upserted (0 on failure)
    pub chunks: usize,
    /// Content hash of the extracted text (present on successful extraction)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    /// When processing of this file finished
    pub processed_at: DateTime<Utc>,
}

/// POST /api/upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Per-file outcomes, in upload order
    pub files: Vec<FileUploadResult>,
    /// True only when every file in the batch succeeded
    pub all_uploaded: bool,
}

impl UploadResponse {
    pub fn new(files: Vec<FileUploadResult>) -> Self {
        let all_uploaded = !files.is_empty() && files.iter().all(|f| f.success);
        Self {
            files,
            all_uploaded,
        }
    }
}

/// POST /api/chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The grounded answer
    pub answer: String,
    /// Session the answer belongs to
    pub session_id: String,
    /// Number of chunks retrieved for this turn
    pub chunks_retrieved: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// POST /api/index/clear response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearIndexResponse {
    /// Whether the remote delete-all call succeeded
    pub cleared: bool,
    /// Status message
    pub message: String,
}
