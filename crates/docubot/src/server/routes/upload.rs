//! Upload endpoint: multi-file ingestion with per-file status

use axum::{extract::Multipart, extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::document::{Format, SourceDocument};
use crate::types::response::{FileUploadResult, UploadResponse};

/// POST /api/upload - ingest uploaded files
///
/// Each file is processed independently: a failed document is reported in
/// its own result entry and never rolls back or blocks the others. The
/// aggregate `all_uploaded` flag is true only when every file succeeded.
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut results = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Internal(format!("Multipart error: {}", e)))?
    {
        let filename = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue, // not a file field
        };

        // Format is selected by extension; unsupported extensions are
        // rejected before any bytes reach the extractor
        let format = match Format::from_filename(&filename) {
            Some(format) => format,
            None => {
                let ext = filename.rsplit('.').next().unwrap_or("").to_string();
                tracing::warn!(%filename, "Rejected unsupported upload format");
                results.push(FileUploadResult {
                    filename,
                    success: false,
                    message: Error::UnsupportedFormat(ext).to_string(),
                    chunks: 0,
                    content_hash: None,
                    processed_at: chrono::Utc::now(),
                });
                continue;
            }
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::Internal(format!("Failed to read upload: {}", e)))?;

        let doc = SourceDocument::new(filename.clone(), format, bytes.to_vec());

        // Remote-call failures surface as a per-file status, never as a
        // crashed batch; earlier documents' records are untouched
        match state.pipeline().ingest(&doc).await {
            Ok(outcome) => {
                results.push(FileUploadResult {
                    filename,
                    success: true,
                    message: format!(
                        "Uploaded {} ({} chunks)",
                        format.display_name(),
                        outcome.chunks
                    ),
                    chunks: outcome.chunks,
                    content_hash: Some(outcome.content_hash),
                    processed_at: chrono::Utc::now(),
                });
            }
            Err(e) => {
                tracing::error!(%filename, error = %e, "Ingestion failed");
                results.push(FileUploadResult {
                    filename,
                    success: false,
                    message: e.to_string(),
                    chunks: 0,
                    content_hash: None,
                    processed_at: chrono::Utc::now(),
                });
            }
        }
    }

    Ok(Json(UploadResponse::new(results)))
}
