//! Vector index management endpoints

use axum::{extract::State, Json};

use crate::server::state::AppState;
use crate::types::response::ClearIndexResponse;

/// POST /api/index/clear - delete every vector, keeping the index itself.
///
/// Failures are reported as a boolean status with a logged message rather
/// than an error response; a clear that races a concurrent ingest is
/// undefined and must be serialized by the caller.
pub async fn clear_index(State(state): State<AppState>) -> Json<ClearIndexResponse> {
    match state.pipeline().clear_index().await {
        Ok(()) => {
            tracing::info!("Vector index cleared");
            Json(ClearIndexResponse {
                cleared: true,
                message: "Index cleared successfully".to_string(),
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to clear vector index");
            Json(ClearIndexResponse {
                cleared: false,
                message: e.to_string(),
            })
        }
    }
}
