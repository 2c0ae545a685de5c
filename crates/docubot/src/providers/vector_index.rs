//! Vector index provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{SearchMatch, VectorRecord};

/// Trait over a remote (or in-process) vector index.
///
/// Implementations:
/// - `PineconeIndex`: remote managed index over HTTP
/// - `MemoryIndex`: in-process cosine index for tests and local runs
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Upsert records. Idempotent per id: a repeated id replaces the prior
    /// vector and metadata rather than duplicating it.
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()>;

    /// Delete every vector while preserving the index itself (dimension,
    /// metric, schema) for future upserts.
    async fn clear_all(&self) -> Result<()>;

    /// Return the `top_k` nearest neighbors, most similar first. An empty
    /// index yields an empty Vec, not an error.
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchMatch>>;

    /// Number of vectors stored
    async fn len(&self) -> Result<usize>;

    /// Check if the index is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Provider name for logging
    fn name(&self) -> &str;
}
