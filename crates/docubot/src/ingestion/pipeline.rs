//! Ingestion pipeline orchestration
//!
//! extract -> stage -> chunk -> embed -> upsert -> unstage. Each step is a
//! hard dependency on the previous one succeeding. The staging artifact is
//! removed only after a successful upsert; on failure it is retained so the
//! document can be re-driven by hand (at-least-once, never silent loss).

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::providers::{Embedder, VectorIndex};
use crate::types::{SourceDocument, VectorRecord};

use super::chunker::TextChunker;
use super::extract::DocumentExtractor;
use super::staging::Staging;

/// Result of one successful ingestion
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// The rendered extracted text, returned for caller feedback
    pub text: String,
    /// Number of vector records upserted
    pub chunks: usize,
    /// Content hash of the rendered text
    pub content_hash: String,
}

/// Main ingestion pipeline
pub struct IngestPipeline {
    extractor: DocumentExtractor,
    chunker: TextChunker,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    staging: Arc<dyn Staging>,
}

impl IngestPipeline {
    pub fn new(
        extractor: DocumentExtractor,
        chunker: TextChunker,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        staging: Arc<dyn Staging>,
    ) -> Self {
        Self {
            extractor,
            chunker,
            embedder,
            index,
            staging,
        }
    }

    /// Ingest one document end to end.
    ///
    /// Record ids are batch-scoped (`doc_<i>`), so upserts are idempotent
    /// per batch position. Failures after staging leave the artifact in
    /// place; failures never touch records from earlier documents.
    pub async fn ingest(&self, doc: &SourceDocument) -> Result<IngestOutcome> {
        tracing::info!(filename = %doc.filename, format = ?doc.format, "Ingesting document");

        let extracted = self.extractor.extract(doc).await?;
        let text = extracted.render();

        self.staging.store(&doc.filename, &text).await?;

        let chunks = self.chunker.split(&text);
        if chunks.is_empty() {
            // Nothing to vectorize; the artifact has no retry value either
            self.staging.remove(&doc.filename).await?;
            return Ok(IngestOutcome {
                content_hash: hash_content(&text),
                text,
                chunks: 0,
            });
        }
        tracing::debug!(filename = %doc.filename, chunks = chunks.len(), "Split into chunks");

        let embeddings = self.embedder.embed_batch(&chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }
        for embedding in &embeddings {
            if embedding.len() != self.embedder.dimensions() {
                return Err(Error::Embedding(format!(
                    "Dimension mismatch: got {} dims, embedder advertises {}",
                    embedding.len(),
                    self.embedder.dimensions()
                )));
            }
        }

        let records: Vec<VectorRecord> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (chunk, embedding))| {
                VectorRecord::new(i, embedding, doc.filename.clone(), chunk)
            })
            .collect();

        self.index.upsert(&records).await?;

        // Upsert confirmed; the artifact has served its purpose. A failed
        // removal is not worth failing the ingestion over.
        if let Err(e) = self.staging.remove(&doc.filename).await {
            tracing::warn!(filename = %doc.filename, error = %e, "Could not remove staging artifact");
        }

        tracing::info!(
            filename = %doc.filename,
            records = records.len(),
            index = self.index.name(),
            "Ingestion complete"
        );

        Ok(IngestOutcome {
            content_hash: hash_content(&text),
            chunks: records.len(),
            text,
        })
    }

    /// Clear the entire vector index (the index itself survives)
    pub async fn clear_index(&self) -> Result<()> {
        self.index.clear_all().await
    }
}

/// Hash content for change tracking
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
