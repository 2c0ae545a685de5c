//! Vector record and search match types

use serde::{Deserialize, Serialize};

/// Metadata stored alongside each vector in the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Source document filename
    pub source: String,
    /// Original chunk text
    pub text: String,
}

/// A record handed to the vector index.
///
/// Ids are batch-scoped (`doc_<index>`): unique within one ingestion call,
/// and deliberately reused across batches so re-ingestion replaces rather
/// than duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Opaque id, unique within one ingestion batch
    pub id: String,
    /// Embedding vector
    pub values: Vec<f32>,
    /// Source + chunk text metadata
    pub metadata: RecordMetadata,
}

impl VectorRecord {
    /// Build the batch-scoped id for a chunk index
    pub fn batch_id(index: usize) -> String {
        format!("doc_{}", index)
    }

    pub fn new(index: usize, values: Vec<f32>, source: String, text: String) -> Self {
        Self {
            id: Self::batch_id(index),
            values,
            metadata: RecordMetadata { source, text },
        }
    }
}

/// One similarity-search hit, most-similar-first in result order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Record id
    pub id: String,
    /// Similarity score under the index's configured metric
    pub score: f32,
    /// Stored metadata
    pub metadata: RecordMetadata,
}
