//! In-process vector index
//!
//! Cosine-similarity index kept in a map, used by tests and keyless local
//! runs. Shares the `VectorIndex` contract with the remote client: upsert
//! replaces per id, clear preserves the (notional) schema, empty queries
//! return empty.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::types::{SearchMatch, VectorRecord};

use super::vector_index::VectorIndex;

/// In-memory cosine index
#[derive(Default)]
pub struct MemoryIndex {
    records: RwLock<HashMap<String, VectorRecord>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        let mut map = self.records.write();
        for record in records {
            map.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        self.records.write().clear();
        Ok(())
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchMatch>> {
        let map = self.records.read();

        let mut matches: Vec<SearchMatch> = map
            .values()
            .map(|record| {
                if record.values.len() != embedding.len() {
                    return Err(Error::Index(format!(
                        "Dimension mismatch: query has {} dims, stored vector {} has {}",
                        embedding.len(),
                        record.id,
                        record.values.len()
                    )));
                }
                Ok(SearchMatch {
                    id: record.id.clone(),
                    score: Self::cosine_similarity(embedding, &record.values),
                    metadata: record.metadata.clone(),
                })
            })
            .collect::<Result<_>>()?;

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);

        Ok(matches)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordMetadata;

    fn record(id: &str, values: Vec<f32>, text: &str) -> VectorRecord {
        VectorRecord {
            id: id.to_string(),
            values,
            metadata: RecordMetadata {
                source: "test.txt".to_string(),
                text: text.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_query_empty_index_returns_empty() {
        let index = MemoryIndex::new();
        let matches = index.query(&[1.0, 0.0], 5).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_same_id_replaces() {
        let index = MemoryIndex::new();
        index
            .upsert(&[record("doc_0", vec![1.0, 0.0], "first")])
            .await
            .unwrap();
        index
            .upsert(&[record("doc_0", vec![0.0, 1.0], "second")])
            .await
            .unwrap();

        assert_eq!(index.len().await.unwrap(), 1);

        let matches = index.query(&[0.0, 1.0], 1).await.unwrap();
        assert_eq!(matches[0].metadata.text, "second");
    }

    #[tokio::test]
    async fn test_query_orders_most_similar_first() {
        let index = MemoryIndex::new();
        index
            .upsert(&[
                record("doc_0", vec![1.0, 0.0], "aligned"),
                record("doc_1", vec![0.0, 1.0], "orthogonal"),
                record("doc_2", vec![0.7, 0.7], "diagonal"),
            ])
            .await
            .unwrap();

        let matches = index.query(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].metadata.text, "aligned");
        assert_eq!(matches[1].metadata.text, "diagonal");
    }

    #[tokio::test]
    async fn test_clear_all_empties_but_remains_usable() {
        let index = MemoryIndex::new();
        index
            .upsert(&[record("doc_0", vec![1.0, 0.0], "x")])
            .await
            .unwrap();
        index.clear_all().await.unwrap();
        assert!(index.is_empty().await.unwrap());

        // Still accepts upserts after the clear
        index
            .upsert(&[record("doc_0", vec![1.0, 0.0], "y")])
            .await
            .unwrap();
        assert_eq!(index.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch_fails() {
        let index = MemoryIndex::new();
        index
            .upsert(&[record("doc_0", vec![1.0, 0.0, 0.0], "x")])
            .await
            .unwrap();
        let result = index.query(&[1.0, 0.0], 1).await;
        assert!(matches!(result, Err(Error::Index(_))));
    }
}
