//! Query-time retrieval against the vector index

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{Embedder, VectorIndex};
use crate::types::SearchMatch;

/// Embeds a query with the ingestion-time embedder and searches the index
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>, top_k: usize) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }

    /// Retrieve the top-k most similar chunks for a query.
    ///
    /// An empty index yields an empty Vec. A dimension mismatch between the
    /// embedder and its own advertised width fails fast rather than letting
    /// the index truncate or pad.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchMatch>> {
        let embedding = self.embedder.embed(query).await?;

        if embedding.len() != self.embedder.dimensions() {
            return Err(Error::Embedding(format!(
                "Query embedding has {} dims, embedder advertises {}",
                embedding.len(),
                self.embedder.dimensions()
            )));
        }

        self.index.query(&embedding, self.top_k).await
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}
