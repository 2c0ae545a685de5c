//! Pinecone vector index client
//!
//! HTTP client for a serverless Pinecone-style index addressed by host.
//! The index schema (1536-dim float vectors, cosine metric, metadata
//! {source, text}) is managed out of band; this client only upserts,
//! clears, and queries.

use async_trait::async_trait;

use crate::config::PineconeConfig;
use crate::error::{Error, Result};
use crate::types::{RecordMetadata, SearchMatch, VectorRecord};

use super::vector_index::VectorIndex;

/// Pinecone index client
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl PineconeIndex {
    /// Create a new client from configuration.
    ///
    /// The host may be given bare ("my-index.svc.pinecone.io") or as a full
    /// URL; bare hosts get "https://" prepended.
    pub fn new(config: &PineconeConfig) -> Result<Self> {
        if config.host.is_empty() {
            return Err(Error::Config("pinecone.host is not set".to_string()));
        }

        let base_url = if config.host.starts_with("http://") || config.host.starts_with("https://")
        {
            config.host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", config.host.trim_end_matches('/'))
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and map non-success statuses to index errors
    async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Index(format!("Request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Index(format!(
                "{} returned {}: {}",
                path, status, text
            )));
        }

        Ok(response)
    }
}

#[derive(serde::Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    upserted_count: Option<usize>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest {
    delete_all: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(serde::Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(serde::Deserialize)]
struct QueryMatch {
    id: String,
    score: f32,
    metadata: Option<RecordMetadata>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    total_vector_count: usize,
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let request = UpsertRequest { vectors: records };
        let response = self.post_json("/vectors/upsert", &request).await?;

        let parsed: UpsertResponse = response
            .json()
            .await
            .map_err(|e| Error::Index(format!("Failed to parse upsert response: {}", e)))?;

        tracing::debug!(
            count = parsed.upserted_count.unwrap_or(records.len()),
            "Upserted vectors"
        );
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        let request = DeleteRequest { delete_all: true };
        self.post_json("/vectors/delete", &request).await?;
        Ok(())
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchMatch>> {
        let request = QueryRequest {
            vector: embedding,
            top_k,
            include_metadata: true,
        };

        let response = self.post_json("/query", &request).await?;

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::Index(format!("Failed to parse query response: {}", e)))?;

        // Matches arrive most-similar first; drop hits without metadata
        // (they cannot be turned into context)
        let matches = parsed
            .matches
            .into_iter()
            .filter_map(|m| {
                let metadata = m.metadata?;
                Some(SearchMatch {
                    id: m.id,
                    score: m.score,
                    metadata,
                })
            })
            .collect();

        Ok(matches)
    }

    async fn len(&self) -> Result<usize> {
        let response = self
            .post_json("/describe_index_stats", &serde_json::json!({}))
            .await?;

        let stats: StatsResponse = response
            .json()
            .await
            .map_err(|e| Error::Index(format!("Failed to parse index stats: {}", e)))?;

        Ok(stats.total_vector_count)
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}
