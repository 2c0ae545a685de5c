//! Configuration for the document Q&A pipeline

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// OpenAI (embedding / captioning / chat) configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Pinecone vector index configuration
    #[serde(default)]
    pub pinecone: PineconeConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Staging configuration
    #[serde(default)]
    pub staging: StagingConfig,
}

impl BotConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config: {}", e)))?;
        Ok(config)
    }

    /// Apply environment overrides for secrets and endpoint identifiers.
    ///
    /// Recognized variables: `OPENAI_API_KEY`, `PINECONE_API_KEY`,
    /// `PINECONE_HOST`, `PINECONE_INDEX`.
    pub fn apply_env(mut self) -> Self {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai.api_key = key;
        }
        if let Ok(key) = std::env::var("PINECONE_API_KEY") {
            self.pinecone.api_key = key;
        }
        if let Ok(host) = std::env::var("PINECONE_HOST") {
            self.pinecone.host = host;
        }
        if let Ok(index) = std::env::var("PINECONE_INDEX") {
            self.pinecone.index_name = index;
        }
        self
    }

    /// Validate cross-field invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be > 0".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be < chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// OpenAI API configuration: one key and endpoint serve the embedding,
/// captioning, and chat roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key (overridable via OPENAI_API_KEY)
    #[serde(default)]
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Embedding dimensions (must match the vector index schema)
    pub dimensions: usize,
    /// Chat / captioning model name
    pub chat_model: String,
    /// Temperature for chat generation
    pub temperature: f32,
    /// Maximum tokens per chat response
    pub max_tokens: u32,
    /// Request timeout in seconds; a timeout counts as a call failure
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com".to_string(),
            embed_model: "text-embedding-ada-002".to_string(),
            dimensions: 1536,
            chat_model: "gpt-4o".to_string(),
            temperature: 0.3,
            max_tokens: 1024,
            timeout_secs: 60,
        }
    }
}

/// Pinecone vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PineconeConfig {
    /// API key (overridable via PINECONE_API_KEY)
    #[serde(default)]
    pub api_key: String,
    /// Index host, e.g. "my-index-abc123.svc.us-east-1.pinecone.io"
    #[serde(default)]
    pub host: String,
    /// Index name (informational; the host addresses the index)
    #[serde(default)]
    pub index_name: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: String::new(),
            index_name: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Text chunking configuration.
///
/// Units are Unicode scalar values (chars), uniformly: re-ingesting a corpus
/// with the same settings reproduces the same chunk boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in chars
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in chars (must be < chunk_size)
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per chat turn
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Staging checkpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Directory for transient extracted-text artifacts
    pub dir: PathBuf,
    /// Bounded concurrency for image captioning within one document
    pub caption_concurrency: Option<usize>,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./docs"),
            caption_concurrency: None, // min(4, cpu count)
        }
    }
}

impl StagingConfig {
    /// Effective caption worker count
    pub fn caption_workers(&self) -> usize {
        self.caption_concurrency
            .unwrap_or_else(|| num_cpus::get().min(4))
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.openai.dimensions, 1536);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        let mut config = BotConfig::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let toml = r#"
            [chunking]
            chunk_size = 500
            chunk_overlap = 50

            [retrieval]
            top_k = 3
        "#;
        let config: BotConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.retrieval.top_k, 3);
        // Unspecified sections fall back to defaults
        assert_eq!(config.server.port, 8080);
    }
}
