//! Application state for the HTTP server

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::chat::{ChatSession, Retriever};
use crate::config::BotConfig;
use crate::error::Result;
use crate::ingestion::{DocumentExtractor, IngestPipeline, Staging, TextChunker};
use crate::providers::{Captioner, ChatModel, Embedder, VectorIndex};

/// Session id used when the client does not supply one
pub const DEFAULT_SESSION: &str = "default";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BotConfig,
    pipeline: IngestPipeline,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    chat: Arc<dyn ChatModel>,
    /// One chat session per client-supplied id. The mutex serializes turns
    /// within a session; sessions are independent of one another.
    sessions: DashMap<String, Arc<Mutex<ChatSession>>>,
}

impl AppState {
    /// Assemble state from explicitly constructed providers.
    ///
    /// Nothing here reads ambient process state; every collaborator is
    /// injected so the whole server can run against fakes.
    pub fn new(
        config: BotConfig,
        embedder: Arc<dyn Embedder>,
        captioner: Arc<dyn Captioner>,
        chat: Arc<dyn ChatModel>,
        index: Arc<dyn VectorIndex>,
        staging: Arc<dyn Staging>,
    ) -> Result<Self> {
        config.validate()?;

        let extractor =
            DocumentExtractor::new(captioner, config.staging.caption_workers());
        let chunker = TextChunker::from_config(&config.chunking)?;
        let pipeline = IngestPipeline::new(
            extractor,
            chunker,
            Arc::clone(&embedder),
            Arc::clone(&index),
            staging,
        );

        tracing::info!(
            embedder = embedder.name(),
            index = index.name(),
            chat = chat.name(),
            "Application state initialized"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                embedder,
                index,
                chat,
                sessions: DashMap::new(),
            }),
        })
    }

    pub fn config(&self) -> &BotConfig {
        &self.inner.config
    }

    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.inner.index
    }

    /// Get or create the chat session for an id
    pub fn session(&self, id: &str) -> Arc<Mutex<ChatSession>> {
        self.inner
            .sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session = %id, "Creating chat session");
                let retriever = Retriever::new(
                    Arc::clone(&self.inner.embedder),
                    Arc::clone(&self.inner.index),
                    self.inner.config.retrieval.top_k,
                );
                Arc::new(Mutex::new(ChatSession::new(
                    retriever,
                    Arc::clone(&self.inner.chat),
                )))
            })
            .clone()
    }

    /// Number of live chat sessions
    pub fn session_count(&self) -> usize {
        self.inner.sessions.len()
    }
}
