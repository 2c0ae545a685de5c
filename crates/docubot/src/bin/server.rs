//! Document Q&A server binary
//!
//! Run with: cargo run -p docubot --bin docubot-server [config.toml]

use std::sync::Arc;

use docubot::config::BotConfig;
use docubot::ingestion::FsStaging;
use docubot::providers::{
    Captioner, ChatModel, Embedder, MemoryIndex, OpenAiClient, PineconeIndex, VectorIndex,
};
use docubot::server::{state::AppState, BotServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docubot=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Optional config file path as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => BotConfig::from_file(&path)?,
        None => BotConfig::default(),
    };
    let config = config.apply_env();
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {} ({} dims)", config.openai.embed_model, config.openai.dimensions);
    tracing::info!("  - Chat model: {}", config.openai.chat_model);
    tracing::info!("  - Chunking: size {} / overlap {}", config.chunking.chunk_size, config.chunking.chunk_overlap);
    tracing::info!("  - Staging dir: {}", config.staging.dir.display());

    if config.openai.api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; embedding/captioning/chat calls will fail");
    }

    let openai = Arc::new(OpenAiClient::new(&config.openai)?);
    let embedder: Arc<dyn Embedder> = openai.clone();
    let captioner: Arc<dyn Captioner> = openai.clone();
    let chat: Arc<dyn ChatModel> = openai;

    // Without a configured index host, fall back to the in-process index so
    // the pipeline can be exercised locally
    let index: Arc<dyn VectorIndex> = if config.pinecone.host.is_empty() {
        tracing::warn!("pinecone.host is not set; using the in-memory index (vectors are not persisted)");
        Arc::new(MemoryIndex::new())
    } else {
        tracing::info!("  - Vector index: {} ({})", config.pinecone.index_name, config.pinecone.host);
        Arc::new(PineconeIndex::new(&config.pinecone)?)
    };

    let staging = Arc::new(FsStaging::new(&config.staging.dir)?);

    let state = AppState::new(config, embedder, captioner, chat, index, staging)?;
    let server = BotServer::new(state);

    tracing::info!("API: http://{}", server.address());
    tracing::info!("  POST /api/upload      - Upload documents");
    tracing::info!("  POST /api/chat        - Ask questions");
    tracing::info!("  POST /api/chat/clear  - Clear conversation history");
    tracing::info!("  POST /api/index/clear - Clear the vector index");

    server.start().await?;

    Ok(())
}
