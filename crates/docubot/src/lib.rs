//! docubot: document Q&A pipeline
//!
//! Ingests PDF, DOCX, TXT, and slide-deck uploads: extracts text, describes
//! embedded images via a multimodal model, chunks and embeds the result,
//! and upserts vectors into a remote index. Questions are then answered by
//! retrieval-augmented chat sessions with per-session conversation memory.

pub mod chat;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod types;

pub use chat::{ChatSession, ConversationMemory};
pub use config::BotConfig;
pub use error::{Error, Result};
pub use ingestion::{IngestOutcome, IngestPipeline};
pub use types::{Format, SourceDocument};
