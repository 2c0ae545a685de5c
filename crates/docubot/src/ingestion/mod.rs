//! Document ingestion: extraction, chunking, staging, and orchestration

pub mod chunker;
pub mod extract;
mod pipeline;
pub mod staging;

pub use chunker::TextChunker;
pub use extract::DocumentExtractor;
pub use pipeline::{hash_content, IngestOutcome, IngestPipeline};
pub use staging::{FsStaging, MemoryStaging, Staging};
