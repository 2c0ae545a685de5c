//! Provider abstractions for embeddings, captioning, chat, and the vector index
//!
//! Every external collaborator sits behind a trait so the pipeline and chat
//! session can be exercised with fakes.

pub mod captioner;
pub mod chat;
pub mod embedding;
pub mod memory;
pub mod openai;
pub mod pinecone;
pub mod vector_index;

pub use captioner::Captioner;
pub use chat::ChatModel;
pub use embedding::Embedder;
pub use memory::MemoryIndex;
pub use openai::OpenAiClient;
pub use pinecone::PineconeIndex;
pub use vector_index::VectorIndex;
