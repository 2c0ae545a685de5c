//! Retrieval-augmented chat: retrieval, prompt composition, and sessions

mod prompt;
mod retriever;
mod session;

pub use prompt::PromptBuilder;
pub use retriever::Retriever;
pub use session::{ChatSession, ChatTurn, ConversationMemory, SessionState};
