//! Chat model provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for chat-model text generation
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a completion for a fully composed prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier in use
    fn model(&self) -> &str;
}
