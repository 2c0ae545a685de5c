//! OpenAI API client implementing the embedding, captioning, and chat roles
//!
//! One shared HTTP client serves all three roles, mirroring how a single
//! API key and endpoint back the whole hosted-model surface.

use async_trait::async_trait;
use base64::Engine;

use crate::config::OpenAiConfig;
use crate::error::{Error, Result};

use super::captioner::Captioner;
use super::chat::ChatModel;
use super::embedding::Embedder;

/// Fixed captioning instruction sent with every image
const CAPTION_INSTRUCTION: &str = "Describe the image";

/// OpenAI API client
pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn embeddings_endpoint(&self) -> String {
        format!("{}/v1/embeddings", self.config.base_url)
    }

    fn chat_endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }

    /// Send a chat completion request and pull out the first choice's text
    async fn chat_completion(&self, messages: Vec<Message>) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.chat_model.clone(),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.chat_endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Chat(format!("Chat request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Chat(format!(
                "Chat completion failed ({}): {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Chat(format!("Failed to parse chat response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Chat("No choices in chat response".to_string()))
    }
}

#[derive(serde::Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(serde::Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(serde::Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(serde::Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(serde::Serialize)]
struct Message {
    role: &'static str,
    content: MessageContent,
}

#[derive(serde::Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(serde::Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(serde::Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(serde::Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(serde::Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(serde::Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = [text.to_string()];
        let embeddings = self.embed_batch(&input).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("Empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: self.config.embed_model.clone(),
            input: texts.to_vec(),
        };

        let response = self
            .client
            .post(self.embeddings_endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "Embedding generation failed ({}): {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Failed to parse embedding response: {}", e)))?;

        if parsed.data.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        // The API may return out of order; restore input order by index
        let mut data = parsed.data;
        data.sort_by_key(|d| d.index);

        for entry in &data {
            if entry.embedding.len() != self.config.dimensions {
                return Err(Error::Embedding(format!(
                    "Dimension mismatch: model returned {} dims, index expects {}",
                    entry.embedding.len(),
                    self.config.dimensions
                )));
            }
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[async_trait]
impl Captioner for OpenAiClient {
    async fn caption(&self, image_bytes: &[u8], mime: &str) -> Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image_bytes);
        let data_url = format!("data:{};base64,{}", mime, encoded);

        let messages = vec![Message {
            role: "user",
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: CAPTION_INSTRUCTION.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: data_url },
                },
            ]),
        }];

        self.chat_completion(messages)
            .await
            .map_err(|e| Error::Caption(e.to_string()))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages = vec![Message {
            role: "user",
            content: MessageContent::Text(prompt.to_string()),
        }];
        self.chat_completion(messages).await
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.chat_model
    }
}
