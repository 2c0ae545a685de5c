//! Retrieval-augmented chat session with conversation memory

use std::sync::Arc;

use crate::error::Result;
use crate::providers::ChatModel;

use super::prompt::PromptBuilder;
use super::retriever::Retriever;

/// Ordered (question, answer) pairs for one session.
///
/// Appended after every completed turn; cleared explicitly by the user,
/// independent of the vector index's contents.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    turns: Vec<(String, String)>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push((question.into(), answer.into()));
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[(String, String)] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }
}

/// Session state: a turn is either in flight or not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

/// One completed chat turn
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// The grounded answer
    pub answer: String,
    /// Number of chunks retrieved for this turn
    pub chunks_retrieved: usize,
}

/// Retrieval-augmented chat session
pub struct ChatSession {
    retriever: Retriever,
    chat: Arc<dyn ChatModel>,
    memory: ConversationMemory,
    state: SessionState,
}

impl ChatSession {
    pub fn new(retriever: Retriever, chat: Arc<dyn ChatModel>) -> Self {
        Self {
            retriever,
            chat,
            memory: ConversationMemory::new(),
            state: SessionState::Idle,
        }
    }

    /// Answer a question, grounded in retrieved chunks and the conversation
    /// so far. The (question, answer) pair is appended to memory only on
    /// success; the state returns to Idle either way.
    pub async fn ask(&mut self, question: &str) -> Result<ChatTurn> {
        self.state = SessionState::AwaitingResponse;
        let result = self.run_turn(question).await;
        self.state = SessionState::Idle;

        let turn = result?;
        self.memory.push(question, turn.answer.clone());
        Ok(turn)
    }

    async fn run_turn(&self, question: &str) -> Result<ChatTurn> {
        let matches = self.retriever.search(question).await?;

        if matches.is_empty() {
            tracing::info!(
                question = %question,
                "No chunks retrieved; answering from conversation only"
            );
        }

        let prompt = PromptBuilder::build_chat_prompt(question, &matches, &self.memory);
        let answer = self.chat.complete(&prompt).await?;

        Ok(ChatTurn {
            answer,
            chunks_retrieved: matches.len(),
        })
    }

    /// Reset the conversation memory. The vector index is untouched.
    pub fn clear_history(&mut self) {
        self.memory.clear();
        tracing::debug!("Conversation history cleared");
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::error::{Error, Result};
    use crate::providers::{ChatModel, Embedder, MemoryIndex, VectorIndex};
    use crate::types::{RecordMetadata, VectorRecord};

    use super::*;

    /// Embedder mapping text length to a tiny deterministic vector
    struct FakeEmbedder;

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let len = text.chars().count() as f32;
            Ok(vec![1.0, len / (len + 1.0)])
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    /// Chat model that echoes and records every prompt it sees
    struct RecordingChat {
        prompts: Mutex<Vec<String>>,
        reply: String,
    }

    impl RecordingChat {
        fn new(reply: &str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                reply: reply.to_string(),
            }
        }
    }

    #[async_trait]
    impl ChatModel for RecordingChat {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().push(prompt.to_string());
            Ok(self.reply.clone())
        }

        fn name(&self) -> &str {
            "recording"
        }

        fn model(&self) -> &str {
            "fake-model"
        }
    }

    /// Chat model that always fails
    struct FailingChat;

    #[async_trait]
    impl ChatModel for FailingChat {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(Error::chat("model down"))
        }

        fn name(&self) -> &str {
            "failing"
        }

        fn model(&self) -> &str {
            "fake-model"
        }
    }

    fn session_with(
        index: Arc<MemoryIndex>,
        chat: Arc<dyn ChatModel>,
    ) -> ChatSession {
        let retriever = Retriever::new(Arc::new(FakeEmbedder), index, 5);
        ChatSession::new(retriever, chat)
    }

    #[tokio::test]
    async fn test_ask_on_empty_index_still_answers() {
        let chat = Arc::new(RecordingChat::new("Hello!"));
        let mut session = session_with(Arc::new(MemoryIndex::new()), chat.clone());

        let turn = session.ask("Hi").await.unwrap();
        assert_eq!(turn.answer, "Hello!");
        assert_eq!(turn.chunks_retrieved, 0);
        assert_eq!(session.memory().len(), 1);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_memory_accumulates_and_reaches_prompt() {
        let chat = Arc::new(RecordingChat::new("answer"));
        let mut session = session_with(Arc::new(MemoryIndex::new()), chat.clone());

        session.ask("first question").await.unwrap();
        session.ask("second question").await.unwrap();

        let prompts = chat.prompts.lock();
        // First prompt sees empty history, second sees the first turn
        assert!(prompts[0].contains("(none)"));
        assert!(prompts[1].contains("Q: first question\nA: answer"));
    }

    #[tokio::test]
    async fn test_clear_history_empties_memory_but_not_index() {
        let index = Arc::new(MemoryIndex::new());
        index
            .upsert(&[VectorRecord {
                id: "doc_0".to_string(),
                values: vec![1.0, 0.5],
                metadata: RecordMetadata {
                    source: "notes.txt".to_string(),
                    text: "stored chunk".to_string(),
                },
            }])
            .await
            .unwrap();

        let chat = Arc::new(RecordingChat::new("ok"));
        let mut session = session_with(index.clone(), chat.clone());

        session.ask("one").await.unwrap();
        session.clear_history();
        assert!(session.memory().is_empty());

        session.ask("two").await.unwrap();
        let prompts = chat.prompts.lock();
        // Post-clear prompt carries no history from before the clear
        assert!(prompts[1].contains("CONVERSATION SO FAR:\n(none)"));
        // The index still holds its record
        assert_eq!(index.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_memory_unchanged_and_state_idle() {
        let mut session = session_with(Arc::new(MemoryIndex::new()), Arc::new(FailingChat));

        let result = session.ask("question").await;
        assert!(result.is_err());
        assert!(session.memory().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_retrieved_chunks_appear_in_prompt() {
        let index = Arc::new(MemoryIndex::new());
        index
            .upsert(&[VectorRecord {
                id: "doc_0".to_string(),
                values: vec![1.0, 0.5],
                metadata: RecordMetadata {
                    source: "report.pdf".to_string(),
                    text: "Revenue grew 12% in Q3.".to_string(),
                },
            }])
            .await
            .unwrap();

        let chat = Arc::new(RecordingChat::new("ok"));
        let mut session = session_with(index, chat.clone());

        let turn = session.ask("How did revenue do?").await.unwrap();
        assert_eq!(turn.chunks_retrieved, 1);

        let prompts = chat.prompts.lock();
        assert!(prompts[0].contains("Revenue grew 12% in Q3."));
        assert!(prompts[0].contains("report.pdf"));
    }
}
