//! Prompt composition for retrieval-augmented chat

use crate::types::SearchMatch;

use super::session::ConversationMemory;

/// Prompt builder for chat turns
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the context block from retrieved chunks
    pub fn build_context(matches: &[SearchMatch]) -> String {
        let mut context = String::new();

        for (i, m) in matches.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}\n\nContent:\n{}\n\n---\n\n",
                i + 1,
                m.metadata.source,
                m.metadata.text
            ));
        }

        context
    }

    /// Build the conversation-history block from memory
    pub fn build_history(memory: &ConversationMemory) -> String {
        memory
            .turns()
            .iter()
            .map(|(q, a)| format!("Q: {}\nA: {}", q, a))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the full chat prompt from history, retrieved context, and the
    /// current question. An empty context block still produces a usable
    /// prompt so ungrounded turns (greetings, feedback) can be answered.
    pub fn build_chat_prompt(
        question: &str,
        matches: &[SearchMatch],
        memory: &ConversationMemory,
    ) -> String {
        let context = if matches.is_empty() {
            "(no documents retrieved for this question)".to_string()
        } else {
            Self::build_context(matches)
        };

        let history = if memory.is_empty() {
            "(none)".to_string()
        } else {
            Self::build_history(memory)
        };

        format!(
            r#"You are a helpful assistant answering questions about the user's uploaded documents.

Ground your answer in the document context below. If the context does not contain the answer, say so plainly instead of guessing. For conversational turns with no document context, respond naturally.

CONVERSATION SO FAR:
{history}

CONTEXT FROM DOCUMENTS:
{context}

QUESTION: {question}

Answer:"#,
            history = history,
            context = context,
            question = question
        )
    }
}
