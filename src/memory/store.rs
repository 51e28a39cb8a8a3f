//! Conversation history storage
//!
//! Stores the messages of one chat session with timestamps and metadata.
//! Lives only as long as the process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
}

impl MessageRole {
    pub fn label(&self) -> &'static str {
        match self {
            MessageRole::User => "User",
            MessageRole::Agent => "Agent",
        }
    }
}

/// A single message in the conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub message_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub role: MessageRole,
    pub content: String,
    /// Approximate token count (4 bytes per token)
    pub token_count: usize,
    /// Optional metadata about message type (query, evaluation, answer)
    pub message_type: Option<String>,
}

impl ConversationMessage {
    pub fn new(role: MessageRole, content: String, message_type: Option<String>) -> Self {
        let token_count = (content.len() + 3) / 4;

        Self {
            message_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            role,
            content,
            token_count,
            message_type,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content.into(), Some("query".to_string()))
    }

    pub fn agent(content: impl Into<String>, message_type: &str) -> Self {
        Self::new(
            MessageRole::Agent,
            content.into(),
            Some(message_type.to_string()),
        )
    }
}

/// Conversation history for one chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationHistory {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    messages: VecDeque<ConversationMessage>,
    total_tokens: usize,
}

impl ConversationHistory {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            messages: VecDeque::new(),
            total_tokens: 0,
        }
    }

    pub fn add_message(&mut self, message: ConversationMessage) {
        self.total_tokens += message.token_count;
        self.messages.push_back(message);
        self.updated_at = Utc::now();
    }

    /// Record one user turn and the reply it got.
    pub fn save_exchange(&mut self, input: &str, output: &str, output_type: &str) {
        self.add_message(ConversationMessage::user(input));
        self.add_message(ConversationMessage::agent(output, output_type));
    }

    pub fn messages(&self) -> impl Iterator<Item = &ConversationMessage> {
        self.messages.iter()
    }

    /// The `count` most recent messages, newest first
    pub fn recent_messages(
        &self,
        count: usize,
    ) -> impl DoubleEndedIterator<Item = &ConversationMessage> {
        self.messages.iter().rev().take(count)
    }

    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop everything but the last `keep_count` messages
    pub fn trim_to_recent(&mut self, keep_count: usize) {
        if self.messages.len() <= keep_count {
            return;
        }

        while self.messages.len() > keep_count {
            self.messages.pop_front();
        }

        self.total_tokens = self.messages.iter().map(|m| m.token_count).sum();
        self.updated_at = Utc::now();
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}
