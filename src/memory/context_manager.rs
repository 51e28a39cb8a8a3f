//! Context window management
//!
//! Decides which part of the history is replayed to the model and renders
//! it as prompt text.

use crate::memory::store::{ConversationHistory, ConversationMessage};
use tracing::debug;

/// Configuration for the replayed context
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Number of recent messages to replay
    pub preserve_recent_count: usize,
    /// Hard cap on replayed tokens; older messages are dropped first
    pub max_context_tokens: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            preserve_recent_count: 20,
            max_context_tokens: 4_000,
        }
    }
}

pub struct ContextManager {
    config: ContextConfig,
}

impl ContextManager {
    pub fn new() -> Self {
        Self {
            config: ContextConfig::default(),
        }
    }

    pub fn with_config(config: ContextConfig) -> Self {
        Self { config }
    }

    /// Messages to replay, oldest first, within both the count and token
    /// limits.
    pub fn prepare_context<'a>(
        &self,
        history: &'a ConversationHistory,
    ) -> Vec<&'a ConversationMessage> {
        let mut context = Vec::with_capacity(self.config.preserve_recent_count);
        let mut tokens = 0;

        for msg in history.recent_messages(self.config.preserve_recent_count) {
            if tokens + msg.token_count > self.config.max_context_tokens {
                break;
            }
            tokens += msg.token_count;
            context.push(msg);
        }

        context.reverse();

        debug!(
            replayed = context.len(),
            total = history.message_count(),
            tokens,
            "Prepared conversation context"
        );

        context
    }

    /// `Role: content` lines for the replayed messages, or `None` when
    /// there is nothing to replay.
    pub fn render(&self, history: &ConversationHistory) -> Option<String> {
        let context = self.prepare_context(history);
        if context.is_empty() {
            return None;
        }

        let mut rendered = String::new();
        for msg in context {
            rendered.push_str(msg.role.label());
            rendered.push_str(": ");
            rendered.push_str(&msg.content);
            rendered.push('\n');
        }

        Some(rendered)
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }
}

impl Default for ContextManager {
    fn default() -> Self {
        Self::new()
    }
}
