//! Language-model capability
//!
//! The agents only need "ask the model, get text back". Everything behind
//! that (prompting, sampling, the model server) lives behind [`Responder`].

pub mod ollama;

pub use ollama::OllamaClient;

use crate::error::AgentError;
use crate::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Best-effort text answering capability
#[async_trait]
pub trait Responder: Send + Sync {
    async fn answer(&self, prompt: &str) -> Result<String>;
}

/// Scripted responder for development & testing
///
/// Replies are handed out in order; once exhausted the fallback reply is
/// used. Every prompt is recorded.
pub struct MockResponder {
    replies: Mutex<VecDeque<Result<String>>>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
}

impl MockResponder {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: fallback.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.push(Ok(reply.into()));
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(Err(AgentError::Llm(message.into())));
        self
    }

    fn push(&self, reply: Result<String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn answer(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let scripted = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());

        scripted.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}
