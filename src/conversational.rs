//! Vendor support chat
//!
//! Each user turn is first matched against the vendor catalog. A match is
//! answered with the vendor's health report, anything else goes to the
//! language model together with the recent conversation. Both kinds of
//! exchange are remembered so the model sees vendor reports too.

use crate::llm::Responder;
use crate::memory::{ContextConfig, ContextManager, ConversationHistory};
use crate::models::{ChatReply, ReplySource};
use crate::vendor::VendorEvaluator;
use crate::Result;
use std::sync::Arc;
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "You are a Vendor Evaluation Assistant for Odoo. \
You help users analyze supplier reliability and suggest actions. \
If you recognize a vendor name, show its evaluation. \
Otherwise, answer conversationally using context.";

/// Words that end the chat loop
const QUIT_COMMANDS: [&str; 2] = ["exit", "quit"];

pub fn is_quit_command(input: &str) -> bool {
    let input = input.to_lowercase();
    QUIT_COMMANDS.contains(&input.as_str())
}

/// Single-session vendor support agent
pub struct VendorChatAgent {
    evaluator: VendorEvaluator,
    responder: Arc<dyn Responder>,
    history: ConversationHistory,
    context_manager: ContextManager,
}

impl VendorChatAgent {
    pub fn new(evaluator: VendorEvaluator, responder: Arc<dyn Responder>) -> Self {
        Self {
            evaluator,
            responder,
            history: ConversationHistory::new(),
            context_manager: ContextManager::new(),
        }
    }

    pub fn with_context_config(mut self, config: ContextConfig) -> Self {
        self.context_manager = ContextManager::with_config(config);
        self
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn evaluator(&self) -> &VendorEvaluator {
        &self.evaluator
    }

    /// Answer one user turn.
    ///
    /// A model failure is returned as an error and leaves the history
    /// untouched.
    pub async fn chat(&mut self, input: &str) -> Result<ChatReply> {
        if let Some(vendor) = self.evaluator.match_vendor(input) {
            let vendor = vendor.to_string();
            let report = self.evaluator.evaluate_vendor(&vendor).to_string();

            info!(vendor = %vendor, "Answered with vendor evaluation");

            self.remember(input, &report, "evaluation");

            return Ok(ChatReply {
                text: report,
                source: ReplySource::Vendor,
                vendor: Some(vendor),
            });
        }

        let prompt = self.build_prompt(input);
        let answer = match self.responder.answer(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Model fallback failed: {}", e);
                return Err(e);
            }
        };

        info!(
            history_messages = self.history.message_count(),
            "Answered with model fallback"
        );

        self.remember(input, &answer, "answer");

        Ok(ChatReply {
            text: answer,
            source: ReplySource::Model,
            vendor: None,
        })
    }

    /// Store the exchange, keeping only what the context window can replay.
    fn remember(&mut self, input: &str, output: &str, output_type: &str) {
        self.history.save_exchange(input, output, output_type);
        self.history
            .trim_to_recent(self.context_manager.config().preserve_recent_count);
    }

    fn build_prompt(&self, input: &str) -> String {
        let mut prompt = String::new();
        prompt.push_str(SYSTEM_PROMPT);
        prompt.push_str("\n\n");

        if let Some(context) = self.context_manager.render(&self.history) {
            prompt.push_str("Conversation so far:\n");
            prompt.push_str(&context);
            prompt.push('\n');
        }

        prompt.push_str("User: ");
        prompt.push_str(input);
        prompt.push_str("\nAgent:");
        prompt
    }
}
