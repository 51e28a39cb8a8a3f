//! Conversation memory
//!
//! Keeps the chat transcript so the model fallback can see earlier turns,
//! including vendor reports produced without the model.

pub mod context_manager;
pub mod store;

pub use context_manager::{ContextConfig, ContextManager};
pub use store::{ConversationHistory, ConversationMessage, MessageRole};
