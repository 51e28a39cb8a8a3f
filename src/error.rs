//! Error types for the vendor and finance agents

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Error, Debug)]
pub enum AgentError {

    // =============================
    // Setup Errors
    // =============================

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid vendor catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid quote table: {0}")]
    InvalidQuotes(String),

    // =============================
    // Runtime Errors
    // =============================

    #[error("Invalid choice: {0}")]
    InvalidChoice(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Quote source error: {0}")]
    QuoteSource(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
