//! Vendor & Finance Agents
//!
//! Two small single-user terminal agents:
//! - a vendor support chat that matches free text against a fixed supplier
//!   catalog, scores the vendor's health deterministically, and otherwise
//!   falls back to a memory-augmented language model
//! - a financial analysis agent that gathers stock ratios through tools and
//!   lets a language model answer a canned question about them
//!
//! The language model and the quote data sit behind the [`llm::Responder`]
//! and [`tools::QuoteSource`] traits.

pub mod config;
pub mod conversational;
pub mod error;
pub mod execution;
pub mod finance;
pub mod llm;
pub mod memory;
pub mod models;
pub mod shell;
pub mod tools;
pub mod vendor;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use conversational::VendorChatAgent;
pub use finance::FinancialAgent;
pub use vendor::{VendorCatalog, VendorEvaluator};
