//! Tool trait, registry and the financial ratio tools
//!
//! Ratio tools are thin pass-throughs to a [`QuoteSource`]: they upper-case
//! the symbol, ask for one ratio and phrase the result as a sentence. A tool
//! never fails outward; missing data and source errors become text the
//! model can read.

pub mod quotes;

pub use quotes::{QuoteSource, StaticQuoteSource};

use crate::models::RatioKind;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Trait for a single named tool
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    async fn execute(&self, input: &str) -> Result<String>;
}

/// Tool registry for looking up and executing tools, in registration order
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn tools(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    /// `- Name: description` lines for prompts
    pub fn describe(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("- {}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Looks up one ratio for a ticker symbol
pub struct RatioTool {
    kind: RatioKind,
    source: Arc<dyn QuoteSource>,
}

impl RatioTool {
    pub fn new(kind: RatioKind, source: Arc<dyn QuoteSource>) -> Self {
        Self { kind, source }
    }

    pub fn kind(&self) -> RatioKind {
        self.kind
    }

    /// Sentence describing the ratio for `symbol`
    pub async fn lookup(&self, symbol: &str) -> String {
        let symbol = symbol.trim().to_uppercase();

        match self.source.ratio(&symbol, self.kind).await {
            Ok(Some(value)) if value != 0.0 && !value.is_nan() => {
                let shown = if self.kind.is_percentage() {
                    format!("{}%", format_rounded(value * 100.0))
                } else {
                    format_rounded(value)
                };
                format!("{} {}: {}", symbol, self.kind.label(), shown)
            }
            Ok(_) => format!("No {} data for {}.", self.kind.data_label(), symbol),
            Err(e) => {
                warn!(symbol = %symbol, ratio = %self.kind, error = %e, "Quote lookup failed");
                format!("Error fetching {} for {}: {}", self.kind.label(), symbol, e)
            }
        }
    }
}

#[async_trait]
impl Tool for RatioTool {
    fn name(&self) -> &'static str {
        match self.kind {
            RatioKind::PriceToEarnings => "GetPERatio",
            RatioKind::EarningsPerShare => "GetEPS",
            RatioKind::PriceToBook => "GetPBRatio",
            RatioKind::ReturnOnEquity => "GetROE",
            RatioKind::DebtToEquity => "GetDebtToEquity",
        }
    }

    fn description(&self) -> &'static str {
        match self.kind {
            RatioKind::PriceToEarnings => "Fetches the company's P/E ratio.",
            RatioKind::EarningsPerShare => "Fetches the company's Earnings per Share (EPS).",
            RatioKind::PriceToBook => "Fetches the company's Price-to-Book (P/B) ratio.",
            RatioKind::ReturnOnEquity => "Fetches the company's Return on Equity (ROE).",
            RatioKind::DebtToEquity => "Fetches the company's Debt-to-Equity ratio.",
        }
    }

    async fn execute(&self, input: &str) -> Result<String> {
        Ok(self.lookup(input).await)
    }
}

/// Two-decimal rounding of the stored value, printed without padding zeros
/// but keeping one decimal ("28.5", "30.0").
fn format_rounded(value: f64) -> String {
    let mut text = format!("{:.2}", value);
    if text.ends_with('0') {
        text.pop();
    }
    text
}

/// Registry with one ratio tool per [`RatioKind`], all backed by `source`.
pub fn create_ratio_registry(source: Arc<dyn QuoteSource>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    for kind in RatioKind::ALL {
        registry.register(Arc::new(RatioTool::new(kind, Arc::clone(&source))));
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentError;

    struct FailingSource;

    #[async_trait]
    impl QuoteSource for FailingSource {
        async fn ratio(&self, _symbol: &str, _kind: RatioKind) -> Result<Option<f64>> {
            Err(AgentError::QuoteSource("rate limited".to_string()))
        }
    }

    fn sample_source() -> Arc<dyn QuoteSource> {
        let source = StaticQuoteSource::new()
            .with_quote("ACME", RatioKind::PriceToEarnings, 28.456)
            .with_quote("ACME", RatioKind::EarningsPerShare, 6.1)
            .with_quote("ACME", RatioKind::PriceToBook, 0.0)
            .with_quote("ACME", RatioKind::ReturnOnEquity, 0.1534)
            .with_quote("ACME", RatioKind::DebtToEquity, 30.0);
        Arc::new(source)
    }

    #[test]
    fn test_format_rounded() {
        assert_eq!(format_rounded(28.456), "28.46");
        assert_eq!(format_rounded(28.5), "28.5");
        assert_eq!(format_rounded(30.0), "30.0");
        assert_eq!(format_rounded(-1.234), "-1.23");
    }

    #[test]
    fn test_format_rounded_uses_stored_value() {
        // 2.675 is stored as 2.67499..., 0.125 is an exact tie rounded to even
        assert_eq!(format_rounded(2.675), "2.67");
        assert_eq!(format_rounded(0.125), "0.12");
        assert_eq!(format_rounded(-0.125), "-0.12");
        assert_eq!(format_rounded(0.375), "0.38");
        assert_eq!(format_rounded(0.999), "1.0");
        assert_eq!(format_rounded(1.19 * 100.0), "119.0");
    }

    #[tokio::test]
    async fn test_ratio_tool_sentences() {
        let registry = create_ratio_registry(sample_source());

        let run = |name: &'static str| {
            let tool = registry.get(name).unwrap();
            async move { tool.execute("acme").await.unwrap() }
        };

        assert_eq!(run("GetPERatio").await, "ACME P/E ratio: 28.46");
        assert_eq!(run("GetEPS").await, "ACME EPS: 6.1");
        assert_eq!(run("GetPBRatio").await, "No P/B data for ACME.");
        assert_eq!(run("GetROE").await, "ACME ROE: 15.34%");
        assert_eq!(run("GetDebtToEquity").await, "ACME Debt/Equity: 30.0");
    }

    #[tokio::test]
    async fn test_unknown_symbol_has_no_data() {
        let tool = RatioTool::new(RatioKind::DebtToEquity, sample_source());
        assert_eq!(tool.lookup("zzzz").await, "No Debt/Equity data for ZZZZ.");
    }

    #[tokio::test]
    async fn test_source_errors_become_text() {
        let tool = RatioTool::new(RatioKind::PriceToEarnings, Arc::new(FailingSource));
        let output = tool.execute("msft").await.unwrap();
        assert_eq!(
            output,
            "Error fetching P/E ratio for MSFT: Quote source error: rate limited"
        );
    }

    #[test]
    fn test_registry_order_and_descriptions() {
        let registry = create_ratio_registry(sample_source());
        assert_eq!(
            registry.list(),
            vec!["GetPERatio", "GetEPS", "GetPBRatio", "GetROE", "GetDebtToEquity"]
        );
        assert!(registry
            .describe()
            .starts_with("- GetPERatio: Fetches the company's P/E ratio.\n"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = create_ratio_registry(sample_source());
        registry.register(Arc::new(RatioTool::new(
            RatioKind::PriceToEarnings,
            Arc::new(FailingSource),
        )));
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.list().last(), Some(&"GetPERatio"));
    }
}
