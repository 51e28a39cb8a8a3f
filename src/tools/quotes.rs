//! Quote sources
//!
//! Live market data is out of scope; the bundled source serves a fixed
//! table, either the compiled-in sample or a JSON file shaped like
//! `{"AAPL": {"trailingPE": 29.1, "returnOnEquity": 1.47}}`.

use crate::error::AgentError;
use crate::models::RatioKind;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// "Fetch ratio for symbol" capability
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// `Ok(None)` when the source has no value for this symbol and ratio.
    async fn ratio(&self, symbol: &str, kind: RatioKind) -> Result<Option<f64>>;
}

/// In-memory quote table keyed by upper-case symbol
#[derive(Debug, Clone, Default)]
pub struct StaticQuoteSource {
    quotes: HashMap<String, HashMap<RatioKind, f64>>,
}

impl StaticQuoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, symbol: &str, kind: RatioKind, value: f64) -> Self {
        self.quotes
            .entry(symbol.to_uppercase())
            .or_default()
            .insert(kind, value);
        self
    }

    /// Offline sample covering the tickers suggested by the CLI prompt.
    pub fn sample() -> Self {
        // Columns follow RatioKind::ALL: P/E, EPS, P/B, ROE (fraction), D/E
        let rows: [(&str, [f64; 5]); 3] = [
            ("NVDA", [52.4, 2.94, 44.1, 1.19, 12.9]),
            ("AAPL", [36.2, 6.59, 52.3, 1.47, 154.5]),
            ("MSFT", [35.8, 13.64, 10.4, 0.33, 32.6]),
        ];

        let mut source = Self::new();
        for (symbol, values) in rows {
            for (kind, value) in RatioKind::ALL.into_iter().zip(values) {
                source = source.with_quote(symbol, kind, value);
            }
        }
        source
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, HashMap<String, f64>> = serde_json::from_str(json)?;
        let mut source = Self::new();

        for (symbol, fields) in raw {
            for (key, value) in fields {
                let kind = RatioKind::ALL
                    .into_iter()
                    .find(|kind| kind.key() == key)
                    .ok_or_else(|| {
                        AgentError::InvalidQuotes(format!(
                            "unknown ratio key '{}' for {}",
                            key, symbol
                        ))
                    })?;
                source = source.with_quote(&symbol, kind, value);
            }
        }

        Ok(source)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = Self::from_json(&std::fs::read_to_string(path)?)?;

        info!(
            path = %path.display(),
            symbols = source.symbols().len(),
            "Loaded quote table"
        );

        Ok(source)
    }

    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.quotes.keys().map(|s| s.as_str()).collect();
        symbols.sort_unstable();
        symbols
    }
}

#[async_trait]
impl QuoteSource for StaticQuoteSource {
    async fn ratio(&self, symbol: &str, kind: RatioKind) -> Result<Option<f64>> {
        Ok(self
            .quotes
            .get(&symbol.to_uppercase())
            .and_then(|ratios| ratios.get(&kind))
            .copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_table() {
        let source = StaticQuoteSource::sample();
        assert_eq!(source.symbols(), vec!["AAPL", "MSFT", "NVDA"]);

        let pe = tokio_test::block_on(source.ratio("nvda", RatioKind::PriceToEarnings)).unwrap();
        assert_eq!(pe, Some(52.4));
    }

    #[tokio::test]
    async fn test_from_json() {
        let source = StaticQuoteSource::from_json(
            r#"{"tsla": {"trailingPE": 180.5, "debtToEquity": 17.1}}"#,
        )
        .unwrap();

        assert_eq!(
            source.ratio("TSLA", RatioKind::PriceToEarnings).await.unwrap(),
            Some(180.5)
        );
        assert_eq!(source.ratio("TSLA", RatioKind::EarningsPerShare).await.unwrap(), None);
        assert_eq!(source.ratio("IBM", RatioKind::DebtToEquity).await.unwrap(), None);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let result = StaticQuoteSource::from_json(r#"{"TSLA": {"beta": 2.3}}"#);
        assert!(matches!(result, Err(AgentError::InvalidQuotes(_))));
    }
}
