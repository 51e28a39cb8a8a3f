//! Runtime configuration
//!
//! Everything is read from the environment (a `.env` file is loaded by the
//! binaries first). Unset variables fall back to the defaults below.

use crate::error::AgentError;
use crate::vendor::DEFAULT_MATCH_THRESHOLD;
use crate::Result;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b-instruct-q4_K_M";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub host: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Option<Duration>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OLLAMA_HOST.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    /// JSON vendor catalog; the compiled-in table is used when unset
    pub vendor_catalog_path: Option<PathBuf>,
    pub match_threshold: f64,
    /// Number of recent messages replayed to the model
    pub history_window: usize,
    /// JSON quote table; the compiled-in sample is used when unset
    pub quotes_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            vendor_catalog_path: None,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            history_window: DEFAULT_HISTORY_WINDOW,
            quotes_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = AppConfig::default();

        let timeout = parse_var::<u64>(&get, "OLLAMA_TIMEOUT_SECS")?.map(Duration::from_secs);

        let llm = LlmConfig {
            host: get("OLLAMA_HOST")
                .map(|h| h.trim_end_matches('/').to_string())
                .unwrap_or(defaults.llm.host),
            model: get("OLLAMA_MODEL").unwrap_or(defaults.llm.model),
            temperature: parse_var(&get, "OLLAMA_TEMPERATURE")?
                .unwrap_or(defaults.llm.temperature),
            timeout,
        };

        let match_threshold =
            parse_var(&get, "VENDOR_MATCH_THRESHOLD")?.unwrap_or(defaults.match_threshold);
        if !(0.0..=1.0).contains(&match_threshold) {
            return Err(AgentError::Config(format!(
                "VENDOR_MATCH_THRESHOLD must be within 0..=1, got {}",
                match_threshold
            )));
        }

        Ok(Self {
            llm,
            vendor_catalog_path: get("VENDOR_CATALOG_PATH").map(PathBuf::from),
            match_threshold,
            history_window: parse_var(&get, "CHAT_HISTORY_WINDOW")?
                .unwrap_or(defaults.history_window),
            quotes_path: get("QUOTES_PATH").map(PathBuf::from),
        })
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| {
                AgentError::Config(format!("{} has invalid value '{}': {}", key, raw, e))
            })
        })
        .transpose()
}
