//! Ollama API client
//!
//! Talks to a local Ollama server through `/api/generate`.
//! Uses a long-lived reqwest::Client for connection pooling.

use crate::config::LlmConfig;
use crate::error::AgentError;
use crate::llm::Responder;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

/// Reusable Ollama client (connection-pooled)
pub struct OllamaClient {
    client: Client,
    config: LlmConfig,
}

impl OllamaClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Generate a completion for `prompt`
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.host);
        let request = build_request(&self.config, prompt);

        info!(model = %self.config.model, "Calling Ollama API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Ollama API request failed: {}", e);
                AgentError::Llm(format!("Ollama API error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Ollama API error response: {}", error_text);
            return Err(AgentError::Llm(format!(
                "Ollama API returned {}: {}",
                status, error_text
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Ollama response: {}", e);
            AgentError::Llm(format!("Ollama parse error: {}", e))
        })?;

        parse_answer(body)
    }
}

#[async_trait]
impl Responder for OllamaClient {
    async fn answer(&self, prompt: &str) -> Result<String> {
        self.generate(prompt).await
    }
}

fn build_request<'a>(config: &'a LlmConfig, prompt: &'a str) -> GenerateRequest<'a> {
    GenerateRequest {
        model: &config.model,
        prompt,
        stream: false,
        options: GenerateOptions {
            temperature: config.temperature,
        },
    }
}

fn parse_answer(body: GenerateResponse) -> Result<String> {
    if let Some(message) = body.error {
        return Err(AgentError::Llm(format!("Ollama error: {}", message)));
    }

    let answer = body.response.unwrap_or_default();
    if answer.trim().is_empty() {
        return Err(AgentError::Llm("Empty response from Ollama".to_string()));
    }

    info!(
        done_reason = body.done_reason.as_deref().unwrap_or("unknown"),
        eval_count = body.eval_count.unwrap_or(0),
        "Ollama response received"
    );

    Ok(answer)
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
    error: Option<String>,
    done_reason: Option<String>,
    eval_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let config = LlmConfig::default();
        let request = build_request(&config, "What is EPS?");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "llama3.2:3b-instruct-q4_K_M");
        assert_eq!(json["prompt"], "What is EPS?");
        assert_eq!(json["stream"], false);
        assert!((json["options"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_parse_answer() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"model":"m","response":"EcoParts looks fine.","done":true,"done_reason":"stop","eval_count":12}"#,
        )
        .unwrap();
        assert_eq!(parse_answer(body).unwrap(), "EcoParts looks fine.");
    }

    #[test]
    fn test_parse_error_and_empty_answers() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"error":"model 'x' not found"}"#).unwrap();
        assert!(matches!(parse_answer(body), Err(AgentError::Llm(_))));

        let body: GenerateResponse = serde_json::from_str(r#"{"response":"  "}"#).unwrap();
        assert!(matches!(parse_answer(body), Err(AgentError::Llm(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let config = LlmConfig {
            host: "http://127.0.0.1:9".to_string(),
            timeout: Some(Duration::from_secs(2)),
            ..LlmConfig::default()
        };
        let client = OllamaClient::new(config).unwrap();

        let result = client.answer("hello").await;
        assert!(matches!(result, Err(AgentError::Llm(_))));
    }
}
