//! Execution engine for tool calls
//!
//! Runs a fixed list of tool calls in order and records one observation per
//! call. The language model never runs here.

use crate::error::AgentError;
use crate::models::{ExecutionStatus, Observation};
use crate::tools::ToolRegistry;
use crate::Result;
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, warn};

/// Maximum calls allowed per run
const MAX_CALLS_PER_RUN: usize = 20;

/// One planned tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub tool_name: String,
    pub input: String,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            input: input.into(),
        }
    }
}

/// Executes tool calls sequentially
pub struct ExecutionEngine {
    tool_registry: ToolRegistry,
}

impl ExecutionEngine {
    pub fn new(tool_registry: ToolRegistry) -> Self {
        Self { tool_registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// One call per registered tool, all with the same input.
    pub fn plan_all(&self, input: &str) -> Vec<ToolCall> {
        self.tool_registry
            .tools()
            .map(|tool| ToolCall::new(tool.name(), input))
            .collect()
    }

    /// Execute every call. A failing or unknown tool is recorded and the
    /// remaining calls still run.
    pub async fn execute(&self, calls: &[ToolCall]) -> Result<Vec<Observation>> {
        if calls.len() > MAX_CALLS_PER_RUN {
            return Err(AgentError::Tool(format!(
                "Run exceeds maximum allowed tool calls ({})",
                MAX_CALLS_PER_RUN
            )));
        }

        let mut observations = Vec::with_capacity(calls.len());

        for call in calls {
            debug!(tool_name = %call.tool_name, input = %call.input, "Processing tool call");

            let start = Instant::now();

            let (status, output) = match self.tool_registry.get(&call.tool_name) {
                Some(tool) => match tool.execute(&call.input).await {
                    Ok(output) => (ExecutionStatus::Success, output),
                    Err(e) => {
                        warn!(tool_name = %call.tool_name, error = %e, "Tool execution failed");
                        (ExecutionStatus::Failed, format!("Error: {}", e))
                    }
                },
                None => {
                    warn!(tool_name = %call.tool_name, "Tool not registered");
                    (ExecutionStatus::Skipped, "Tool not registered".to_string())
                }
            };

            observations.push(Observation {
                tool_name: call.tool_name.clone(),
                input: call.input.clone(),
                output,
                status,
                execution_time_ms: start.elapsed().as_millis() as u64,
                created_at: Utc::now(),
            });
        }

        debug!(observation_count = observations.len(), "Tool execution completed");

        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{create_ratio_registry, StaticQuoteSource, Tool};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &'static str {
            "Broken"
        }

        fn description(&self) -> &'static str {
            "Always fails"
        }

        async fn execute(&self, _input: &str) -> Result<String> {
            Err(AgentError::Tool("boom".to_string()))
        }
    }

    fn engine() -> ExecutionEngine {
        ExecutionEngine::new(create_ratio_registry(Arc::new(StaticQuoteSource::sample())))
    }

    #[tokio::test]
    async fn test_execution_engine() {
        let engine = engine();
        let calls = engine.plan_all("NVDA");
        assert_eq!(calls.len(), 5);

        let observations = engine.execute(&calls).await.unwrap();
        assert_eq!(observations.len(), 5);
        assert!(observations
            .iter()
            .all(|obs| obs.status == ExecutionStatus::Success));
        assert_eq!(observations[0].output, "NVDA P/E ratio: 52.4");
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_run() {
        let mut registry = create_ratio_registry(Arc::new(StaticQuoteSource::sample()));
        registry.register(Arc::new(BrokenTool));
        let engine = ExecutionEngine::new(registry);

        let calls = vec![
            ToolCall::new("Broken", "AAPL"),
            ToolCall::new("GetStockSplits", "AAPL"),
            ToolCall::new("GetEPS", "AAPL"),
        ];
        let observations = engine.execute(&calls).await.unwrap();

        let statuses: Vec<_> = observations.iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![
                ExecutionStatus::Failed,
                ExecutionStatus::Skipped,
                ExecutionStatus::Success
            ]
        );
        assert_eq!(observations[0].output, "Error: Tool error: boom");
        assert_eq!(observations[2].output, "AAPL EPS: 6.59");
    }

    #[tokio::test]
    async fn test_rejects_oversized_runs() {
        let calls = vec![ToolCall::new("GetEPS", "AAPL"); MAX_CALLS_PER_RUN + 1];
        let result = engine().execute(&calls).await;
        assert!(matches!(result, Err(AgentError::Tool(_))));
    }
}
