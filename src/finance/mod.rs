//! Financial analysis agent
//!
//! INPUT (ticker + question) → PLAN (every ratio tool) → EXECUTE → ANSWER
//!
//! Tool outputs are gathered deterministically; only the final answer comes
//! from the model.

use crate::error::AgentError;
use crate::execution::ExecutionEngine;
use crate::llm::Responder;
use crate::models::{AgentResponse, ExecutionStatus, Observation};
use crate::shell::prompt_line;
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tracing::info;

/// Canned questions, `{ticker}` is replaced by the symbol
const QUESTION_TEMPLATES: [&str; 5] = [
    "Based on fundamentals, is {ticker} currently overvalued or undervalued?",
    "Is {ticker} an efficient business based on its ROE?",
    "Does {ticker} carry too much debt compared to its equity?",
    "Summarize {ticker}'s financial health in 3 sentences.",
    "What are the main financial strengths and weaknesses of {ticker}?",
];

const SYSTEM_PROMPT: &str = "You are a financial analysis agent. \
You answer questions about a company's fundamentals using the tool results provided. \
Quote the figures you rely on, say so when data is missing, and keep the answer concise.";

/// Upper-cased, trimmed ticker. Empty input is rejected.
pub fn normalize_ticker(raw: &str) -> Result<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AgentError::InvalidChoice(
            "ticker symbol must not be empty".to_string(),
        ));
    }
    Ok(ticker)
}

/// The canned questions for `ticker`, in menu order
pub fn questions(ticker: &str) -> Vec<String> {
    QUESTION_TEMPLATES
        .iter()
        .map(|template| template.replace("{ticker}", ticker))
        .collect()
}

/// Question for a 1-based menu choice such as `"3"`.
pub fn select_question(ticker: &str, choice: &str) -> Result<String> {
    let index = choice
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=QUESTION_TEMPLATES.len()).contains(n))
        .ok_or_else(|| AgentError::InvalidChoice(choice.trim().to_string()))?;

    Ok(QUESTION_TEMPLATES[index - 1].replace("{ticker}", ticker))
}

pub struct FinancialAgent {
    engine: ExecutionEngine,
    responder: Arc<dyn Responder>,
}

impl FinancialAgent {
    pub fn new(engine: ExecutionEngine, responder: Arc<dyn Responder>) -> Self {
        Self { engine, responder }
    }

    /// Gather every ratio for `ticker`, then let the model answer `question`.
    pub async fn ask(&self, ticker: &str, question: &str) -> Result<AgentResponse> {
        let start = Instant::now();
        let ticker = normalize_ticker(ticker)?;

        info!(ticker = %ticker, question = %question, "Financial agent: starting");

        let calls = self.engine.plan_all(&ticker);
        let observations = self.engine.execute(&calls).await?;

        let prompt = self.build_prompt(question, &observations);
        let answer = self.responder.answer(&prompt).await?;

        info!(
            ticker = %ticker,
            tool_calls = observations.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Financial agent: answered"
        );

        Ok(AgentResponse {
            ticker,
            question: question.to_string(),
            answer,
            observations,
        })
    }

    /// Interactive session: ticker, question menu, answer.
    ///
    /// Bad input ends the session with a short message instead of an error.
    pub async fn run_session<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(raw_ticker) = prompt_line(
            reader,
            writer,
            "Enter the company ticker symbol (e.g., NVDA, AAPL, MSFT): ",
        )
        .await?
        else {
            return Ok(());
        };

        let ticker = match normalize_ticker(&raw_ticker) {
            Ok(ticker) => ticker,
            Err(AgentError::InvalidChoice(_)) => {
                writer
                    .write_all(b"No ticker symbol entered. Exiting.\n")
                    .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let mut menu = format!("\nChoose a question to ask about {}\n", ticker);
        for (i, question) in questions(&ticker).iter().enumerate() {
            menu.push_str(&format!("{}. {}\n", i + 1, question));
        }
        writer.write_all(menu.as_bytes()).await?;

        let choice = prompt_line(
            reader,
            writer,
            "\nEnter the number of the question you want to ask (1-5): ",
        )
        .await?
        .unwrap_or_default();

        let question = match select_question(&ticker, &choice) {
            Ok(question) => question,
            Err(AgentError::InvalidChoice(_)) => {
                writer.write_all(b"Invalid choice. Exiting.\n").await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        writer.write_all("\n🤖 Thinking...\n\n".as_bytes()).await?;
        writer.flush().await?;

        let response = self.ask(&ticker, &question).await?;

        writer
            .write_all(format!("\n--- AGENT RESPONSE ---\n\n{}\n", response.answer).as_bytes())
            .await?;
        writer.flush().await?;

        Ok(())
    }

    fn build_prompt(&self, question: &str, observations: &[Observation]) -> String {
        let mut prompt = String::new();
        prompt.push_str(SYSTEM_PROMPT);

        prompt.push_str("\n\nAvailable tools:\n");
        prompt.push_str(&self.engine.registry().describe());

        prompt.push_str("\n\nTool results:\n");
        for obs in observations {
            let note = match obs.status {
                ExecutionStatus::Success => "",
                ExecutionStatus::Failed => " (failed)",
                ExecutionStatus::Skipped => " (skipped)",
            };
            prompt.push_str(&format!(
                "- {}({}){}: {}\n",
                obs.tool_name, obs.input, note, obs.output
            ));
        }

        prompt.push_str("\nQuestion: ");
        prompt.push_str(question);
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockResponder;
    use crate::tools::{create_ratio_registry, StaticQuoteSource};

    fn agent(responder: Arc<MockResponder>) -> FinancialAgent {
        let registry = create_ratio_registry(Arc::new(StaticQuoteSource::sample()));
        FinancialAgent::new(ExecutionEngine::new(registry), responder)
    }

    #[test]
    fn test_questions() {
        let questions = questions("NVDA");
        assert_eq!(questions.len(), 5);
        assert_eq!(
            questions[0],
            "Based on fundamentals, is NVDA currently overvalued or undervalued?"
        );
        assert_eq!(questions[3], "Summarize NVDA's financial health in 3 sentences.");
    }

    #[test]
    fn test_select_question() {
        assert_eq!(
            select_question("AAPL", " 2 ").unwrap(),
            "Is AAPL an efficient business based on its ROE?"
        );

        for choice in ["0", "6", "-1", "two", ""] {
            let result = select_question("AAPL", choice);
            assert!(matches!(result, Err(AgentError::InvalidChoice(_))), "{:?}", choice);
        }
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" msft\n").unwrap(), "MSFT");
        assert!(normalize_ticker("   ").is_err());
    }

    #[tokio::test]
    async fn test_ask_gathers_ratios_before_answering() {
        let responder = Arc::new(MockResponder::new("NVDA trades at a premium."));
        let agent = agent(Arc::clone(&responder));

        let question = select_question("NVDA", "1").unwrap();
        let response = agent.ask("nvda", &question).await.unwrap();

        assert_eq!(response.ticker, "NVDA");
        assert_eq!(response.answer, "NVDA trades at a premium.");
        assert_eq!(response.observations.len(), 5);

        let prompts = responder.prompts();
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];
        assert!(prompt.contains("- GetPERatio(NVDA): NVDA P/E ratio: 52.4\n"));
        assert!(prompt.contains("- GetROE(NVDA): NVDA ROE: 119.0%\n"));
        assert!(prompt.ends_with(&format!("Question: {}", question)));
    }

    #[tokio::test]
    async fn test_unknown_ticker_still_asks_model() {
        let responder = Arc::new(MockResponder::new("No data available."));
        let agent = agent(Arc::clone(&responder));

        let response = agent.ask("ZZZZ", "Is ZZZZ cheap?").await.unwrap();
        assert!(response
            .observations
            .iter()
            .all(|obs| obs.output.starts_with("No ")));
        assert!(responder.prompts()[0].contains("No P/E data for ZZZZ."));
    }

    async fn session_output(responder: Arc<MockResponder>, input: &str) -> String {
        let agent = agent(responder);
        let mut reader = input.as_bytes();
        let mut output = Vec::new();

        agent.run_session(&mut reader, &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_session_answers_selected_question() {
        let responder = Arc::new(MockResponder::new("MSFT carries little debt."));
        let output = session_output(Arc::clone(&responder), "msft\n3\n").await;

        assert!(output.contains("\nChoose a question to ask about MSFT\n1. Based on fundamentals"));
        assert!(output.contains("3. Does MSFT carry too much debt compared to its equity?\n"));
        assert!(output.ends_with("\n--- AGENT RESPONSE ---\n\nMSFT carries little debt.\n"));
        assert!(responder.prompts()[0]
            .ends_with("Question: Does MSFT carry too much debt compared to its equity?"));
    }

    #[tokio::test]
    async fn test_session_with_empty_ticker_exits_cleanly() {
        let responder = Arc::new(MockResponder::new("unused"));
        let output = session_output(Arc::clone(&responder), "   \n").await;

        assert!(output.ends_with("No ticker symbol entered. Exiting.\n"));
        assert!(!output.contains("Choose a question"));
        assert!(responder.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_session_with_invalid_choice_exits_cleanly() {
        let responder = Arc::new(MockResponder::new("unused"));
        let output = session_output(Arc::clone(&responder), "AAPL\n9\n").await;

        assert!(output.ends_with("Invalid choice. Exiting.\n"));
        assert!(responder.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_is_reported() {
        let responder = Arc::new(MockResponder::new("unused").with_failure("connection refused"));
        let agent = agent(responder);

        let result = agent.ask("AAPL", "Is AAPL cheap?").await;
        assert!(matches!(result, Err(AgentError::Llm(_))));
    }
}
