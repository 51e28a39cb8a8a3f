use std::sync::Arc;
use tokio::io::{stdin, stdout, BufReader};
use tracing::error;
use tracing_subscriber::EnvFilter;
use vendor_finance_agents::{
    config::AppConfig,
    execution::ExecutionEngine,
    finance::FinancialAgent,
    llm::OllamaClient,
    tools::{create_ratio_registry, QuoteSource, StaticQuoteSource},
    Result,
};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        error!("Finance agent failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;

    let quotes: Arc<dyn QuoteSource> = match &config.quotes_path {
        Some(path) => Arc::new(StaticQuoteSource::from_path(path)?),
        None => Arc::new(StaticQuoteSource::sample()),
    };

    let engine = ExecutionEngine::new(create_ratio_registry(quotes));
    let responder = Arc::new(OllamaClient::new(config.llm.clone())?);
    let agent = FinancialAgent::new(engine, responder);

    let mut reader = BufReader::new(stdin());
    let mut out = stdout();

    agent.run_session(&mut reader, &mut out).await
}
