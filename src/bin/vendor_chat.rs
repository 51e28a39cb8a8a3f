use std::sync::Arc;
use tokio::io::{stdin, stdout, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vendor_finance_agents::{
    config::AppConfig,
    conversational::{is_quit_command, VendorChatAgent},
    llm::OllamaClient,
    memory::ContextConfig,
    shell::prompt_line,
    vendor::{VendorCatalog, VendorEvaluator},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;

    let catalog = match &config.vendor_catalog_path {
        Some(path) => VendorCatalog::from_path(path)?,
        None => VendorCatalog::builtin(),
    };
    info!(vendors = catalog.len(), "Vendor catalog ready");

    let evaluator =
        VendorEvaluator::new(Arc::new(catalog)).with_threshold(config.match_threshold);
    let responder = Arc::new(OllamaClient::new(config.llm.clone())?);

    let mut agent = VendorChatAgent::new(evaluator, responder).with_context_config(ContextConfig {
        preserve_recent_count: config.history_window,
        ..ContextConfig::default()
    });

    let mut reader = BufReader::new(stdin());
    let mut out = stdout();

    out.write_all("💬 Vendor Evaluation Assistant\nType 'exit' to quit.\n\n".as_bytes())
        .await?;

    loop {
        let Some(input) = prompt_line(&mut reader, &mut out, "You: ").await? else {
            break;
        };

        if is_quit_command(&input) {
            out.write_all("👋 Goodbye!\n".as_bytes()).await?;
            break;
        }

        match agent.chat(&input).await {
            Ok(reply) => {
                out.write_all(format!("Agent: {}\n", reply.text).as_bytes())
                    .await?;
            }
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                out.write_all(format!("Agent: ⚠️ {}\n", e).as_bytes()).await?;
            }
        }
    }

    out.flush().await?;
    Ok(())
}
