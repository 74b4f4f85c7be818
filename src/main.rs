use anyhow::Context;
use llm_service::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` is optional; the hosting platform usually injects variables.
    let dotenv = dotenvy::dotenv();

    telemetry::init(api::debug_flag()).context("install tracing subscriber")?;
    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    api::start().await.context("HTTP server failed")?;
    Ok(())
}
