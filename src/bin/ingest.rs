//! Scrapes the configured pages and writes chunk exports for the index.

use anyhow::Context;
use content_pipeline::{PipelineConfig, run_pipeline};
use llm_service::telemetry;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    telemetry::init(api::debug_flag()).context("install tracing subscriber")?;

    let cfg = PipelineConfig::from_env()?;
    let persisted = run_pipeline(&cfg).await?;

    let counts = &persisted.summary.counts;
    info!(
        out_dir = %persisted.out_dir,
        pages = counts.pages_total,
        failed = counts.pages_failed,
        documents = counts.documents_kept,
        chunks = counts.chunks,
        "ingest finished"
    );
    Ok(())
}
