//! High-level orchestration for preparing index content from the website.
//!
//! The single public entry point `run_pipeline` fetches the configured pages,
//! cleans them into documents, cuts documents into word-window chunks and
//! exports everything into `<out_dir>/<timestamp>/`. Loading the export into
//! the vector index is done by the hosting platform.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::{
    config::model::PipelineConfig,
    core::{chunking::chunk_document, summary::PipelineSummary},
    export::save_all::{self, PersistSummary},
    model::{
        document::{Chunk, Document},
        page::ScrapedPage,
    },
    scrape::PageFetcher,
};

/// Main pipeline: scrape → clean → chunk → export.
///
/// # Steps:
/// 1. **Fetch** every configured URL once (failures are recorded, not fatal).
/// 2. **Clean** successful pages and drop documents below the size gate.
/// 3. **Chunk** each document into overlapping word windows.
/// 4. **Export** chunks and a summary into a timestamped folder.
#[tracing::instrument(level = "info", skip_all, fields(urls = cfg.urls.len()))]
pub async fn run_pipeline(cfg: &PipelineConfig) -> Result<PersistSummary> {
    cfg.validate()?;
    info!(
        window = cfg.chunking.window(),
        overlap = cfg.chunking.overlap(),
        min_size = cfg.chunking.min_size(),
        min_content_chars = cfg.min_content_chars,
        "Configuration loaded"
    );

    // 1. Fetch
    let fetcher = PageFetcher::new(Duration::from_secs(cfg.scrape_timeout_secs))
        .context("build HTTP client")?;
    let urls = unique_urls(&cfg.urls);
    let pages = fetcher.fetch_all(&urls).await;
    let failed = pages.iter().filter(|p| !p.is_success()).count();
    info!(total = pages.len(), failed, "Scraped pages");
    if failed == pages.len() {
        warn!("every page failed to scrape; export will be empty");
    }

    // 2-3. Clean and chunk
    let (documents, chunks) = process_pages(&pages, cfg);

    // 4. Export
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let out_dir: PathBuf = cfg.out_dir.join(timestamp);
    let summary = save_all::persist_all(
        &out_dir,
        &chunks,
        PipelineSummary::from_counts(&pages, &documents, &chunks),
    )?;

    info!(out_dir = %out_dir.display(), chunks = chunks.len(), "Artifacts saved");
    Ok(summary)
}

/// Cleans pages into documents and chunks them. Pure; no I/O.
pub fn process_pages(pages: &[ScrapedPage], cfg: &PipelineConfig) -> (Vec<Document>, Vec<Chunk>) {
    let documents: Vec<Document> = pages
        .iter()
        .filter_map(|p| {
            let doc = Document::from_page(p, cfg.min_content_chars);
            if doc.is_none() && p.is_success() {
                warn!(url = %p.url, "dropped page with insufficient content");
            }
            doc
        })
        .collect();
    info!(count = documents.len(), "Cleaned documents");

    let chunks: Vec<Chunk> = documents
        .iter()
        .flat_map(|d| chunk_document(d, &cfg.chunking))
        .collect();
    info!(count = chunks.len(), "Generated chunks");

    (documents, chunks)
}

/// Drops repeated URLs, keeping the first occurrence.
fn unique_urls(urls: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .filter(|u| seen.insert(u.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chunking::ChunkingConfig;
    use crate::model::{document::Section, page::ScrapeStatus};

    fn page(url: &str, words: usize) -> ScrapedPage {
        let body = (0..words).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        ScrapedPage {
            url: url.into(),
            title: "Title".into(),
            html: format!("<main><p>{body}</p><script>ignored()</script></main>"),
            scraped_at: Utc::now(),
            status: ScrapeStatus::Success,
            error: None,
        }
    }

    #[test]
    fn pages_flow_into_chunks() {
        let cfg = PipelineConfig {
            chunking: ChunkingConfig::new(20, 5, 5).unwrap(),
            min_content_chars: 30,
            ..PipelineConfig::default()
        };
        let pages = vec![
            page("https://x/solar", 50),
            page("https://x/help", 2),
            ScrapedPage::failed("https://x/plans", "timeout"),
        ];

        let (docs, chunks) = process_pages(&pages, &cfg);

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].section, Section::Solar);
        assert!(!docs[0].cleaned_text.contains("ignored"));
        // 50 words, window 20, step 15: [0..20] [15..35] [30..50]
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.url == "https://x/solar"));
        assert_eq!(chunks[2].chunk_id, "https://x/solar_2");
    }

    #[test]
    fn repeated_urls_are_fetched_once() {
        let urls = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(unique_urls(&urls), vec!["a".to_string(), "b".to_string()]);
    }
}
