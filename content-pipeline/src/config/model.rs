//! Configuration for the scrape → clean → chunk → export pipeline.
//!
//! Groups:
//! - [`PipelineConfig`]: top-level container, read from env
//! - [`ChunkingConfig`]: word-window parameters (validated on construction)

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use crate::core::chunking::{ChunkingConfig, DEFAULT_MIN_SIZE, DEFAULT_OVERLAP, DEFAULT_WINDOW};

pub const DEFAULT_MIN_CONTENT_CHARS: usize = 100;
pub const DEFAULT_OUT_DIR: &str = "content_data";
pub const DEFAULT_SCRAPE_TIMEOUT_SECS: u64 = 30;

/// Key sections of the retailer website.
pub const DEFAULT_URLS: [&str; 10] = [
    "https://www.alintaenergy.com.au/plans",
    "https://www.alintaenergy.com.au/plans/electricity",
    "https://www.alintaenergy.com.au/plans/gas",
    "https://www.alintaenergy.com.au/help",
    "https://www.alintaenergy.com.au/help/billing",
    "https://www.alintaenergy.com.au/help/payments",
    "https://www.alintaenergy.com.au/help/moving-house",
    "https://www.alintaenergy.com.au/solar",
    "https://www.alintaenergy.com.au/hardship",
    "https://www.alintaenergy.com.au/contact",
];

/// Top-level configuration for one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    /// Pages to fetch, in order. Duplicates are fetched once.
    pub urls: Vec<String>,
    pub chunking: ChunkingConfig,
    /// Documents with fewer cleaned characters are dropped.
    pub min_content_chars: usize,
    /// Parent of the timestamped run folders.
    pub out_dir: PathBuf,
    pub scrape_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            urls: DEFAULT_URLS.iter().map(|s| s.to_string()).collect(),
            chunking: ChunkingConfig::default(),
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            scrape_timeout_secs: DEFAULT_SCRAPE_TIMEOUT_SECS,
        }
    }
}

impl PipelineConfig {
    /// Build configuration from environment variables.
    ///
    /// - `SCRAPE_URLS` (comma-separated; default: the ten key pages)
    /// - `CHUNK_SIZE` / `CHUNK_OVERLAP` / `CHUNK_MIN_SIZE` (default: 400 / 50 / 50)
    /// - `MIN_CONTENT_CHARS` (default: 100)
    /// - `PIPELINE_OUT_DIR` (default: `content_data`)
    /// - `SCRAPE_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self> {
        let urls = match std::env::var("SCRAPE_URLS") {
            Ok(v) if !v.trim().is_empty() => parse_url_list(&v),
            _ => DEFAULT_URLS.iter().map(|s| s.to_string()).collect(),
        };

        let chunking = ChunkingConfig::new(
            read_env_or("CHUNK_SIZE", DEFAULT_WINDOW)?,
            read_env_or("CHUNK_OVERLAP", DEFAULT_OVERLAP)?,
            read_env_or("CHUNK_MIN_SIZE", DEFAULT_MIN_SIZE)?,
        )
        .context("invalid chunking settings")?;

        let cfg = Self {
            urls,
            chunking,
            min_content_chars: read_env_or("MIN_CONTENT_CHARS", DEFAULT_MIN_CONTENT_CHARS)?,
            out_dir: std::env::var("PIPELINE_OUT_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
            scrape_timeout_secs: read_env_or("SCRAPE_TIMEOUT_SECS", DEFAULT_SCRAPE_TIMEOUT_SECS)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate config sanity (no degenerate values).
    pub fn validate(&self) -> Result<()> {
        if self.urls.is_empty() {
            return Err(anyhow!("no URLs to scrape"));
        }
        if let Some(bad) = self
            .urls
            .iter()
            .find(|u| !(u.starts_with("http://") || u.starts_with("https://")))
        {
            return Err(anyhow!("URL must start with http:// or https://: {bad}"));
        }
        if self.scrape_timeout_secs == 0 {
            return Err(anyhow!("`scrape_timeout_secs` must be greater than 0"));
        }
        Ok(())
    }
}

/// Splits a comma-separated list, trimming entries and dropping blanks.
pub fn parse_url_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("failed to parse env variable {key} = '{v}': {e}")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = PipelineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.urls.len(), 10);
        assert_eq!(cfg.min_content_chars, 100);
    }

    #[test]
    fn url_list_is_trimmed() {
        assert_eq!(
            parse_url_list(" https://a/plans , ,https://a/help "),
            vec!["https://a/plans".to_string(), "https://a/help".to_string()]
        );
    }

    #[test]
    fn rejects_non_http_urls() {
        let cfg = PipelineConfig {
            urls: vec!["ftp://a".into()],
            ..PipelineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
