//! Page fetcher: downloads pages and keeps their title and main content HTML.
//!
//! Every URL yields a [`ScrapedPage`]; transport errors and non-success
//! statuses are recorded as `Failed` pages so one bad URL does not abort the
//! run.

use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::header;
use scraper::Html;
use tracing::{info, warn};

use crate::core::clean::{main_content_html, page_title};
use crate::model::page::{ScrapeStatus, ScrapedPage};

/// Browser-like User-Agent; some sites reject default client agents.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers({
                let mut h = header::HeaderMap::new();
                h.insert(header::ACCEPT, header::HeaderValue::from_static("text/html"));
                h
            })
            .build()?;
        Ok(Self { client })
    }

    /// Fetches one page. Never fails.
    pub async fn fetch(&self, url: &str) -> ScrapedPage {
        let started = Instant::now();
        let body = match self.get_text(url).await {
            Ok(b) => b,
            Err(e) => {
                warn!(%url, error = %e, "scrape failed");
                return ScrapedPage::failed(url, e.to_string());
            }
        };
        let page = parse_page(url, &body);
        info!(
            %url,
            title = %page.title,
            html_bytes = page.html.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "scraped"
        );
        page
    }

    /// Fetches pages one after another, in input order.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<ScrapedPage> {
        let mut pages = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            info!(n = i + 1, total = urls.len(), %url, "scraping");
            pages.push(self.fetch(url).await);
        }
        pages
    }

    async fn get_text(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

/// Builds a successful [`ScrapedPage`] from a downloaded body.
pub fn parse_page(url: &str, body: &str) -> ScrapedPage {
    let doc = Html::parse_document(body);
    ScrapedPage {
        url: url.to_string(),
        title: page_title(&doc),
        html: main_content_html(&doc).unwrap_or_default(),
        scraped_at: Utc::now(),
        status: ScrapeStatus::Success,
        error: None,
    }
}
