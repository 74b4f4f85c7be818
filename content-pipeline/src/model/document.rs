//! Documents (cleaned pages) and the chunk records cut from them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::clean::clean_html;
use crate::model::page::ScrapedPage;

/// Site area a page belongs to, derived from its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Plans,
    Help,
    Solar,
    Hardship,
    General,
}

impl Section {
    /// First matching URL fragment wins: `/plans`, `/help`, `/solar`,
    /// `/hardship`; anything else is `general`.
    pub fn from_url(url: &str) -> Self {
        if url.contains("/plans") {
            Section::Plans
        } else if url.contains("/help") {
            Section::Help
        } else if url.contains("/solar") {
            Section::Solar
        } else if url.contains("/hardship") {
            Section::Hardship
        } else {
            Section::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Plans => "plans",
            Section::Help => "help",
            Section::Solar => "solar",
            Section::Hardship => "hardship",
            Section::General => "general",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cleaned text of one page. Immutable once chunked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub title: String,
    pub section: Section,
    pub cleaned_text: String,
    pub scraped_at: DateTime<Utc>,
}

impl Document {
    /// Cleans a successfully scraped page. Returns `None` for failed pages,
    /// pages without content, and pages whose cleaned text is shorter than
    /// `min_chars` characters.
    pub fn from_page(page: &ScrapedPage, min_chars: usize) -> Option<Self> {
        if !page.is_success() || page.html.is_empty() {
            return None;
        }
        let cleaned_text = clean_html(&page.html);
        if cleaned_text.chars().count() < min_chars {
            return None;
        }
        Some(Self {
            url: page.url.clone(),
            title: page.title.clone(),
            section: Section::from_url(&page.url),
            cleaned_text,
            scraped_at: page.scraped_at,
        })
    }
}

/// One indexed unit. Field names on the wire match the index columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `"{url}_{index}"`
    pub chunk_id: String,
    pub url: String,
    pub title: String,
    pub section: Section,
    #[serde(rename = "chunk_text")]
    pub text: String,
    /// Zero-based position within the document.
    #[serde(rename = "chunk_index")]
    pub index: usize,
    /// Character count of `text`.
    #[serde(rename = "chunk_length")]
    pub length: usize,
}

impl Chunk {
    pub fn new(doc: &Document, index: usize, text: String) -> Self {
        Self {
            chunk_id: format!("{}_{}", doc.url, index),
            url: doc.url.clone(),
            title: doc.title.clone(),
            section: doc.section,
            length: text.chars().count(),
            text,
            index,
        }
    }
}
