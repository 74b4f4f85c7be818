//! Chunking module: splits cleaned page text into overlapping word windows.
//!
//! Strategy:
//! - Words are whitespace-separated tokens;
//! - Text that fits one window is kept as-is (if it has at least `min_size` words);
//! - Longer text is cut into `window`-word slices, advancing `window - overlap`
//!   words per step, until a slice reaches the last word;
//! - Slices shorter than `min_size` words are dropped.
//!
//! [`ChunkingConfig`] validates its parameters once, so chunking itself cannot
//! fail. A step of zero words (`overlap >= window`) would never advance and is
//! rejected up front.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::model::document::{Chunk, Document};

pub const DEFAULT_WINDOW: usize = 400;
pub const DEFAULT_OVERLAP: usize = 50;
pub const DEFAULT_MIN_SIZE: usize = 50;

/// Rejected chunking parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkingError {
    #[error("chunk window must be greater than 0")]
    ZeroWindow,

    #[error("chunk overlap ({overlap}) must be smaller than the window ({window})")]
    OverlapNotBelowWindow { overlap: usize, window: usize },

    #[error("minimum chunk size ({min_size}) must not exceed the window ({window})")]
    MinSizeAboveWindow { min_size: usize, window: usize },
}

/// Validated word-window parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkingConfig {
    window: usize,
    overlap: usize,
    min_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            overlap: DEFAULT_OVERLAP,
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

impl ChunkingConfig {
    /// Checks the parameters and builds the config.
    pub fn new(window: usize, overlap: usize, min_size: usize) -> Result<Self, ChunkingError> {
        if window == 0 {
            return Err(ChunkingError::ZeroWindow);
        }
        if overlap >= window {
            return Err(ChunkingError::OverlapNotBelowWindow { overlap, window });
        }
        if min_size > window {
            return Err(ChunkingError::MinSizeAboveWindow { min_size, window });
        }
        Ok(Self {
            window,
            overlap,
            min_size,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Words to advance between two consecutive windows (always > 0).
    pub fn step(&self) -> usize {
        self.window - self.overlap
    }

    /// Splits `text` into word windows, left to right.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let words: Vec<&str> = text.split_whitespace().collect();

        if words.len() <= self.window {
            return if words.len() >= self.min_size {
                vec![text.to_string()]
            } else {
                Vec::new()
            };
        }

        let mut chunks = Vec::new();
        let mut start = 0usize;
        while start < words.len() {
            let end = (start + self.window).min(words.len());
            let slice = &words[start..end];
            if slice.len() >= self.min_size {
                chunks.push(slice.join(" "));
            }
            if end >= words.len() {
                break;
            }
            start += self.step();
        }

        debug!(
            words = words.len(),
            chunks = chunks.len(),
            window = self.window,
            overlap = self.overlap,
            "chunked text"
        );
        chunks
    }
}

/// One-shot form: validates the parameters, then chunks `text`.
///
/// Invalid parameters are reported before any text is looked at.
pub fn chunk(
    text: &str,
    window: usize,
    overlap: usize,
    min_size: usize,
) -> Result<Vec<String>, ChunkingError> {
    Ok(ChunkingConfig::new(window, overlap, min_size)?.chunk(text))
}

/// Splits a document into [`Chunk`] records (`chunk_id = "{url}_{index}"`).
pub fn chunk_document(doc: &Document, cfg: &ChunkingConfig) -> Vec<Chunk> {
    cfg.chunk(&doc.cleaned_text)
        .into_iter()
        .enumerate()
        .map(|(index, text)| Chunk::new(doc, index, text))
        .collect()
}
