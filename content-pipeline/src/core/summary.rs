//! Pipeline summary: counters collected during one scrape → chunk run.
//!
//! Serialized into `summary.json` next to the chunk export. Field names are
//! lowercase with underscores so they are easy to grep and query.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::{
    document::{Chunk, Document},
    page::ScrapedPage,
};

/// High-level summary of a single pipeline execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// RFC 3339 UTC timestamp when the summary was produced.
    pub generated_at: String,
    pub counts: Counts,
    /// Chunk count per site section.
    pub chunks_by_section: BTreeMap<String, usize>,
    /// Character lengths of the emitted chunks.
    pub chunk_length: LengthStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub pages_total: usize,
    pub pages_scraped: usize,
    pub pages_failed: usize,
    pub documents_kept: usize,
    pub documents_dropped: usize,
    pub chunks: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LengthStats {
    pub min: usize,
    pub max: usize,
    pub avg: f64,
}

impl PipelineSummary {
    pub fn from_counts(pages: &[ScrapedPage], documents: &[Document], chunks: &[Chunk]) -> Self {
        let pages_scraped = pages.iter().filter(|p| p.is_success()).count();

        let mut chunks_by_section = BTreeMap::new();
        for c in chunks {
            *chunks_by_section
                .entry(c.section.as_str().to_string())
                .or_insert(0) += 1;
        }

        Self {
            generated_at: Utc::now().to_rfc3339(),
            counts: Counts {
                pages_total: pages.len(),
                pages_scraped,
                pages_failed: pages.len() - pages_scraped,
                documents_kept: documents.len(),
                documents_dropped: pages_scraped.saturating_sub(documents.len()),
                chunks: chunks.len(),
            },
            chunks_by_section,
            chunk_length: LengthStats::of(chunks.iter().map(|c| c.length)),
        }
    }
}

impl LengthStats {
    fn of(lengths: impl Iterator<Item = usize>) -> Self {
        let mut stats: Option<(usize, usize, usize, usize)> = None;
        for len in lengths {
            stats = Some(match stats {
                None => (len, len, len, 1),
                Some((min, max, sum, n)) => (min.min(len), max.max(len), sum + len, n + 1),
            });
        }
        match stats {
            Some((min, max, sum, n)) => Self {
                min,
                max,
                avg: sum as f64 / n as f64,
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_stats_over_values() {
        let s = LengthStats::of([10usize, 30, 20].into_iter());
        assert_eq!((s.min, s.max), (10, 30));
        assert!((s.avg - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn length_stats_of_nothing_is_zero() {
        assert_eq!(LengthStats::of(std::iter::empty()), LengthStats::default());
    }
}
