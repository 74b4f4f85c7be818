//! Persist pipeline artifacts into the given output directory.
//!
//! Layout:
//!   out_dir/
//!     content_chunks.jsonl
//!     summary.json
//!
//! `out_dir` is expected to be a timestamped folder chosen by the caller.
//! This module ensures the directory exists and writes both files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::{core::summary::PipelineSummary, export::jsonl, model::document::Chunk};

pub const CHUNKS_FILE: &str = "content_chunks.jsonl";
pub const SUMMARY_FILE: &str = "summary.json";

/// File paths of the persisted artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct PersistFiles {
    pub chunks_jsonl: String,
    pub summary_json: String,
}

/// Returned to the caller and also written to `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct PersistSummary {
    pub out_dir: String,
    pub files: PersistFiles,
    pub summary: PipelineSummary,
}

/// Write all artifacts to `out_dir` and return the [`PersistSummary`].
pub fn persist_all(
    out_dir: &Path,
    chunks: &[Chunk],
    summary: PipelineSummary,
) -> Result<PersistSummary> {
    fs::create_dir_all(out_dir).with_context(|| format!("create_dir_all {}", out_dir.display()))?;
    info!("persist: dir prepared -> {}", out_dir.display());

    let p_chunks = out_dir.join(CHUNKS_FILE);
    let p_summary = out_dir.join(SUMMARY_FILE);

    jsonl::write_chunks_jsonl(&p_chunks, chunks)?;

    let persist = PersistSummary {
        out_dir: out_dir.to_string_lossy().into_owned(),
        files: PersistFiles {
            chunks_jsonl: p_chunks.to_string_lossy().into_owned(),
            summary_json: p_summary.to_string_lossy().into_owned(),
        },
        summary,
    };

    {
        let f = fs::File::create(&p_summary)
            .with_context(|| format!("create {}", p_summary.display()))?;
        let w = std::io::BufWriter::new(f);
        serde_json::to_writer_pretty(w, &persist)?;
    }

    info!("persist: all artifacts written");
    Ok(persist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::{Document, Section};
    use chrono::Utc;

    #[test]
    fn writes_jsonl_and_summary() {
        let out = std::env::temp_dir().join(format!(
            "content-pipeline-persist-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let doc = Document {
            url: "https://x/plans".into(),
            title: "Plans".into(),
            section: Section::Plans,
            cleaned_text: "a b c".into(),
            scraped_at: Utc::now(),
        };
        let chunks = vec![
            Chunk::new(&doc, 0, "a b".into()),
            Chunk::new(&doc, 1, "b c".into()),
        ];
        let summary = PipelineSummary::from_counts(&[], std::slice::from_ref(&doc), &chunks);

        let persisted = persist_all(&out, &chunks, summary).unwrap();

        let body = fs::read_to_string(out.join(CHUNKS_FILE)).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Chunk = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, chunks[0]);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(SUMMARY_FILE)).unwrap()).unwrap();
        assert_eq!(written["summary"]["counts"]["chunks"], 2);
        assert_eq!(written["summary"]["chunks_by_section"]["plans"], 2);
        assert_eq!(persisted.summary.counts.documents_kept, 1);

        let _ = fs::remove_dir_all(&out);
    }
}
