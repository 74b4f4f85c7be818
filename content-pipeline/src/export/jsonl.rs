//! JSONL writer for chunk records.
//!
//! One compact JSON object per line; field names match the columns of the
//! vector index (`chunk_id`, `url`, `title`, `section`, `chunk_text`,
//! `chunk_index`, `chunk_length`).

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use tracing::info;

use crate::model::document::Chunk;

/// Write [`Chunk`]s as JSON Lines.
pub fn write_chunks_jsonl(path: &Path, chunks: &[Chunk]) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);

    for c in chunks {
        serde_json::to_writer(&mut w, c)?;
        w.write_all(b"\n")?;
    }

    w.flush()?;
    info!(count = chunks.len(), "jsonl: wrote chunks -> {}", path.display());
    Ok(())
}
