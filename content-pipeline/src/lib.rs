//! Content pipeline for the support assistant's vector index.
//!
//! Fetches the retailer's key pages, strips page chrome, splits the text into
//! overlapping word windows and writes the chunks as JSONL for ingestion.
//!
//! Entry point: [`run::run_pipeline`]. The chunker is usable on its own via
//! [`ChunkingConfig`].

pub mod config;
pub mod core;
pub mod export;
pub mod model;
pub mod run;
pub mod scrape;

pub use crate::config::model::PipelineConfig;
pub use crate::core::chunking::{ChunkingConfig, ChunkingError, chunk, chunk_document};
pub use crate::model::document::{Chunk, Document, Section};
pub use crate::run::run_pipeline;
