//! Unified error type for the vector-search crate.

use reqwest::StatusCode;
use services::retry::{Transient, is_retryable_status, is_retryable_transport};
use thiserror::Error;

/// Errors produced by the vector-search client.
#[derive(Debug, Error)]
pub enum VectorSearchError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Required environment variable is missing.
    #[error("missing env variable: {key}")]
    EnvMissing { key: String },

    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Transport ───────────────────────────────────────────────────────────
    /// Underlying HTTP client error (connect, timeout, body read).
    #[error("vector search transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The index answered with a non-success status.
    #[error("vector search returned HTTP {status} from {url}: {snippet}")]
    Status {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    // ── Payload ─────────────────────────────────────────────────────────────
    /// Response body did not have the expected shape.
    #[error("vector search decode error: {0}")]
    Decode(String),

    /// JSON (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Transient for VectorSearchError {
    fn is_transient(&self) -> bool {
        match self {
            VectorSearchError::Http(e) => is_retryable_transport(e),
            VectorSearchError::Status { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}
