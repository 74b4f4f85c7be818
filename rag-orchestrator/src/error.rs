//! Typed errors for the rag-orchestrator crate.

use thiserror::Error;

/// Error produced by a [`Retriever`](crate::Retriever) or
/// [`Generator`](crate::Generator) implementation.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a question could not be answered.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The question was blank after trimming. Client error.
    #[error("question is empty")]
    EmptyQuestion,

    /// The retriever failed; the generator was not called.
    #[error("retrieval failed: {0}")]
    Retrieval(#[source] BackendError),

    /// The generator failed after context was retrieved.
    #[error("generation failed: {0}")]
    Generation(#[source] BackendError),
}

impl PipelineError {
    /// `true` when the caller sent something invalid.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::EmptyQuestion)
    }
}

/// Invalid orchestrator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse env variable {key} = '{value}'")]
    EnvParse { key: &'static str, value: String },
}
