//! Retrieval-augmented answering for the support assistant.
//!
//! Public API: [`RagPipeline::answer_question`]. It retrieves ranked website
//! chunks through a [`Retriever`], renders them into a numbered context block,
//! and asks a [`Generator`] for an answer with the most recent conversation
//! history. When nothing is retrieved it answers with a fixed message without
//! calling the model.
//!
//! [`VectorRetriever`] and [`LlmGenerator`] plug the concrete
//! `vector-search` and `llm-service` clients into those seams.

pub mod assembler;
pub mod backends;
pub mod cfg;
mod error;
pub mod history;
pub mod pipeline;
pub mod prompt;

mod api_types;

pub use api_types::{Answer, AnswerMetadata, ConversationTurn, Role, Source};
pub use assembler::RetrievalResult;
pub use backends::{Generation, Generator, LlmGenerator, Retriever, VectorRetriever};
pub use cfg::OrchestratorConfig;
pub use error::{BackendError, ConfigError, PipelineError};
pub use pipeline::{RagPipeline, Stage};
pub use prompt::{STARTER_QUESTIONS, UserMessage};
