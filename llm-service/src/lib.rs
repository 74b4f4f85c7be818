//! Client for a hosted chat model exposed through an OpenAI-compatible
//! serving endpoint.
//!
//! - [`config`]: [`LlmModelConfig`] and the env-driven constructor.
//! - [`chat`]: message types and the tagged-union response content.
//! - [`services::chat_service`]: [`ChatService`], the HTTP client.
//! - [`health_service`]: cheap probe that never fails.
//! - [`telemetry`]: tracing subscriber used by the binaries.

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod services;
pub mod telemetry;

pub use chat::{ChatCompletion, ChatMessage, ChatRole, ContentBlock, GenerationMetadata, MessageContent};
pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{LlmError, Result};
pub use services::chat_service::ChatService;
