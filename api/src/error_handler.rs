use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use llm_service::LlmError;
use rag_orchestrator::{PipelineError, UserMessage};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use vector_search::VectorSearchError;

use crate::core::settings::SettingsError;

/// Public application error type.
///
/// Request errors carry only customer-safe text; internal detail is logged
/// where it happens and never placed in a response body.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] SettingsError),

    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("{0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    /// Clients failed to initialize at startup.
    #[error("{}", UserMessage::Initializing.as_str())]
    ServiceUnavailable,

    #[error("{}", UserMessage::RetrievalFailed.as_str())]
    RetrievalFailed,

    #[error("{}", UserMessage::GenerationFailed.as_str())]
    GenerationFailed,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,

            // 5xx
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RetrievalFailed | AppError::GenerationFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            } // startup-only
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound => "NOT_FOUND",
            AppError::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            AppError::RetrievalFailed => "RETRIEVAL_FAILED",
            AppError::GenerationFailed => "GENERATION_FAILED",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        debug!(status = %err.status(), detail = %err.body_text(), "rejected chat payload");
        AppError::BadRequest(UserMessage::InvalidRequest.as_str().to_string())
    }
}

/// Internal detail was already logged by the pipeline; only the kind survives.
impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::EmptyQuestion => {
                AppError::BadRequest(UserMessage::EmptyQuestion.as_str().to_string())
            }
            PipelineError::Retrieval(_) => AppError::RetrievalFailed,
            PipelineError::Generation(_) => AppError::GenerationFailed,
        }
    }
}

/// Why the RAG clients could not be built at startup.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("vector search: {0}")]
    VectorSearch(#[from] VectorSearchError),

    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    #[error("orchestrator: {0}")]
    Orchestrator(#[from] rag_orchestrator::ConfigError),
}
