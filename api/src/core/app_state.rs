use std::sync::Arc;

use llm_service::{ChatService, config::default_config::config_chat_from_env};
use rag_orchestrator::{LlmGenerator, OrchestratorConfig, RagPipeline, VectorRetriever};
use tracing::{error, info};
use vector_search::{VectorSearchClient, VectorSearchConfig};

use crate::{
    core::settings::Settings,
    error_handler::{AppError, InitError},
};

/// Shared state for all HTTP handlers.
///
/// Built once at startup. If the clients could not be built, the failure is
/// kept here and every chat request answers 503 instead of retrying setup.
#[derive(Debug)]
pub struct AppContext {
    settings: Settings,
    pipeline: Result<RagPipeline, String>,
}

impl AppContext {
    /// Build the retriever, generator and pipeline from the environment.
    /// Never fails; see [`AppContext::is_ready`].
    pub fn initialize(settings: Settings) -> Self {
        let pipeline = build_pipeline_from_env().map_err(|e| {
            error!(error = %e, "failed to initialize RAG pipeline");
            e.to_string()
        });
        Self { settings, pipeline }
    }

    pub fn with_pipeline(settings: Settings, pipeline: RagPipeline) -> Self {
        Self {
            settings,
            pipeline: Ok(pipeline),
        }
    }

    pub fn unavailable(settings: Settings, reason: impl Into<String>) -> Self {
        Self {
            settings,
            pipeline: Err(reason.into()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_ready(&self) -> bool {
        self.pipeline.is_ok()
    }

    pub fn try_pipeline(&self) -> Option<&RagPipeline> {
        self.pipeline.as_ref().ok()
    }

    /// The pipeline, or [`AppError::ServiceUnavailable`] if setup failed.
    pub fn pipeline(&self) -> Result<&RagPipeline, AppError> {
        self.pipeline.as_ref().map_err(|reason| {
            error!(reason = %reason, "RAG pipeline not initialized");
            AppError::ServiceUnavailable
        })
    }
}

fn build_pipeline_from_env() -> Result<RagPipeline, InitError> {
    let vs_cfg = VectorSearchConfig::from_env()?;
    info!(
        endpoint = %vs_cfg.index.endpoint,
        index = %vs_cfg.index.index,
        top_k = vs_cfg.search.top_k,
        similarity_threshold = vs_cfg.search.similarity_threshold,
        "vector search configured"
    );
    let retriever = VectorRetriever::new(VectorSearchClient::new(vs_cfg)?);

    let chat = ChatService::new(config_chat_from_env()?)?;
    info!(model = %chat.model(), "llm configured");
    let generator = LlmGenerator::new(chat);

    let pipeline = RagPipeline::new(
        Arc::new(retriever),
        Arc::new(generator),
        OrchestratorConfig::from_env()?,
    );
    info!("RAG pipeline initialized successfully");
    Ok(pipeline)
}
