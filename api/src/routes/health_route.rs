//! GET /api/health: service and dependency status.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppContext;

#[derive(Debug, Serialize)]
pub struct Components {
    pub vector_search: bool,
    pub llm: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`.
    pub status: &'static str,
    pub service: String,
    pub version: String,
    pub components: Components,
}

/// Probes both backends concurrently. Always answers 200; failures only
/// flip the component flags and the overall status.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<HealthResponse> {
    let components = match ctx.try_pipeline() {
        Some(p) => {
            let (vector_search, llm) =
                tokio::join!(p.retriever().health_check(), p.generator().health_check());
            Components { vector_search, llm }
        }
        None => Components {
            vector_search: false,
            llm: false,
        },
    };

    let healthy = ctx.is_ready() && components.vector_search && components.llm;
    let settings = ctx.settings();
    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        service: settings.app_name.clone(),
        version: settings.app_version.clone(),
        components,
    })
}
