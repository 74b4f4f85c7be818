//! GET /api/starter-questions, GET /api and GET /.

use std::sync::Arc;

use axum::{Json, extract::State};
use rag_orchestrator::STARTER_QUESTIONS;
use serde::Serialize;

use crate::{core::app_state::AppContext, error_handler::AppError};

#[derive(Debug, Serialize)]
pub struct StarterQuestionsResponse {
    pub questions: Vec<&'static str>,
}

pub async fn starter_questions() -> Json<StarterQuestionsResponse> {
    Json(StarterQuestionsResponse {
        questions: STARTER_QUESTIONS.to_vec(),
    })
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub chat: &'static str,
    pub health: &'static str,
    pub starter_questions: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub service: String,
    pub version: String,
    pub status: &'static str,
    pub endpoints: Endpoints,
}

pub async fn api_info(State(ctx): State<Arc<AppContext>>) -> Json<ApiInfo> {
    let s = ctx.settings();
    Json(ApiInfo {
        service: s.app_name.clone(),
        version: s.app_version.clone(),
        status: "running",
        endpoints: Endpoints {
            chat: "/api/chat",
            health: "/api/health",
            starter_questions: "/api/starter-questions",
        },
    })
}

#[derive(Debug, Serialize)]
pub struct Banner {
    pub message: String,
    pub version: String,
    pub api: &'static str,
}

pub async fn banner(State(ctx): State<Arc<AppContext>>) -> Json<Banner> {
    let s = ctx.settings();
    Json(Banner {
        message: format!("{} API", s.app_name),
        version: s.app_version.clone(),
        api: "/api",
    })
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
