//! POST /api/chat: answers a customer question from website content.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

use crate::{
    core::app_state::AppContext,
    error_handler::AppResult,
    routes::chat::chat_request::{ChatRequest, ChatResponse},
};

/// Handler: POST /api/chat
///
/// Order of checks: pipeline availability (503), then payload (400).
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/api/chat \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is a solar feed-in tariff?","top_k":3}'
/// ```
pub async fn chat(
    State(ctx): State<Arc<AppContext>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let pipeline = ctx.pipeline()?;
    let Json(body) = payload?;
    let (question, top_k) = body.validate()?;

    let answer = pipeline
        .answer_question(question, &body.conversation_history, top_k)
        .await?;

    info!(sources = answer.sources.len(), "chat request completed");
    Ok(Json(answer.into()))
}
