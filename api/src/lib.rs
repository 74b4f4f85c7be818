//! HTTP façade of the support assistant.
//!
//! Routes:
//! - `POST /api/chat`: answer a question with cited sources
//! - `GET /api/health`: backend status, `healthy` or `degraded`
//! - `GET /api/starter-questions`: curated example questions
//! - `GET /api`, `GET /`: service info

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};

pub use crate::core::{
    app_state::AppContext,
    settings::{Settings, SettingsError, debug_flag},
};
pub use crate::error_handler::{AppError, AppResult, InitError};
pub use crate::middleware_layer::request_id::REQUEST_ID_HEADER;

use crate::routes::{
    chat::chat_route::chat,
    health_route::health,
    info_route::{api_info, banner, not_found, starter_questions},
};

/// Full application router over a shared context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    let cors = cors_layer(ctx.settings());
    Router::new()
        .route("/", get(banner))
        .route("/api", get(api_info))
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .route("/api/starter-questions", get(starter_questions))
        .fallback(not_found)
        .layer(middleware::from_fn(middleware_layer::request_id::request_id))
        .layer(cors)
        .with_state(ctx)
}

/// Reads settings, builds the clients and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    info!(
        service = %settings.app_name,
        version = %settings.app_version,
        mode = if settings.debug { "DEBUG" } else { "PRODUCTION" },
        "starting"
    );

    let ctx = Arc::new(AppContext::initialize(settings));
    if !ctx.is_ready() {
        warn!("serving without a RAG pipeline; chat requests will answer 503");
    }

    let address = ctx.settings().address.clone();
    let listener = TcpListener::bind(&address).await.map_err(AppError::Bind)?;
    info!(%address, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if settings.allows_any_origin() {
        return base.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
