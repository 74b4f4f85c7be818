//! Health probe for the chat serving endpoint.
//!
//! The probe sends a tiny completion (`max_tokens = 10`, `temperature = 0`)
//! with a fixed prompt in a single attempt, without retries. It is **resilient**: it never returns an error. Any
//! failure is converted to `HealthStatus { ok: false, message: ... }`, which
//! is convenient for a `/health` endpoint.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::{chat::ChatMessage, services::chat_service::ChatService};

const PROBE_SYSTEM: &str = "You are a helpful assistant.";
const PROBE_USER: &str = "Say 'OK' if you can read this.";
const PROBE_MAX_TOKENS: u32 = 10;

/// A serializable health snapshot for the chat endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Model / serving endpoint that was probed.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured latency in milliseconds for the probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

/// Runs the probe against `svc`. Never fails.
pub async fn probe_chat(svc: &ChatService) -> HealthStatus {
    let started = Instant::now();
    let messages = [ChatMessage::system(PROBE_SYSTEM), ChatMessage::user(PROBE_USER)];

    match svc.complete_once(&messages, PROBE_MAX_TOKENS, 0.0).await {
        Ok(_) => {
            let status = HealthStatus {
                model: svc.model().to_string(),
                ok: true,
                latency_ms: started.elapsed().as_millis(),
                message: "serving endpoint answered".into(),
            };
            info!(
                model = %status.model,
                latency_ms = status.latency_ms as u64,
                "health probe completed"
            );
            status
        }
        Err(err) => {
            let status = HealthStatus {
                model: svc.model().to_string(),
                ok: false,
                latency_ms: started.elapsed().as_millis(),
                message: err.to_string(),
            };
            warn!(
                model = %status.model,
                latency_ms = status.latency_ms as u64,
                message = %status.message,
                "health probe failed"
            );
            status
        }
    }
}
