//! Default LLM config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `DATABRICKS_HOST`  = workspace base URL (mandatory, http/https)
//! - `DATABRICKS_TOKEN` = bearer token (mandatory)
//! - `LLM_MODEL`        = serving endpoint name (default `databricks-gpt-oss-120b-preview`)
//! - `LLM_MAX_TOKENS`   = max completion tokens (default 1024)
//! - `LLM_TEMPERATURE`  = sampling temperature, `0.0..=2.0` (default 0.7)
//! - `LLM_TIMEOUT_SECS` = per-request timeout (default 60)
//! - `HTTP_MAX_RETRIES` = attempts for transient failures (default 3)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        ConfigError, LlmError, env_opt_f32, env_opt_u32, must_env, validate_http_endpoint,
        validate_range_f32,
    },
};

pub const DEFAULT_MODEL: &str = "databricks-gpt-oss-120b-preview";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Constructs the chat config strictly from environment.
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if host or token are absent
/// - [`ConfigError::InvalidFormat`] if the host is not an http(s) URL
/// - [`ConfigError::InvalidNumber`] / [`ConfigError::OutOfRange`] for bad knobs
pub fn config_chat_from_env() -> Result<LlmModelConfig, LlmError> {
    let host = must_env("DATABRICKS_HOST")?;
    validate_http_endpoint("DATABRICKS_HOST", &host)?;
    let api_key = must_env("DATABRICKS_TOKEN")?;

    let model = std::env::var("LLM_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let cfg = LlmModelConfig {
        host,
        model,
        api_key: Some(api_key),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS),
        temperature: env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE),
        timeout_secs: env_opt_u32("LLM_TIMEOUT_SECS")?
            .map(u64::from)
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
        max_retries: env_opt_u32("HTTP_MAX_RETRIES")?.unwrap_or(DEFAULT_MAX_RETRIES),
    };
    validate(&cfg)?;
    Ok(cfg)
}

/// Checks invariants that do not depend on where the config came from.
pub fn validate(cfg: &LlmModelConfig) -> Result<(), LlmError> {
    validate_http_endpoint("DATABRICKS_HOST", &cfg.host)?;
    if cfg.model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }
    validate_range_f32("temperature", cfg.temperature, 0.0, 2.0)?;
    if cfg.max_tokens == 0 {
        return Err(ConfigError::OutOfRange {
            field: "max_tokens",
            detail: "expected a positive number of tokens",
        }
        .into());
    }
    if cfg.timeout_secs == 0 {
        return Err(ConfigError::OutOfRange {
            field: "LLM_TIMEOUT_SECS",
            detail: "expected a positive number of seconds",
        }
        .into());
    }
    Ok(())
}
