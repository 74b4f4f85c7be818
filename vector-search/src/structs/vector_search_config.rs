//! Configuration layer: reads runtime settings from environment variables
//! and exposes strongly typed configs for the workspace connection, the
//! index and search behavior.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::vector_search_error::VectorSearchError;

pub const DEFAULT_ENDPOINT: &str = "alinta_support_endpoint";
pub const DEFAULT_INDEX: &str = "main.alinta.content_vector_index";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.5;

/// Upper bound accepted for `top_k`.
pub const MAX_TOP_K: usize = 10;

/// Workspace connection (shared with the chat client).
#[derive(Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Base URL, e.g. `https://adb-123.azuredatabricks.net`.
    pub host: String,
    /// Bearer token.
    pub token: String,
}

// Keeps the token out of logs.
impl std::fmt::Debug for WorkspaceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceConfig")
            .field("host", &self.host)
            .field("token", &"***")
            .finish()
    }
}

/// Index addressing and transport knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Vector-search endpoint that hosts the index (informational).
    pub endpoint: String,
    /// Fully qualified index name (`catalog.schema.index`).
    pub index: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Attempts for transient failures.
    pub max_retries: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            index: DEFAULT_INDEX.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Search behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results returned when the caller does not ask for a count.
    pub top_k: usize,
    /// Declared minimum similarity (`0.0..=1.0`). Loaded and validated, not
    /// applied to results.
    pub similarity_threshold: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Top-level runtime configuration for the vector-search client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSearchConfig {
    pub workspace: WorkspaceConfig,
    pub index: IndexConfig,
    pub search: SearchConfig,
}

impl VectorSearchConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `DATABRICKS_HOST` (required)
    /// - `DATABRICKS_TOKEN` (required)
    /// - `VECTOR_SEARCH_ENDPOINT` (default: "alinta_support_endpoint")
    /// - `VECTOR_SEARCH_INDEX` (default: "main.alinta.content_vector_index")
    /// - `VECTOR_SEARCH_TIMEOUT_SECS` (default: 30)
    /// - `HTTP_MAX_RETRIES` (default: 3)
    /// - `TOP_K_RESULTS` (default: 3, range 1..=10)
    /// - `SIMILARITY_THRESHOLD` (default: 0.5, range 0..=1)
    pub fn from_env() -> Result<Self, VectorSearchError> {
        let workspace = WorkspaceConfig {
            host: read_required_env("DATABRICKS_HOST")?,
            token: read_required_env("DATABRICKS_TOKEN")?,
        };

        let index = IndexConfig {
            endpoint: read_string_env("VECTOR_SEARCH_ENDPOINT", DEFAULT_ENDPOINT),
            index: read_string_env("VECTOR_SEARCH_INDEX", DEFAULT_INDEX),
            timeout_secs: read_env_or("VECTOR_SEARCH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            max_retries: read_env_or("HTTP_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
        };

        let search = SearchConfig {
            top_k: read_env_or("TOP_K_RESULTS", DEFAULT_TOP_K)?,
            similarity_threshold: read_env_or(
                "SIMILARITY_THRESHOLD",
                DEFAULT_SIMILARITY_THRESHOLD,
            )?,
        };

        let cfg = Self {
            workspace,
            index,
            search,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Basic validations, independent of where the values came from.
    pub fn validate(&self) -> Result<(), VectorSearchError> {
        let host = self.workspace.host.trim();
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(VectorSearchError::InvalidConfig(
                "DATABRICKS_HOST must start with http:// or https://".into(),
            ));
        }
        if self.workspace.token.trim().is_empty() {
            return Err(VectorSearchError::InvalidConfig(
                "DATABRICKS_TOKEN must not be empty".into(),
            ));
        }
        if self.index.index.trim().is_empty() {
            return Err(VectorSearchError::InvalidConfig(
                "VECTOR_SEARCH_INDEX must not be empty".into(),
            ));
        }
        if !(1..=MAX_TOP_K).contains(&self.search.top_k) {
            return Err(VectorSearchError::InvalidConfig(format!(
                "TOP_K_RESULTS must be within 1..={MAX_TOP_K}"
            )));
        }
        let t = self.search.similarity_threshold;
        if !(t.is_finite() && (0.0..=1.0).contains(&t)) {
            return Err(VectorSearchError::InvalidConfig(
                "SIMILARITY_THRESHOLD must be within 0.0..=1.0".into(),
            ));
        }
        if self.index.timeout_secs == 0 {
            return Err(VectorSearchError::InvalidConfig(
                "VECTOR_SEARCH_TIMEOUT_SECS must be positive".into(),
            ));
        }
        Ok(())
    }

    /// `{host}/api/2.0/vector-search/indexes/{index}/query`
    pub fn query_url(&self) -> String {
        format!(
            "{}/api/2.0/vector-search/indexes/{}/query",
            self.workspace.host.trim().trim_end_matches('/'),
            self.index.index.trim()
        )
    }
}

/// Read a required, non-empty string from env.
fn read_required_env(key: &str) -> Result<String, VectorSearchError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(VectorSearchError::EnvMissing { key: key.into() }),
    }
}

/// Read an optional string from env, falling back to `default` when unset or blank.
fn read_string_env(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Read an optional value from env. Unset or blank yields `default`; a value
/// that fails to parse is an error.
fn read_env_or<T: FromStr>(key: &str, default: T) -> Result<T, VectorSearchError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => {
            v.trim().parse::<T>().map_err(|_| VectorSearchError::EnvParse {
                key: key.into(),
                value: v,
            })
        }
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> VectorSearchConfig {
        VectorSearchConfig {
            workspace: WorkspaceConfig {
                host: "https://ws.example.com/".into(),
                token: "t".into(),
            },
            index: IndexConfig::default(),
            search: SearchConfig::default(),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(cfg().validate().is_ok());
    }

    #[test]
    fn query_url_joins_host_and_index() {
        assert_eq!(
            cfg().query_url(),
            "https://ws.example.com/api/2.0/vector-search/indexes/main.alinta.content_vector_index/query"
        );
    }

    #[test]
    fn top_k_must_be_between_one_and_ten() {
        let mut c = cfg();
        c.search.top_k = 0;
        assert!(c.validate().is_err());
        c.search.top_k = 11;
        assert!(c.validate().is_err());
        c.search.top_k = 10;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn threshold_must_be_a_probability() {
        let mut c = cfg();
        c.search.similarity_threshold = 1.5;
        assert!(c.validate().is_err());
        c.search.similarity_threshold = f32::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut c = cfg();
        c.index.timeout_secs = 0;
        assert!(matches!(
            c.validate(),
            Err(VectorSearchError::InvalidConfig(msg)) if msg.contains("VECTOR_SEARCH_TIMEOUT_SECS")
        ));
    }

    #[test]
    fn host_needs_a_scheme() {
        let mut c = cfg();
        c.workspace.host = "ws.example.com".into();
        assert!(matches!(
            c.validate(),
            Err(VectorSearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn debug_output_hides_token() {
        let s = format!("{:?}", cfg().workspace);
        assert!(!s.contains("\"t\""));
        assert!(s.contains("***"));
    }
}
