//! Runtime configuration loaded from environment variables.

use crate::error::ConfigError;

/// Messages of caller-supplied history forwarded to the model.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Knobs of the orchestrator itself. Retrieval depth (`top_k`) belongs to
/// the retriever, which applies its own default when the caller gives none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Most recent history messages kept; `0` drops history entirely.
    pub history_limit: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl OrchestratorConfig {
    /// Reads `HISTORY_LIMIT` (default 10).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            history_limit: parse("HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)?,
        })
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, dflt: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::EnvParse { key, value: v }),
        _ => Ok(dflt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_ten_messages() {
        assert_eq!(OrchestratorConfig::default().history_limit, 10);
    }

    #[test]
    fn unset_variable_falls_back_to_default() {
        let v: usize = parse("RAG_ORCHESTRATOR_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(v, 7);
    }
}
