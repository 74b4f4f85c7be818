//! HTTP-layer settings read from the environment.

use thiserror::Error;

pub const DEFAULT_APP_NAME: &str = "Alinta Energy Assistant";
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("PORT must be a number between 1 and 65535, got '{0}'")]
    InvalidPort(String),
}

/// Service identity, bind address and CORS policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    /// `host:port` to bind.
    pub address: String,
    /// Allowed origins; `*` allows any.
    pub cors_origins: Vec<String>,
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            address: DEFAULT_ADDRESS.to_string(),
            cors_origins: vec!["*".to_string()],
            debug: false,
        }
    }
}

impl Settings {
    /// - `APP_NAME`, `APP_VERSION`
    /// - `API_ADDRESS` (full `host:port`), else `PORT` on `0.0.0.0`, else `0.0.0.0:8000`
    /// - `CORS_ORIGINS` (comma-separated, default `*`)
    /// - `DEBUG` (`true` / `1`)
    pub fn from_env() -> Result<Self, SettingsError> {
        let dflt = Settings::default();

        let address = match (non_empty("API_ADDRESS"), non_empty("PORT")) {
            (Some(addr), _) => addr,
            (None, Some(port)) => {
                let p: u16 = port
                    .parse()
                    .ok()
                    .filter(|p| *p > 0)
                    .ok_or_else(|| SettingsError::InvalidPort(port.clone()))?;
                format!("0.0.0.0:{p}")
            }
            (None, None) => dflt.address,
        };

        let cors_origins = non_empty("CORS_ORIGINS")
            .map(|v| parse_origins(&v))
            .filter(|v| !v.is_empty())
            .unwrap_or(dflt.cors_origins);

        Ok(Self {
            app_name: non_empty("APP_NAME").unwrap_or(dflt.app_name),
            app_version: non_empty("APP_VERSION").unwrap_or(dflt.app_version),
            address,
            cors_origins,
            debug: debug_flag(),
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// `DEBUG=true` or `DEBUG=1`.
pub fn debug_flag() -> bool {
    non_empty("DEBUG")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1"))
        .unwrap_or(false)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_allow_any_origin() {
        let s = Settings::default();
        assert!(s.allows_any_origin());
        assert_eq!(s.address, "0.0.0.0:8000");
        assert_eq!(s.app_name, "Alinta Energy Assistant");
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins(" https://a.example , ,http://localhost:5173"),
            vec!["https://a.example", "http://localhost:5173"]
        );
    }
}
