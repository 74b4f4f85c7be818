/// Configuration for chat-completion calls against a model serving endpoint.
///
/// # Fields
///
/// - `host`: workspace base URL; the serving route is derived from it.
/// - `model`: serving endpoint name, also reported as the model id.
/// - `api_key`: bearer token.
/// - `max_tokens`: maximum number of tokens to generate.
/// - `temperature`: controls randomness (0.0 = deterministic).
/// - `timeout_secs`: per-request timeout in seconds.
/// - `max_retries`: total attempts for transient failures (1 = no retry).
///
/// # Examples
///
/// ```
/// use llm_service::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     host: "https://workspace.example.com".to_string(),
///     model: "databricks-gpt-oss-120b-preview".to_string(),
///     api_key: Some("dapi-...".to_string()),
///     max_tokens: 1024,
///     temperature: 0.7,
///     timeout_secs: 60,
///     max_retries: 3,
/// };
/// assert!(cfg.invocations_url().ends_with("/invocations"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Workspace base URL (`https://...`).
    pub host: String,

    /// Serving endpoint / model identifier.
    pub model: String,

    /// Bearer token for the workspace.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Request timeout (in seconds).
    pub timeout_secs: u64,

    /// Attempts for transient failures.
    pub max_retries: u32,
}

impl LlmModelConfig {
    /// `POST` target for chat completions on this endpoint.
    pub fn invocations_url(&self) -> String {
        format!(
            "{}/serving-endpoints/{}/invocations",
            self.host.trim_end_matches('/'),
            self.model
        )
    }
}
