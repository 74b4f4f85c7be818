//! Chat-completion client for an OpenAI-compatible model serving endpoint.
//!
//! Minimal, non-streaming client. The endpoint is derived from
//! `LlmModelConfig::invocations_url`:
//! - POST {host}/serving-endpoints/{model}/invocations: chat completion
//!
//! Constructor validation:
//! - `cfg.api_key` must be present
//! - `cfg.host` must start with http:// or https://
//!
//! Transient failures (connect/timeout, 429, 5xx) are retried with backoff
//! according to `cfg.max_retries`. Errors are normalized via `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use services::retry::RetryPolicy;
use tracing::{debug, error, info};

use crate::{
    chat::{
        ChatCompletion, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
        GenerationMetadata,
    },
    config::llm_model_config::LlmModelConfig,
    error_handler::{HttpError, LlmError, ProviderError, make_snippet},
    health_service::{self, HealthStatus},
};

/// Thin client for the serving endpoint.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers); it is
/// stateless between calls and safe to share behind an `Arc`.
#[derive(Debug)]
pub struct ChatService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    retry: RetryPolicy,
}

impl ChatService {
    /// Creates a new [`ChatService`] from the given config.
    ///
    /// # Errors
    /// - [`LlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`LlmError::Provider`] with `InvalidEndpoint` if `cfg.host` is invalid
    /// - [`LlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, LlmError> {
        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ProviderError::MissingApiKey)?;

        let host = cfg.host.trim();
        if host.is_empty() || !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(ProviderError::InvalidEndpoint(cfg.host.clone()).into());
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ProviderError::Decode(format!("invalid API key header: {e}")))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        let url_chat = cfg.invocations_url();

        info!(
            model = %cfg.model,
            host = %cfg.host,
            timeout_secs = cfg.timeout_secs,
            max_retries = cfg.max_retries,
            "ChatService initialized"
        );

        Ok(Self {
            client,
            retry: RetryPolicy::with_attempts(cfg.max_retries),
            cfg,
            url_chat,
        })
    }

    /// Model / serving endpoint identifier.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a **non-streaming** chat completion with the configured
    /// `max_tokens` and `temperature`.
    ///
    /// # Errors
    /// - [`LlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`LlmError::HttpTransport`] for client/network failures
    /// - [`LlmError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`LlmError::Provider`] with `EmptyChoices` if no content is returned
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, LlmError> {
        self.complete_with(messages, self.cfg.max_tokens, self.cfg.temperature)
            .await
    }

    /// Same as [`complete`](Self::complete) with explicit sampling knobs.
    pub async fn complete_with(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<ChatCompletion, LlmError> {
        let body = ChatCompletionRequest {
            messages,
            max_tokens,
            temperature,
        };
        self.retry
            .run("chat.complete", || self.send_once(&body))
            .await
    }

    /// Single attempt, no retry. Used by the health probe.
    pub(crate) async fn complete_once(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<ChatCompletion, LlmError> {
        let body = ChatCompletionRequest {
            messages,
            max_tokens,
            temperature,
        };
        self.send_once(&body).await
    }

    /// Cheap reachability probe; never fails.
    pub async fn health_check(&self) -> bool {
        self.probe().await.ok
    }

    /// Detailed probe result (latency, message).
    pub async fn probe(&self) -> HealthStatus {
        health_service::probe_chat(self).await
    }

    async fn send_once(&self, body: &ChatCompletionRequest<'_>) -> Result<ChatCompletion, LlmError> {
        let started = Instant::now();

        debug!(
            model = %self.cfg.model,
            messages = body.messages.len(),
            max_tokens = body.max_tokens,
            "POST {}", self.url_chat
        );

        let resp = self.client.post(&self.url_chat).json(body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis() as u64,
                "chat completion returned non-success status"
            );

            return Err(ProviderError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })
            .into());
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis() as u64,
                    "failed to decode chat completion response"
                );
                return Err(ProviderError::Decode(format!(
                    "serde error: {e}; expected `choices[0].message.content`"
                ))
                .into());
            }
        };

        let completion = into_completion(out, &self.cfg.model)?;

        info!(
            model = %self.cfg.model,
            answer_chars = completion.text.chars().count(),
            tokens_used = ?completion.metadata.tokens_used,
            latency_ms = started.elapsed().as_millis() as u64,
            "chat completion completed"
        );

        Ok(completion)
    }
}

/// Picks the first choice and flattens its content into a [`ChatCompletion`].
pub(crate) fn into_completion(
    out: ChatCompletionResponse,
    model: &str,
) -> Result<ChatCompletion, LlmError> {
    let tokens_used = out.usage.and_then(|u| u.total_tokens);
    let choice = out
        .choices
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyChoices)?;
    let content = choice.message.content.ok_or(ProviderError::EmptyChoices)?;

    Ok(ChatCompletion {
        text: content.extract_text(),
        metadata: GenerationMetadata {
            model: model.to_string(),
            tokens_used,
            finish_reason: choice.finish_reason,
        },
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            host: "http://127.0.0.1:9".into(),
            model: "test-model".into(),
            api_key: Some("token".into()),
            max_tokens: 16,
            temperature: 0.0,
            timeout_secs: 1,
            max_retries: 1,
        }
    }

    #[test]
    fn new_requires_api_key() {
        let mut c = cfg();
        c.api_key = None;
        assert!(matches!(
            ChatService::new(c),
            Err(LlmError::Provider(ProviderError::MissingApiKey))
        ));
    }

    #[test]
    fn new_rejects_non_http_host() {
        let mut c = cfg();
        c.host = "ftp://x".into();
        assert!(matches!(
            ChatService::new(c),
            Err(LlmError::Provider(ProviderError::InvalidEndpoint(_)))
        ));
    }

    #[test]
    fn completion_carries_usage_and_finish_reason() {
        let out: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"Pay online."},"finish_reason":"stop"}],
                "usage":{"prompt_tokens":400,"completion_tokens":50,"total_tokens":450}}"#,
        )
        .unwrap();
        let c = into_completion(out, "m").unwrap();
        assert_eq!(c.text, "Pay online.");
        assert_eq!(c.metadata.model, "m");
        assert_eq!(c.metadata.tokens_used, Some(450));
        assert_eq!(c.metadata.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn completion_without_choices_is_an_error() {
        let out: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            into_completion(out, "m"),
            Err(LlmError::Provider(ProviderError::EmptyChoices))
        ));
    }

    /// Serves `503` to every request and counts the requests.
    async fn always_unavailable() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut sock, _)) = listener.accept().await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                read_request(&mut sock).await;
                let _ = sock
                    .write_all(
                        b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    )
                    .await;
                let _ = sock.shutdown().await;
            }
        });
        (host, hits)
    }

    async fn read_request(sock: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = match sock.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_lowercase();
            if let Some(end) = text.find("\r\n\r\n") {
                let body_len = text[..end]
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    return;
                }
            }
        }
    }

    #[tokio::test]
    async fn health_check_makes_a_single_attempt() {
        let (host, hits) = always_unavailable().await;
        let mut c = cfg();
        c.host = host;
        c.max_retries = 3;
        let svc = ChatService::new(c).unwrap();

        assert!(!svc.health_check().await);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn completion_retries_unavailable_endpoint() {
        let (host, hits) = always_unavailable().await;
        let mut c = cfg();
        c.host = host;
        c.max_retries = 2;
        let svc = ChatService::new(c).unwrap();

        assert!(svc.complete(&[ChatMessage::user("hi")]).await.is_err());
        assert!(hits.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn health_check_swallows_transport_errors() {
        let svc = ChatService::new(cfg()).unwrap();
        assert!(!svc.health_check().await);
    }
}
