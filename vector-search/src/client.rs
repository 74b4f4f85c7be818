//! REST client for a managed vector-search index.
//!
//! The index embeds the query text itself, so the client only ships the text,
//! the wanted columns and the result count:
//! - POST {host}/api/2.0/vector-search/indexes/{index}/query

use std::time::{Duration, Instant};

use reqwest::header;
use services::retry::RetryPolicy;
use tracing::{debug, error, info, warn};

use crate::errors::vector_search_error::VectorSearchError;
use crate::structs::query::{QueryRequest, QueryResponse, RECORD_COLUMNS};
use crate::structs::retrieved_record::{QueryFilters, RetrievedRecord};
use crate::structs::vector_search_config::VectorSearchConfig;

/// Max characters kept from an error body.
const SNIPPET_MAX_CHARS: usize = 240;

/// Max characters of the query echoed to logs.
const LOG_QUERY_CHARS: usize = 100;

/// Similarity-query client. Stateless between calls; share it behind an `Arc`.
#[derive(Debug)]
pub struct VectorSearchClient {
    client: reqwest::Client,
    cfg: VectorSearchConfig,
    url_query: String,
    retry: RetryPolicy,
}

impl VectorSearchClient {
    /// Validates `cfg` and builds the HTTP client (bearer auth, timeout).
    pub fn new(cfg: VectorSearchConfig) -> Result<Self, VectorSearchError> {
        cfg.validate()?;

        let mut headers = header::HeaderMap::new();
        let auth = header::HeaderValue::from_str(&format!("Bearer {}", cfg.workspace.token))
            .map_err(|e| VectorSearchError::InvalidConfig(format!("invalid token header: {e}")))?;
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.index.timeout_secs))
            .default_headers(headers)
            .build()?;

        let url_query = cfg.query_url();

        info!(
            endpoint = %cfg.index.endpoint,
            index = %cfg.index.index,
            top_k = cfg.search.top_k,
            similarity_threshold = cfg.search.similarity_threshold,
            "VectorSearchClient initialized"
        );

        Ok(Self {
            client,
            retry: RetryPolicy::with_attempts(cfg.index.max_retries),
            cfg,
            url_query,
        })
    }

    pub fn config(&self) -> &VectorSearchConfig {
        &self.cfg
    }

    /// Default result count from config.
    pub fn default_top_k(&self) -> usize {
        self.cfg.search.top_k
    }

    /// Returns up to `top_k` records most similar to `query`, ranked by the
    /// index. A blank query returns no records without calling the service.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: Option<usize>,
        filters: Option<&QueryFilters>,
    ) -> Result<Vec<RetrievedRecord>, VectorSearchError> {
        if query.trim().is_empty() {
            warn!("empty query provided to retrieve");
            return Ok(Vec::new());
        }

        let k = top_k.unwrap_or(self.cfg.search.top_k);
        let filters_json = match filters {
            Some(f) if !f.is_empty() => Some(f.to_json()?),
            _ => None,
        };

        info!(
            top_k = k,
            query = %truncate_chars(query, LOG_QUERY_CHARS),
            filtered = filters_json.is_some(),
            "retrieving"
        );

        let body = QueryRequest {
            query_text: query,
            columns: &RECORD_COLUMNS,
            num_results: k,
            filters_json,
        };

        let resp: QueryResponse = self
            .retry
            .run("vector_search.query", || self.send_once(&body))
            .await?;
        let records = resp.into_records()?;

        info!(retrieved = records.len(), "retrieval finished");
        Ok(records)
    }

    /// [`retrieve`](Self::retrieve) restricted to one site section
    /// (`plans`, `help`, `solar`, ...).
    pub async fn retrieve_by_section(
        &self,
        query: &str,
        section: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<RetrievedRecord>, VectorSearchError> {
        let filters = QueryFilters::section(section);
        self.retrieve(query, top_k, Some(&filters)).await
    }

    /// One-result query for `"test"`. Never fails; errors are logged.
    pub async fn health_check(&self) -> bool {
        let body = QueryRequest {
            query_text: "test",
            columns: &RECORD_COLUMNS[..1],
            num_results: 1,
            filters_json: None,
        };
        match self.send_once(&body).await {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "vector search health check failed");
                false
            }
        }
    }

    async fn send_once(&self, body: &QueryRequest<'_>) -> Result<QueryResponse, VectorSearchError> {
        let started = Instant::now();
        debug!(num_results = body.num_results, "POST {}", self.url_query);

        let resp = self.client.post(&self.url_query).json(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
            let snippet = truncate_chars(&flat, SNIPPET_MAX_CHARS);
            error!(
                %status,
                url = %self.url_query,
                %snippet,
                latency_ms = started.elapsed().as_millis() as u64,
                "vector search returned non-success status"
            );
            return Err(VectorSearchError::Status {
                status,
                url: self.url_query.clone(),
                snippet,
            });
        }

        let out = resp
            .json::<QueryResponse>()
            .await
            .map_err(|e| VectorSearchError::Decode(format!("serde error: {e}")))?;

        debug!(
            latency_ms = started.elapsed().as_millis() as u64,
            "vector search query completed"
        );
        Ok(out)
    }
}

/// First `max` characters of `s` (char-boundary safe).
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        sync::mpsc,
    };

    use super::*;
    use crate::structs::vector_search_config::{IndexConfig, SearchConfig, WorkspaceConfig};

    fn client_for(host: &str) -> VectorSearchClient {
        let cfg = VectorSearchConfig {
            workspace: WorkspaceConfig {
                host: host.into(),
                token: "t".into(),
            },
            index: IndexConfig {
                timeout_secs: 1,
                max_retries: 1,
                ..IndexConfig::default()
            },
            search: SearchConfig::default(),
        };
        VectorSearchClient::new(cfg).unwrap()
    }

    fn unreachable_client() -> VectorSearchClient {
        client_for("http://127.0.0.1:9")
    }

    /// Answers every query with `response` and forwards each request body.
    async fn recording_index(response: Value) -> (String, mpsc::UnboundedReceiver<Value>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::unbounded_channel();
        let payload = response.to_string();
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                if let Some(body) = read_body(&mut sock).await {
                    let _ = tx.send(serde_json::from_slice(&body).unwrap_or(Value::Null));
                }
                let head = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                    payload.len()
                );
                let _ = sock.write_all(head.as_bytes()).await;
                let _ = sock.write_all(payload.as_bytes()).await;
                let _ = sock.shutdown().await;
            }
        });
        (host, rx)
    }

    async fn read_body(sock: &mut TcpStream) -> Option<Vec<u8>> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = sock.read(&mut chunk).await.ok()?;
            if n == 0 {
                return None;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                return Some(buf[end + 4..end + 4 + body_len].to_vec());
            }
        }
    }

    #[tokio::test]
    async fn retrieve_by_section_sends_section_filter() {
        let (host, mut bodies) = recording_index(json!({
            "manifest": { "columns": [
                {"name": "chunk_id"}, {"name": "chunk_text"}, {"name": "url"},
                {"name": "title"}, {"name": "section"}, {"name": "score"}
            ]},
            "result": { "data_array": [
                ["c1", "Fixed rate plans lock your usage rates.", "https://example.com/plans",
                 "Plans", "plans", 0.91]
            ]}
        }))
        .await;
        let client = client_for(&host);

        let records = client
            .retrieve_by_section("which plans are fixed", "plans", Some(2))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://example.com/plans");

        let sent = bodies.recv().await.unwrap();
        assert_eq!(sent["query_text"], "which plans are fixed");
        assert_eq!(sent["num_results"], 2);
        assert_eq!(sent["filters_json"], r#"{"section":"plans"}"#);
    }

    #[tokio::test]
    async fn unfiltered_retrieve_omits_filters() {
        let (host, mut bodies) = recording_index(json!({})).await;
        let client = client_for(&host);

        assert!(client.retrieve("pay my bill", None, None).await.unwrap().is_empty());
        let sent = bodies.recv().await.unwrap();
        assert!(sent.get("filters_json").is_none());
        assert_eq!(sent["num_results"], client.default_top_k());
    }

    #[tokio::test]
    async fn blank_query_returns_nothing_without_a_network_call() {
        let client = unreachable_client();
        assert!(client.retrieve("   ", None, None).await.unwrap().is_empty());
        assert!(client.retrieve("", Some(5), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_an_error() {
        let client = unreachable_client();
        assert!(matches!(
            client.retrieve("how do I pay my bill", None, None).await,
            Err(VectorSearchError::Http(_))
        ));
    }

    #[tokio::test]
    async fn health_check_swallows_errors() {
        assert!(!unreachable_client().health_check().await);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut cfg = unreachable_client().config().clone();
        cfg.search.top_k = 0;
        assert!(VectorSearchClient::new(cfg).is_err());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
