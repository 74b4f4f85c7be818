//! Seams between the orchestrator and the external services.
//!
//! [`Retriever`] and [`Generator`] are object-safe async traits so the HTTP
//! layer can hold `Arc<dyn Retriever>` / `Arc<dyn Generator>` and tests can
//! swap in mocks. [`VectorRetriever`] and [`LlmGenerator`] adapt the concrete
//! clients.

use async_trait::async_trait;
use llm_service::{ChatService, GenerationMetadata};
use vector_search::{QueryFilters, RetrievedRecord, VectorSearchClient};

use crate::{api_types::ConversationTurn, error::BackendError, prompt};

/// Similarity search over the indexed website content.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Up to `top_k` records, most relevant first. `None` uses the backend's
    /// default depth. A blank query yields no records and no remote call.
    ///
    /// Transport, auth and HTTP failures are errors, never an empty result.
    async fn retrieve(
        &self,
        query: &str,
        top_k: Option<usize>,
        filters: Option<&QueryFilters>,
    ) -> Result<Vec<RetrievedRecord>, BackendError>;

    /// Cheap reachability probe. Never fails.
    async fn health_check(&self) -> bool;
}

/// Model output for one question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub metadata: GenerationMetadata,
}

/// Answer generation from a question, its context and prior messages.
#[async_trait]
pub trait Generator: Send + Sync {
    /// `history` is already trimmed to the window the caller wants sent.
    async fn generate(
        &self,
        query: &str,
        context: &str,
        history: &[ConversationTurn],
    ) -> Result<Generation, BackendError>;

    /// Cheap reachability probe. Never fails.
    async fn health_check(&self) -> bool;
}

/// [`Retriever`] backed by the managed vector-search index.
#[derive(Debug)]
pub struct VectorRetriever {
    client: VectorSearchClient,
}

impl VectorRetriever {
    pub fn new(client: VectorSearchClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &VectorSearchClient {
        &self.client
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn retrieve(
        &self,
        query: &str,
        top_k: Option<usize>,
        filters: Option<&QueryFilters>,
    ) -> Result<Vec<RetrievedRecord>, BackendError> {
        Ok(self.client.retrieve(query, top_k, filters).await?)
    }

    async fn health_check(&self) -> bool {
        self.client.health_check().await
    }
}

/// [`Generator`] backed by the chat-completion serving endpoint.
#[derive(Debug)]
pub struct LlmGenerator {
    chat: ChatService,
}

impl LlmGenerator {
    pub fn new(chat: ChatService) -> Self {
        Self { chat }
    }

    pub fn model(&self) -> &str {
        self.chat.model()
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(
        &self,
        query: &str,
        context: &str,
        history: &[ConversationTurn],
    ) -> Result<Generation, BackendError> {
        let messages = prompt::build_messages(query, context, history);
        tracing::debug!(
            context_chars = context.chars().count(),
            history = history.len(),
            "sending prompt"
        );
        let completion = self.chat.complete(&messages).await?;
        Ok(Generation {
            text: completion.text,
            metadata: completion.metadata,
        })
    }

    async fn health_check(&self) -> bool {
        self.chat.health_check().await
    }
}
