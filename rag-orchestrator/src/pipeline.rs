//! Question answering over retrieved context.
//!
//! One call of [`RagPipeline::answer_question`] walks:
//!
//! ```text
//! Received -> Retrieving -> NoContext ----------------> Completed
//!                        \-> Retrieved -> Generating -> Completed
//! (any step) -> Failed
//! ```
//!
//! Each transition is logged with its stage name. The pipeline keeps no
//! state between calls.

use std::{fmt, sync::Arc, time::Instant};

use tracing::{debug, error, info, warn};

use crate::{
    api_types::{Answer, AnswerMetadata, ConversationTurn},
    assembler::RetrievalResult,
    backends::{Generator, Retriever},
    cfg::OrchestratorConfig,
    error::PipelineError,
    history::recent_history,
};

const LOG_QUESTION_CHARS: usize = 100;

/// Step of one orchestration run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Received,
    Retrieving,
    NoContext,
    Retrieved,
    Generating,
    Completed,
    Failed,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Retrieving => "retrieving",
            Stage::NoContext => "no_context",
            Stage::Retrieved => "retrieved",
            Stage::Generating => "generating",
            Stage::Completed => "completed",
            Stage::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the current stage of a single run and logs transitions.
struct Run {
    stage: Stage,
    started: Instant,
}

impl Run {
    fn start() -> Self {
        debug!(stage = %Stage::Received, "stage");
        Self {
            stage: Stage::Received,
            started: Instant::now(),
        }
    }

    fn enter(&mut self, next: Stage) {
        debug_assert!(!self.stage.is_terminal());
        debug!(from = %self.stage, stage = %next, "stage");
        self.stage = next;
    }

    fn fail(&mut self, err: PipelineError) -> PipelineError {
        let from = self.stage;
        self.enter(Stage::Failed);
        if err.is_client_error() {
            warn!(from = %from, error = %err, "question rejected");
        } else {
            error!(
                from = %from,
                error = %err,
                latency_ms = self.started.elapsed().as_millis(),
                "RAG pipeline failed"
            );
        }
        err
    }

    fn complete(&mut self, answer: Answer) -> Answer {
        self.enter(Stage::Completed);
        info!(
            retrieved = answer.metadata.retrieved_chunks,
            sources = answer.sources.len(),
            latency_ms = self.started.elapsed().as_millis(),
            "RAG pipeline completed"
        );
        answer
    }
}

/// Retrieval followed by generation, over shared backends.
///
/// Cheap to clone; clones share the same backends.
#[derive(Clone)]
pub struct RagPipeline {
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn Generator>,
    cfg: OrchestratorConfig,
}

impl fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RagPipeline")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn Generator>,
        cfg: OrchestratorConfig,
    ) -> Self {
        Self {
            retriever,
            generator,
            cfg,
        }
    }

    pub fn retriever(&self) -> &dyn Retriever {
        self.retriever.as_ref()
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.cfg
    }

    /// Answer `question` from retrieved website content.
    ///
    /// `history` is oldest first; only the most recent
    /// [`history_limit`](OrchestratorConfig::history_limit) messages are sent.
    /// `top_k` of `None` lets the retriever use its configured default.
    ///
    /// When retrieval finds nothing, the fixed no-context answer is returned
    /// and the generator is not called.
    ///
    /// # Errors
    /// - [`PipelineError::EmptyQuestion`] if `question` is blank
    /// - [`PipelineError::Retrieval`] if the retriever fails
    /// - [`PipelineError::Generation`] if the generator fails
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(
            question = %preview(question),
            top_k = ?top_k,
            history = history.len()
        )
    )]
    pub async fn answer_question(
        &self,
        question: &str,
        history: &[ConversationTurn],
        top_k: Option<usize>,
    ) -> Result<Answer, PipelineError> {
        let mut run = Run::start();

        let question = question.trim();
        if question.is_empty() {
            return Err(run.fail(PipelineError::EmptyQuestion));
        }

        run.enter(Stage::Retrieving);
        let records = match self.retriever.retrieve(question, top_k, None).await {
            Ok(records) => records,
            Err(e) => return Err(run.fail(PipelineError::Retrieval(e))),
        };
        let retrieval = RetrievalResult::new(records, question);

        if retrieval.is_empty() {
            run.enter(Stage::NoContext);
            warn!("no relevant content retrieved");
            return Ok(run.complete(Answer::no_context()));
        }

        run.enter(Stage::Retrieved);
        let context = retrieval.context_string();
        debug!(
            retrieved = retrieval.count(),
            context_chars = context.chars().count(),
            "context assembled"
        );

        run.enter(Stage::Generating);
        let history = recent_history(history, self.cfg.history_limit);
        let generation = match self.generator.generate(question, &context, history).await {
            Ok(g) => g,
            Err(e) => return Err(run.fail(PipelineError::Generation(e))),
        };

        Ok(run.complete(Answer {
            text: generation.text,
            sources: retrieval.sources(),
            metadata: AnswerMetadata {
                retrieved_chunks: retrieval.count(),
                generation: Some(generation.metadata),
            },
        }))
    }
}

/// First `LOG_QUESTION_CHARS` characters of `s`, for logs.
fn preview(s: &str) -> String {
    match s.char_indices().nth(LOG_QUESTION_CHARS) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
