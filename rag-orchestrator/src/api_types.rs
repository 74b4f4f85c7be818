//! Public API types re-used by external crates (e.g., the HTTP API layer).

use llm_service::GenerationMetadata;
use serde::{Deserialize, Serialize};

use crate::prompt::UserMessage;

/// Author of a history message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message of caller-supplied history, oldest first. Never persisted.
///
/// # Example
/// ```
/// use rag_orchestrator::{ConversationTurn, Role};
/// let t: ConversationTurn =
///     serde_json::from_str(r#"{"role":"user","content":"What plans are available?"}"#).unwrap();
/// assert_eq!(t.role, Role::User);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Citation for an answer. Unique by `url` within one answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// Counts and model details attached to an answer.
///
/// Serializes flat: `{"retrieved_chunks": 3, "model": "...", "tokens_used": 450,
/// "finish_reason": "stop"}`. Generation fields are absent when the model was
/// never called.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnswerMetadata {
    pub retrieved_chunks: usize,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationMetadata>,
}

/// Final answer with its citations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<Source>,
    pub metadata: AnswerMetadata,
}

impl Answer {
    /// Fixed reply used when retrieval found nothing.
    pub fn no_context() -> Self {
        Self {
            text: UserMessage::NoContext.as_str().to_string(),
            sources: Vec::new(),
            metadata: AnswerMetadata {
                retrieved_chunks: 0,
                generation: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_flattens_generation_fields() {
        let meta = AnswerMetadata {
            retrieved_chunks: 2,
            generation: Some(GenerationMetadata {
                model: "m".into(),
                tokens_used: Some(450),
                finish_reason: Some("stop".into()),
            }),
        };
        let v = serde_json::to_value(&meta).unwrap();
        assert_eq!(v["retrieved_chunks"], 2);
        assert_eq!(v["model"], "m");
        assert_eq!(v["tokens_used"], 450);
        assert_eq!(v["finish_reason"], "stop");
    }

    #[test]
    fn no_context_metadata_has_only_the_count() {
        let v = serde_json::to_value(Answer::no_context().metadata).unwrap();
        assert_eq!(v, serde_json::json!({ "retrieved_chunks": 0 }));
    }

    #[test]
    fn unknown_roles_are_rejected() {
        let r = serde_json::from_str::<ConversationTurn>(r#"{"role":"system","content":"x"}"#);
        assert!(r.is_err());
    }
}
