use rag_orchestrator::{Answer, AnswerMetadata, ConversationTurn, Source, UserMessage};
use serde::{Deserialize, Serialize};

use crate::error_handler::AppError;

pub const MAX_QUESTION_CHARS: usize = 1000;
pub const TOP_K_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

/// Request payload for POST /api/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Customer question, 1 to 1000 characters.
    pub question: String,
    /// Earlier messages, oldest first.
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    /// Records to retrieve, 1 to 10. Omitted uses the configured default.
    #[serde(default)]
    pub top_k: Option<i64>,
}

impl ChatRequest {
    /// Checks the payload and returns the trimmed question and `top_k`.
    pub fn validate(&self) -> Result<(&str, Option<usize>), AppError> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(AppError::BadRequest(
                UserMessage::EmptyQuestion.as_str().to_string(),
            ));
        }
        if self.question.chars().count() > MAX_QUESTION_CHARS {
            return Err(AppError::BadRequest(format!(
                "Question must be at most {MAX_QUESTION_CHARS} characters"
            )));
        }
        let top_k = match self.top_k {
            None => None,
            Some(k) if TOP_K_RANGE.contains(&k) => Some(k as usize),
            Some(k) => {
                return Err(AppError::BadRequest(format!(
                    "top_k must be between {} and {}, got {k}",
                    TOP_K_RANGE.start(),
                    TOP_K_RANGE.end()
                )));
            }
        };
        Ok((question, top_k))
    }
}

/// Response payload for POST /api/chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<Source>,
    pub metadata: AnswerMetadata,
}

impl From<Answer> for ChatResponse {
    fn from(a: Answer) -> Self {
        Self {
            answer: a.text,
            sources: a.sources,
            metadata: a.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(question: &str, top_k: Option<i64>) -> ChatRequest {
        ChatRequest {
            question: question.into(),
            conversation_history: Vec::new(),
            top_k,
        }
    }

    #[test]
    fn trims_question_and_passes_top_k() {
        let r = req("  How do I pay?  ", Some(4));
        assert_eq!(r.validate().unwrap(), ("How do I pay?", Some(4)));
    }

    #[test]
    fn rejects_blank_and_oversized_questions() {
        assert!(req(" \t", None).validate().is_err());
        assert!(req(&"a".repeat(1001), None).validate().is_err());
        assert!(req(&"a".repeat(1000), None).validate().is_ok());
    }

    #[test]
    fn rejects_top_k_out_of_range() {
        for k in [0, -1, 11] {
            assert!(req("q", Some(k)).validate().is_err(), "k = {k}");
        }
        assert!(req("q", Some(10)).validate().is_ok());
    }
}
