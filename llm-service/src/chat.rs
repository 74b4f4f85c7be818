//! Chat message types and the completion payloads of the serving endpoint.
//!
//! The endpoint returns `choices[0].message.content` either as a plain string
//! or as a list of typed blocks (reasoning models emit a `reasoning` block
//! before the `text` block). [`MessageContent`] models both shapes and
//! [`MessageContent::extract_text`] turns either into the answer text.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// Single message sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Message content as returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// `"content": "..."`
    Text(String),
    /// `"content": [{"type": "reasoning", ...}, {"type": "text", "text": "..."}]`
    Blocks(Vec<ContentBlock>),
}

/// One typed block of structured content. Unknown block fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessageContent {
    /// Answer text carried by this content.
    ///
    /// Structured content keeps only `text` blocks, concatenated in order.
    /// When there are none, any block that carries a `text` field is joined
    /// with single spaces instead.
    pub fn extract_text(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Blocks(blocks) => {
                let answer: String = blocks
                    .iter()
                    .filter(|b| b.kind == "text")
                    .filter_map(|b| b.text.as_deref())
                    .collect();
                if !answer.is_empty() {
                    return answer;
                }
                blocks
                    .iter()
                    .filter_map(|b| b.text.as_deref())
                    .collect::<Vec<_>>()
                    .join(" ")
            }
        }
    }
}

/// Model-side details reported with an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub model: String,
    pub tokens_used: Option<u32>,
    pub finish_reason: Option<String>,
}

/// Decoded result of one chat completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    pub text: String,
    pub metadata: GenerationMetadata,
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/serving-endpoints/{name}/invocations`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub messages: &'a [ChatMessage],
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Minimal response for a chat completion.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatMessageOut,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatMessageOut {
    #[serde(default)]
    pub content: Option<MessageContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Usage {
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_of(json: &str) -> MessageContent {
        let resp: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap()
    }

    #[test]
    fn plain_string_content() {
        let c = content_of(r#"{"choices":[{"message":{"role":"assistant","content":"Hello"}}]}"#);
        assert_eq!(c, MessageContent::Text("Hello".into()));
        assert_eq!(c.extract_text(), "Hello");
    }

    #[test]
    fn structured_content_keeps_only_text_blocks() {
        let c = content_of(
            r#"{"choices":[{"message":{"content":[
                {"type":"reasoning","summary":[{"type":"summary_text","text":"thinking"}]},
                {"type":"text","text":"A feed-in tariff "},
                {"type":"text","text":"pays you for exports."}
            ]},"finish_reason":"stop"}]}"#,
        );
        assert_eq!(c.extract_text(), "A feed-in tariff pays you for exports.");
    }

    #[test]
    fn structured_content_falls_back_to_any_text_field() {
        let c = MessageContent::Blocks(vec![
            ContentBlock {
                kind: "output".into(),
                text: Some("first".into()),
            },
            ContentBlock {
                kind: "reasoning".into(),
                text: None,
            },
            ContentBlock {
                kind: "output".into(),
                text: Some("second".into()),
            },
        ]);
        assert_eq!(c.extract_text(), "first second");
    }

    #[test]
    fn usage_and_finish_reason_are_optional() {
        let resp: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(resp.usage.is_none());
        assert!(resp.choices[0].finish_reason.is_none());
        assert!(resp.choices[0].message.content.is_none());
    }

    #[test]
    fn roles_serialize_lowercase() {
        let m = serde_json::to_value(ChatMessage::assistant("hi")).unwrap();
        assert_eq!(m["role"], "assistant");
    }
}
