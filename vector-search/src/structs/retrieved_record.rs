//! Data types for one similarity query: filters and the hits it returns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single hit of a similarity query, in the order the index ranked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedRecord {
    pub chunk_id: String,
    /// Chunk text (`chunk_text` column).
    pub text: String,
    pub url: String,
    pub title: String,
    pub section: String,
    /// Similarity score when the index reports one. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// Equality filters applied to index columns, e.g. `{"section": "plans"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryFilters(BTreeMap<String, String>);

impl QueryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on the `section` column.
    pub fn section(section: impl Into<String>) -> Self {
        Self::new().with("section", section)
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialized form expected by the `filters_json` request field.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_filter_serializes_as_flat_object() {
        let f = QueryFilters::section("plans");
        assert_eq!(f.to_json().unwrap(), r#"{"section":"plans"}"#);
        assert!(!f.is_empty());
        assert!(QueryFilters::new().is_empty());
    }

    #[test]
    fn score_is_omitted_when_absent() {
        let r = RetrievedRecord {
            chunk_id: "u_0".into(),
            text: "t".into(),
            url: "u".into(),
            title: "T".into(),
            section: "general".into(),
            score: None,
        };
        let v = serde_json::to_value(&r).unwrap();
        assert!(v.get("score").is_none());
    }
}
