//! Wire shapes of the index `query` call and positional row decoding.
//!
//! The service answers with a column manifest and an array of rows; each row
//! is a JSON array whose cells line up with `manifest.columns`. A `score`
//! column is appended by the service after the requested columns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::vector_search_error::VectorSearchError;
use crate::structs::retrieved_record::RetrievedRecord;

/// Columns requested for every retrieval.
pub const RECORD_COLUMNS: [&str; 5] = ["chunk_id", "chunk_text", "url", "title", "section"];

/// Name of the similarity column added by the service.
pub const SCORE_COLUMN: &str = "score";

/// Body of `POST /api/2.0/vector-search/indexes/{index}/query`.
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub query_text: &'a str,
    pub columns: &'a [&'a str],
    pub num_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters_json: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub manifest: Option<Manifest>,
    #[serde(default)]
    pub result: Option<ResultData>,
}

#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ResultData {
    #[serde(default)]
    pub data_array: Vec<Vec<Value>>,
}

impl QueryResponse {
    /// Decodes rows into records using the manifest column positions.
    ///
    /// Missing or non-string cells become empty strings. A response without
    /// `result` (no hits) yields an empty list; rows without a manifest are
    /// a decode error.
    pub fn into_records(self) -> Result<Vec<RetrievedRecord>, VectorSearchError> {
        let rows = match self.result {
            Some(r) => r.data_array,
            None => return Ok(Vec::new()),
        };
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let manifest = self
            .manifest
            .ok_or_else(|| VectorSearchError::Decode("rows returned without a manifest".into()))?;
        let positions: HashMap<&str, usize> = manifest
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), i))
            .collect();

        let text_at = |row: &[Value], column: &str| -> String {
            positions
                .get(column)
                .and_then(|&i| row.get(i))
                .and_then(cell_to_string)
                .unwrap_or_default()
        };

        Ok(rows
            .iter()
            .map(|row| RetrievedRecord {
                chunk_id: text_at(row, "chunk_id"),
                text: text_at(row, "chunk_text"),
                url: text_at(row, "url"),
                title: text_at(row, "title"),
                section: text_at(row, "section"),
                score: positions
                    .get(SCORE_COLUMN)
                    .and_then(|&i| row.get(i))
                    .and_then(Value::as_f64)
                    .map(|s| s as f32),
            })
            .collect())
    }
}

fn cell_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Vec<RetrievedRecord> {
        serde_json::from_str::<QueryResponse>(json)
            .unwrap()
            .into_records()
            .unwrap()
    }

    #[test]
    fn rows_are_decoded_by_manifest_position() {
        let records = decode(
            r#"{
              "manifest": {"column_count": 6, "columns": [
                {"name": "chunk_id"}, {"name": "chunk_text"}, {"name": "url"},
                {"name": "title"}, {"name": "section"}, {"name": "score"}]},
              "result": {"row_count": 2, "data_array": [
                ["a_0", "Feed-in tariffs pay you.", "https://x/solar", "Solar", "solar", 0.91],
                ["b_3", "Pay online.", "https://x/help/pay", "Pay", "help", 0.74]]}
            }"#,
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].chunk_id, "a_0");
        assert_eq!(records[0].text, "Feed-in tariffs pay you.");
        assert_eq!(records[0].section, "solar");
        assert_eq!(records[0].score, Some(0.91));
        assert_eq!(records[1].url, "https://x/help/pay");
    }

    #[test]
    fn column_order_follows_the_manifest_not_the_request() {
        let records = decode(
            r#"{
              "manifest": {"columns": [{"name": "url"}, {"name": "title"}, {"name": "chunk_text"}]},
              "result": {"data_array": [["https://x/plans", "Plans", "Compare plans."]]}
            }"#,
        );
        assert_eq!(records[0].url, "https://x/plans");
        assert_eq!(records[0].title, "Plans");
        assert_eq!(records[0].text, "Compare plans.");
        assert_eq!(records[0].chunk_id, "");
        assert_eq!(records[0].score, None);
    }

    #[test]
    fn null_cells_become_empty_strings() {
        let records = decode(
            r#"{
              "manifest": {"columns": [{"name": "chunk_id"}, {"name": "title"}]},
              "result": {"data_array": [["a_0", null]]}
            }"#,
        );
        assert_eq!(records[0].title, "");
    }

    #[test]
    fn missing_result_means_no_hits() {
        assert!(decode(r#"{"manifest": {"columns": []}}"#).is_empty());
        assert!(decode(r#"{}"#).is_empty());
    }

    #[test]
    fn rows_without_manifest_are_rejected() {
        let resp: QueryResponse =
            serde_json::from_str(r#"{"result": {"data_array": [["a"]]}}"#).unwrap();
        assert!(matches!(
            resp.into_records(),
            Err(VectorSearchError::Decode(_))
        ));
    }

    #[test]
    fn filters_are_omitted_when_absent() {
        let body = QueryRequest {
            query_text: "bill",
            columns: &RECORD_COLUMNS,
            num_results: 3,
            filters_json: None,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert!(v.get("filters_json").is_none());
        assert_eq!(v["columns"][1], "chunk_text");
        assert_eq!(v["num_results"], 3);
    }
}
