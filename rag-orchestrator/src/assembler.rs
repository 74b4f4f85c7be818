//! Turns retrieved records into a prompt context block and a citation list.
//!
//! Records are kept in the order the retriever ranked them; nothing here
//! re-ranks or filters by score.

use std::collections::HashSet;

use vector_search::RetrievedRecord;

use crate::api_types::Source;

/// Returned by [`RetrievalResult::context_string`] when nothing was retrieved.
pub const NO_CONTEXT_SENTINEL: &str = "No relevant information found.";

const BLOCK_SEPARATOR: &str = "\n\n---\n\n";
const UNKNOWN_TITLE: &str = "Unknown";

/// Records returned for one query.
#[derive(Clone, Debug)]
pub struct RetrievalResult {
    records: Vec<RetrievedRecord>,
    query: String,
}

impl RetrievalResult {
    pub fn new(records: Vec<RetrievedRecord>, query: impl Into<String>) -> Self {
        Self {
            records,
            query: query.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn records(&self) -> &[RetrievedRecord] {
        &self.records
    }

    /// Number of input records, duplicates included.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render records as numbered blocks:
    ///
    /// ```text
    /// [Source 1: {title}]
    /// {text}
    /// URL: {url}
    /// ```
    ///
    /// joined by `\n\n---\n\n`.
    pub fn context_string(&self) -> String {
        if self.records.is_empty() {
            return NO_CONTEXT_SENTINEL.to_string();
        }
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "[Source {}: {}]\n{}\nURL: {}",
                    i + 1,
                    title_or_unknown(&r.title),
                    r.text,
                    r.url
                )
            })
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }

    /// Citations, first occurrence per URL. Records without a URL are skipped.
    pub fn sources(&self) -> Vec<Source> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| !r.url.is_empty() && seen.insert(r.url.as_str()))
            .map(|r| Source {
                title: title_or_unknown(&r.title).to_string(),
                url: r.url.clone(),
            })
            .collect()
    }
}

fn title_or_unknown(title: &str) -> &str {
    if title.trim().is_empty() {
        UNKNOWN_TITLE
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(url: &str, title: &str, text: &str) -> RetrievedRecord {
        RetrievedRecord {
            chunk_id: format!("{url}_0"),
            text: text.into(),
            url: url.into(),
            title: title.into(),
            section: "general".into(),
            score: None,
        }
    }

    #[test]
    fn empty_result_renders_sentinel_and_no_sources() {
        let r = RetrievalResult::new(vec![], "anything");
        assert_eq!(r.context_string(), "No relevant information found.");
        assert!(r.sources().is_empty());
        assert_eq!(r.count(), 0);
    }

    #[test]
    fn blocks_are_numbered_and_separated_in_order() {
        let r = RetrievalResult::new(
            vec![rec("https://a", "Plans", "alpha"), rec("https://b", "Help", "beta")],
            "q",
        );
        assert_eq!(
            r.context_string(),
            "[Source 1: Plans]\nalpha\nURL: https://a\n\n---\n\n[Source 2: Help]\nbeta\nURL: https://b"
        );
    }

    #[test]
    fn sources_dedupe_by_url_keeping_first() {
        let r = RetrievalResult::new(
            vec![
                rec("a", "first a", "1"),
                rec("b", "b", "2"),
                rec("a", "second a", "3"),
                rec("c", "c", "4"),
            ],
            "q",
        );
        let sources = r.sources();
        let urls: Vec<&str> = sources.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b", "c"]);
        assert_eq!(sources[0].title, "first a");
        assert_eq!(r.count(), 4);
    }

    #[test]
    fn records_without_url_are_not_cited() {
        let r = RetrievalResult::new(vec![rec("", "x", "1"), rec("https://a", "", "2")], "q");
        assert_eq!(
            r.sources(),
            vec![Source {
                title: "Unknown".into(),
                url: "https://a".into()
            }]
        );
        assert!(r.context_string().contains("[Source 2: Unknown]"));
    }
}
