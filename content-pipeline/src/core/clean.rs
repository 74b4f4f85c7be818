//! HTML → plain text.
//!
//! Text inside `script`, `style`, `nav`, `footer`, `header`, `iframe` and
//! `noscript` elements is dropped; the remaining text nodes are joined with
//! single spaces.

use scraper::{ElementRef, Html, Selector};

/// Elements whose whole subtree is discarded.
pub const REMOVED_TAGS: [&str; 7] = [
    "script", "style", "nav", "footer", "header", "iframe", "noscript",
];

/// Main-content candidates, in order of preference.
pub const CONTENT_SELECTORS: [&str; 4] = ["main", "article", "div.content", "body"];

/// Extracts readable text from an HTML fragment.
pub fn clean_html(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let mut raw = String::with_capacity(html.len() / 2);

    for node in fragment.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let removed = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| REMOVED_TAGS.contains(&e.name()))
        });
        if removed {
            continue;
        }
        raw.push(' ');
        raw.push_str(text);
    }

    collapse_whitespace(&raw)
}

/// Outer HTML of the first content candidate, if any.
pub fn main_content_html(doc: &Html) -> Option<String> {
    CONTENT_SELECTORS
        .iter()
        .find_map(|css| select_first(doc, css))
        .map(|el| el.html())
}

/// Page title: first `h1`, else `<title>`; empty when neither has text.
pub fn page_title(doc: &Html) -> String {
    ["h1", "title"]
        .iter()
        .filter_map(|css| select_first(doc, css))
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(css).ok()?;
    doc.select(&sel).next()
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
