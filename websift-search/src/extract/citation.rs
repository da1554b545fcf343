//! Citation extraction for answers produced by the API provider.
//!
//! The provider answers with free-form text in which each source is
//! introduced by a numbered marker: `[1] Title https://url snippet [2] ...`.
//! Each marker's span runs to the next marker or the end of the text.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::SearchResult;

use super::url_canon::canonicalize_url;
use super::{collapse_whitespace, truncate_chars};

/// Maximum snippet length in characters.
pub const MAX_CITATION_SNIPPET_CHARS: usize = 200;

fn marker_regex() -> Option<&'static Regex> {
    static MARKER: OnceLock<Option<Regex>> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"\[\d+\]").ok()).as_ref()
}

fn url_regex() -> Option<&'static Regex> {
    static URL: OnceLock<Option<Regex>> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r#"https?://[^\s<>"'\[\]]+"#).ok()).as_ref()
}

/// Extract at most `limit` ranked results from citation-marked text.
///
/// Spans that contain no URL are skipped and consume no rank, so ranks are
/// always `1..=n`. The text before the URL is the title (`"Result {rank}"`
/// if empty), the text after it is the snippet.
pub fn extract_citation_results(text: &str, limit: usize) -> Vec<SearchResult> {
    let limit = limit.max(1);
    let (Some(marker_re), Some(url_re)) = (marker_regex(), url_regex()) else {
        tracing::warn!("citation patterns failed to compile");
        return Vec::new();
    };

    let markers: Vec<_> = marker_re.find_iter(text).collect();
    let mut results = Vec::new();

    for (i, marker) in markers.iter().enumerate() {
        if results.len() >= limit {
            break;
        }
        let end = markers.get(i + 1).map_or(text.len(), |next| next.start());
        let span = &text[marker.end()..end];

        let Some(found) = url_re.find(span) else {
            tracing::trace!(marker = marker.as_str(), "citation without URL skipped");
            continue;
        };

        let url = trim_url_token(found.as_str());
        let title = title_before_url(&span[..found.start()]);
        let snippet = snippet_after_url(&span[found.start() + url.len()..]);

        let rank = results.len() + 1;
        let title = if title.is_empty() {
            format!("Result {rank}")
        } else {
            title
        };

        results.push(SearchResult {
            title,
            url: canonicalize_url(url),
            snippet: truncate_chars(&snippet, MAX_CITATION_SNIPPET_CHARS),
            rank,
        });
    }

    tracing::debug!(
        markers = markers.len(),
        count = results.len(),
        "citations parsed"
    );
    results
}

/// The text before a URL, minus one separator between it and the URL.
///
/// `Title - https://...` and `Title: https://...` lose the separator; a
/// parenthesis is only dropped when it opens directly onto the URL, as in
/// `Title (https://...)`. Brackets inside the title are kept.
fn title_before_url(raw: &str) -> String {
    let title = match raw.strip_suffix('(') {
        Some(opened) => opened,
        None => {
            let trimmed = raw.trim_end();
            trimmed.strip_suffix(['-', ':', '|']).unwrap_or(trimmed)
        }
    };
    collapse_whitespace(title)
}

/// The text after a URL, minus punctuation glued directly onto it.
fn snippet_after_url(raw: &str) -> String {
    let snippet = raw.strip_prefix(['.', ',', ';', ':', ')']).unwrap_or(raw);
    collapse_whitespace(snippet)
}

/// Drop sentence punctuation glued to the end of a URL token.
///
/// A closing parenthesis is kept when the URL itself opened one, as in
/// `https://en.wikipedia.org/wiki/Rust_(programming_language)`.
fn trim_url_token(token: &str) -> &str {
    let mut url = token.trim_end_matches(['.', ',', ';', ':', '!', '?']);
    while url.ends_with(')') && url.matches(')').count() > url.matches('(').count() {
        url = url[..url.len() - 1].trim_end_matches(['.', ',', ';', ':', '!', '?']);
    }
    url
}
