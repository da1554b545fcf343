//! Result extraction from provider payloads.
//!
//! [`html`] parses the markup provider's results page, [`citation`] parses
//! the API provider's citation-marked answer, and [`url_canon`] gives both
//! the same canonical URL form.

pub mod citation;
pub mod html;
pub mod url_canon;

pub use citation::extract_citation_results;
pub use html::{extract_html_results, HtmlExtractor};
pub use url_canon::canonicalize_url;

/// Collapse every whitespace run to a single space and trim the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters, never splitting a character.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_owned(),
        None => text.to_owned(),
    }
}
