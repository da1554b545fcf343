//! Page flattening — turns a fetched HTML page into plain text.
//!
//! Removes `<script>` and `<style>` blocks, drops every remaining tag,
//! collapses whitespace runs to single spaces, and bounds the length.

use scraper::Html;

use crate::extract::{collapse_whitespace, truncate_chars};

/// Maximum characters kept when flattening a page.
pub const MAX_RAW_CHARS: usize = 10_000;

/// Flatten `html` to at most [`MAX_RAW_CHARS`] characters of text.
pub fn flatten_html(html: &str) -> String {
    flatten_html_with_limit(html, MAX_RAW_CHARS)
}

/// Flatten `html` to at most `max_chars` characters of text.
pub fn flatten_html_with_limit(html: &str, max_chars: usize) -> String {
    let cleaned = strip_tag(&strip_tag(html, "script"), "style");
    let document = Html::parse_document(&cleaned);
    let text = document.root_element().text().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapse_whitespace(&text), max_chars)
}

/// Remove all instances of a specific HTML tag and its content.
fn strip_tag(html: &str, tag: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let lower = html.to_ascii_lowercase();
    let open_tag = format!("<{tag}");
    let close_tag = format!("</{tag}>");

    let mut pos = 0;
    loop {
        let start = match lower[pos..].find(&open_tag) {
            Some(offset) => pos + offset,
            None => {
                result.push_str(&html[pos..]);
                break;
            }
        };

        // Make sure this is the target tag and not e.g. <scripts> or <styled-box>.
        let after_tag = start + open_tag.len();
        if after_tag < lower.len() {
            let next_byte = lower.as_bytes()[after_tag];
            if !matches!(next_byte, b' ' | b'>' | b'/' | b'\n' | b'\r' | b'\t') {
                result.push_str(&html[pos..after_tag]);
                pos = after_tag;
                continue;
            }
        }

        result.push_str(&html[pos..start]);

        let end = match lower[start..].find(&close_tag) {
            Some(offset) => start + offset + close_tag.len(),
            // Unclosed: drop everything to the end, since the rest is script body.
            None => html.len(),
        };

        pos = end;
    }

    result
}
