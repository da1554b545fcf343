//! HTML result extraction for the markup provider's results page.
//!
//! Extraction is a pipeline of [`LinkStrategy`] implementations tried in a
//! fixed priority order: the provider-specific [`ResultClassStrategy`]
//! first, then the generic [`AnyAnchorStrategy`] when the first finds no
//! links at all. Snippets are scanned independently and paired with links
//! by position. The pairing is a best-effort heuristic: if the provider
//! reorders its markup, a snippet can end up next to the wrong link.
//!
//! The input is untrusted. Every strategy stops after `2 × limit`
//! candidates and extraction never fails; a document that yields nothing
//! simply produces no results.

use scraper::{ElementRef, Html, Selector};

use crate::types::SearchResult;

use super::url_canon::{canonicalize_url, has_web_scheme, points_at_provider, resolve_href};
use super::{collapse_whitespace, truncate_chars};

/// Class the provider puts on each organic result link.
pub const RESULT_LINK_SELECTOR: &str = "a.result__a";

/// Class the provider puts on each result snippet.
pub const RESULT_SNIPPET_SELECTOR: &str = ".result__snippet";

/// Maximum snippet length in characters.
pub const MAX_SNIPPET_CHARS: usize = 300;

/// A candidate link gathered by a strategy, already canonicalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub title: String,
}

/// One way of finding result links in a results page.
pub trait LinkStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Collect at most `cap` links that survive the provider filters.
    fn collect_links(&self, document: &Html, provider_domain: &str, cap: usize) -> Vec<Link>;
}

/// Primary strategy: anchors carrying the provider's result-link class.
pub struct ResultClassStrategy;

impl LinkStrategy for ResultClassStrategy {
    fn name(&self) -> &'static str {
        "result-class"
    }

    fn collect_links(&self, document: &Html, provider_domain: &str, cap: usize) -> Vec<Link> {
        collect_matching(document, RESULT_LINK_SELECTOR, provider_domain, cap)
    }
}

/// Fallback strategy: any scheme-qualified anchor that leaves the provider.
pub struct AnyAnchorStrategy;

impl LinkStrategy for AnyAnchorStrategy {
    fn name(&self) -> &'static str {
        "any-anchor"
    }

    fn collect_links(&self, document: &Html, provider_domain: &str, cap: usize) -> Vec<Link> {
        collect_matching(document, "a[href]", provider_domain, cap)
    }
}

/// Extracts ranked results from the markup provider's HTML.
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    provider_domain: String,
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new("duckduckgo.com")
    }
}

impl HtmlExtractor {
    /// An extractor that discards links back to `provider_domain`.
    pub fn new(provider_domain: impl Into<String>) -> Self {
        Self {
            provider_domain: provider_domain.into(),
        }
    }

    /// Extract at most `limit` ranked results from `html`.
    ///
    /// Ranks are `1..=n` in output order. A missing title becomes
    /// `"Result {rank}"`. Never fails.
    pub fn extract(&self, html: &str, limit: usize) -> Vec<SearchResult> {
        let limit = limit.max(1);
        let cap = limit.saturating_mul(2);
        let document = Html::parse_document(html);

        let strategies: [&dyn LinkStrategy; 2] = [&ResultClassStrategy, &AnyAnchorStrategy];
        let links = strategies
            .into_iter()
            .find_map(|strategy| {
                let links = strategy.collect_links(&document, &self.provider_domain, cap);
                tracing::debug!(
                    strategy = strategy.name(),
                    count = links.len(),
                    "link strategy finished"
                );
                (!links.is_empty()).then_some(links)
            })
            .unwrap_or_default();

        let snippets = collect_snippets(&document, cap);
        pair_results(links, &snippets, limit)
    }
}

/// Extract results using the default provider domain.
///
/// Convenience wrapper around [`HtmlExtractor::extract`].
pub fn extract_html_results(html: &str, limit: usize) -> Vec<SearchResult> {
    HtmlExtractor::default().extract(html, limit)
}

/// Gather links from every element matching `selector` until `cap` is hit.
fn collect_matching(
    document: &Html,
    selector: &str,
    provider_domain: &str,
    cap: usize,
) -> Vec<Link> {
    let Ok(selector) = Selector::parse(selector) else {
        tracing::warn!(selector, "invalid link selector");
        return Vec::new();
    };

    let mut links = Vec::new();
    for anchor in document.select(&selector) {
        if links.len() >= cap {
            break;
        }
        if let Some(link) = link_from_anchor(anchor, provider_domain) {
            links.push(link);
        }
    }
    links
}

/// Turn an anchor into a link, or `None` if it fails the provider filters.
fn link_from_anchor(anchor: ElementRef<'_>, provider_domain: &str) -> Option<Link> {
    let href = anchor.value().attr("href")?;
    if href.trim_start().to_ascii_lowercase().starts_with("javascript:") {
        return None;
    }

    let target = resolve_href(href, provider_domain);
    if !has_web_scheme(&target) || points_at_provider(&target, provider_domain) {
        return None;
    }

    let url = canonicalize_url(&target);
    // A link whose canonical form re-exposes the provider (e.g. an unwrapped
    // target that itself points back) is still a self-link.
    if points_at_provider(&url, provider_domain) {
        return None;
    }

    Some(Link {
        url,
        title: collapse_whitespace(&anchor.text().collect::<String>()),
    })
}

/// Gather up to `cap` snippet texts in document order.
fn collect_snippets(document: &Html, cap: usize) -> Vec<String> {
    let Ok(selector) = Selector::parse(RESULT_SNIPPET_SELECTOR) else {
        tracing::warn!("invalid snippet selector");
        return Vec::new();
    };

    document
        .select(&selector)
        .take(cap)
        .map(|el| {
            let text = collapse_whitespace(&el.text().collect::<String>());
            truncate_chars(&text, MAX_SNIPPET_CHARS)
        })
        .collect()
}

/// Combine links with snippets by position and assign ranks.
///
/// Result `i` takes snippet `i`; if there is none it takes snippet `i - 1`,
/// since snippets often trail their link; otherwise the snippet is empty.
fn pair_results(links: Vec<Link>, snippets: &[String], limit: usize) -> Vec<SearchResult> {
    links
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, link)| {
            let rank = i + 1;
            let snippet = snippets
                .get(i)
                .or_else(|| i.checked_sub(1).and_then(|prev| snippets.get(prev)))
                .cloned()
                .unwrap_or_default();
            let title = if link.title.is_empty() {
                format!("Result {rank}")
            } else {
                link.title
            };
            SearchResult {
                title,
                url: link.url,
                snippet,
                rank,
            }
        })
        .collect()
}
