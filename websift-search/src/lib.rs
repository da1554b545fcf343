//! # websift-search
//!
//! Web search with provider fallback and best-effort content enrichment.
//!
//! A query is resolved by one of two interchangeable providers: a
//! credentialed chat-completion API whose cited answer is parsed into
//! results, or an HTML results page scraped without credentials. The top
//! results can then be fetched and flattened to plain text.
//!
//! ## Design
//!
//! - The API provider is tried only when [`SearchConfig::api_key`] is set;
//!   any failure falls back to the markup provider
//! - HTML extraction is an ordered pipeline of link strategies over
//!   untrusted input, bounded to `2 × limit` candidates
//! - Every operation returns an envelope, never an error: a failed search
//!   is an envelope with `source = none` and an `error` message
//! - Page fetches run concurrently, each with its own timeout, and fail
//!   per item
//!
//! ## Security
//!
//! - The API credential is passed in explicitly and never logged or
//!   serialized
//! - Search queries are logged only at trace level

pub mod config;
pub mod content;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod http;
pub mod provider;
pub mod providers;
pub mod resolver;
pub mod types;

pub use config::{FetchOptions, SearchConfig, SearchOptions};
pub use enrich::fetch_page_text;
pub use error::{Result, SearchError};
pub use provider::SearchProvider;
pub use types::{
    EnrichedResult, EnrichmentEnvelope, MultiQueryEnvelope, SearchEnvelope, SearchResult,
    SearchSource,
};

/// Search the web for a single query.
///
/// Tries the API provider when a credential is configured, falling back to
/// the markup provider. Always returns an envelope; check
/// [`SearchEnvelope::is_failure`] for total failure.
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// let config = websift_search::SearchConfig::default();
/// let options = websift_search::SearchOptions::default();
/// let envelope = websift_search::search("rust programming", &options, &config).await;
/// for result in &envelope.results {
///     println!("{}. {}: {}", result.rank, result.title, result.url);
/// }
/// # }
/// ```
pub async fn search(query: &str, options: &SearchOptions, config: &SearchConfig) -> SearchEnvelope {
    resolver::search(query, options, config).await
}

/// Search for several queries concurrently.
///
/// `results[i]` always belongs to `queries[i]`. One query's failure only
/// degrades its own envelope.
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// let config = websift_search::SearchConfig::default();
/// let multi = websift_search::search_multiple(
///     &["rust", "tokio"],
///     &websift_search::SearchOptions::default(),
///     &config,
/// )
/// .await;
/// println!("{} results in total", multi.total_results);
/// # }
/// ```
pub async fn search_multiple<S: AsRef<str>>(
    queries: &[S],
    options: &SearchOptions,
    config: &SearchConfig,
) -> MultiQueryEnvelope {
    resolver::search_multiple(queries, options, config).await
}

/// Search, then fetch and flatten the pages of the top results.
///
/// `fetched_content[i]` pairs `search_results[i]` with its page text or a
/// fetch error.
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// let config = websift_search::SearchConfig::default();
/// let options = websift_search::FetchOptions::with_fetch_count(2);
/// let enriched = websift_search::search_and_fetch("rust ownership", &options, &config).await;
/// for item in &enriched.fetched_content {
///     match (&item.content, &item.fetch_error) {
///         (Some(text), _) => println!("{}: {} chars", item.result.url, text.len()),
///         (None, Some(err)) => println!("{}: {err}", item.result.url),
///         (None, None) => {}
///     }
/// }
/// # }
/// ```
pub async fn search_and_fetch(
    query: &str,
    options: &FetchOptions,
    config: &SearchConfig,
) -> EnrichmentEnvelope {
    enrich::search_and_fetch(query, options, config).await
}
