//! Enrichment stage: search, then fetch and flatten the top result pages.
//!
//! Page fetches run concurrently, each under its own timeout. A failed
//! fetch becomes a per-item error and never affects its siblings; the
//! output stays aligned with the search results.

use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;

use crate::config::{FetchOptions, SearchConfig};
use crate::content::flatten_html;
use crate::error::{Result, SearchError};
use crate::extract::truncate_chars;
use crate::http::{self, ACCEPT_HTML};
use crate::resolver;
use crate::types::{EnrichedResult, EnrichmentEnvelope, SearchResult};

/// Maximum characters of page text carried by an [`EnrichedResult`].
pub const MAX_CONTENT_CHARS: usize = 5_000;

/// Search for `query` and fetch the content of the top results.
///
/// The search and every page fetch share one HTTP client.
pub async fn search_and_fetch(
    query: &str,
    options: &FetchOptions,
    config: &SearchConfig,
) -> EnrichmentEnvelope {
    let client = match http::build_client(config) {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(error = %err, "cannot build HTTP client, nothing to fetch");
            return EnrichmentEnvelope {
                query: query.to_owned(),
                search_results: Vec::new(),
                fetched_content: Vec::new(),
                timestamp: Utc::now(),
            };
        }
    };

    let search_options = options.search_options();
    let envelope =
        resolver::search_with_client(client.clone(), query, &search_options, config).await;
    if let Some(ref error) = envelope.error {
        tracing::warn!(error = %error, "search failed, nothing to fetch");
    }

    let fetch_count = options.fetch_count.max(1).min(envelope.results.len());
    let fetched_content = fetch_results(&client, &envelope.results[..fetch_count], config).await;

    EnrichmentEnvelope {
        query: query.to_owned(),
        search_results: envelope.results,
        fetched_content,
        timestamp: Utc::now(),
    }
}

/// Fetch every result's page concurrently through `client`, preserving order.
pub async fn fetch_results(
    client: &reqwest::Client,
    results: &[SearchResult],
    config: &SearchConfig,
) -> Vec<EnrichedResult> {
    let timeout = Duration::from_secs(config.fetch_timeout_seconds);

    let fetches = results.iter().map(|result| async move {
        match fetch_with_client(client, &result.url, timeout).await {
            Ok(text) => {
                let content = truncate_chars(&text, MAX_CONTENT_CHARS);
                EnrichedResult::fetched(result.clone(), content)
            }
            Err(err) => {
                tracing::debug!(url = %result.url, error = %err, "page fetch failed");
                EnrichedResult::failed(result.clone(), err.to_string())
            }
        }
    });

    join_all(fetches).await
}

/// Fetch a single page and flatten it to plain text.
///
/// Bounded by `config.fetch_timeout_seconds`.
///
/// # Errors
///
/// Returns [`SearchError::Timeout`] if the page does not arrive in time,
/// or [`SearchError::Http`] on a network failure or non-success status.
pub async fn fetch_page_text(url: &str, config: &SearchConfig) -> Result<String> {
    let client = http::build_client(config)?;
    fetch_with_client(&client, url, Duration::from_secs(config.fetch_timeout_seconds)).await
}

async fn fetch_with_client(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<String> {
    let request = async {
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(url, e))?
            .error_for_status()
            .map_err(|e| SearchError::from_reqwest(url, e))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(url, e))?;
        Ok::<_, SearchError>(flatten_html(&html))
    };

    tokio::time::timeout(timeout, request)
        .await
        .map_err(|_| {
            SearchError::Timeout(format!(
                "{url} did not respond within {}s",
                timeout.as_secs()
            ))
        })?
}
