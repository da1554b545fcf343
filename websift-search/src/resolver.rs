//! Search resolution: provider selection, fallback, and multi-query fan-out.
//!
//! A query moves through at most two stages. When a credential is
//! configured the API provider is tried first; its failure is logged and
//! the markup provider is tried next. A markup failure ends resolution
//! with a failure envelope. Every stage returns a `Result` and the chain
//! below composes them, so nothing escapes as an error.

use futures::future::join_all;

use crate::config::{SearchConfig, SearchOptions};
use crate::http;
use crate::provider::SearchProvider;
use crate::providers::{ApiProvider, MarkupProvider};
use crate::types::{MultiQueryEnvelope, SearchEnvelope};

/// Resolve `query` with the built-in providers.
///
/// Always returns an envelope. `source = none` with an `error` means every
/// attempted provider failed; an empty `markup-provider` envelope means
/// the search succeeded but found nothing.
pub async fn search(query: &str, options: &SearchOptions, config: &SearchConfig) -> SearchEnvelope {
    match http::build_client(config) {
        Ok(client) => search_with_client(client, query, options, config).await,
        Err(err) => SearchEnvelope::failure(query, err.to_string()),
    }
}

/// Resolve `query` with the built-in providers sharing `client`.
pub(crate) async fn search_with_client(
    client: reqwest::Client,
    query: &str,
    options: &SearchOptions,
    config: &SearchConfig,
) -> SearchEnvelope {
    let api = ApiProvider::new(client.clone());
    let markup = MarkupProvider::new(client);
    resolve_with(&api, &markup, query, options, config).await
}

/// Resolve `query` through an explicit provider chain.
///
/// `api` is only attempted when `config` carries a non-blank credential.
pub async fn resolve_with<A, M>(
    api: &A,
    markup: &M,
    query: &str,
    options: &SearchOptions,
    config: &SearchConfig,
) -> SearchEnvelope
where
    A: SearchProvider,
    M: SearchProvider,
{
    if let Err(err) = config.validate() {
        tracing::warn!(error = %err, "invalid search configuration");
        return SearchEnvelope::failure(query, err.to_string());
    }

    if config.credential().is_some() {
        match api.search(query, options, config).await {
            Ok(results) => {
                tracing::debug!(source = %api.source(), count = results.len(), "query resolved");
                return SearchEnvelope::success(query, api.source(), results);
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "API provider failed, falling back to markup provider"
                );
            }
        }
    } else {
        tracing::debug!("no API credential configured, using markup provider");
    }

    match markup.search(query, options, config).await {
        Ok(results) => {
            tracing::debug!(source = %markup.source(), count = results.len(), "query resolved");
            SearchEnvelope::success(query, markup.source(), results)
        }
        Err(err) => {
            tracing::warn!(error = %err, "markup provider failed, returning empty envelope");
            SearchEnvelope::failure(query, err.to_string())
        }
    }
}

/// Resolve every query concurrently with the built-in providers.
///
/// The output is positionally aligned with `queries` regardless of which
/// query finishes first.
pub async fn search_multiple<S: AsRef<str>>(
    queries: &[S],
    options: &SearchOptions,
    config: &SearchConfig,
) -> MultiQueryEnvelope {
    let client = match http::build_client(config) {
        Ok(client) => client,
        Err(err) => {
            let message = err.to_string();
            let envelopes = queries
                .iter()
                .map(|q| SearchEnvelope::failure(q.as_ref(), message.clone()))
                .collect();
            let queries = queries.iter().map(|q| q.as_ref().to_owned()).collect();
            return MultiQueryEnvelope::new(queries, envelopes);
        }
    };
    let api = ApiProvider::new(client.clone());
    let markup = MarkupProvider::new(client);
    resolve_multiple_with(&api, &markup, queries, options, config).await
}

/// Resolve every query concurrently through an explicit provider chain.
pub async fn resolve_multiple_with<A, M, S>(
    api: &A,
    markup: &M,
    queries: &[S],
    options: &SearchOptions,
    config: &SearchConfig,
) -> MultiQueryEnvelope
where
    A: SearchProvider,
    M: SearchProvider,
    S: AsRef<str>,
{
    let futures = queries
        .iter()
        .map(|query| resolve_with(api, markup, query.as_ref(), options, config));
    let envelopes = join_all(futures).await;

    let queries: Vec<String> = queries.iter().map(|q| q.as_ref().to_owned()).collect();
    let multi = MultiQueryEnvelope::new(queries, envelopes);
    tracing::debug!(
        queries = multi.queries.len(),
        total = multi.total_results,
        "multi-query search finished"
    );
    multi
}
