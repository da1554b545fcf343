//! Core types: search results, provider identification, and the envelopes
//! returned by every public operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single ranked search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// Canonical URL of the result, tracking suffixes stripped.
    pub url: String,
    /// A short text snippet summarising the page.
    pub snippet: String,
    /// 1-based position within the envelope. Contiguous, no repeats.
    pub rank: usize,
}

/// Which provider produced an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchSource {
    /// The credentialed chat-completion provider.
    ApiProvider,
    /// The HTML scraping provider.
    MarkupProvider,
    /// Every provider failed; the envelope carries an error.
    None,
}

impl SearchSource {
    /// Returns the wire name of this source.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ApiProvider => "api-provider",
            Self::MarkupProvider => "markup-provider",
            Self::None => "none",
        }
    }
}

impl fmt::Display for SearchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The normalised response of a single query resolution.
///
/// Always returned, even on failure. `source` is [`SearchSource::None`]
/// exactly when `error` is set and `results` is empty; the two
/// constructors are the only way the crate builds one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEnvelope {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total: usize,
    pub source: SearchSource,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchEnvelope {
    /// A successful resolution, possibly with zero results.
    pub fn success(query: &str, source: SearchSource, results: Vec<SearchResult>) -> Self {
        Self {
            query: query.to_owned(),
            total: results.len(),
            results,
            source,
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// A terminal failure: no results, `source = none`, error message set.
    pub fn failure(query: &str, error: impl Into<String>) -> Self {
        Self {
            query: query.to_owned(),
            results: Vec::new(),
            total: 0,
            source: SearchSource::None,
            timestamp: Utc::now(),
            error: Some(error.into()),
        }
    }

    /// Returns `true` if every provider failed for this query.
    pub fn is_failure(&self) -> bool {
        self.source == SearchSource::None
    }
}

/// Envelopes for a batch of queries, positionally aligned with the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiQueryEnvelope {
    pub queries: Vec<String>,
    pub results: Vec<SearchEnvelope>,
    /// Sum of every envelope's `total`.
    pub total_results: usize,
    pub timestamp: DateTime<Utc>,
}

impl MultiQueryEnvelope {
    pub fn new(queries: Vec<String>, results: Vec<SearchEnvelope>) -> Self {
        let total_results = results.iter().map(|env| env.total).sum();
        Self {
            queries,
            results,
            total_results,
            timestamp: Utc::now(),
        }
    }
}

/// A search result paired with its fetched page text or a fetch error.
///
/// Exactly one of `content` and `fetch_error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedResult {
    #[serde(flatten)]
    pub result: SearchResult,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl EnrichedResult {
    /// A result whose page was fetched and flattened.
    pub fn fetched(result: SearchResult, content: String) -> Self {
        Self {
            result,
            content: Some(content),
            fetch_error: None,
        }
    }

    /// A result whose page could not be fetched.
    pub fn failed(result: SearchResult, error: impl Into<String>) -> Self {
        Self {
            result,
            content: None,
            fetch_error: Some(error.into()),
        }
    }
}

/// Search results plus the fetched content of the top entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentEnvelope {
    pub query: String,
    pub search_results: Vec<SearchResult>,
    /// Aligned with the first `fetched_content.len()` entries of `search_results`.
    pub fetched_content: Vec<EnrichedResult>,
    pub timestamp: DateTime<Utc>,
}
