//! Trait definition for interchangeable search providers.
//!
//! The markup provider and the API provider both implement
//! [`SearchProvider`] so the resolver can chain them without caring how
//! each one talks to its backend.

use crate::config::{SearchConfig, SearchOptions};
use crate::error::SearchError;
use crate::types::{SearchResult, SearchSource};

/// A backend that resolves a query to ranked results.
///
/// Each provider handles its own:
///
/// - request construction and query encoding
/// - HTTP transport with appropriate headers and credentials
/// - extraction of results from the raw payload
///
/// All implementations must be `Send + Sync` so queries can be resolved
/// concurrently.
pub trait SearchProvider: Send + Sync {
    /// Resolve `query` to at most `options.limit` ranked results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the provider cannot be reached, answers
    /// with a non-success status, or is missing required configuration.
    /// An empty `Ok` is a legitimate "no results" answer.
    fn search(
        &self,
        query: &str,
        options: &SearchOptions,
        config: &SearchConfig,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;

    /// Which envelope source this provider's results are reported under.
    fn source(&self) -> SearchSource;
}
