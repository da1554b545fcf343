//! Error types for the websift-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and for embedding in a failure envelope. No API keys or other
//! credentials appear in error messages.

/// Errors that can occur at a stage boundary of the search pipeline.
///
/// None of these escape the public operations: the resolver turns them
/// into fallbacks or failure envelopes, and the enrichment stage turns
/// them into per-item fetch errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A network failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A request did not complete within its timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A provider response yielded nothing extractable.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The API provider was invoked without a credential.
    #[error("API provider requires a credential but none is configured")]
    MissingCredential,
}

impl SearchError {
    /// Map a [`reqwest::Error`] raised while talking to `target`.
    ///
    /// Timeouts are kept distinct from other transport failures so callers
    /// can tell a slow page from an unreachable one.
    pub(crate) fn from_reqwest(target: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{target}: {err}"))
        } else if let Some(status) = err.status() {
            Self::Http(format!("{target} returned status {status}"))
        } else {
            Self::Http(format!("{target} request failed: {err}"))
        }
    }
}

/// Convenience type alias for websift-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
