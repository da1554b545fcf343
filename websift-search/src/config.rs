//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] names the provider endpoints, the optional API
//! credential, and timeouts. It is passed explicitly into every operation;
//! the library never reads process environment. [`SearchOptions`] and
//! [`FetchOptions`] are the per-call knobs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Default number of results per query.
pub const DEFAULT_LIMIT: usize = 10;

/// Default markup provider region.
pub const DEFAULT_REGION: &str = "us-en";

/// Default number of results to fetch page content for.
pub const DEFAULT_FETCH_COUNT: usize = 3;

/// Configuration shared by all search operations.
///
/// Deserializable from TOML; missing fields take their defaults. The API
/// credential is never serialized back out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the HTML search provider. Queried as `{base}/html/`.
    pub markup_base_url: String,
    /// Domain of the markup provider. Links back to it are never results.
    pub provider_domain: String,
    /// Base URL of the chat-completion API. Queried as `{base}/chat/completions`.
    pub api_base_url: String,
    /// Chat model named in API requests.
    pub api_model: String,
    /// Bearer credential for the API provider. `None` skips the API stage.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Token budget cap sent with each API request.
    pub api_max_tokens: u32,
    /// HTTP timeout in seconds for provider requests.
    pub timeout_seconds: u64,
    /// Independent timeout in seconds for each enrichment page fetch.
    pub fetch_timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            markup_base_url: "https://html.duckduckgo.com".into(),
            provider_domain: "duckduckgo.com".into(),
            api_base_url: "https://api.perplexity.ai".into(),
            api_model: "sonar".into(),
            api_key: None,
            api_max_tokens: 2000,
            timeout_seconds: 15,
            fetch_timeout_seconds: 10,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Returns a copy of this configuration carrying `key` as the API credential.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// The configured credential, if present and not blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - base URLs and the provider domain must not be blank
    /// - `timeout_seconds` and `fetch_timeout_seconds` must be greater than 0
    /// - `api_max_tokens` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.markup_base_url.trim().is_empty() {
            return Err(SearchError::Config("markup_base_url must not be empty".into()));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(SearchError::Config("api_base_url must not be empty".into()));
        }
        if self.provider_domain.trim().is_empty() {
            return Err(SearchError::Config("provider_domain must not be empty".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.fetch_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "fetch_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.api_max_tokens == 0 {
            return Err(SearchError::Config(
                "api_max_tokens must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a TOML file. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SearchError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SearchError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| SearchError::Config(e.to_string()))
    }
}

/// Per-call options for [`crate::search`] and [`crate::search_multiple`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of results. Zero is treated as one.
    pub limit: usize,
    /// Markup provider region code, e.g. `us-en`.
    pub region: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            region: DEFAULT_REGION.into(),
        }
    }
}

impl SearchOptions {
    /// Options requesting at most `limit` results.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    /// The limit actually applied: never below one.
    pub fn effective_limit(&self) -> usize {
        self.limit.max(1)
    }
}

/// Per-call options for [`crate::search_and_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// How many top results to search for and fetch. Zero is treated as one.
    pub fetch_count: usize,
    /// Markup provider region code.
    pub region: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            fetch_count: DEFAULT_FETCH_COUNT,
            region: DEFAULT_REGION.into(),
        }
    }
}

impl FetchOptions {
    /// Options fetching the top `fetch_count` results.
    pub fn with_fetch_count(fetch_count: usize) -> Self {
        Self {
            fetch_count,
            ..Default::default()
        }
    }

    /// The search options this enrichment call resolves with.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            limit: self.fetch_count.max(1),
            region: self.region.clone(),
        }
    }
}
