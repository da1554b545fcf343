//! HTTP plumbing shared by the providers and the enrichment stage.
//!
//! Each public operation builds one [`reqwest::Client`] up front and hands
//! it to every request it makes, so a multi-query search or a batch of page
//! fetches shares one connection pool and presents one User-Agent.

use std::time::Duration;

use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Browser identities used when no `user_agent` is configured. The markup
/// provider serves its plain results page only to browser-like clients.
const BROWSER_USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36 Edg/126.0.0.0",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
];

/// `Accept-Language` header sent with every request.
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// `Accept` header sent with HTML requests.
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Build the client for one search or enrichment operation.
///
/// Requests time out after `config.timeout_seconds` unless the caller sets
/// a per-request timeout. The User-Agent is `config.user_agent` or one
/// browser identity picked for the lifetime of the client.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let user_agent = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => pick_user_agent().to_owned(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE),
    );

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(user_agent)
        .default_headers(headers)
        .build()
        .map_err(|e| SearchError::Http(format!("cannot build HTTP client: {e}")))
}

/// Pick one of the built-in browser User-Agents.
pub fn pick_user_agent() -> &'static str {
    let index = rand::thread_rng().gen_range(0..BROWSER_USER_AGENTS.len());
    BROWSER_USER_AGENTS[index]
}

/// Join a base URL and a path without doubling or dropping the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
