//! Markup provider: scrapes the HTML-only results page of the search site.
//!
//! Uses `GET {markup_base_url}/html/?q=...&kl=...`, which requires no
//! JavaScript and no credentials.

use crate::config::{SearchConfig, SearchOptions};
use crate::error::SearchError;
use crate::extract::HtmlExtractor;
use crate::http::{self, ACCEPT_HTML};
use crate::provider::SearchProvider;
use crate::types::{SearchResult, SearchSource};

/// HTML scraping provider. Always available.
pub struct MarkupProvider {
    client: reqwest::Client,
}

impl MarkupProvider {
    /// A provider issuing its requests through `client`.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build the results page URL for `query` in `region`.
    pub fn search_url(config: &SearchConfig, query: &str, region: &str) -> String {
        format!(
            "{}?q={}&kl={}",
            http::join_url(&config.markup_base_url, "html/"),
            urlencoding::encode(query),
            urlencoding::encode(region)
        )
    }
}

impl SearchProvider for MarkupProvider {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "markup provider search");

        let url = Self::search_url(config, query, &options.region);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("markup provider", e))?
            .error_for_status()
            .map_err(|e| SearchError::from_reqwest("markup provider", e))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest("markup provider", e))?;

        tracing::trace!(bytes = html.len(), "markup provider response received");

        let extractor = HtmlExtractor::new(config.provider_domain.as_str());
        let results = extractor.extract(&html, options.effective_limit());
        tracing::debug!(count = results.len(), "markup provider results parsed");
        Ok(results)
    }

    fn source(&self) -> SearchSource {
        SearchSource::MarkupProvider
    }
}
