//! API provider: asks a chat-completion service for cited search results.
//!
//! Sends a single `POST {api_base_url}/chat/completions` request with a
//! bearer credential and parses the assistant's answer with the citation
//! extractor. Requires `SearchConfig::api_key`.

use serde::Deserialize;

use crate::config::{SearchConfig, SearchOptions};
use crate::error::SearchError;
use crate::extract::extract_citation_results;
use crate::http;
use crate::provider::SearchProvider;
use crate::types::{SearchResult, SearchSource};

/// System instruction framing the model as a structured search formatter.
const SYSTEM_PROMPT: &str = "You are a search engine that formats web results. \
Answer only with a numbered list of sources. Write each source on its own line \
as `[n] Title URL Snippet`, where URL is the full https:// address.";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Credentialed chat-completion provider.
pub struct ApiProvider {
    client: reqwest::Client,
}

impl ApiProvider {
    /// A provider issuing its requests through `client`.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// The user instruction embedding the query and desired result count.
    pub fn user_prompt(query: &str, limit: usize) -> String {
        format!(
            "Search the web for: {query}\n\
             Return the top {limit} results with a title, URL and short snippet for each."
        )
    }

    /// Build the JSON request body.
    pub fn request_body(config: &SearchConfig, query: &str, limit: usize) -> serde_json::Value {
        serde_json::json!({
            "model": config.api_model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::user_prompt(query, limit) },
            ],
            "max_tokens": config.api_max_tokens,
        })
    }
}

impl SearchProvider for ApiProvider {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let api_key = config.credential().ok_or(SearchError::MissingCredential)?;
        tracing::trace!(query, model = %config.api_model, "API provider search");

        let limit = options.effective_limit();
        let url = http::join_url(&config.api_base_url, "chat/completions");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&Self::request_body(config, query, limit))
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("API provider", e))?
            .error_for_status()
            .map_err(|e| SearchError::from_reqwest("API provider", e))?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("API provider response invalid: {e}")))?;

        let answer = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        let results = extract_citation_results(&answer, limit);
        if results.is_empty() {
            return Err(SearchError::Parse(
                "API provider answer contained no citations".into(),
            ));
        }

        tracing::debug!(count = results.len(), "API provider results parsed");
        Ok(results)
    }

    fn source(&self) -> SearchSource {
        SearchSource::ApiProvider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_has_required_fields() {
        let config = SearchConfig::default();
        let body = ApiProvider::request_body(&config, "rust async", 5);
        assert_eq!(body["model"], "sonar");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        let user = body["messages"][1]["content"].as_str().unwrap_or_default();
        assert!(user.contains("rust async"));
        assert!(user.contains("top 5 results"));
    }

    #[test]
    fn chat_response_parses_minimal_payload() {
        let body: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "[1] A https://a.example" } }]
        }))
        .expect("deserialize");
        assert_eq!(body.choices.len(), 1);
        assert!(body.choices[0].message.content.is_some());
    }

    #[test]
    fn chat_response_tolerates_missing_choices() {
        let body: ChatResponse =
            serde_json::from_value(serde_json::json!({})).expect("deserialize");
        assert!(body.choices.is_empty());
    }

    #[tokio::test]
    async fn missing_credential_fails_without_network() {
        let provider = ApiProvider::new(reqwest::Client::new());
        let err = provider
            .search("q", &SearchOptions::default(), &SearchConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::MissingCredential));
    }

    #[test]
    fn source_is_api() {
        let provider = ApiProvider::new(reqwest::Client::new());
        assert_eq!(provider.source(), SearchSource::ApiProvider);
    }
}
