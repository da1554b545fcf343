//! Integration tests for search resolution against mock providers.
//!
//! A local wiremock server stands in for both the chat-completion API and
//! the HTML results page, so these run without network access. Live
//! provider tests are marked `#[ignore]` for manual validation.

use std::time::Duration;

use websift_search::{SearchConfig, SearchOptions, SearchSource};
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn results_page(links: &[(&str, &str, &str)]) -> String {
    let mut html = String::from("<html><body><div class=\"results\">");
    for (url, title, snippet) in links {
        html.push_str(&format!(
            "<div class=\"result\">\
               <h2><a class=\"result__a\" href=\"{url}\">{title}</a></h2>\
               <a class=\"result__snippet\">{snippet}</a>\
             </div>"
        ));
    }
    html.push_str("</div></body></html>");
    html
}

fn mock_config(server: &MockServer) -> SearchConfig {
    SearchConfig {
        markup_base_url: server.uri(),
        api_base_url: server.uri(),
        timeout_seconds: 5,
        ..Default::default()
    }
}

fn chat_answer(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "cmpl-1",
        "model": "sonar",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content }
        }]
    })
}

async fn mount_markup(server: &MockServer, html: String) {
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

#[tokio::test]
async fn markup_provider_resolves_without_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "rust programming"))
        .and(query_param("kl", "us-en"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept-language"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&[
            (
                "https://www.rust-lang.org/",
                "Rust Programming Language",
                "A language empowering everyone.",
            ),
            (
                "https://doc.rust-lang.org/book/?utm_source=x",
                "The Rust Book",
                "An introductory book about Rust.",
            ),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let envelope =
        websift_search::search("rust programming", &SearchOptions::default(), &mock_config(&server))
            .await;

    assert_eq!(envelope.source, SearchSource::MarkupProvider);
    assert!(envelope.error.is_none());
    assert_eq!(envelope.total, 2);
    assert_eq!(envelope.results[0].rank, 1);
    assert_eq!(envelope.results[0].title, "Rust Programming Language");
    assert_eq!(envelope.results[0].snippet, "A language empowering everyone.");
    assert_eq!(envelope.results[1].url, "https://doc.rust-lang.org/book/");
    assert_eq!(envelope.results[1].rank, 2);
}

#[tokio::test]
async fn markup_provider_honours_limit() {
    let server = MockServer::start().await;
    let links: Vec<(String, String, String)> = (1..=8)
        .map(|i| {
            (
                format!("https://site{i}.example/page"),
                format!("Site {i}"),
                format!("Snippet {i}"),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str, &str)> = links
        .iter()
        .map(|(u, t, s)| (u.as_str(), t.as_str(), s.as_str()))
        .collect();
    mount_markup(&server, results_page(&borrowed)).await;

    let envelope = websift_search::search(
        "many",
        &SearchOptions::with_limit(3),
        &mock_config(&server),
    )
    .await;

    assert_eq!(envelope.total, 3);
    let ranks: Vec<usize> = envelope.results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[tokio::test]
async fn empty_results_page_is_a_successful_empty_search() {
    let server = MockServer::start().await;
    mount_markup(
        &server,
        "<html><body><p>No results.</p></body></html>".to_string(),
    )
    .await;

    let envelope =
        websift_search::search("nothing here", &SearchOptions::default(), &mock_config(&server))
            .await;

    assert_eq!(envelope.source, SearchSource::MarkupProvider);
    assert_eq!(envelope.total, 0);
    assert!(envelope.results.is_empty());
    assert!(envelope.error.is_none());
}

#[tokio::test]
async fn markup_failure_yields_failure_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let envelope =
        websift_search::search("down", &SearchOptions::default(), &mock_config(&server)).await;

    assert!(envelope.is_failure());
    assert_eq!(envelope.source, SearchSource::None);
    assert_eq!(envelope.total, 0);
    let error = envelope.error.unwrap_or_default();
    assert!(error.contains("503"), "unexpected error: {error}");
}

#[tokio::test]
async fn api_provider_is_preferred_when_credential_present() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "sonar",
            "max_tokens": 2000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_answer(
            "[1] Rust Language - https://www.rust-lang.org/ - Fast and reliable.\n\
             [2] Tokio https://tokio.rs/ An asynchronous runtime.",
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let config = mock_config(&server).with_api_key("test-key");
    let envelope = websift_search::search("rust", &SearchOptions::default(), &config).await;

    assert_eq!(envelope.source, SearchSource::ApiProvider);
    assert_eq!(envelope.total, 2);
    assert_eq!(envelope.results[0].url, "https://www.rust-lang.org/");
    assert_eq!(envelope.results[0].title, "Rust Language");
    assert_eq!(envelope.results[1].url, "https://tokio.rs/");
    assert_eq!(envelope.results[1].rank, 2);
}

#[tokio::test]
async fn api_error_falls_back_to_markup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_markup(
        &server,
        results_page(&[("https://fallback.example/", "Fallback", "From markup.")]),
    )
    .await;

    let config = mock_config(&server).with_api_key("test-key");
    let envelope = websift_search::search("rust", &SearchOptions::default(), &config).await;

    assert_eq!(envelope.source, SearchSource::MarkupProvider);
    assert!(envelope.error.is_none());
    assert_eq!(envelope.results[0].url, "https://fallback.example/");
}

#[tokio::test]
async fn api_answer_without_citations_falls_back_to_markup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_answer("I could not find anything useful.")),
        )
        .mount(&server)
        .await;
    mount_markup(
        &server,
        results_page(&[("https://fallback.example/", "Fallback", "From markup.")]),
    )
    .await;

    let config = mock_config(&server).with_api_key("test-key");
    let envelope = websift_search::search("rust", &SearchOptions::default(), &config).await;

    assert_eq!(envelope.source, SearchSource::MarkupProvider);
    assert_eq!(envelope.total, 1);
}

#[tokio::test]
async fn api_and_markup_failing_yields_failure_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = mock_config(&server).with_api_key("bad-key");
    let envelope = websift_search::search("rust", &SearchOptions::default(), &config).await;

    assert_eq!(envelope.source, SearchSource::None);
    assert!(envelope.error.is_some());
}

#[tokio::test]
async fn multiple_queries_stay_aligned_with_input() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(results_page(&[("https://slow.example/", "Slow", "s")]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "fast"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&[
            ("https://fast.example/1", "Fast 1", "f"),
            ("https://fast.example/2", "Fast 2", "f"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let multi = websift_search::search_multiple(
        &["slow", "broken", "fast"],
        &SearchOptions::default(),
        &mock_config(&server),
    )
    .await;

    assert_eq!(multi.queries, vec!["slow", "broken", "fast"]);
    assert_eq!(multi.results.len(), 3);
    assert_eq!(multi.results[0].query, "slow");
    assert_eq!(multi.results[0].results[0].url, "https://slow.example/");
    assert!(multi.results[1].is_failure());
    assert_eq!(multi.results[2].query, "fast");
    assert_eq!(multi.results[2].total, 2);
    assert_eq!(multi.total_results, 3);
}

#[tokio::test]
async fn envelope_serializes_with_wire_field_names() {
    let server = MockServer::start().await;
    mount_markup(
        &server,
        results_page(&[("https://a.example/", "A", "Snippet A")]),
    )
    .await;

    let envelope =
        websift_search::search("a", &SearchOptions::default(), &mock_config(&server)).await;
    let json = serde_json::to_value(&envelope).expect("serialize");

    assert_eq!(json["query"], "a");
    assert_eq!(json["source"], "markup-provider");
    assert_eq!(json["total"], 1);
    assert_eq!(json["results"][0]["rank"], 1);
    assert!(json["timestamp"].is_string());
    assert!(json.get("error").is_none());
}

// ── Live tests ─────────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn live_markup_search_returns_results() {
    let envelope = websift_search::search(
        "rust programming language",
        &SearchOptions::default(),
        &SearchConfig::default(),
    )
    .await;

    match envelope.error {
        None => {
            assert_eq!(envelope.source, SearchSource::MarkupProvider);
            for r in &envelope.results {
                assert!(!r.title.is_empty(), "result title should not be empty");
                assert!(
                    url::Url::parse(&r.url).is_ok(),
                    "result URL is not valid: {}",
                    r.url
                );
            }
        }
        Some(e) => {
            // Network failures are acceptable in CI; just log
            eprintln!("Live search failed (acceptable in CI): {e}");
        }
    }
}

#[tokio::test]
#[ignore]
async fn live_api_search_with_environment_credential() {
    let Ok(key) = std::env::var("PERPLEXITY_API_KEY") else {
        eprintln!("PERPLEXITY_API_KEY not set, skipping");
        return;
    };
    let config = SearchConfig::default().with_api_key(key);
    let envelope =
        websift_search::search("rust programming", &SearchOptions::with_limit(3), &config).await;
    assert!(envelope.results.len() <= 3);
    if let Some(e) = envelope.error {
        eprintln!("Live API search failed (acceptable): {e}");
    }
}
