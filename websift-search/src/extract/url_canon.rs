//! URL canonicalisation for extracted results.
//!
//! Search providers decorate outbound links with redirect wrappers and
//! tracking suffixes. Results carry a stable, suffix-free URL so that the
//! same page always compares equal.

use url::Url;

/// Characters that start a query-string or fragment-style suffix.
const SUFFIX_DELIMITERS: [char; 3] = ['?', '&', '#'];

/// Strip every query-string and fragment-style suffix from `raw`.
///
/// Truncates at the first `?`, `&` or `#`. Idempotent: canonicalising an
/// already-canonical URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use websift_search::extract::url_canon::canonicalize_url;
///
/// let url = canonicalize_url("https://example.com/page?utm_source=x&ref=y");
/// assert_eq!(url, "https://example.com/page");
/// assert_eq!(canonicalize_url(&url), url);
/// ```
pub fn canonicalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.find(SUFFIX_DELIMITERS) {
        Some(end) => trimmed[..end].to_owned(),
        None => trimmed.to_owned(),
    }
}

/// Returns `true` if `url` starts with a web scheme.
pub fn has_web_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Returns `true` if `url` mentions the provider's own domain.
pub fn points_at_provider(url: &str, provider_domain: &str) -> bool {
    !provider_domain.is_empty()
        && url
            .to_ascii_lowercase()
            .contains(&provider_domain.to_ascii_lowercase())
}

/// Resolve an anchor `href` to the URL it actually leads to.
///
/// Provider redirect links of the form `//provider/l/?uddg=<encoded
/// target>&rut=...` are unwrapped to their decoded target. Anything else,
/// protocol-relative hrefs included, is returned as-is so the scheme check
/// can reject it.
pub fn resolve_href(href: &str, provider_domain: &str) -> String {
    let href = href.trim();
    let absolute = match href.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => href.to_owned(),
    };

    let Ok(parsed) = Url::parse(&absolute) else {
        return href.to_owned();
    };

    let on_provider = parsed
        .host_str()
        .is_some_and(|host| points_at_provider(host, provider_domain));
    if on_provider && parsed.path().starts_with("/l/") {
        if let Some((_, target)) = parsed.query_pairs().find(|(key, _)| key == "uddg") {
            return target.into_owned();
        }
    }

    href.to_owned()
}
