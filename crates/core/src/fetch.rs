//! Content fetching from URLs, files, and stdin.
//!
//! [`fetch_url`] tries a direct request first, then each configured proxy in
//! order, and returns the first successful body. Attempts are sequential and
//! never retried.

use std::fs;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{LecternError, Result};

/// Placeholder replaced by the percent-encoded target URL in a proxy template.
pub const URL_PLACEHOLDER: &str = "{url}";

/// Public CORS proxies tried after the direct request, in order.
pub const DEFAULT_PROXIES: &[&str] = &[
    "https://api.allorigins.win/raw?url={url}",
    "https://cors-anywhere.herokuapp.com/{url}",
    "https://cors.bridged.cc/{url}",
];

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds, per attempt.
    pub timeout: u64,
    /// User-Agent sent on the direct request.
    pub user_agent: String,
    /// Proxy URL templates. A template without [`URL_PLACEHOLDER`] gets the
    /// encoded URL appended.
    pub proxies: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            proxies: DEFAULT_PROXIES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl FetchConfig {
    /// Config without proxies: only the direct request is attempted.
    pub fn direct_only() -> Self {
        Self { proxies: Vec::new(), ..Self::default() }
    }
}

/// Expands a proxy template for `url`.
///
/// ```rust
/// use lectern_core::fetch::proxy_url;
///
/// assert_eq!(
///     proxy_url("https://proxy.test/raw?url={url}", "https://example.com/a b"),
///     "https://proxy.test/raw?url=https%3A%2F%2Fexample.com%2Fa+b"
/// );
/// assert_eq!(proxy_url("https://proxy.test/", "https://e.com"), "https://proxy.test/https%3A%2F%2Fe.com");
/// ```
pub fn proxy_url(template: &str, url: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
    if template.contains(URL_PLACEHOLDER) {
        template.replace(URL_PLACEHOLDER, &encoded)
    } else {
        format!("{template}{encoded}")
    }
}

/// Fetches HTML for `url`: direct request, then each proxy in order.
///
/// # Errors
///
/// - [`LecternError::InvalidUrl`] if `url` is not an absolute http(s) URL
/// - [`LecternError::Unreachable`] if every attempt failed
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| LecternError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(LecternError::InvalidUrl(format!(
            "URL must use http:// or https://, got {}",
            parsed_url.scheme()
        )));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(LecternError::HttpError)?;

    let mut attempts = 1;
    tracing::debug!(url, "fetching directly");
    match fetch_direct(&client, parsed_url.as_str(), config).await {
        Ok(body) => return Ok(body),
        Err(e) => tracing::warn!(url, error = %e, "direct fetch failed, trying proxies"),
    }

    for template in &config.proxies {
        attempts += 1;
        let target = proxy_url(template, parsed_url.as_str());
        tracing::debug!(proxy = %template, "fetching through proxy");
        match fetch_plain(&client, &target, config).await {
            Ok(body) => return Ok(body),
            Err(e) => tracing::warn!(proxy = %template, error = %e, "proxy fetch failed"),
        }
    }

    Err(LecternError::Unreachable { url: url.to_string(), attempts })
}

#[cfg(feature = "fetch")]
async fn fetch_direct(client: &Client, url: &str, config: &FetchConfig) -> Result<String> {
    let request = client
        .get(url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.5")
        .header("Upgrade-Insecure-Requests", "1")
        .header("Cache-Control", "max-age=0");
    read_body(request, config).await
}

#[cfg(feature = "fetch")]
async fn fetch_plain(client: &Client, url: &str, config: &FetchConfig) -> Result<String> {
    read_body(client.get(url), config).await
}

#[cfg(feature = "fetch")]
async fn read_body(request: reqwest::RequestBuilder, config: &FetchConfig) -> Result<String> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() { LecternError::Timeout { timeout: config.timeout } } else { LecternError::HttpError(e) }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LecternError::HttpStatus { status: status.as_u16() });
    }

    Ok(response.text().await?)
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(LecternError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(LecternError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(LecternError::from)?;

    Ok(buffer)
}
