//! Main extraction API.
//!
//! The [`Reader`] ties the fetcher and the fallback chain together, along
//! with convenience functions like [`parse_with_url`] and [`import_url`].
//!
//! # Example
//!
//! ```rust
//! use lectern_core::reader::parse_with_url;
//!
//! let html = r#"<article><h1>T</h1><p>Hello.</p><img src="/a.png" width="400" height="300"></article>"#;
//! let result = parse_with_url(html, "https://example.com/post").unwrap();
//! assert_eq!(result.title, "T");
//! assert_eq!(result.images[0].src, "https://example.com/a.png");
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::extract::{ExtractConfig, ExtractionResult, extract_article};
use crate::fetch::FetchConfig;
#[cfg(feature = "fetch")]
use crate::fetch::fetch_url;
use crate::images::ImageRecord;
use crate::{LecternError, Result};

/// Base URL assumed when HTML is parsed without one.
pub const DEFAULT_BASE_URL: &str = "http://localhost/";

/// Configuration for the [`Reader`].
///
/// # Example
///
/// ```rust
/// use lectern_core::ReaderConfig;
///
/// let config = ReaderConfig::builder()
///     .min_content_length(500)
///     .timeout(10)
///     .proxies(Vec::<String>::new())
///     .build();
/// assert_eq!(config.min_content_length, Some(500));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Extraction tables and thresholds.
    pub extract: ExtractConfig,
    /// Fetcher settings.
    pub fetch: FetchConfig,
    /// Reject results whose content is shorter than this many characters
    /// (default: none; the fallback chain decides).
    pub min_content_length: Option<usize>,
}

impl ReaderConfig {
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::new()
    }
}

/// Builder for ReaderConfig.
pub struct ReaderConfigBuilder {
    config: ReaderConfig,
}

impl ReaderConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ReaderConfig::default() }
    }

    /// Sets the minimum content length a caller will accept.
    pub fn min_content_length(mut self, value: usize) -> Self {
        self.config.min_content_length = Some(value);
        self
    }

    /// Sets the text a candidate container needs to be accepted.
    pub fn candidate_min_chars(mut self, value: usize) -> Self {
        self.config.extract.candidate_min_chars = value;
        self
    }

    /// Sets the primary content length below which the secondary tier runs.
    pub fn sufficient_chars(mut self, value: usize) -> Self {
        self.config.extract.sufficient_chars = value;
        self
    }

    /// Adds a content selector at the lowest priority.
    pub fn content_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.extract.content_selectors.push(selector.into());
        self
    }

    /// Sets the per-attempt fetch timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.fetch.timeout = seconds;
        self
    }

    /// Sets the User-Agent for direct requests.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Replaces the proxy templates.
    pub fn proxies<S: Into<String>>(mut self, proxies: Vec<S>) -> Self {
        self.config.fetch.proxies = proxies.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the config.
    pub fn build(self) -> ReaderConfig {
        self.config
    }
}

impl Default for ReaderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Response shape of the article import boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub title: String,
    pub content: String,
    pub images: Vec<ImageRecord>,
    /// The URL the article was imported from.
    pub source: String,
}

impl ImportResponse {
    pub fn new(result: ExtractionResult, source: impl Into<String>) -> Self {
        Self { title: result.title, content: result.content, images: result.images, source: source.into() }
    }
}

/// Main entry point for article extraction.
///
/// # Example
///
/// ```rust
/// use lectern_core::Reader;
///
/// let reader = Reader::new();
/// let html = "<html><body><article><p>Content here</p></article></body></html>";
/// let result = reader.parse(html).unwrap();
/// assert!(result.content.contains("Content here"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Reader {
    config: ReaderConfig,
}

impl Reader {
    /// Creates a reader with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reader with a custom configuration.
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Extracts an article from HTML with no known page URL. Relative image
    /// URLs resolve against [`DEFAULT_BASE_URL`].
    pub fn parse(&self, html: &str) -> Result<ExtractionResult> {
        self.parse_with_url(html, DEFAULT_BASE_URL)
    }

    /// Extracts an article from HTML fetched from `url`.
    ///
    /// # Errors
    ///
    /// - [`LecternError::InvalidUrl`] if `url` does not parse
    /// - [`LecternError::InsufficientContent`] if a minimum length is
    ///   configured and not met
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<ExtractionResult> {
        let page_url = Url::parse(url).map_err(|e| LecternError::InvalidUrl(e.to_string()))?;
        let result = extract_article(html, &page_url, &self.config.extract)?;

        if let Some(required) = self.config.min_content_length {
            let length = result.content_chars();
            if length < required {
                return Err(LecternError::InsufficientContent { length, required });
            }
        }

        Ok(result)
    }

    /// Fetches `url` through the fallback chain and extracts it.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_parse(&self, url: &str) -> Result<ExtractionResult> {
        let html = fetch_url(url, &self.config.fetch).await?;
        self.parse_with_url(&html, url)
    }

    /// Boundary operation: validates the request URL, fetches, extracts.
    ///
    /// # Errors
    ///
    /// [`LecternError::MalformedInput`] with "URL is required" for an empty
    /// URL; otherwise whatever fetching or extraction returned.
    #[cfg(feature = "fetch")]
    pub async fn import_url(&self, url: &str) -> Result<ImportResponse> {
        let url = url.trim();
        if url.is_empty() {
            return Err(LecternError::MalformedInput("URL is required".to_string()));
        }
        let result = self.fetch_and_parse(url).await?;
        Ok(ImportResponse::new(result, url))
    }
}

/// Extracts with defaults and no page URL.
pub fn parse(html: &str) -> Result<ExtractionResult> {
    Reader::new().parse(html)
}

/// Extracts with defaults, resolving images against `url`.
pub fn parse_with_url(html: &str, url: &str) -> Result<ExtractionResult> {
    Reader::new().parse_with_url(html, url)
}

/// Fetches and extracts with defaults.
#[cfg(feature = "fetch")]
pub async fn fetch_and_parse(url: &str) -> Result<ExtractionResult> {
    Reader::new().fetch_and_parse(url).await
}

/// Fetches and extracts with a custom configuration.
#[cfg(feature = "fetch")]
pub async fn fetch_and_parse_with_config(url: &str, config: ReaderConfig) -> Result<ExtractionResult> {
    Reader::with_config(config).fetch_and_parse(url).await
}

/// Boundary import with defaults.
#[cfg(feature = "fetch")]
pub async fn import_url(url: &str) -> Result<ImportResponse> {
    Reader::new().import_url(url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ReaderConfig::builder()
            .min_content_length(50)
            .candidate_min_chars(100)
            .sufficient_chars(80)
            .content_selector(".story-text")
            .timeout(5)
            .user_agent("test-agent")
            .proxies(vec!["https://p.test/{url}"])
            .build();

        assert_eq!(config.min_content_length, Some(50));
        assert_eq!(config.extract.candidate_min_chars, 100);
        assert_eq!(config.extract.sufficient_chars, 80);
        assert_eq!(config.extract.content_selectors.last().map(String::as_str), Some(".story-text"));
        assert_eq!(config.fetch.timeout, 5);
        assert_eq!(config.fetch.user_agent, "test-agent");
        assert_eq!(config.fetch.proxies, ["https://p.test/{url}"]);
    }

    #[test]
    fn test_parse_uses_default_base() {
        let result = parse(r#"<article><p>Hi.</p><img src="pic.jpg" width="640"></article>"#).unwrap();
        assert_eq!(result.images[0].src, "http://localhost/pic.jpg");
    }

    #[test]
    fn test_parse_with_invalid_url() {
        assert!(matches!(parse_with_url("<p>x</p>", "not a url"), Err(LecternError::InvalidUrl(_))));
    }

    #[test]
    fn test_min_content_length() {
        let reader = Reader::with_config(ReaderConfig::builder().min_content_length(1000).build());
        let err = reader.parse("<article><p>Too short.</p></article>").unwrap_err();
        assert!(matches!(err, LecternError::InsufficientContent { required: 1000, .. }));
    }

    #[test]
    fn test_import_response_shape() {
        let result = parse_with_url("<article><h1>T</h1><p>Hello.</p></article>", "https://e.com/x").unwrap();
        let response = ImportResponse::new(result, "https://e.com/x");
        let json = serde_json::to_value(&response).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 4);
        for key in ["title", "content", "images", "source"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_import_url_requires_url() {
        let err = Reader::new().import_url("   ").await.unwrap_err();
        assert!(matches!(err, LecternError::MalformedInput(ref m) if m == "URL is required"));
    }
}
