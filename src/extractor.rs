use crate::document::Document;
use crate::fallback::apply_fallbacks;
use crate::og_scanner::scan_og;
use crate::{ExtractionResult, Fetcher, LinkPreviewer, NetworkConfig, PreviewError};
use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

/// Fetches pages and turns them into [`ExtractionResult`]s.
///
/// Holds only immutable configuration, so one instance can be cloned or shared
/// across tasks freely.
#[derive(Clone)]
pub struct Extractor {
    fetcher: Fetcher,
}

impl Extractor {
    pub fn new(config: NetworkConfig) -> Result<Self, PreviewError> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
        })
    }

    pub fn with_fetcher(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    pub fn config(&self) -> &NetworkConfig {
        self.fetcher.config()
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn extract(
        &self,
        url: &str,
        user_agent: &str,
    ) -> Result<ExtractionResult, PreviewError> {
        let page = self.fetcher.fetch(url, user_agent).await.map_err(|e| {
            e.log();
            e
        })?;

        let result = self.extract_html(&page.html, &page.final_url, url);
        debug!(url = %url, result = ?result, "Extraction finished");
        Ok(result)
    }

    /// Like [`Extractor::extract`], with every failure collapsed to `None`.
    pub async fn extract_or_none(&self, url: &str, user_agent: &str) -> Option<ExtractionResult> {
        self.extract(url, user_agent).await.ok()
    }

    /// Runs the Open Graph scan and fallbacks on markup that was already fetched.
    ///
    /// `page_url` is where the markup came from and serves as its base URI;
    /// `request_url` is what the caller originally asked for and feeds the `url`
    /// fallback.
    pub fn extract_html(&self, html: &str, page_url: &Url, request_url: &str) -> ExtractionResult {
        let document = Document::parse(html, page_url);
        let scanned = scan_og(&document);
        apply_fallbacks(&document, scanned, request_url)
    }
}

#[async_trait]
impl LinkPreviewer for Extractor {
    async fn preview(
        &self,
        url: &str,
        user_agent: &str,
    ) -> Result<ExtractionResult, PreviewError> {
        self.extract(url, user_agent).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Fallback Title</title>
    <meta property="og:title" content="Hello">
    <meta property="og:site_name" content="Example">
    <meta name="description" content="desc">
    <link rel="icon" href="/favicon.png">
</head>
<body><h1>Body</h1></body>
</html>"#;

    #[test]
    fn extract_html_combines_scan_and_fallbacks() {
        let extractor = Extractor::new(NetworkConfig::default()).unwrap();
        let page_url = Url::parse("http://example.com/post/1").unwrap();

        let result = extractor.extract_html(PAGE, &page_url, "http://example.com/post/1");

        assert_eq!(result.title.as_deref(), Some("Hello"));
        assert_eq!(result.site_name.as_deref(), Some("Example"));
        assert_eq!(result.description.as_deref(), Some("desc"));
        assert_eq!(result.image.as_deref(), Some("http://example.com/favicon.png"));
        assert_eq!(result.url.as_deref(), Some("http://example.com"));
        assert!(result.og_type.is_none());
    }

    #[test]
    fn url_fallback_ignores_redirect_target() {
        let extractor = Extractor::new(NetworkConfig::default()).unwrap();
        let page_url = Url::parse("https://www.moved.example.org/landing").unwrap();

        let result = extractor.extract_html(PAGE, &page_url, "http://short.example/abc");

        assert_eq!(result.url.as_deref(), Some("http://short.example"));
        assert_eq!(
            result.image.as_deref(),
            Some("https://www.moved.example.org/favicon.png")
        );
    }

    #[test]
    fn extract_html_is_deterministic() {
        let extractor = Extractor::new(NetworkConfig::default()).unwrap();
        let page_url = Url::parse("http://example.com/").unwrap();

        let first = extractor.extract_html(PAGE, &page_url, "http://example.com/");
        let second = extractor.extract_html(PAGE, &page_url, "http://example.com/");
        assert_eq!(first, second);
    }
}
