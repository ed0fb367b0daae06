use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};
use tracing::{info, warn};

/// Extracted text shorter than this is treated as a failed scrape
/// (paywall stubs, cookie walls, empty shells).
pub const MIN_ARTICLE_CHARS: usize = 100;

const SCRAPE_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = "Mozilla/5.0 (compatible; reelcheck/0.1; +https://github.com/reelcheck)";

#[async_trait]
pub trait ArticleScraper: Send + Sync {
    /// Readable article text for `url`. Errors when the page cannot be fetched
    /// or yields less than [`MIN_ARTICLE_CHARS`] of text.
    async fn scrape(&self, url: &str) -> Result<String>;
    fn name(&self) -> &str;
}

/// What the analyzer sees when the article itself could not be read.
pub fn fallback_content(title: &str) -> String {
    format!("Article title: {title}. Unable to access full content.")
}

// --- Plain HTTP + Readability scraper ---

pub struct HttpArticleScraper {
    client: reqwest::Client,
}

impl HttpArticleScraper {
    pub fn new() -> Result<Self> {
        info!("Using HttpArticleScraper (reqwest + Readability extraction)");
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(SCRAPE_TIMEOUT)
                .user_agent(USER_AGENT)
                .build()
                .context("Failed to build HTTP client")?,
        })
    }
}

#[async_trait]
impl ArticleScraper for HttpArticleScraper {
    async fn scrape(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url).context("Invalid URL")?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            bail!("Only http/https URLs are allowed, got: {}", parsed.scheme());
        }

        info!(url, scraper = "http", "Scraping article");

        let html = self
            .client
            .get(parsed.as_str())
            .send()
            .await
            .context("Article request failed")?
            .error_for_status()
            .context("Article request returned an error status")?
            .text()
            .await
            .context("Failed to read article body")?;

        let text = readable_text(&parsed, &html);
        let chars = text.chars().count();
        if chars < MIN_ARTICLE_CHARS {
            warn!(url, scraper = "http", chars, "Too little content after Readability extraction");
            bail!("Insufficient article content ({chars} chars) at {url}");
        }

        info!(url, scraper = "http", bytes = text.len(), "Scraped successfully");
        Ok(text)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Main-content extraction to Markdown, with images and SVG dropped.
pub fn readable_text(url: &url::Url, html: &str) -> String {
    let config = TransformConfig {
        readability: true,
        main_content: true,
        return_format: ReturnFormat::Markdown,
        filter_images: true,
        filter_svg: true,
        clean_html: true,
    };
    let input = TransformInput {
        url: Some(url),
        content: html.as_bytes(),
        screenshot_bytes: None,
        encoding: None,
        selector_config: None,
        ignore_tags: None,
    };
    transform_content_input(input, &config).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_names_the_title() {
        assert_eq!(
            fallback_content("Minister resigns"),
            "Article title: Minister resigns. Unable to access full content."
        );
    }

    #[tokio::test]
    async fn non_http_schemes_are_rejected() {
        let scraper = HttpArticleScraper::new().unwrap();
        let err = scraper.scrape("file:///etc/passwd").await.unwrap_err();
        assert!(err.to_string().contains("http/https"), "{err}");
    }

    #[tokio::test]
    async fn malformed_urls_are_rejected() {
        let scraper = HttpArticleScraper::new().unwrap();
        assert!(scraper.scrape("not a url").await.is_err());
    }
}
