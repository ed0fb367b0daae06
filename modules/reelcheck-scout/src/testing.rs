// Test mocks for the evidence pipeline.
//
// One mock per trait boundary:
// - MockSearcher (WebSearcher): query → hits, with optional failures and delay
// - MockScraper (ArticleScraper): url → text, optional slow pages, records every call
// - MockAnalyzer (ArticleAnalyzer): url → analysis, unregistered URLs fail
// - MockDeepAnalyzer (DeepAnalyzer): one fixed answer, records the URL it read
// - MockClaimReviews (ClaimReviewSource): fixed list
//
// Plus builders for SearchResult and ArticleAnalysis.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reelcheck_common::{AiConfidence, AiVerdict, DeepAnalysis, RawEvidence};

use crate::analyzer::{Article, ArticleAnalysis, ArticleAnalyzer, DeepAnalyzer};
use crate::scraper::ArticleScraper;
use crate::searcher::{ClaimReviewSource, SearchResult, WebSearcher};

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// A search hit on `url` with a display link taken from its host.
pub fn hit(url: &str, title: &str) -> SearchResult {
    SearchResult {
        url: url.to_string(),
        title: title.to_string(),
        snippet: format!("{title} snippet"),
        display_link: url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(String::from))
            .unwrap_or_default(),
        published: None,
    }
}

pub fn dated_hit(url: &str, title: &str, published: &str) -> SearchResult {
    SearchResult {
        published: Some(published.to_string()),
        ..hit(url, title)
    }
}

pub fn analysis(verdict: AiVerdict, confidence: AiConfidence) -> ArticleAnalysis {
    ArticleAnalysis {
        verdict,
        confidence,
        reasoning: "mock".to_string(),
        key_evidence: Vec::new(),
    }
}

/// Article text comfortably over the minimum scrape length.
pub fn article_body(topic: &str) -> String {
    format!("{topic}. ").repeat(20)
}

// ---------------------------------------------------------------------------
// MockSearcher
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockSearcher {
    results: HashMap<String, Vec<SearchResult>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_query(mut self, query: &str, hits: Vec<SearchResult>) -> Self {
        self.results.insert(query.to_string(), hits);
        self
    }

    pub fn failing(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    /// Every search sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        self.calls.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(query) {
            bail!("MockSearcher: search failed for {query}");
        }
        Ok(self
            .results
            .get(query)
            .map(|hits| hits.iter().take(max_results).cloned().collect())
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// MockScraper
// ---------------------------------------------------------------------------

/// Returns `Err` for unregistered URLs.
#[derive(Default)]
pub struct MockScraper {
    pages: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page(mut self, url: &str, content: &str) -> Self {
        self.pages.insert(url.to_string(), content.to_string());
        self
    }

    /// Scraping `url` sleeps this long first.
    pub fn slow_page(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleScraper for MockScraper {
    async fn scrape(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("MockScraper: no page registered for {url}"))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ---------------------------------------------------------------------------
// MockAnalyzer
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockAnalyzer {
    answers: HashMap<String, ArticleAnalysis>,
    seen: Mutex<Vec<Article>>,
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_article(mut self, url: &str, answer: ArticleAnalysis) -> Self {
        self.answers.insert(url.to_string(), answer);
        self
    }

    /// Articles handed to the analyzer, in call order.
    pub fn seen(&self) -> Vec<Article> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleAnalyzer for MockAnalyzer {
    async fn analyze(&self, _claim: &str, article: &Article) -> Result<ArticleAnalysis> {
        self.seen.lock().unwrap().push(article.clone());
        self.answers
            .get(&article.url)
            .cloned()
            .ok_or_else(|| anyhow!("MockAnalyzer: no analysis registered for {}", article.url))
    }
}

// ---------------------------------------------------------------------------
// MockDeepAnalyzer
// ---------------------------------------------------------------------------

pub struct MockDeepAnalyzer {
    answer: Option<DeepAnalysis>,
    read: Mutex<Vec<String>>,
}

impl MockDeepAnalyzer {
    pub fn answering(verdict: AiVerdict, confidence: AiConfidence) -> Self {
        Self {
            answer: Some(DeepAnalysis {
                verdict,
                confidence,
                evidence_summary: "mock deep read".to_string(),
                key_facts: vec!["fact".to_string()],
            }),
            read: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            read: Mutex::new(Vec::new()),
        }
    }

    /// URLs given a deep read.
    pub fn read(&self) -> Vec<String> {
        self.read.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeepAnalyzer for MockDeepAnalyzer {
    async fn deep_analyze(&self, _claim: &str, article: &Article) -> Result<DeepAnalysis> {
        self.read.lock().unwrap().push(article.url.clone());
        self.answer
            .clone()
            .ok_or_else(|| anyhow!("MockDeepAnalyzer: configured to fail"))
    }
}

// ---------------------------------------------------------------------------
// MockClaimReviews
// ---------------------------------------------------------------------------

pub struct MockClaimReviews {
    reviews: Result<Vec<RawEvidence>, String>,
}

impl MockClaimReviews {
    pub fn with(reviews: Vec<RawEvidence>) -> Self {
        Self {
            reviews: Ok(reviews),
        }
    }

    pub fn failing() -> Self {
        Self {
            reviews: Err("MockClaimReviews: configured to fail".to_string()),
        }
    }
}

#[async_trait]
impl ClaimReviewSource for MockClaimReviews {
    async fn claim_reviews(&self, _claim: &str) -> Result<Vec<RawEvidence>> {
        self.reviews.clone().map_err(|e| anyhow!(e))
    }
}
