use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reelcheck_common::RawEvidence;
use serde::Deserialize;
use tracing::{info, warn};

const GOOGLE_CSE_URL: &str = "https://www.googleapis.com/customsearch/v1";
const FACT_CHECK_TOOLS_URL: &str = "https://factchecktools.googleapis.com/v1alpha1/claims:search";

/// Custom Search returns at most 10 items per request.
const CSE_MAX_NUM: usize = 10;
const FACT_CHECK_PAGE_SIZE: u32 = 10;
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

// --- WebSearcher trait ---

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// Display domain, used as the publisher name.
    pub display_link: String,
    /// Publication time from the page's metatags, as given.
    pub published: Option<String>,
}

#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

// --- Google Custom Search ---

pub struct GoogleSearcher {
    api_key: String,
    engine_id: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CseItem {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    display_link: String,
    #[serde(default)]
    pagemap: Option<CsePagemap>,
}

#[derive(Debug, Deserialize)]
struct CsePagemap {
    #[serde(default)]
    metatags: Vec<serde_json::Map<String, serde_json::Value>>,
}

const PUBLISHED_METATAGS: &[&str] = &[
    "article:published_time",
    "og:published_time",
    "datepublished",
    "pubdate",
    "date",
];

impl CseItem {
    fn published(&self) -> Option<String> {
        let tags = self.pagemap.as_ref()?.metatags.first()?;
        PUBLISHED_METATAGS
            .iter()
            .filter_map(|key| tags.get(*key))
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(String::from)
    }
}

impl GoogleSearcher {
    pub fn new(api_key: &str, engine_id: &str) -> Result<Self> {
        if api_key.trim().is_empty() || engine_id.trim().is_empty() {
            bail!("Google Custom Search needs both an API key and an engine id");
        }
        Ok(Self {
            api_key: api_key.to_string(),
            engine_id: engine_id.to_string(),
            base_url: GOOGLE_CSE_URL.to_string(),
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .context("Failed to build HTTP client")?,
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

#[async_trait]
impl WebSearcher for GoogleSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let num = max_results.clamp(1, CSE_MAX_NUM).to_string();
        info!(query, num = num.as_str(), "Google search");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .context("Google Custom Search request failed")?
            .error_for_status()
            .context("Google Custom Search returned an error status")?;

        let data: CseResponse = resp
            .json()
            .await
            .context("Failed to parse Google Custom Search response")?;

        let results = cse_results(data);
        info!(query, count = results.len(), "Google search complete");
        Ok(results)
    }
}

fn cse_results(data: CseResponse) -> Vec<SearchResult> {
    data.items
        .into_iter()
        .filter(|item| !item.link.is_empty())
        .map(|item| SearchResult {
            published: item.published(),
            url: item.link,
            title: item.title,
            snippet: item.snippet,
            display_link: item.display_link,
        })
        .collect()
}

// --- ClaimReviewSource trait ---

/// Published fact-checks for a claim, already in raw evidence form.
#[async_trait]
pub trait ClaimReviewSource: Send + Sync {
    async fn claim_reviews(&self, claim: &str) -> Result<Vec<RawEvidence>>;
}

// --- Google Fact Check Tools ---

pub struct FactCheckToolsClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ClaimSearchResponse {
    #[serde(default)]
    claims: Vec<ClaimEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimEntry {
    #[serde(default)]
    claim_review: Vec<ClaimReview>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimReview {
    publisher: Option<ReviewPublisher>,
    url: Option<String>,
    title: Option<String>,
    review_date: Option<String>,
    textual_rating: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewPublisher {
    name: Option<String>,
    site: Option<String>,
}

impl FactCheckToolsClient {
    pub fn new(api_key: &str) -> Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: FACT_CHECK_TOOLS_URL.to_string(),
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .context("Failed to build HTTP client")?,
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

#[async_trait]
impl ClaimReviewSource for FactCheckToolsClient {
    async fn claim_reviews(&self, claim: &str) -> Result<Vec<RawEvidence>> {
        info!(claim, "Fact Check Tools search");

        let page_size = FACT_CHECK_PAGE_SIZE.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("query", claim),
                ("languageCode", "en"),
                ("pageSize", page_size.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Fact Check Tools request failed")?
            .error_for_status()
            .context("Fact Check Tools returned an error status")?;

        let data: ClaimSearchResponse = resp
            .json()
            .await
            .context("Failed to parse Fact Check Tools response")?;

        let evidence = review_evidence(data);
        if evidence.is_empty() {
            warn!(claim, "No published fact-checks found");
        } else {
            info!(claim, count = evidence.len(), "Fact Check Tools search complete");
        }
        Ok(evidence)
    }
}

/// One evidence item per review that carries a textual rating.
fn review_evidence(data: ClaimSearchResponse) -> Vec<RawEvidence> {
    data.claims
        .into_iter()
        .flat_map(|c| c.claim_review)
        .filter(|r| r.textual_rating.as_deref().is_some_and(|t| !t.trim().is_empty()))
        .map(|r| RawEvidence {
            publisher: r.publisher.and_then(|p| p.name.or(p.site)),
            url: r.url,
            title: r.title,
            rating: r.textual_rating,
            review_date: r.review_date.map(serde_json::Value::String),
            ..Default::default()
        })
        .collect()
}
