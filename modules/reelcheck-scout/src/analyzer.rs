use ai_client::claude::Claude;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reelcheck_common::{truncate_chars, AiConfidence, AiVerdict, DeepAnalysis, RawEvidence};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Article text beyond this many characters is cut before prompting.
pub const MAX_ARTICLE_CHARS: usize = 3000;

/// An article as handed to the analyzers.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub url: String,
    pub title: String,
    /// Display domain or publication name.
    pub publisher: String,
    pub snippet: String,
    /// Scraped text, or the title-only fallback.
    pub content: String,
    pub published: Option<String>,
}

impl Article {
    /// Evidence for this article with no rating attached. Classifies as Unknown.
    pub fn unrated_evidence(&self) -> RawEvidence {
        RawEvidence {
            publisher: Some(self.publisher.clone()),
            url: Some(self.url.clone()),
            title: Some(self.title.clone()),
            snippet: Some(self.snippet.clone()),
            review_date: self.published.clone().map(serde_json::Value::String),
            ..Default::default()
        }
    }
}

/// One model reading of one article against the claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleAnalysis {
    /// TRUE if the article confirms the claim, FALSE if it explicitly
    /// contradicts it, MIXED if partly, UNCLEAR otherwise.
    pub verdict: AiVerdict,
    pub confidence: AiConfidence,
    /// One or two sentences on why.
    #[serde(default)]
    pub reasoning: String,
    #[serde(default, alias = "key_evidence")]
    pub key_evidence: Vec<String>,
}

impl ArticleAnalysis {
    pub fn to_evidence(&self, article: &Article) -> RawEvidence {
        RawEvidence {
            verdict: Some(label(&self.verdict)),
            confidence: Some(label(&self.confidence)),
            ..article.unrated_evidence()
        }
    }
}

// Serialized form of an AI label, e.g. "FALSE" or "HIGH".
fn label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_default()
}

#[async_trait]
pub trait ArticleAnalyzer: Send + Sync {
    async fn analyze(&self, claim: &str, article: &Article) -> Result<ArticleAnalysis>;
}

/// Closer read of a single article, run on the most recent one only.
#[async_trait]
pub trait DeepAnalyzer: Send + Sync {
    async fn deep_analyze(&self, claim: &str, article: &Article) -> Result<DeepAnalysis>;
}

// --- Prompts ---

const ARTICLE_ANALYSIS_SYSTEM: &str = "\
You are a fact-checking expert. Decide whether the article CONFIRMS, DENIES, or is UNCLEAR about the claim. \
Be decisive: if the article reports the claimed event as fact, the verdict is TRUE. \
Official government or company statements count as factual reporting. \
Only answer FALSE when the article explicitly contradicts the claim or gives contradicting facts. \
Use MIXED when the article confirms part of the claim and contradicts another part. \
If the article does not address the claim, answer UNCLEAR.";

const DEEP_ANALYSIS_SYSTEM: &str = "\
You are a senior fact-checker doing a close reading of the most recent report on a claim. \
Weigh what the article actually establishes, separating reported facts from quotes and speculation. \
Give an overall verdict (TRUE, FALSE, MIXED or UNCLEAR), your confidence, \
a short evidence summary, and the key facts that decide it.";

pub fn article_prompt(claim: &str, article: &Article) -> String {
    format!(
        "CLAIM TO VERIFY: \"{claim}\"\n\n\
         ARTICLE TITLE: \"{}\"\n\
         ARTICLE URL: {}\n\
         PUBLISHER: {}\n\
         ARTICLE CONTENT:\n\"{}\"",
        article.title,
        article.url,
        article.publisher,
        truncate_chars(&article.content, MAX_ARTICLE_CHARS),
    )
}

// --- Claude-backed analyzer ---

pub struct ClaudeAnalyzer {
    claude: Claude,
}

impl ClaudeAnalyzer {
    pub fn from_client(claude: Claude) -> Self {
        Self { claude }
    }
}

#[async_trait]
impl ArticleAnalyzer for ClaudeAnalyzer {
    async fn analyze(&self, claim: &str, article: &Article) -> Result<ArticleAnalysis> {
        let analysis: ArticleAnalysis = self
            .claude
            .extract(ARTICLE_ANALYSIS_SYSTEM, article_prompt(claim, article))
            .await
            .with_context(|| format!("Article analysis failed for {}", article.url))?;

        info!(
            url = article.url.as_str(),
            model = self.claude.model(),
            verdict = ?analysis.verdict,
            confidence = ?analysis.confidence,
            "Article analyzed"
        );
        Ok(analysis)
    }
}

#[async_trait]
impl DeepAnalyzer for ClaudeAnalyzer {
    async fn deep_analyze(&self, claim: &str, article: &Article) -> Result<DeepAnalysis> {
        let deep: DeepAnalysis = self
            .claude
            .extract(DEEP_ANALYSIS_SYSTEM, article_prompt(claim, article))
            .await
            .with_context(|| format!("Deep analysis failed for {}", article.url))?;

        info!(
            url = article.url.as_str(),
            model = self.claude.model(),
            verdict = ?deep.verdict,
            key_facts = deep.key_facts.len(),
            "Deep analysis complete"
        );
        Ok(deep)
    }
}
