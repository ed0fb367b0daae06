use std::sync::Arc;
use std::time::Duration;

use ai_client::Claude;
use chrono::{DateTime, Utc};
use reelcheck_common::{Config, DeepAnalysis, ReelCheckError, Settings};
use reelcheck_verdict::normalize::normalize;
use reelcheck_verdict::recency::recency_order;
use reelcheck_verdict::{AggregationResult, Aggregator};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::analyzer::{ArticleAnalyzer, ClaudeAnalyzer, DeepAnalyzer};
use crate::gatherer::{EvidenceGatherer, GatherOutcome};
use crate::scraper::{ArticleScraper, HttpArticleScraper};
use crate::searcher::{ClaimReviewSource, FactCheckToolsClient, GoogleSearcher, WebSearcher};
use crate::store::{ContentCache, HistoryStore, InMemoryContentCache, InMemoryHistory};

/// Token budget and timeout for the deep read.
const DEEP_ANALYSIS_MAX_TOKENS: u32 = 2048;
const DEEP_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(60);

/// What the claim extractor emits when a message has nothing checkable.
pub const NO_CLAIM_SENTINEL: &str = "No verifiable claim found";

/// One completed check, as stored in a user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckRecord {
    pub id: Uuid,
    pub user_id: String,
    pub claim: String,
    pub result: AggregationResult,
    pub checked_at: DateTime<Utc>,
    /// Gathering hit its deadline; the verdict rests on partial evidence.
    #[serde(default)]
    pub partial: bool,
}

/// Everything a [`FactChecker`] talks to.
#[derive(Clone, TypedBuilder)]
pub struct FactCheckDeps {
    pub searcher: Arc<dyn WebSearcher>,
    pub scraper: Arc<dyn ArticleScraper>,
    pub analyzer: Arc<dyn ArticleAnalyzer>,
    #[builder(default, setter(strip_option))]
    pub deep_analyzer: Option<Arc<dyn DeepAnalyzer>>,
    #[builder(default, setter(strip_option))]
    pub claim_reviews: Option<Arc<dyn ClaimReviewSource>>,
    #[builder(default = Arc::new(InMemoryHistory::default()) as Arc<dyn HistoryStore>)]
    pub history: Arc<dyn HistoryStore>,
    #[builder(default = Arc::new(InMemoryContentCache::default()) as Arc<dyn ContentCache>)]
    pub cache: Arc<dyn ContentCache>,
}

impl FactCheckDeps {
    /// Live clients: Google search, optional Fact Check Tools, plain HTTP
    /// scraping, and Claude for both analysis passes.
    pub fn from_config(config: &Config) -> Result<Self, ReelCheckError> {
        let searcher = GoogleSearcher::new(
            &config.google_search_api_key,
            &config.google_search_engine_id,
        )
        .map_err(|e| ReelCheckError::Search(format!("{e:#}")))?;
        let claim_reviews = config
            .google_factcheck_api_key
            .as_deref()
            .map(FactCheckToolsClient::new)
            .transpose()
            .map_err(|e| ReelCheckError::Search(format!("{e:#}")))?
            .map(|c| Arc::new(c) as Arc<dyn ClaimReviewSource>);
        let scraper =
            HttpArticleScraper::new().map_err(|e| ReelCheckError::Scraping(format!("{e:#}")))?;

        let mut claude = Claude::new(&config.anthropic_api_key, &config.analysis_model);
        if let Some(url) = &config.anthropic_base_url {
            claude = claude.with_base_url(url);
        }
        let analyzer = ClaudeAnalyzer::from_client(claude.clone());
        let deep_analyzer = ClaudeAnalyzer::from_client(
            claude
                .with_max_tokens(DEEP_ANALYSIS_MAX_TOKENS)
                .with_timeout(DEEP_ANALYSIS_TIMEOUT),
        );

        Ok(Self {
            searcher: Arc::new(searcher),
            scraper: Arc::new(scraper),
            analyzer: Arc::new(analyzer),
            deep_analyzer: Some(Arc::new(deep_analyzer)),
            claim_reviews,
            history: Arc::new(InMemoryHistory::default()),
            cache: Arc::new(InMemoryContentCache::default()),
        })
    }
}

/// Claim in, verdict out: gather → optional deep read → aggregate → record.
pub struct FactChecker {
    gatherer: EvidenceGatherer,
    aggregator: Aggregator,
    deep_analyzer: Option<Arc<dyn DeepAnalyzer>>,
    history: Arc<dyn HistoryStore>,
}

impl FactChecker {
    pub fn new(deps: FactCheckDeps, settings: &Settings) -> Self {
        let deep_analyzer = if settings.gathering.deep_analysis {
            deps.deep_analyzer
        } else {
            None
        };
        Self {
            gatherer: EvidenceGatherer::new(
                deps.searcher,
                deps.scraper,
                deps.analyzer,
                deps.claim_reviews,
                deps.cache,
                settings.gathering.clone(),
            ),
            aggregator: Aggregator::from_settings(&settings.aggregation),
            deep_analyzer,
            history: deps.history,
        }
    }

    pub async fn check(&self, user_id: &str, claim: &str) -> Result<FactCheckRecord, ReelCheckError> {
        let claim = claim.trim();
        if claim.is_empty() || claim.eq_ignore_ascii_case(NO_CLAIM_SENTINEL) {
            return Err(ReelCheckError::NoClaim);
        }

        info!(user_id, claim, "Fact check started");

        let outcome = self.gatherer.gather(claim).await;
        let deep = self.deep_read_newest(claim, &outcome).await;
        let result = self.aggregator.aggregate(&outcome.evidence(), deep.as_ref());

        let record = FactCheckRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            claim: claim.to_string(),
            result,
            checked_at: Utc::now(),
            partial: outcome.partial,
        };

        self.history
            .append(record.clone())
            .await
            .map_err(|e| ReelCheckError::Store(e.to_string()))?;

        info!(
            user_id,
            claim,
            verdict = %record.result.verdict(),
            confidence = %record.result.confidence(),
            evidence = record.result.evidence_count(),
            partial = record.partial,
            "Fact check complete"
        );
        Ok(record)
    }

    pub async fn history(&self, user_id: &str) -> Result<Vec<FactCheckRecord>, ReelCheckError> {
        self.history
            .history(user_id)
            .await
            .map_err(|e| ReelCheckError::Store(e.to_string()))
    }

    /// Deep analysis of the rank-0 item, when it has an article to read.
    /// Failure only costs the refinement. Skipped once gathering has used up
    /// the deadline.
    async fn deep_read_newest(&self, claim: &str, outcome: &GatherOutcome) -> Option<DeepAnalysis> {
        let analyzer = self.deep_analyzer.as_ref()?;
        if outcome.partial {
            info!(claim, "Deadline already reached, skipping deep analysis");
            return None;
        }
        let items = normalize(&outcome.evidence());
        let newest = *recency_order(&items).first()?;
        let article = outcome.items.get(newest)?.article.as_ref()?;

        match analyzer.deep_analyze(claim, article).await {
            Ok(deep) => Some(deep),
            Err(e) => {
                warn!(url = article.url.as_str(), error = %e, "Deep analysis failed, skipping");
                None
            }
        }
    }
}
