use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::stream::{self, Stream, StreamExt};
use reelcheck_common::{GatheringSettings, RawEvidence};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::analyzer::{Article, ArticleAnalyzer};
use crate::queries::search_queries;
use crate::scraper::{fallback_content, ArticleScraper};
use crate::searcher::{ClaimReviewSource, SearchResult, WebSearcher};
use crate::store::ContentCache;

/// One piece of evidence plus the article it came from, when there was one.
/// Published fact-checks have no article.
#[derive(Debug, Clone, PartialEq)]
pub struct GatheredEvidence {
    pub evidence: RawEvidence,
    pub article: Option<Article>,
}

#[derive(Debug, Clone, Default)]
pub struct GatherOutcome {
    /// Discovery order: published fact-checks first, then articles by query
    /// and search rank.
    pub items: Vec<GatheredEvidence>,
    /// The deadline passed before every search and analysis finished.
    pub partial: bool,
}

impl GatherOutcome {
    pub fn evidence(&self) -> Vec<RawEvidence> {
        self.items.iter().map(|i| i.evidence.clone()).collect()
    }
}

/// Runs searches, scrapes and per-article analysis for one claim.
pub struct EvidenceGatherer {
    searcher: Arc<dyn WebSearcher>,
    scraper: Arc<dyn ArticleScraper>,
    analyzer: Arc<dyn ArticleAnalyzer>,
    claim_reviews: Option<Arc<dyn ClaimReviewSource>>,
    cache: Arc<dyn ContentCache>,
    settings: GatheringSettings,
}

/// A search hit picked for analysis, tagged with its discovery position.
struct Candidate {
    position: usize,
    hit: SearchResult,
}

impl EvidenceGatherer {
    pub fn new(
        searcher: Arc<dyn WebSearcher>,
        scraper: Arc<dyn ArticleScraper>,
        analyzer: Arc<dyn ArticleAnalyzer>,
        claim_reviews: Option<Arc<dyn ClaimReviewSource>>,
        cache: Arc<dyn ContentCache>,
        settings: GatheringSettings,
    ) -> Self {
        Self {
            searcher,
            scraper,
            analyzer,
            claim_reviews,
            cache,
            settings,
        }
    }

    fn concurrency(&self) -> usize {
        self.settings.max_concurrency.max(1)
    }

    pub async fn gather(&self, claim: &str) -> GatherOutcome {
        let deadline = Instant::now() + Duration::from_secs(self.settings.deadline_secs);
        let queries = search_queries(claim, self.settings.max_queries);

        info!(claim, queries = queries.len(), "Gathering evidence");

        let (reviews, (hits, searches_cut)) = tokio::join!(
            self.fetch_claim_reviews(claim, deadline),
            self.run_searches(&queries, deadline),
        );

        let candidates = self.pick_candidates(hits);
        let (mut analyzed, analysis_cut) = collect_until(
            stream::iter(candidates)
                .map(|c| async move { (c.position, self.evaluate(claim, c.hit).await) })
                .buffer_unordered(self.concurrency()),
            deadline,
        )
        .await;
        analyzed.sort_by_key(|(position, _)| *position);

        let mut items: Vec<GatheredEvidence> = reviews
            .into_iter()
            .map(|evidence| GatheredEvidence {
                evidence,
                article: None,
            })
            .collect();
        items.extend(analyzed.into_iter().map(|(_, item)| item));

        let partial = searches_cut || analysis_cut;
        if partial {
            warn!(claim, collected = items.len(), "Deadline reached, using partial evidence");
        }
        info!(claim, evidence = items.len(), partial, "Evidence gathered");

        GatherOutcome { items, partial }
    }

    async fn fetch_claim_reviews(&self, claim: &str, deadline: Instant) -> Vec<RawEvidence> {
        let Some(source) = &self.claim_reviews else {
            return Vec::new();
        };
        match tokio::time::timeout_at(deadline, source.claim_reviews(claim)).await {
            Ok(Ok(reviews)) => reviews,
            Ok(Err(e)) => {
                warn!(claim, error = %e, "Fact-check lookup failed");
                Vec::new()
            }
            Err(_) => {
                warn!(claim, "Fact-check lookup timed out");
                Vec::new()
            }
        }
    }

    /// Hits per query in query order. A failed query contributes nothing.
    async fn run_searches(
        &self,
        queries: &[String],
        deadline: Instant,
    ) -> (Vec<Vec<SearchResult>>, bool) {
        let max_results = self.settings.results_per_query;
        let (mut done, cut) = collect_until(
            stream::iter(queries.iter().enumerate())
                .map(|(i, query)| async move {
                    let hits = match self.searcher.search(query, max_results).await {
                        Ok(hits) => hits,
                        Err(e) => {
                            warn!(query = query.as_str(), error = %e, "Search failed");
                            Vec::new()
                        }
                    };
                    (i, hits)
                })
                .buffer_unordered(self.concurrency()),
            deadline,
        )
        .await;
        done.sort_by_key(|(i, _)| *i);
        (done.into_iter().map(|(_, hits)| hits).collect(), cut)
    }

    /// Top `articles_per_query` hits of each query, first sighting of a URL wins.
    fn pick_candidates(&self, hits: Vec<Vec<SearchResult>>) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        hits.into_iter()
            .flat_map(|per_query| per_query.into_iter().take(self.settings.articles_per_query))
            .filter(|hit| seen.insert(hit.url.clone()))
            .enumerate()
            .map(|(position, hit)| Candidate { position, hit })
            .collect()
    }

    /// Scrape (through the cache) and analyze one hit. Never fails: a failed
    /// scrape falls back to the title, a failed analysis leaves the item unrated.
    async fn evaluate(&self, claim: &str, hit: SearchResult) -> GatheredEvidence {
        let content = match self.article_text(&hit.url).await {
            Ok(text) => text,
            Err(e) => {
                warn!(url = hit.url.as_str(), error = %e, "Scrape failed, using title only");
                fallback_content(&hit.title)
            }
        };

        let article = Article {
            publisher: if hit.display_link.is_empty() {
                publisher_from_url(&hit.url)
            } else {
                hit.display_link
            },
            url: hit.url,
            title: hit.title,
            snippet: hit.snippet,
            content,
            published: hit.published,
        };

        let evidence = match self.analyzer.analyze(claim, &article).await {
            Ok(analysis) => analysis.to_evidence(&article),
            Err(e) => {
                warn!(url = article.url.as_str(), error = %e, "Analysis failed, keeping item unrated");
                article.unrated_evidence()
            }
        };

        GatheredEvidence {
            evidence,
            article: Some(article),
        }
    }

    async fn article_text(&self, url: &str) -> Result<String> {
        if let Some(cached) = self.cache.get(url).await {
            return Ok(cached);
        }
        let text = self.scraper.scrape(url).await?;
        self.cache.set(url, text.clone()).await;
        Ok(text)
    }
}

fn publisher_from_url(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_default()
}

/// Drain `stream` until it ends or `deadline` passes. The flag is true when
/// the deadline cut it short.
async fn collect_until<S: Stream>(stream: S, deadline: Instant) -> (Vec<S::Item>, bool) {
    let mut stream = std::pin::pin!(stream);
    let mut out = Vec::new();
    loop {
        match tokio::time::timeout_at(deadline, stream.next()).await {
            Ok(Some(item)) => out.push(item),
            Ok(None) => return (out, false),
            Err(_) => return (out, true),
        }
    }
}
