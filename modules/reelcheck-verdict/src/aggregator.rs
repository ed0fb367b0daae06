use reelcheck_common::{AggregationSettings, AggregationStrategy, DeepAnalysis, RawEvidence};
use tracing::debug;

use crate::aggregate::{decide, ScoredEvidence};
use crate::classifier::{classify, classify_deep};
use crate::credibility::CredibilityTable;
use crate::normalize::{normalize, EvidenceItem};
use crate::recency::{recency_order, RecencyPolicy};
use crate::report::{build_report, AggregationResult, DEFAULT_MAX_SOURCES};

/// Configured aggregation pipeline. Holds no per-run state, so one instance
/// can serve any number of calls.
#[derive(Debug, Clone)]
pub struct Aggregator {
    strategy: AggregationStrategy,
    credibility: CredibilityTable,
    recency: RecencyPolicy,
    max_sources: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            strategy: AggregationStrategy::default(),
            credibility: CredibilityTable::default(),
            recency: RecencyPolicy::default(),
            max_sources: DEFAULT_MAX_SOURCES,
        }
    }
}

impl Aggregator {
    pub fn from_settings(settings: &AggregationSettings) -> Self {
        let recency = if settings.recency_weighting {
            RecencyPolicy::default()
        } else {
            RecencyPolicy::flat()
        };
        Self {
            strategy: settings.strategy,
            credibility: CredibilityTable::with_overrides(
                &settings.publishers,
                settings.default_credibility,
            ),
            recency: RecencyPolicy::default(),
            max_sources: settings.max_sources,
        }
        .with_recency(recency)
    }

    pub fn with_strategy(mut self, strategy: AggregationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_recency(mut self, recency: RecencyPolicy) -> Self {
        self.recency = recency;
        self
    }

    pub fn strategy(&self) -> AggregationStrategy {
        self.strategy
    }

    pub fn aggregate(&self, raw: &[RawEvidence], deep: Option<&DeepAnalysis>) -> AggregationResult {
        self.aggregate_items(normalize(raw), deep)
    }

    pub fn aggregate_items(
        &self,
        items: Vec<EvidenceItem>,
        deep: Option<&DeepAnalysis>,
    ) -> AggregationResult {
        let scored = self.score(items, deep);
        let decision = decide(self.strategy, &scored);
        debug!(
            strategy = %self.strategy,
            evidence = scored.len(),
            verdict = %decision.verdict,
            confidence = %decision.confidence,
            "Aggregated evidence"
        );
        build_report(decision, &scored, self.strategy, self.max_sources)
    }

    /// Classify and weight every item, most recent first. A deep analysis
    /// replaces the classification of the rank-0 item only.
    pub fn score(&self, items: Vec<EvidenceItem>, deep: Option<&DeepAnalysis>) -> Vec<ScoredEvidence> {
        let order = recency_order(&items);
        let mut slots: Vec<Option<EvidenceItem>> = items.into_iter().map(Some).collect();

        order
            .into_iter()
            .enumerate()
            .filter_map(|(rank, i)| slots[i].take().map(|item| (rank, item)))
            .map(|(rank, item)| {
                let classification = match deep {
                    Some(d) if rank == 0 => classify_deep(d),
                    _ => classify(item.rating.as_ref()),
                };
                ScoredEvidence {
                    credibility: self.credibility.weight(&item.publisher),
                    recency_multiplier: self.recency.multiplier(rank),
                    recency_rank: rank,
                    stance: classification.stance,
                    stance_confidence: classification.confidence,
                    item,
                }
            })
            .collect()
    }
}
