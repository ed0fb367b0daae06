use reelcheck_common::{truncate_chars, AggregationStrategy, ConfidenceBand, Stance};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Decision, ScoreBreakdown, ScoredEvidence};

pub const DEFAULT_MAX_SOURCES: usize = 4;
const TITLE_DISPLAY_CHARS: usize = 100;

pub(crate) const INSUFFICIENT_EVIDENCE: &str =
    "Insufficient evidence: no sources were found to verify this claim.";

/// One contributing source as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
    pub publisher: String,
    pub url: String,
    pub title: String,
    pub verdict: Stance,
    pub confidence: f64,
    pub credibility: f64,
}

/// Final output of one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    verdict: Stance,
    confidence: ConfidenceBand,
    summary: String,
    sources: Vec<SourceSummary>,
    score_breakdown: ScoreBreakdown,
    strategy: AggregationStrategy,
    evidence_count: usize,
}

impl AggregationResult {
    pub fn verdict(&self) -> Stance {
        self.verdict
    }

    pub fn confidence(&self) -> ConfidenceBand {
        self.confidence
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn sources(&self) -> &[SourceSummary] {
        &self.sources
    }

    pub fn score_breakdown(&self) -> ScoreBreakdown {
        self.score_breakdown
    }

    pub fn strategy(&self) -> AggregationStrategy {
        self.strategy
    }

    pub fn evidence_count(&self) -> usize {
        self.evidence_count
    }
}

/// Assemble the result. `scored` must already be in recency order.
pub fn build_report(
    decision: Decision,
    scored: &[ScoredEvidence],
    strategy: AggregationStrategy,
    max_sources: usize,
) -> AggregationResult {
    let sources = scored
        .iter()
        .take(max_sources.min(DEFAULT_MAX_SOURCES))
        .map(|e| SourceSummary {
            publisher: e.item.publisher.clone(),
            url: e.item.url.clone(),
            title: truncate_chars(&e.item.title, TITLE_DISPLAY_CHARS),
            verdict: e.stance,
            confidence: e.stance_confidence,
            credibility: e.credibility,
        })
        .collect();

    AggregationResult {
        verdict: decision.verdict,
        confidence: decision.confidence,
        summary: summary_text(&decision, scored),
        sources,
        score_breakdown: decision.breakdown,
        strategy,
        evidence_count: scored.len(),
    }
}

fn summary_text(decision: &Decision, scored: &[ScoredEvidence]) -> String {
    let Some(newest) = scored.first() else {
        return INSUFFICIENT_EVIDENCE.to_string();
    };

    let n = scored.len();
    let plural = if n == 1 { "source" } else { "sources" };
    let headline = match decision.verdict {
        Stance::True => "the claim appears to be true",
        Stance::False => "the claim appears to be false",
        Stance::Mixed => "the claim is partly accurate",
        Stance::Unknown => "there is not enough agreement to reach a verdict",
    };
    let b = &decision.breakdown;

    format!(
        "Based on {n} {plural}, {headline} ({} confidence). Most recent coverage: {} rated it {}. \
         Support: {:.0}% true, {:.0}% false, {:.0}% mixed.",
        decision.confidence.to_string().to_lowercase(),
        newest.item.publisher,
        newest.stance.to_string().to_lowercase(),
        b.true_ratio * 100.0,
        b.false_ratio * 100.0,
        b.mixed_ratio * 100.0,
    )
}
