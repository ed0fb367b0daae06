//! Verdict aggregation: raw evidence in, one (verdict, confidence) out.
//!
//! Pipeline: [`normalize`] → [`recency`] ordering → [`classifier`] →
//! [`credibility`] weighting → [`aggregate`] decision → [`report`].
//! Everything here is synchronous and total; no function returns an error.

pub mod aggregate;
pub mod aggregator;
pub mod classifier;
pub mod credibility;
pub mod normalize;
pub mod recency;
pub mod report;

pub use aggregate::{Decision, ScoreBreakdown, ScoredEvidence};
pub use aggregator::Aggregator;
pub use classifier::Classification;
pub use credibility::CredibilityTable;
pub use normalize::{EvidenceItem, Rating};
pub use recency::RecencyPolicy;
pub use report::{AggregationResult, SourceSummary};

use reelcheck_common::RawEvidence;

/// Aggregate with the stock configuration (weighted strategy, built-in
/// publisher table, default recency multipliers).
pub fn aggregate(raw: &[RawEvidence]) -> AggregationResult {
    Aggregator::default().aggregate(raw, None)
}
