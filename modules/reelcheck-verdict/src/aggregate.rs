use reelcheck_common::{AggregationStrategy, ConfidenceBand, Stance};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::normalize::EvidenceItem;

/// A ratio at or above this wins the verdict for True or False.
pub const MAJORITY_RATIO: f64 = 0.5;
/// A winning True/False ratio at or above this is High confidence.
pub const HIGH_CONFIDENCE_RATIO: f64 = 0.7;
/// Mixed wins at this ratio when neither True nor False has a majority.
pub const MIXED_RATIO: f64 = 0.4;

/// Mean per-item confidence above this is High in majority-vote mode.
pub const VOTE_HIGH_CONFIDENCE: f64 = 0.8;
/// Mean per-item confidence above this is Medium in majority-vote mode.
pub const VOTE_MEDIUM_CONFIDENCE: f64 = 0.6;

/// An evidence item with everything the decision needs attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEvidence {
    pub item: EvidenceItem,
    /// 0 = most recent.
    pub recency_rank: usize,
    pub stance: Stance,
    /// Per-item classification confidence in [0, 1].
    pub stance_confidence: f64,
    /// Publisher weight in [0, 1].
    pub credibility: f64,
    pub recency_multiplier: f64,
}

impl ScoredEvidence {
    /// credibility × recency × confidence
    pub fn effective_weight(&self) -> f64 {
        self.credibility * self.recency_multiplier * self.stance_confidence
    }
}

/// Share of the evidence behind each stance. Unknown has no bucket but counts
/// in the denominator, so the three ratios sum to at most 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub true_ratio: f64,
    pub false_ratio: f64,
    pub mixed_ratio: f64,
}

impl ScoreBreakdown {
    pub fn ratio(&self, stance: Stance) -> f64 {
        match stance {
            Stance::True => self.true_ratio,
            Stance::False => self.false_ratio,
            Stance::Mixed => self.mixed_ratio,
            Stance::Unknown => 0.0,
        }
    }

    fn from_totals(true_total: f64, false_total: f64, mixed_total: f64, total: f64) -> Self {
        if total <= 0.0 || !total.is_finite() {
            return Self::default();
        }
        Self {
            true_ratio: true_total / total,
            false_ratio: false_total / total,
            mixed_ratio: mixed_total / total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub verdict: Stance,
    pub confidence: ConfidenceBand,
    pub breakdown: ScoreBreakdown,
}

impl Decision {
    fn unknown(breakdown: ScoreBreakdown) -> Self {
        Self {
            verdict: Stance::Unknown,
            confidence: ConfidenceBand::Low,
            breakdown,
        }
    }
}

/// Run the configured strategy over the scored evidence.
pub fn decide(strategy: AggregationStrategy, evidence: &[ScoredEvidence]) -> Decision {
    match strategy {
        AggregationStrategy::Weighted => weighted_decision(evidence),
        AggregationStrategy::MajorityVote => majority_vote_decision(evidence),
    }
}

/// Weight-based policy. False is checked before True: one credible debunk
/// should beat several neutral or supportive mentions.
pub fn weighted_decision(evidence: &[ScoredEvidence]) -> Decision {
    let mut totals = [0.0_f64; 3];
    let mut total_weight = 0.0;

    for e in evidence {
        let w = e.effective_weight();
        if !w.is_finite() || w <= 0.0 {
            continue;
        }
        total_weight += w;
        if let Some(slot) = Stance::SCORED.iter().position(|s| *s == e.stance) {
            totals[slot] += w;
        }
    }

    let breakdown = ScoreBreakdown::from_totals(totals[0], totals[1], totals[2], total_weight);

    debug!(
        items = evidence.len(),
        total_weight,
        true_ratio = breakdown.true_ratio,
        false_ratio = breakdown.false_ratio,
        mixed_ratio = breakdown.mixed_ratio,
        "Weighted evidence totals"
    );

    if total_weight <= 0.0 {
        return Decision::unknown(breakdown);
    }

    let band = |ratio: f64| {
        if ratio >= HIGH_CONFIDENCE_RATIO {
            ConfidenceBand::High
        } else {
            ConfidenceBand::Medium
        }
    };

    if breakdown.false_ratio >= MAJORITY_RATIO {
        Decision {
            verdict: Stance::False,
            confidence: band(breakdown.false_ratio),
            breakdown,
        }
    } else if breakdown.true_ratio >= MAJORITY_RATIO {
        Decision {
            verdict: Stance::True,
            confidence: band(breakdown.true_ratio),
            breakdown,
        }
    } else if breakdown.mixed_ratio >= MIXED_RATIO {
        Decision {
            verdict: Stance::Mixed,
            confidence: ConfidenceBand::Medium,
            breakdown,
        }
    } else {
        Decision::unknown(breakdown)
    }
}

/// Count-based policy: the stance with strictly the most items wins, ties give
/// Unknown. Unknown items compete too, so a pile of unclear articles wins as
/// Unknown.
pub fn majority_vote_decision(evidence: &[ScoredEvidence]) -> Decision {
    if evidence.is_empty() {
        return Decision::unknown(ScoreBreakdown::default());
    }

    let count = |stance: Stance| evidence.iter().filter(|e| e.stance == stance).count();
    let counts = [
        (Stance::True, count(Stance::True)),
        (Stance::False, count(Stance::False)),
        (Stance::Mixed, count(Stance::Mixed)),
        (Stance::Unknown, count(Stance::Unknown)),
    ];

    let n = evidence.len() as f64;
    let breakdown = ScoreBreakdown::from_totals(
        counts[0].1 as f64,
        counts[1].1 as f64,
        counts[2].1 as f64,
        n,
    );

    let top = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let leaders: Vec<Stance> = counts
        .iter()
        .filter(|(_, c)| *c == top)
        .map(|(s, _)| *s)
        .collect();

    let mean_confidence = evidence.iter().map(|e| e.stance_confidence).sum::<f64>() / n;

    debug!(
        true_count = counts[0].1,
        false_count = counts[1].1,
        mixed_count = counts[2].1,
        unknown_count = counts[3].1,
        mean_confidence,
        "Majority vote counts"
    );

    match leaders.as_slice() {
        [winner] if *winner != Stance::Unknown => Decision {
            verdict: *winner,
            confidence: if mean_confidence > VOTE_HIGH_CONFIDENCE {
                ConfidenceBand::High
            } else if mean_confidence > VOTE_MEDIUM_CONFIDENCE {
                ConfidenceBand::Medium
            } else {
                ConfidenceBand::Low
            },
            breakdown,
        },
        _ => Decision::unknown(breakdown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    /// Evidence with explicit weights so tests control `effective_weight` exactly.
    fn scored(
        stance: Stance,
        confidence: f64,
        credibility: f64,
        recency: f64,
    ) -> ScoredEvidence {
        ScoredEvidence {
            item: EvidenceItem {
                index: 0,
                publisher: "Test".into(),
                url: String::new(),
                title: String::new(),
                snippet: String::new(),
                rating: None,
                review_date: DateTime::<Utc>::UNIX_EPOCH,
            },
            recency_rank: 0,
            stance,
            stance_confidence: confidence,
            credibility,
            recency_multiplier: recency,
        }
    }

    fn unit(stance: Stance) -> ScoredEvidence {
        scored(stance, 1.0, 1.0, 1.0)
    }

    #[test]
    fn empty_evidence_is_unknown_low() {
        let d = weighted_decision(&[]);
        assert_eq!(d.verdict, Stance::Unknown);
        assert_eq!(d.confidence, ConfidenceBand::Low);
        assert_eq!(d.breakdown, ScoreBreakdown::default());
    }

    #[test]
    fn zero_weight_evidence_is_unknown_low() {
        let d = weighted_decision(&[scored(Stance::False, 0.9, 0.0, 3.0)]);
        assert_eq!(d.verdict, Stance::Unknown);
        assert_eq!(d.confidence, ConfidenceBand::Low);
    }

    #[test]
    fn false_majority_band_boundaries() {
        // exactly 0.5 → False/Medium
        let d = weighted_decision(&[unit(Stance::False), unit(Stance::True)]);
        assert_eq!((d.verdict, d.confidence), (Stance::False, ConfidenceBand::Medium));

        // 0.625 → still Medium
        let d = weighted_decision(&[
            scored(Stance::False, 0.625, 1.0, 1.0),
            scored(Stance::True, 0.375, 1.0, 1.0),
        ]);
        assert_eq!((d.verdict, d.confidence), (Stance::False, ConfidenceBand::Medium));

        // 0.75 → High
        let d = weighted_decision(&[
            scored(Stance::False, 0.75, 1.0, 1.0),
            scored(Stance::True, 0.25, 1.0, 1.0),
        ]);
        assert_eq!(d.breakdown.false_ratio, 0.75);
        assert_eq!((d.verdict, d.confidence), (Stance::False, ConfidenceBand::High));
    }

    #[test]
    fn false_is_checked_before_true_on_an_exact_split() {
        // 0.5 / 0.5: symmetric evidence resolves to False, never True
        let d = weighted_decision(&[unit(Stance::True), unit(Stance::False)]);
        assert_eq!(d.verdict, Stance::False);
    }

    #[test]
    fn true_majority_when_false_is_short() {
        let d = weighted_decision(&[
            unit(Stance::True),
            unit(Stance::True),
            unit(Stance::True),
            unit(Stance::False),
        ]);
        assert_eq!((d.verdict, d.confidence), (Stance::True, ConfidenceBand::High));
    }

    #[test]
    fn mixed_needs_forty_percent() {
        // mixed 0.5, true 0.25, false 0.25
        let d = weighted_decision(&[
            scored(Stance::Mixed, 0.5, 1.0, 1.0),
            scored(Stance::True, 0.25, 1.0, 1.0),
            scored(Stance::False, 0.25, 1.0, 1.0),
        ]);
        assert_eq!((d.verdict, d.confidence), (Stance::Mixed, ConfidenceBand::Medium));

        // mixed 0.375 → nothing clears a threshold
        let d = weighted_decision(&[
            scored(Stance::Mixed, 0.375, 1.0, 1.0),
            scored(Stance::True, 0.3125, 1.0, 1.0),
            scored(Stance::False, 0.3125, 1.0, 1.0),
        ]);
        assert_eq!((d.verdict, d.confidence), (Stance::Unknown, ConfidenceBand::Low));
    }

    #[test]
    fn below_threshold_is_unknown_even_if_one_stance_leads() {
        // True leads at 0.45 but never reaches 0.5; no fallback to the largest ratio
        let d = weighted_decision(&[
            scored(Stance::True, 0.45, 1.0, 1.0),
            scored(Stance::False, 0.2, 1.0, 1.0),
            scored(Stance::Unknown, 0.35, 1.0, 1.0),
        ]);
        assert_eq!(d.verdict, Stance::Unknown);
        assert_eq!(d.confidence, ConfidenceBand::Low);
    }

    #[test]
    fn ratios_never_exceed_one_and_unknown_only_dilutes() {
        let d = weighted_decision(&[
            unit(Stance::True),
            unit(Stance::False),
            unit(Stance::Mixed),
            unit(Stance::Unknown),
        ]);
        let sum = d.breakdown.true_ratio + d.breakdown.false_ratio + d.breakdown.mixed_ratio;
        assert!((sum - 0.75).abs() < 1e-12, "sum: {sum}");
    }

    #[test]
    fn majority_vote_strict_winner() {
        let d = majority_vote_decision(&[
            scored(Stance::True, 0.95, 0.5, 1.0),
            scored(Stance::True, 0.95, 0.5, 1.0),
            scored(Stance::False, 0.95, 1.0, 3.0),
        ]);
        assert_eq!((d.verdict, d.confidence), (Stance::True, ConfidenceBand::High));
        assert!((d.breakdown.true_ratio - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn majority_vote_confidence_bands_use_mean_confidence() {
        let d = majority_vote_decision(&[
            scored(Stance::False, 0.8, 1.0, 1.0),
            scored(Stance::False, 0.6, 1.0, 1.0),
        ]);
        // mean 0.7 → Medium
        assert_eq!((d.verdict, d.confidence), (Stance::False, ConfidenceBand::Medium));

        let d = majority_vote_decision(&[scored(Stance::Mixed, 0.6, 1.0, 1.0)]);
        // mean exactly 0.6 is not above 0.6
        assert_eq!((d.verdict, d.confidence), (Stance::Mixed, ConfidenceBand::Low));
    }

    #[test]
    fn majority_vote_unknown_can_win() {
        let d = majority_vote_decision(&[
            unit(Stance::Unknown),
            unit(Stance::Unknown),
            unit(Stance::True),
        ]);
        assert_eq!((d.verdict, d.confidence), (Stance::Unknown, ConfidenceBand::Low));
    }

    #[test]
    fn majority_vote_empty_is_unknown_low() {
        let d = majority_vote_decision(&[]);
        assert_eq!((d.verdict, d.confidence), (Stance::Unknown, ConfidenceBand::Low));
    }

    #[test]
    fn decide_dispatches_on_strategy() {
        // One heavy False vs two light True: weights and counts disagree.
        let evidence = [
            scored(Stance::False, 0.95, 1.0, 3.0),
            scored(Stance::True, 0.9, 0.5, 1.0),
            scored(Stance::True, 0.9, 0.5, 1.0),
        ];
        assert_eq!(decide(AggregationStrategy::Weighted, &evidence).verdict, Stance::False);
        assert_eq!(decide(AggregationStrategy::MajorityVote, &evidence).verdict, Stance::True);
    }
}
