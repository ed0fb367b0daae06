use chrono::{DateTime, Utc};
use reelcheck_common::{AggregationStrategy, ConfidenceBand, RawEvidence, Stance};
use reelcheck_verdict::aggregate::weighted_decision;
use reelcheck_verdict::{aggregate, Aggregator, EvidenceItem, ScoredEvidence};
use serde_json::json;

fn rated(publisher: &str, rating: &str, date: &str) -> RawEvidence {
    RawEvidence {
        publisher: Some(publisher.into()),
        url: Some(format!("https://example.com/{}", publisher.replace(' ', "-"))),
        title: Some(format!("{publisher} on the claim")),
        rating: Some(rating.into()),
        review_date: Some(json!(date)),
        ..Default::default()
    }
}

fn ai_labelled(publisher: &str, verdict: &str, confidence: &str, date: &str) -> RawEvidence {
    RawEvidence {
        publisher: Some(publisher.into()),
        verdict: Some(verdict.into()),
        confidence: Some(confidence.into()),
        review_date: Some(json!(date)),
        ..Default::default()
    }
}

fn scored(stance: Stance, confidence: f64, credibility: f64, recency: f64) -> ScoredEvidence {
    ScoredEvidence {
        item: EvidenceItem {
            index: 0,
            publisher: "Fixture".into(),
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

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// --- P1: totality ---

#[test]
fn any_field_combination_yields_a_valid_result() {
    let publishers = [None, Some(""), Some("Reuters"), Some("some blog")];
    let ratings = [None, Some(""), Some("Pants on Fire"), Some("Mostly True"), Some("???")];
    let verdicts = [None, Some("FALSE"), Some("insufficient"), Some("Not true"), Some("garbage")];
    let dates = [
        None,
        Some(json!("2024-02-30")),
        Some(json!("2024-01-01")),
        Some(json!(1_700_000_000_000_i64)),
        Some(json!(-5)),
        Some(json!(-1e30)),
        Some(json!(i64::MIN)),
        Some(json!("-9223372036854775808")),
        Some(json!({ "nested": true })),
    ];

    let mut evidence = Vec::new();
    for p in &publishers {
        for r in &ratings {
            for v in &verdicts {
                for d in &dates {
                    evidence.push(RawEvidence {
                        publisher: p.map(String::from),
                        rating: r.map(String::from),
                        verdict: v.map(String::from),
                        confidence: v.map(|_| "sort of HIGH".to_string()),
                        review_date: d.clone(),
                        ..Default::default()
                    });
                }
            }
        }
    }

    for end in [0, 1, 7, evidence.len()] {
        let result = aggregate(&evidence[..end]);
        assert_eq!(result.evidence_count(), end);
        assert!(!result.summary().is_empty());
        let b = result.score_breakdown();
        for ratio in [b.true_ratio, b.false_ratio, b.mixed_ratio] {
            assert!((0.0..=1.0).contains(&ratio), "ratio out of range: {ratio}");
        }
        assert!(b.true_ratio + b.false_ratio + b.mixed_ratio <= 1.0 + 1e-9);
    }
}

#[test]
fn raw_evidence_deserializes_from_loose_json() {
    let raw: Vec<RawEvidence> = serde_json::from_value(json!([
        { "publisher": "PolitiFact", "textualRating": "Pants on Fire", "reviewDate": "2024-01-02" },
        { "publisher": "BBC", "aiVerdict": "FALSE", "confidence": "HIGH", "date": 1704153600 },
        { "content": "no rating at all" },
        {}
    ]))
    .unwrap();
    let result = aggregate(&raw);
    assert_eq!(result.evidence_count(), 4);
    assert_eq!(result.verdict(), Stance::False);
}

#[test]
fn negated_ai_label_counts_against_the_claim() {
    let result = aggregate(&[ai_labelled("Reuters", "Not true", "HIGH", "2024-06-01")]);
    assert_eq!(result.verdict(), Stance::False);
    assert_eq!(result.sources()[0].verdict, Stance::False);

    let result = aggregate(&[ai_labelled("Reuters", "not false", "HIGH", "2024-06-01")]);
    assert_eq!(result.verdict(), Stance::Unknown);
}

// --- P2: empty input ---

#[test]
fn empty_input_is_unknown_low() {
    let result = aggregate(&[]);
    assert_eq!(result.verdict(), Stance::Unknown);
    assert_eq!(result.confidence(), ConfidenceBand::Low);
    assert!(result.sources().is_empty());
    assert!(result.summary().contains("Insufficient evidence"));
}

// --- P3: single strong False dominates ---

#[test]
fn single_strong_false_dominates_exact_arithmetic() {
    let mut evidence = vec![scored(Stance::False, 0.95, 0.9, 3.0)];
    evidence.extend((0..3).map(|_| scored(Stance::True, 0.9, 0.5, 1.0)));

    let d = weighted_decision(&evidence);
    assert_close(d.breakdown.false_ratio, 2.565 / 3.915);
    assert_close(d.breakdown.true_ratio, 1.35 / 3.915);
    assert_eq!(d.verdict, Stance::False);
    // ≈ 0.655 clears 0.5 but not 0.7
    assert_eq!(d.confidence, ConfidenceBand::Medium);
}

#[test]
fn single_strong_false_dominates_end_to_end() {
    let result = aggregate(&[
        rated("Blog One", "True", "2023-01-01"),
        rated("Blog Two", "Correct", "2023-01-02"),
        ai_labelled("BBC", "FALSE", "HIGH", "2024-05-01"),
        rated("Blog Three", "Verified", "2023-01-03"),
    ]);
    assert_eq!(result.verdict(), Stance::False);
    assert_eq!(result.confidence(), ConfidenceBand::Medium);
    assert_eq!(result.sources()[0].publisher, "BBC");
}

// --- P4: recency monotonicity ---

#[test]
fn moving_a_false_item_to_rank_zero_never_lowers_its_share() {
    let supporting = [
        rated("Blog One", "True", "2023-02-01"),
        rated("Blog Two", "True", "2023-03-01"),
        rated("Blog Three", "True", "2023-04-01"),
    ];

    let mut stale = supporting.to_vec();
    stale.push(rated("Reuters", "False", "2020-01-01"));
    let mut fresh = supporting.to_vec();
    fresh.push(rated("Reuters", "False", "2024-01-01"));

    let before = aggregate(&stale).score_breakdown().false_ratio;
    let after = aggregate(&fresh).score_breakdown().false_ratio;
    assert!(after >= before, "before {before}, after {after}");
}

#[test]
fn recency_lets_a_single_newest_debunk_beat_an_older_majority() {
    // Count-wise True leads 3:1 but the newest credible source says False.
    let result = aggregate(&[
        rated("Reuters", "False", "2024-06-01"),
        rated("CNN", "True", "2023-01-01"),
        rated("Blog Two", "True", "2023-01-02"),
        rated("Blog One", "True", "2023-01-03"),
    ]);
    assert_eq!(result.verdict(), Stance::False);
}

// --- P5: idempotence ---

#[test]
fn aggregating_twice_is_bit_identical() {
    let evidence = vec![
        rated("Reuters", "False", "2024-06-01"),
        ai_labelled("Some Site", "MIXED", "LOW", "2024-01-01"),
        rated("Snopes", "Mostly False", "2023-05-05"),
        RawEvidence::default(),
    ];
    let aggregator = Aggregator::default();
    let first = aggregator.aggregate(&evidence, None);
    let second = aggregator.aggregate(&evidence, None);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

// --- P6: unknown dilution ---

#[test]
fn unknown_items_dilute_every_ratio_and_can_cross_a_threshold() {
    let mut evidence = vec![
        scored(Stance::False, 1.0, 1.0, 1.0),
        scored(Stance::False, 1.0, 1.0, 1.0),
        scored(Stance::True, 0.5, 1.0, 1.0),
    ];
    let before = weighted_decision(&evidence);
    assert_close(before.breakdown.false_ratio, 0.8);
    assert_eq!((before.verdict, before.confidence), (Stance::False, ConfidenceBand::High));

    evidence.extend((0..3).map(|_| scored(Stance::Unknown, 1.0, 1.0, 1.0)));
    let after = weighted_decision(&evidence);

    assert_close(after.breakdown.false_ratio, 2.0 / 5.5);
    assert!(after.breakdown.false_ratio < before.breakdown.false_ratio);
    assert!(after.breakdown.true_ratio < before.breakdown.true_ratio);
    assert_eq!((after.verdict, after.confidence), (Stance::Unknown, ConfidenceBand::Low));
}

// --- P7: majority-vote tie ---

#[test]
fn majority_vote_tie_is_unknown_regardless_of_confidence() {
    let evidence = [
        ai_labelled("Reuters", "TRUE", "HIGH", "2024-01-01"),
        ai_labelled("AP", "TRUE", "HIGH", "2024-01-02"),
        rated("Blog One", "some sort of claim", "2024-01-03"),
        ai_labelled("Blog Two", "FALSE", "LOW", "2024-01-04"),
        ai_labelled("Blog Three", "FALSE", "LOW", "2024-01-05"),
    ];
    let result = Aggregator::default()
        .with_strategy(AggregationStrategy::MajorityVote)
        .aggregate(&evidence, None);
    assert_eq!(result.verdict(), Stance::Unknown);
    assert_eq!(result.confidence(), ConfidenceBand::Low);
    assert_eq!(result.strategy(), AggregationStrategy::MajorityVote);
}
