use reelcheck_common::{AiConfidence, AiVerdict, DeepAnalysis, Stance};

use crate::normalize::Rating;

/// Stance and confidence for a single evidence item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub stance: Stance,
    /// In [0, 1].
    pub confidence: f64,
}

/// Anything we cannot read gets this: a neutral stance with low confidence.
pub const UNCLASSIFIED: Classification = Classification {
    stance: Stance::Unknown,
    confidence: 0.3,
};

/// One keyword rule for free-text ratings.
#[derive(Debug)]
pub struct RatingRule {
    pub keywords: &'static [&'static str],
    pub stance: Stance,
    pub confidence: f64,
}

/// Evaluated top-down, first hit wins. False sits above True so that
/// "not true", "untrue" and "inaccurate" never read as confirmations.
pub const RATING_RULES: &[RatingRule] = &[
    RatingRule {
        keywords: &[
            "false",
            "incorrect",
            "misleading",
            "pants on fire",
            "fake",
            "fabricated",
            "untrue",
            "not true",
            "inaccurate",
        ],
        stance: Stance::False,
        confidence: 0.9,
    },
    RatingRule {
        keywords: &["true", "correct", "accurate", "verified", "confirmed"],
        stance: Stance::True,
        confidence: 0.9,
    },
    RatingRule {
        keywords: &["partially", "mixed", "half", "mostly", "some"],
        stance: Stance::Mixed,
        confidence: 0.7,
    },
];

/// Classify a free-text rating such as "Pants on Fire" or "Mostly True".
pub fn classify_text(rating: &str) -> Classification {
    let lowered = rating.to_lowercase();
    RATING_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
        .map(|rule| Classification {
            stance: rule.stance,
            confidence: rule.confidence,
        })
        .unwrap_or(UNCLASSIFIED)
}

/// Direct mapping for structured AI labels. A missing confidence reads as MEDIUM.
pub fn classify_ai(verdict: AiVerdict, confidence: Option<AiConfidence>) -> Classification {
    let stance = match verdict {
        AiVerdict::True => Stance::True,
        AiVerdict::False => Stance::False,
        AiVerdict::Mixed => Stance::Mixed,
        AiVerdict::Unclear => Stance::Unknown,
    };
    Classification {
        stance,
        confidence: ai_confidence_score(confidence.unwrap_or(AiConfidence::Medium)),
    }
}

pub fn ai_confidence_score(confidence: AiConfidence) -> f64 {
    match confidence {
        AiConfidence::High => 0.95,
        AiConfidence::Medium => 0.8,
        AiConfidence::Low => 0.6,
    }
}

pub fn classify(rating: Option<&Rating>) -> Classification {
    match rating {
        Some(Rating::Text { text }) => classify_text(text),
        Some(Rating::Ai { verdict, confidence }) => classify_ai(*verdict, *confidence),
        None => UNCLASSIFIED,
    }
}

pub fn classify_deep(deep: &DeepAnalysis) -> Classification {
    classify_ai(deep.verdict, Some(deep.confidence))
}
