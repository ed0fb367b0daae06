use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Stances and confidence ---

/// Classified position of a single evidence item, and of the final verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Stance {
    True,
    False,
    Mixed,
    Unknown,
}

impl Stance {
    /// The three stances that own a score bucket. Unknown only counts toward the total.
    pub const SCORED: [Stance; 3] = [Stance::True, Stance::False, Stance::Mixed];
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stance::True => write!(f, "True"),
            Stance::False => write!(f, "False"),
            Stance::Mixed => write!(f, "Mixed"),
            Stance::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Coarse label summarizing how strong the aggregate evidence was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceBand::Low => write!(f, "Low"),
            ConfidenceBand::Medium => write!(f, "Medium"),
            ConfidenceBand::High => write!(f, "High"),
        }
    }
}

// --- Structured AI labels ---

static RE_AI_VERDICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:(not|isn't|is\s+not|never)\s+)?(un)?(true|false|mixed|unclear|insufficient)\b")
        .unwrap()
});
static RE_AI_CONFIDENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(high|medium|low)\b").unwrap());

/// Verdict label produced by an LLM reading an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AiVerdict {
    True,
    False,
    Mixed,
    /// Also covers `INSUFFICIENT`.
    #[serde(alias = "INSUFFICIENT")]
    Unclear,
}

impl AiVerdict {
    /// Lenient parse: finds the first label word anywhere in the text.
    /// Model output like `"Verdict: **FALSE**"` parses; anything unrecognised is `Unclear`.
    /// A negated TRUE ("not true", "untrue") is `False`; any other negated label is `Unclear`.
    pub fn parse_lenient(text: &str) -> Self {
        let Some(caps) = RE_AI_VERDICT.captures(text) else {
            return AiVerdict::Unclear;
        };
        let negated = caps.get(1).is_some() || caps.get(2).is_some();
        let label = caps
            .get(3)
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();
        match (negated, label.as_str()) {
            (false, "true") => AiVerdict::True,
            (false, "false") => AiVerdict::False,
            (false, "mixed") => AiVerdict::Mixed,
            (true, "true") => AiVerdict::False,
            _ => AiVerdict::Unclear,
        }
    }
}

/// Confidence label attached to an [`AiVerdict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AiConfidence {
    High,
    Medium,
    Low,
}

impl AiConfidence {
    pub fn parse_lenient(text: &str) -> Option<Self> {
        let m = RE_AI_CONFIDENCE.find(text)?;
        match m.as_str().to_ascii_lowercase().as_str() {
            "high" => Some(AiConfidence::High),
            "medium" => Some(AiConfidence::Medium),
            "low" => Some(AiConfidence::Low),
            _ => None,
        }
    }
}

// --- Raw evidence (input boundary) ---

/// One search or fact-check result as handed over by the evidence gatherer or
/// read from a JSON file. Every field is optional; normalization fills defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvidence {
    pub publisher: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    #[serde(alias = "content")]
    pub snippet: Option<String>,
    /// Free-text rating from a fact-check API, e.g. "Pants on Fire".
    #[serde(alias = "textualRating")]
    pub rating: Option<String>,
    /// Structured AI label (`TRUE`/`FALSE`/`MIXED`/`UNCLEAR`/`INSUFFICIENT`).
    #[serde(alias = "aiVerdict")]
    pub verdict: Option<String>,
    /// AI confidence (`HIGH`/`MEDIUM`/`LOW`). Ignored without `verdict`.
    pub confidence: Option<String>,
    /// ISO 8601 string or integer epoch.
    #[serde(alias = "date", alias = "review_date")]
    pub review_date: Option<serde_json::Value>,
}

/// Deep-read analysis of the single most recent evidence item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeepAnalysis {
    pub verdict: AiVerdict,
    pub confidence: AiConfidence,
    #[serde(default, alias = "evidence_summary")]
    pub evidence_summary: String,
    #[serde(default, alias = "key_facts")]
    pub key_facts: Vec<String>,
}

// --- Strategy selection ---

/// Which aggregation rule turns classified evidence into a verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationStrategy {
    /// Credibility × recency × confidence scoring with ratio thresholds.
    #[default]
    Weighted,
    /// Count-based: the stance with strictly the most items wins.
    MajorityVote,
}

impl std::fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationStrategy::Weighted => write!(f, "weighted"),
            AggregationStrategy::MajorityVote => write!(f, "majority-vote"),
        }
    }
}

impl std::str::FromStr for AggregationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weighted" => Ok(AggregationStrategy::Weighted),
            "majority-vote" | "majority_vote" | "majority" => Ok(AggregationStrategy::MajorityVote),
            other => Err(format!("unknown aggregation strategy: {other}")),
        }
    }
}
