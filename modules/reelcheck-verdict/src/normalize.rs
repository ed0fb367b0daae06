use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reelcheck_common::{AiConfidence, AiVerdict, RawEvidence};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_PUBLISHER: &str = "Unknown";

/// Integer epochs above this are read as milliseconds, below as seconds.
/// 10^11 seconds is year 5138; 10^11 ms is early 1973.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;
/// 9999-12-31T23:59:59Z. Anything further out is garbage, not a review date.
const MAX_EPOCH_SECS: i64 = 253_402_300_799;

/// How an evidence item judged the claim, before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Rating {
    /// Free-text rating from a fact-check API ("Pants on Fire", "Mostly True").
    Text { text: String },
    /// Structured label from an LLM reading the article.
    Ai {
        verdict: AiVerdict,
        confidence: Option<AiConfidence>,
    },
}

/// Canonical evidence record with every optional field resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceItem {
    /// Position in the input list. Breaks recency ties.
    pub index: usize,
    pub publisher: String,
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub rating: Option<Rating>,
    /// Epoch zero when the source gave no usable date, so it sorts last.
    pub review_date: DateTime<Utc>,
}

/// Normalize a heterogeneous raw list. Never drops an item.
pub fn normalize(raw: &[RawEvidence]) -> Vec<EvidenceItem> {
    raw.iter()
        .enumerate()
        .map(|(index, r)| normalize_one(index, r))
        .collect()
}

pub fn normalize_one(index: usize, raw: &RawEvidence) -> EvidenceItem {
    let publisher = clean(raw.publisher.as_deref());
    EvidenceItem {
        index,
        publisher: if publisher.is_empty() {
            UNKNOWN_PUBLISHER.to_string()
        } else {
            publisher
        },
        url: clean(raw.url.as_deref()),
        title: clean(raw.title.as_deref()),
        snippet: clean(raw.snippet.as_deref()),
        rating: resolve_rating(raw),
        review_date: raw
            .review_date
            .as_ref()
            .and_then(parse_review_date)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    }
}

fn clean(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// An AI label, when present, wins over a free-text rating.
fn resolve_rating(raw: &RawEvidence) -> Option<Rating> {
    if let Some(verdict) = raw.verdict.as_deref().filter(|v| !v.trim().is_empty()) {
        return Some(Rating::Ai {
            verdict: AiVerdict::parse_lenient(verdict),
            confidence: raw.confidence.as_deref().and_then(AiConfidence::parse_lenient),
        });
    }
    raw.rating
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| Rating::Text { text: t.to_string() })
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD`, or an integer epoch
/// (as a JSON number or a digit string). Dates before 1970 clamp to the epoch.
pub fn parse_review_date(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    let parsed = match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(from_epoch),
        serde_json::Value::String(s) => parse_date_str(s.trim()),
        _ => None,
    }?;
    Some(parsed.max(DateTime::<Utc>::UNIX_EPOCH))
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    s.parse::<i64>().ok().and_then(from_epoch)
}

fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    let is_millis = value.unsigned_abs() > EPOCH_MILLIS_THRESHOLD.unsigned_abs();
    let secs = if is_millis { value.div_euclid(1000) } else { value };
    if secs.unsigned_abs() > MAX_EPOCH_SECS.unsigned_abs() {
        return None;
    }
    if is_millis {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}
