use reelcheck_common::PublisherWeight;

pub const DEFAULT_CREDIBILITY: f64 = 0.5;

/// Built-in publisher weights, matched against the lower-cased publisher name
/// (or display domain). First substring match wins, so longer or more specific
/// names must come before the short ones they contain.
const BUILTIN_PUBLISHERS: &[(&str, f64)] = &[
    // Wire services
    ("reuters", 1.0),
    ("associated press", 1.0),
    ("apnews", 1.0),
    ("agence france-presse", 0.95),
    ("afp", 0.95),
    ("press trust of india", 0.9),
    // Dedicated fact-checkers
    ("politifact", 0.95),
    ("snopes", 0.95),
    ("factcheck.org", 0.95),
    ("full fact", 0.95),
    ("fullfact", 0.95),
    ("alt news", 0.9),
    ("altnews", 0.9),
    ("boom live", 0.9),
    ("boomlive", 0.9),
    ("factly", 0.9),
    ("vishvas news", 0.85),
    ("lead stories", 0.85),
    ("leadstories", 0.85),
    ("check your fact", 0.8),
    // Public broadcasters
    ("bbc", 0.9),
    ("npr", 0.85),
    ("pbs", 0.85),
    // National outlets
    ("new york times", 0.8),
    ("nytimes", 0.8),
    ("washington post", 0.8),
    ("washingtonpost", 0.8),
    ("wall street journal", 0.8),
    ("wsj", 0.8),
    ("the guardian", 0.8),
    ("theguardian", 0.8),
    ("the hindu", 0.8),
    ("thehindu", 0.8),
    ("indian express", 0.75),
    ("indianexpress", 0.75),
    ("hindustan times", 0.7),
    ("hindustantimes", 0.7),
    ("times of india", 0.7),
    ("timesofindia", 0.7),
    ("ndtv", 0.7),
    ("usa today", 0.75),
    ("usatoday", 0.75),
    ("cnn", 0.75),
    ("cbs news", 0.75),
    ("nbc news", 0.75),
    ("abc news", 0.75),
    ("bloomberg", 0.8),
    ("the economist", 0.8),
    // Open social platforms
    ("wikipedia", 0.5),
    ("reddit", 0.3),
    ("youtube", 0.3),
    ("facebook", 0.3),
    ("instagram", 0.3),
    ("twitter", 0.3),
    ("tiktok", 0.25),
];

/// Case-insensitive publisher → trust weight in [0, 1].
#[derive(Debug, Clone)]
pub struct CredibilityTable {
    /// Lower-cased names in match order.
    entries: Vec<(String, f64)>,
    default_weight: f64,
}

impl Default for CredibilityTable {
    fn default() -> Self {
        Self {
            entries: BUILTIN_PUBLISHERS
                .iter()
                .map(|(name, w)| (name.to_string(), *w))
                .collect(),
            default_weight: DEFAULT_CREDIBILITY,
        }
    }
}

impl CredibilityTable {
    /// Built-in table with `overrides` checked first and a custom default.
    pub fn with_overrides(overrides: &[PublisherWeight], default_weight: f64) -> Self {
        let mut table = Self::default();
        let mut entries: Vec<(String, f64)> = overrides
            .iter()
            .map(|p| (p.name.trim().to_lowercase(), sanitize(p.weight, DEFAULT_CREDIBILITY)))
            .filter(|(name, _)| !name.is_empty())
            .collect();
        entries.append(&mut table.entries);
        table.entries = entries;
        table.default_weight = sanitize(default_weight, DEFAULT_CREDIBILITY);
        table
    }

    pub fn default_weight(&self) -> f64 {
        self.default_weight
    }

    /// Exact match first, then the first entry found in the publisher name as
    /// a whole word or domain label ("npr.org" matches `npr`, "The Enterprise"
    /// does not). Unmatched publishers (including "Unknown") take the default.
    pub fn weight(&self, publisher: &str) -> f64 {
        let needle = publisher.trim().to_lowercase();
        if needle.is_empty() {
            return self.default_weight;
        }
        if let Some((_, w)) = self.entries.iter().find(|(name, _)| *name == needle) {
            return *w;
        }
        self.entries
            .iter()
            .find(|(name, _)| contains_word(&needle, name))
            .map(|(_, w)| *w)
            .unwrap_or(self.default_weight)
    }
}

/// `name` occurs in `haystack` with no letter or digit directly on either side.
fn contains_word(haystack: &str, name: &str) -> bool {
    haystack.match_indices(name).any(|(start, m)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + m.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn sanitize(weight: f64, fallback: f64) -> f64 {
    if weight.is_finite() {
        weight.clamp(0.0, 1.0)
    } else {
        fallback
    }
}
