use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::AggregationStrategy;

/// TOML-backed tunables. Secrets stay in env vars (see [`crate::Config`]).
///
/// Every section and field has a default, so an empty file (or no file at all)
/// yields the stock behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Settings {
    pub aggregation: AggregationSettings,
    pub gathering: GatheringSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AggregationSettings {
    pub strategy: AggregationStrategy,
    /// Cap on the contributing sources listed in a result.
    pub max_sources: usize,
    /// Weight for publishers that match nothing in the table.
    pub default_credibility: f64,
    /// Extra or overriding publisher weights, checked before the built-in table.
    pub publishers: Vec<PublisherWeight>,
    /// Boost the newest items. When off, every rank weighs the same.
    pub recency_weighting: bool,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            strategy: AggregationStrategy::Weighted,
            max_sources: 4,
            default_credibility: 0.5,
            publishers: Vec::new(),
            recency_weighting: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublisherWeight {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GatheringSettings {
    pub max_queries: usize,
    pub results_per_query: usize,
    pub articles_per_query: usize,
    pub max_concurrency: usize,
    pub deadline_secs: u64,
    /// Run the deep analysis pass on the most recent article.
    pub deep_analysis: bool,
}

impl Default for GatheringSettings {
    fn default() -> Self {
        Self {
            max_queries: 3,
            results_per_query: 5,
            articles_per_query: 3,
            max_concurrency: 3,
            deadline_secs: 90,
            deep_analysis: true,
        }
    }
}

impl Settings {
    /// Load and parse a TOML settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path` when given, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
