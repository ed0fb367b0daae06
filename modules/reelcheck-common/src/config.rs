use std::env;

use tracing::info;

use crate::error::ReelCheckError;

pub const DEFAULT_ANALYSIS_MODEL: &str = "claude-haiku-4-5-20251001";

/// Secrets and endpoints loaded from environment variables.
/// Tunables (thresholds, concurrency) live in [`crate::Settings`] instead.
#[derive(Debug, Clone)]
pub struct Config {
    // AI provider
    pub anthropic_api_key: String,
    pub analysis_model: String,
    /// Messages API endpoint override, e.g. a local proxy.
    pub anthropic_base_url: Option<String>,

    // Search
    pub google_search_api_key: String,
    pub google_search_engine_id: String,
    pub google_factcheck_api_key: Option<String>,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ReelCheckError> {
        let _ = dotenvy::dotenv();
        Ok(Self {
            anthropic_api_key: required_env("ANTHROPIC_API_KEY")?,
            analysis_model: env::var("REELCHECK_ANALYSIS_MODEL")
                .unwrap_or_else(|_| DEFAULT_ANALYSIS_MODEL.to_string()),
            anthropic_base_url: optional_env("ANTHROPIC_BASE_URL"),
            google_search_api_key: required_env("GOOGLE_CUSTOM_SEARCH_API_KEY")?,
            google_search_engine_id: required_env("GOOGLE_CUSTOM_SEARCH_ENGINE_ID")?,
            google_factcheck_api_key: optional_env("GOOGLE_FACTCHECK_API_KEY"),
        })
    }

    /// Log which settings are present without printing secret values.
    pub fn log_redacted(&self) {
        info!(
            analysis_model = self.analysis_model.as_str(),
            anthropic_api_key = redact(&self.anthropic_api_key),
            anthropic_base_url = self.anthropic_base_url.as_deref().unwrap_or("(default)"),
            google_search_api_key = redact(&self.google_search_api_key),
            google_search_engine_id = self.google_search_engine_id.as_str(),
            google_factcheck_api_key = self
                .google_factcheck_api_key
                .as_deref()
                .map(redact)
                .unwrap_or("(unset)"),
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> Result<String, ReelCheckError> {
    optional_env(key)
        .ok_or_else(|| ReelCheckError::Config(format!("{key} environment variable is required")))
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "(unset)"
    } else {
        "(set)"
    }
}
