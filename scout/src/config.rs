//! Runtime configuration for the pipeline.
//!
//! Configuration is read from the environment exactly once at startup and
//! carried as an explicit struct for the duration of the run; nothing else in
//! the crate touches process-wide state.

use crate::error::{Error, Result};
use crate::llms::OpenAIConfig;

/// The fixed query the CLI runs when none is given.
pub const DEFAULT_QUERY: &str =
    "Find websites that explain model rate limits and model pricing for Groq";

/// Runtime configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint for the streaming MCP tool session.
    pub mcp_server_url: String,
    /// Inference endpoint configuration.
    pub openai: OpenAIConfig,
    /// Maximum number of results the search agent is asked to return.
    pub max_results: usize,
    /// Source label whose results the search agent is told to drop.
    pub excluded_source: String,
}

impl Config {
    /// Default model identifier.
    pub const DEFAULT_MODEL: &'static str = "Qwen/Qwen3-8B";
    /// Default cap on search results.
    pub const DEFAULT_MAX_RESULTS: usize = 3;
    /// Default excluded source label.
    pub const DEFAULT_EXCLUDED_SOURCE: &'static str = "google";

    /// Creates a configuration from an MCP endpoint and inference settings.
    #[must_use]
    pub fn new(mcp_server_url: impl Into<String>, openai: OpenAIConfig) -> Self {
        Self {
            mcp_server_url: mcp_server_url.into(),
            openai,
            max_results: Self::DEFAULT_MAX_RESULTS,
            excluded_source: Self::DEFAULT_EXCLUDED_SOURCE.to_owned(),
        }
    }

    /// Reads configuration from the environment.
    ///
    /// | Variable | Effect |
    /// |---|---|
    /// | `MCP_SERVER_URL` | endpoint for the MCP tool session (required) |
    /// | `OPENAI_API_KEY` | credential for the inference endpoint (required) |
    /// | `OPENAI_BASE_URL` | base URL of the inference endpoint (optional) |
    /// | `OPENAI_MODEL` | model identifier (optional) |
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a required variable is missing or empty.
    pub fn from_env() -> Result<Self> {
        let mcp_server_url = require_env("MCP_SERVER_URL")?;
        let api_key = require_env("OPENAI_API_KEY")?;

        let mut openai = OpenAIConfig::new(api_key).with_model(Self::DEFAULT_MODEL);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            openai = openai.with_base_url(base_url);
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            openai = openai.with_model(model);
        }

        Ok(Self::new(mcp_server_url, openai))
    }

    /// Sets the maximum number of search results.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets the excluded source label.
    #[must_use]
    pub fn with_excluded_source(mut self, source: impl Into<String>) -> Self {
        self.excluded_source = source.into();
        self
    }
}

/// Reads a required environment variable, rejecting empty values.
fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::config(format!(
            "{name} environment variable not set"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let config = Config::new("http://localhost:8080", OpenAIConfig::new("key"));

        assert_eq!(config.mcp_server_url, "http://localhost:8080");
        assert_eq!(config.max_results, Config::DEFAULT_MAX_RESULTS);
        assert_eq!(config.excluded_source, Config::DEFAULT_EXCLUDED_SOURCE);
    }

    #[test]
    fn builder_overrides() {
        let config = Config::new("http://localhost:8080", OpenAIConfig::new("key"))
            .with_max_results(5)
            .with_excluded_source("bing");

        assert_eq!(config.max_results, 5);
        assert_eq!(config.excluded_source, "bing");
    }

    #[test]
    fn default_query_mentions_groq() {
        assert!(DEFAULT_QUERY.contains("Groq"));
    }
}
