//! Search stage: answer a query using web-search tools from an MCP session.

use tracing::info;

use crate::agent::{Agent, RunConfig};
use crate::chat::SharedChatProvider;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::tool::BoxedTool;

/// Free-text answer produced by the search agent for one query.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The answer text, expected to cite source URLs.
    pub content: String,
}

/// Agent that answers a free-text query using the tools of a live MCP session.
///
/// The answer is asked to cite source URLs, cap the number of results, and
/// drop results attributed to the excluded source. These constraints are
/// instruction-level only: enforcement is delegated to the model, so they are
/// best-effort rather than verifiable guarantees.
pub struct SearchAgent {
    provider: SharedChatProvider,
    model: String,
    max_results: usize,
    excluded_source: String,
}

impl SearchAgent {
    /// Creates a search agent with default result constraints.
    #[must_use]
    pub fn new(provider: SharedChatProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_results: Config::DEFAULT_MAX_RESULTS,
            excluded_source: Config::DEFAULT_EXCLUDED_SOURCE.to_owned(),
        }
    }

    /// Creates a search agent from pipeline configuration.
    #[must_use]
    pub fn from_config(provider: SharedChatProvider, config: &Config) -> Self {
        Self {
            provider,
            model: config.openai.model.clone(),
            max_results: config.max_results,
            excluded_source: config.excluded_source.clone(),
        }
    }

    /// Sets the maximum number of results to ask for.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets the source label whose results should be dropped.
    #[must_use]
    pub fn with_excluded_source(mut self, source: impl Into<String>) -> Self {
        self.excluded_source = source.into();
        self
    }

    /// Builds the system instructions for the search agent.
    fn instructions(&self) -> String {
        [
            "Use the internet search tools to find relevant URLs and information.".to_owned(),
            "Always include source URLs when providing information.".to_owned(),
            format!("Never return more than {} results.", self.max_results),
            "Always return the most relevant results for the users question.".to_owned(),
            format!(
                "Never return content that came from Source: {}.",
                self.excluded_source
            ),
        ]
        .join("\n")
    }

    /// Answers `query` using the given session tools.
    ///
    /// The tools must belong to a live MCP session; a closed session fails
    /// the call rather than silently degrading.
    ///
    /// # Errors
    ///
    /// Rejects empty queries with [`Error::Agent`]; any provider or tool
    /// session failure propagates unmodified.
    pub async fn run(&self, query: &str, tools: Vec<BoxedTool>) -> Result<SearchResult> {
        if query.trim().is_empty() {
            return Err(Error::agent("search query must not be empty"));
        }

        info!(query, tools = tools.len(), "Running search agent");

        let agent = Agent::new("search")
            .instructions(self.instructions())
            .model(&self.model)
            .provider(self.provider.clone())
            .tools(tools);

        let result = agent.run(query, RunConfig::default()).await?;

        Ok(SearchResult {
            content: result.output_text(),
        })
    }
}

impl std::fmt::Debug for SearchAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchAgent")
            .field("model", &self.model)
            .field("max_results", &self.max_results)
            .field("excluded_source", &self.excluded_source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llms::OpenAIConfig;
    use std::sync::Arc;

    fn test_agent() -> SearchAgent {
        let config = Config::new("http://localhost:8080", OpenAIConfig::new("key"));
        let provider: SharedChatProvider =
            Arc::new(crate::llms::OpenAI::new(config.openai.clone()).expect("client"));
        SearchAgent::from_config(provider, &config)
    }

    #[test]
    fn instructions_carry_constraints() {
        let instructions = test_agent().instructions();

        assert!(instructions.contains("source URLs"));
        assert!(instructions.contains("Never return more than 3 results"));
        assert!(instructions.contains("Source: google"));
    }

    #[test]
    fn builders_override_constraints() {
        let agent = test_agent().with_max_results(1).with_excluded_source("bing");
        let instructions = agent.instructions();

        assert!(instructions.contains("more than 1 results"));
        assert!(instructions.contains("Source: bing"));
    }
}
