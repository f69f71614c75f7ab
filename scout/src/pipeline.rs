//! Pipeline driver: the search-then-extract state machine.
//!
//! A run moves through the states
//! `CONFIGURED → TOOL_SESSION_OPEN → SEARCH_DONE → [EXTRACT_DONE] →
//! TOOL_SESSION_CLOSED`:
//!
//! - session acquisition failure is fatal; no search or extraction runs;
//! - exactly one MCP session is opened per run and it is closed before any
//!   stage error propagates to the caller;
//! - extraction only runs after a successful search.

use std::sync::Arc;

use crate::chat::SharedChatProvider;
use crate::config::Config;
use crate::error::Result;
use crate::extract::{Extraction, ExtractionAgent};
use crate::llms::OpenAI;
use crate::mcp::McpClient;
use crate::search::{SearchAgent, SearchResult};

/// Which stages a pipeline run executes.
///
/// Both variants of the original tool exist as explicit modes rather than a
/// merged default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    /// Run the search stage only and report its free-text answer.
    SearchOnly,
    /// Run search, then extract the top URLs from its answer.
    SearchAndExtract,
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// The search stage's free-text answer.
    pub search: SearchResult,
    /// The extraction outcome; `None` in [`PipelineMode::SearchOnly`].
    pub extraction: Option<Extraction>,
}

/// The pipeline driver.
///
/// Owns the runtime configuration and the inference provider; each
/// [`run`](Pipeline::run) call owns its MCP session exclusively for the
/// duration of that run.
pub struct Pipeline {
    config: Config,
    provider: SharedChatProvider,
}

impl Pipeline {
    /// Creates a pipeline, constructing the inference provider once.
    ///
    /// # Errors
    ///
    /// Fails when the inference client cannot be constructed (e.g., missing
    /// API key).
    pub fn new(config: Config) -> Result<Self> {
        let provider: SharedChatProvider = Arc::new(OpenAI::new(config.openai.clone())?);
        Ok(Self { config, provider })
    }

    /// Creates a pipeline with an externally supplied provider.
    ///
    /// This is the seam tests use to script the inference side.
    #[must_use]
    pub fn with_provider(config: Config, provider: SharedChatProvider) -> Self {
        Self { config, provider }
    }

    /// Runs the pipeline once for `query`.
    ///
    /// # Errors
    ///
    /// Propagates session acquisition, search, and extraction failures
    /// unmodified. The MCP session is closed before an error is returned.
    pub async fn run(&self, query: &str, mode: PipelineMode) -> Result<PipelineReport> {
        let session = McpClient::http(&self.config.mcp_server_url).await?;

        // Release the session before surfacing any stage failure.
        let outcome = self.run_stages(&session, query, mode).await;
        session.close().await;
        outcome
    }

    /// Executes the search and (optionally) extraction stages.
    async fn run_stages(
        &self,
        session: &McpClient,
        query: &str,
        mode: PipelineMode,
    ) -> Result<PipelineReport> {
        let search_agent = SearchAgent::from_config(self.provider.clone(), &self.config);
        let search = search_agent.run(query, session.agent_tools()).await?;

        let extraction = match mode {
            PipelineMode::SearchOnly => None,
            PipelineMode::SearchAndExtract => {
                let extractor =
                    ExtractionAgent::new(self.provider.clone(), self.config.openai.model.clone());
                Some(extractor.run(query, &search.content).await?)
            }
        };

        Ok(PipelineReport { search, extraction })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_equality() {
        assert_eq!(PipelineMode::SearchOnly, PipelineMode::SearchOnly);
        assert_ne!(PipelineMode::SearchOnly, PipelineMode::SearchAndExtract);
    }
}
