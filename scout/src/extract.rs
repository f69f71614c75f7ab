//! Extraction stage: structured URL extraction from search output.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::agent::{Agent, RunConfig};
use crate::chat::SharedChatProvider;
use crate::error::{Error, Result};

/// Maximum number of URLs the extraction schema requests from the model.
///
/// This cap lives in the JSON schema sent with the request; it is a
/// constraint on the model, not something the driver enforces afterwards.
pub const MAX_URLS: usize = 2;

/// One extracted URL with its page title.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UrlFinding {
    /// The resource locator.
    pub url: String,
    /// Human-readable page title.
    pub title: String,
}

/// The most relevant URLs for a query, capped at [`MAX_URLS`] entries.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TopUrls {
    /// Extracted findings, most relevant first.
    #[schemars(length(max = 2))]
    pub urls: Vec<UrlFinding>,
}

/// Outcome of an extraction run.
///
/// A model response that does not match the [`TopUrls`] schema is not an
/// error: it is surfaced as [`Extraction::Unstructured`] so the caller can
/// report the raw value for inspection.
#[derive(Debug, Clone)]
pub enum Extraction {
    /// The model produced output matching the requested schema.
    Structured(TopUrls),
    /// The model produced something else; the raw value is kept verbatim.
    Unstructured(Value),
}

impl Extraction {
    /// Returns `true` for the structured variant.
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// Returns the structured value, if present.
    #[must_use]
    pub const fn as_structured(&self) -> Option<&TopUrls> {
        match self {
            Self::Structured(top) => Some(top),
            Self::Unstructured(_) => None,
        }
    }
}

/// Agent that converts free-text search output into a [`TopUrls`] value.
pub struct ExtractionAgent {
    provider: SharedChatProvider,
    model: String,
}

impl ExtractionAgent {
    /// Creates an extraction agent.
    #[must_use]
    pub fn new(provider: SharedChatProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Builds the system instructions for the extraction agent.
    fn instructions() -> String {
        format!(
            "Extract the {MAX_URLS} most relevant URLs for the user's question \
             from the search result text. Only use URLs that literally appear \
             in the text; never fabricate a URL or a title. Return fewer than \
             {MAX_URLS} entries if the text does not contain enough URLs."
        )
    }

    /// Extracts the top URLs from `search_content` for the original `query`.
    ///
    /// Makes exactly one structured-output call to the inference endpoint.
    ///
    /// # Errors
    ///
    /// Rejects empty input with [`Error::Agent`]; provider failures propagate
    /// unmodified. A schema mismatch in the model's reply is **not** an
    /// error; it yields [`Extraction::Unstructured`].
    pub async fn run(&self, query: &str, search_content: &str) -> Result<Extraction> {
        if search_content.trim().is_empty() {
            return Err(Error::agent("extraction input must not be empty"));
        }

        let agent = Agent::new("extract")
            .instructions(Self::instructions())
            .model(&self.model)
            .provider(self.provider.clone())
            .output_type::<TopUrls>();

        let input = format!("Question: {query}\n\nSearch result:\n{search_content}");
        let result = agent.run(input, RunConfig::default()).await?;

        match serde_json::from_value::<TopUrls>(result.output.clone()) {
            Ok(top) => {
                info!(urls = top.urls.len(), "Extraction produced structured output");
                Ok(Extraction::Structured(top))
            }
            Err(e) => {
                warn!(error = %e, "Extraction output did not match schema");
                Ok(Extraction::Unstructured(result.output))
            }
        }
    }
}

impl std::fmt::Debug for ExtractionAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionAgent")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
