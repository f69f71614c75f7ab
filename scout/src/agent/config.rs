//! Agent configuration types.
//!
//! The [`Agent`] struct defines an agent's identity, behavior, capabilities,
//! and its own LLM provider. It contains no execution logic: it describes
//! *what* the agent is; the [`Runner`](super::Runner) handles *how* it runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use scout::agent::{Agent, RunConfig};
//!
//! let agent = Agent::new("search")
//!     .instructions("Use the available tools to answer questions.")
//!     .model("Qwen/Qwen3-8B")
//!     .provider(provider.clone())
//!     .tools(session.agent_tools());
//!
//! let result = agent.run("Find Groq pricing pages.", RunConfig::default()).await?;
//! ```

use std::fmt;

use serde_json::Value;

use crate::chat::{JsonSchemaSpec, ResponseFormat, SharedChatProvider, generate_json_schema};
use crate::error::Result;
use crate::tool::BoxedTool;

use super::result::{RunConfig, RunResult};

/// Schema specification for structured agent output.
///
/// When set on an [`Agent`], the [`Runner`](super::Runner) will:
///
/// 1. Set `response_format` to a JSON schema on every LLM request,
///    constraining the model to produce valid JSON.
/// 2. Parse the LLM's text output as JSON for [`RunResult::output`].
///
/// The caller can then deserialize the output into a concrete Rust type with
/// [`RunResult::parse`].
#[derive(Debug, Clone)]
pub struct OutputSchema {
    /// Schema name (used in the `response_format` API parameter).
    name: String,
    /// JSON Schema definition.
    schema: Value,
    /// Whether to enforce strict JSON schema validation.
    strict: bool,
}

impl OutputSchema {
    /// Creates a new output schema with strict mode enabled (recommended).
    #[must_use]
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
            strict: true,
        }
    }

    /// Creates an output schema by auto-generating JSON Schema from a Rust type.
    ///
    /// The type must derive [`schemars::JsonSchema`]; the schema name is
    /// derived from the type name automatically.
    #[must_use]
    pub fn from_type<T: schemars::JsonSchema>() -> Self {
        let (name, schema) = generate_json_schema::<T>();
        Self {
            name,
            schema,
            strict: true,
        }
    }

    /// Returns the schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the JSON Schema definition.
    #[must_use]
    pub const fn schema(&self) -> &Value {
        &self.schema
    }

    /// Returns whether strict mode is enabled.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Converts this into a [`ResponseFormat`] for use in a chat request.
    #[must_use]
    pub fn to_response_format(&self) -> ResponseFormat {
        ResponseFormat::JsonSchema {
            json_schema: JsonSchemaSpec {
                name: self.name.clone(),
                schema: self.schema.clone(),
                strict: Some(self.strict),
            },
        }
    }
}

/// A pure configuration struct defining an AI agent.
pub struct Agent {
    /// Unique name identifying this agent.
    pub(crate) name: String,

    /// System-level instructions (prompt) for the agent.
    pub(crate) instructions: String,

    /// LLM model identifier to use for this agent.
    pub(crate) model: String,

    /// The LLM provider this agent uses for chat completions.
    pub(crate) provider: Option<SharedChatProvider>,

    /// Tools available to this agent for function calling.
    pub(crate) tools: Vec<BoxedTool>,

    /// Maximum number of reasoning steps before the runner aborts.
    pub(crate) max_steps: usize,

    /// Optional schema for structured JSON output.
    pub(crate) output_schema: Option<OutputSchema>,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("provider", &self.provider.is_some())
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .field("max_steps", &self.max_steps)
            .field(
                "output_schema",
                &self.output_schema.as_ref().map(OutputSchema::name),
            )
            .finish()
    }
}

impl Agent {
    /// Default maximum number of reasoning steps.
    pub const DEFAULT_MAX_STEPS: usize = 10;

    /// Create a new agent with the given name and sensible defaults.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: String::new(),
            model: String::new(),
            provider: None,
            tools: Vec::new(),
            max_steps: Self::DEFAULT_MAX_STEPS,
            output_schema: None,
        }
    }

    /// Set the system instructions.
    #[must_use]
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Set the LLM model identifier.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the LLM provider for this agent.
    #[must_use]
    pub fn provider(mut self, provider: SharedChatProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Add a tool to this agent.
    #[must_use]
    pub fn tool(mut self, tool: BoxedTool) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set all tools for this agent.
    #[must_use]
    pub fn tools(mut self, tools: Vec<BoxedTool>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the maximum number of reasoning steps.
    #[must_use]
    pub const fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the output schema for structured JSON output.
    #[must_use]
    pub fn output_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Set structured output by inferring the JSON Schema from a Rust type.
    ///
    /// The type must derive [`schemars::JsonSchema`] and
    /// [`serde::Deserialize`]; the generated output can be deserialized with
    /// [`RunResult::parse`].
    #[must_use]
    pub fn output_type<T: schemars::JsonSchema>(self) -> Self {
        self.output_schema(OutputSchema::from_type::<T>())
    }

    /// Returns the agent's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of tools registered on this agent.
    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Run this agent to completion with the given input.
    ///
    /// Convenience wrapper around [`Runner::run`](super::Runner::run).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Agent`](crate::Error::Agent) if no provider is
    /// configured, [`Error::MaxSteps`](crate::Error::MaxSteps) if the step
    /// limit is exceeded, or propagates LLM errors unmodified.
    pub async fn run(&self, input: impl Into<String> + Send, config: RunConfig) -> Result<RunResult> {
        super::Runner::run(self, input, config).await
    }
}
