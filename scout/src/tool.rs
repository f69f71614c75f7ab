//! Tool trait and definition types for agent function calling.
//!
//! Tools are the way the search agent reaches the outside world. In this
//! pipeline every tool comes from a remote MCP server (see [`crate::mcp`]),
//! but the trait is provider-agnostic so tests can plug in local tools.
//!
//! # OpenAI API Alignment
//!
//! [`ToolDefinition`] serializes to the `{"type": "function", "function": {...}}`
//! format expected by the Chat Completions API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolError;

/// Definition of a tool for LLM function calling.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct ToolDefinition {
    /// Name of the tool (e.g., "web_search").
    pub name: String,

    /// Description of what the tool does.
    pub description: String,

    /// JSON schema for the tool's parameters.
    pub parameters: Value,

    /// Whether to use strict schema validation (OpenAI Structured Outputs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl ToolDefinition {
    /// Create a new tool definition.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            strict: None,
        }
    }

    /// Enable strict schema validation.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Returns the tool name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Custom serialization to OpenAI function calling format.
impl Serialize for ToolDefinition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut function = serde_json::Map::new();
        function.insert("name".to_owned(), Value::String(self.name.clone()));
        function.insert(
            "description".to_owned(),
            Value::String(self.description.clone()),
        );
        function.insert("parameters".to_owned(), self.parameters.clone());
        if let Some(strict) = self.strict {
            function.insert("strict".to_owned(), Value::Bool(strict));
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "function")?;
        map.serialize_entry("function", &function)?;
        map.end()
    }
}

/// A callable capability exposed to the agent's LLM.
///
/// Arguments arrive as the JSON value decoded from the model's tool call;
/// the output value is serialized back into a tool-result message.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique tool name, as advertised to the model.
    fn name(&self) -> String;

    /// The tool definition sent to the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with JSON arguments.
    async fn call_json(&self, args: Value) -> Result<Value, ToolError>;
}

/// Type alias for a boxed dynamic tool.
pub type BoxedTool = Box<dyn Tool>;
