//! Adapter exposing MCP server tools to the agent runner.

use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, RawContent};
use rmcp::service::ServerSink;
use serde_json::Value;

use crate::error::ToolError;
use crate::tool::{Tool, ToolDefinition};

/// A single tool served by a remote MCP server.
///
/// Holds a clone of the server sink, so the tool stays bound to the session
/// that produced it: once the session is closed, calls fail and the error
/// propagates to the agent run.
pub struct McpTool {
    tool: rmcp::model::Tool,
    sink: ServerSink,
}

impl McpTool {
    /// Creates a tool adapter from server metadata and a session sink.
    #[must_use]
    pub fn new(tool: rmcp::model::Tool, sink: ServerSink) -> Self {
        Self { tool, sink }
    }
}

impl std::fmt::Debug for McpTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpTool")
            .field("name", &self.tool.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for McpTool {
    fn name(&self) -> String {
        self.tool.name.to_string()
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            self.tool.name.to_string(),
            self.tool
                .description
                .as_deref()
                .unwrap_or_default()
                .to_owned(),
            Value::Object((*self.tool.input_schema).clone()),
        )
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let result = self
            .sink
            .call_tool(CallToolRequestParam {
                meta: None,
                name: self.tool.name.clone(),
                arguments: args.as_object().cloned(),
                task: None,
            })
            .await
            .map_err(|e| ToolError::execution(e.to_string()))?;

        let text = result
            .content
            .into_iter()
            .map(|content| match content.raw {
                RawContent::Text(t) => t.text,
                other => serde_json::to_string(&other).unwrap_or_default(),
            })
            .collect::<Vec<_>>()
            .join("\n");

        if result.is_error.unwrap_or(false) {
            return Err(ToolError::execution(text));
        }

        Ok(Value::String(text))
    }
}
