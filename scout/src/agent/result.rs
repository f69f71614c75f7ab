//! Agent run result types.

use serde_json::Value;

use crate::message::ToolCall;
use crate::usage::Usage;

/// Run-level configuration passed to [`Runner::run`](super::Runner::run).
#[derive(Debug, Clone, Copy, Default)]
pub struct RunConfig {
    /// Overrides the agent's maximum step count for this run.
    pub max_steps: Option<usize>,
}

/// What the runner should do after classifying an LLM response.
#[derive(Debug, Clone)]
pub enum NextStep {
    /// The LLM produced a final answer; the run is complete.
    FinalOutput {
        /// The final output value (JSON for structured runs, string otherwise).
        output: Value,
    },
    /// The LLM requested tool calls; execute them and continue.
    ToolCalls {
        /// The requested calls.
        calls: Vec<ToolCallRequest>,
    },
}

/// A tool call requested by the model, with decoded arguments.
#[derive(Debug, Clone)]
pub struct ToolCallRequest {
    /// Unique identifier for the tool call.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// Decoded JSON arguments.
    pub arguments: Value,
}

impl From<&ToolCall> for ToolCallRequest {
    fn from(call: &ToolCall) -> Self {
        // A model emitting malformed argument JSON still gets the raw string
        // forwarded, so the tool can report a usable error.
        let arguments = call
            .parsed_arguments()
            .unwrap_or_else(|_| Value::String(call.function.arguments.clone()));

        Self {
            id: call.id.clone(),
            name: call.function.name.clone(),
            arguments,
        }
    }
}

/// Record of one executed tool call.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Tool call identifier.
    pub id: String,
    /// Tool name.
    pub name: String,
    /// Arguments passed to the tool.
    pub arguments: Value,
    /// Serialized tool output (or error text).
    pub result: String,
    /// Whether the call succeeded.
    pub success: bool,
}

/// The final result of an agent run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The final output: parsed JSON for structured runs, a string otherwise.
    pub output: Value,
    /// Cumulative token usage across all steps.
    pub usage: Usage,
    /// Number of reasoning steps taken.
    pub steps: usize,
    /// Name of the agent that produced this result.
    pub agent_name: String,
}

impl RunResult {
    /// Deserialize the output into a concrete Rust type.
    ///
    /// Companion to [`Agent::output_type`](super::Agent::output_type).
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if the output does not match `T`.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.output.clone())
    }

    /// Returns the output as plain text.
    ///
    /// String outputs are returned as-is; structured outputs are serialized.
    #[must_use]
    pub fn output_text(&self) -> String {
        match &self.output {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tool_call_request_decodes_arguments() {
        let call = ToolCall::function("id-1", "web_search", r#"{"query":"groq"}"#);
        let request = ToolCallRequest::from(&call);

        assert_eq!(request.name, "web_search");
        assert_eq!(request.arguments["query"], "groq");
    }

    #[test]
    fn tool_call_request_keeps_malformed_arguments_as_string() {
        let call = ToolCall::function("id-1", "web_search", "not json");
        let request = ToolCallRequest::from(&call);

        assert_eq!(request.arguments, Value::String("not json".into()));
    }

    #[test]
    fn run_result_parse() {
        #[derive(serde::Deserialize)]
        struct Out {
            n: u32,
        }

        let result = RunResult {
            output: serde_json::json!({"n": 7}),
            usage: Usage::zero(),
            steps: 1,
            agent_name: "test".into(),
        };

        assert_eq!(result.parse::<Out>().unwrap().n, 7);
    }

    #[test]
    fn run_result_output_text() {
        let text = RunResult {
            output: Value::String("plain".into()),
            usage: Usage::zero(),
            steps: 1,
            agent_name: "test".into(),
        };
        assert_eq!(text.output_text(), "plain");

        let json = RunResult {
            output: serde_json::json!({"k": 1}),
            usage: Usage::zero(),
            steps: 1,
            agent_name: "test".into(),
        };
        assert_eq!(json.output_text(), r#"{"k":1}"#);
    }
}
