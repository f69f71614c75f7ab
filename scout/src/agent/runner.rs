//! Runner, the agent execution engine.
//!
//! The [`Runner`] drives an [`Agent`] through its reasoning loop:
//!
//! 1. Build messages from instructions + user input
//! 2. Call the LLM with available tools
//! 3. Parse the response into a [`NextStep`]
//! 4. Execute tool calls and append their results
//! 5. Loop back to step 2
//!
//! The loop terminates when the LLM produces a final output, an error occurs,
//! or the maximum step count is exceeded. Tool calls execute one at a time:
//! the whole pipeline is a single logical task, suspending at each network
//! call and resuming when the response arrives.
//!
//! Failures from the provider propagate to the caller unmodified; there is no
//! retry and no partial-result recovery. Tool failures are reported back to
//! the model as tool-result text so it can recover or answer without them.

use serde_json::Value;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::chat::{ChatRequest, ChatResponse, ToolChoice};
use crate::error::{Error, Result};
use crate::message::Message;
use crate::tool::{BoxedTool, ToolDefinition};
use crate::usage::Usage;

use super::config::Agent;
use super::result::{NextStep, RunConfig, RunResult, ToolCallRecord, ToolCallRequest};

/// Stateless execution engine that drives an [`Agent`] through its reasoning loop.
///
/// `Runner` owns no state; everything per-run lives on the stack of
/// [`Runner::run`]. It is safe to run different agents concurrently.
#[derive(Debug, Clone, Copy)]
pub struct Runner;

impl Runner {
    /// Execute an agent run to completion.
    ///
    /// # Arguments
    ///
    /// * `agent` - the agent to run (must have a provider configured)
    /// * `input` - the user's input text
    /// * `config` - run-level configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Agent`] if no provider is configured,
    /// [`Error::MaxSteps`] if the step limit is exceeded, or propagates
    /// LLM errors encountered during execution.
    pub async fn run(
        agent: &Agent,
        input: impl Into<String> + Send,
        config: RunConfig,
    ) -> Result<RunResult> {
        let input = input.into();
        let span = info_span!(
            "agent",
            agent.name = %agent.name,
            agent.model = %agent.model,
        );
        Self::run_inner(agent, input, config).instrument(span).await
    }

    /// Internal implementation of the agent run loop.
    async fn run_inner(agent: &Agent, input: String, config: RunConfig) -> Result<RunResult> {
        let provider = agent.provider.as_deref().ok_or_else(|| {
            Error::agent(format!(
                "Agent '{}' has no provider configured. Call .provider() before running.",
                agent.name
            ))
        })?;

        let max_steps = config.max_steps.unwrap_or(agent.max_steps);
        let structured_output = agent.output_schema.is_some();

        let mut messages = Vec::new();
        if !agent.instructions.is_empty() {
            messages.push(Message::system(&agent.instructions));
        }
        messages.push(Message::user(input));

        let definitions: Vec<ToolDefinition> =
            agent.tools.iter().map(|t| t.definition()).collect();
        let mut cumulative_usage = Usage::zero();

        for step in 1..=max_steps {
            debug!(agent = %agent.name, step, "Starting step");

            let request = Self::build_request(agent, &messages, &definitions);

            let response = provider.chat(&request).await.map_err(|e| {
                error!(error = %e, agent = %agent.name, step, "LLM call failed");
                e
            })?;

            if let Some(usage) = response.usage {
                cumulative_usage += usage;
            }

            match Self::classify_response(&response, structured_output) {
                NextStep::FinalOutput { output } => {
                    info!(
                        agent = %agent.name,
                        steps = step,
                        input_tokens = cumulative_usage.input_tokens,
                        output_tokens = cumulative_usage.output_tokens,
                        "Agent run completed",
                    );

                    return Ok(RunResult {
                        output,
                        usage: cumulative_usage,
                        steps: step,
                        agent_name: agent.name.clone(),
                    });
                }
                NextStep::ToolCalls { calls } => {
                    messages.push(response.message.clone());
                    Self::execute_tool_calls(&calls, &agent.tools, &mut messages).await;
                }
            }
        }

        let err = Error::max_steps(max_steps);
        error!(error = %err, agent = %agent.name, max_steps, "Max steps exceeded");
        Err(err)
    }

    /// Build a [`ChatRequest`] for the current step.
    fn build_request(
        agent: &Agent,
        messages: &[Message],
        definitions: &[ToolDefinition],
    ) -> ChatRequest {
        let mut request = ChatRequest::with_messages(&agent.model, messages.to_vec());
        if !definitions.is_empty() {
            request = request
                .tools(definitions.to_vec())
                .tool_choice(ToolChoice::Auto);
        }
        if let Some(ref schema) = agent.output_schema {
            request = request.response_format(schema.to_response_format());
        }
        request
    }

    /// Classify an LLM response into a [`NextStep`].
    ///
    /// When `structured_output` is `true`, the text content is parsed as JSON
    /// so that [`RunResult::output`] contains a structured [`Value`] rather
    /// than a plain string. Text that fails to parse is kept verbatim as a
    /// string value; the caller decides how to surface it.
    fn classify_response(response: &ChatResponse, structured_output: bool) -> NextStep {
        if let Some(tool_calls) = response.tool_calls() {
            let calls: Vec<ToolCallRequest> =
                tool_calls.iter().map(ToolCallRequest::from).collect();
            if !calls.is_empty() {
                return NextStep::ToolCalls { calls };
            }
        }
        let output = if structured_output {
            response.text().map_or(Value::Null, |text| {
                serde_json::from_str(&text).unwrap_or(Value::String(text))
            })
        } else {
            response.text().map_or(Value::Null, Value::String)
        };
        NextStep::FinalOutput { output }
    }

    /// Execute tool calls one at a time and append results to messages.
    async fn execute_tool_calls(
        calls: &[ToolCallRequest],
        tools: &[BoxedTool],
        messages: &mut Vec<Message>,
    ) -> Vec<ToolCallRecord> {
        let mut records = Vec::with_capacity(calls.len());

        for call in calls {
            let record = Self::execute_single_tool(call, tools).await;
            messages.push(Message::tool(&record.id, &record.result));
            records.push(record);
        }

        records
    }

    /// Execute a single tool call.
    async fn execute_single_tool(call: &ToolCallRequest, tools: &[BoxedTool]) -> ToolCallRecord {
        let tool_span = info_span!(
            "tool",
            tool.name = %call.name,
            tool.id = %call.id,
        );

        async {
            let (result, success) = match tools.iter().find(|t| t.name() == call.name) {
                Some(tool) => match tool.call_json(call.arguments.clone()).await {
                    Ok(value) => {
                        let output =
                            serde_json::to_string(&value).unwrap_or_else(|_| value.to_string());
                        (output, true)
                    }
                    Err(e) => {
                        warn!(tool = %call.name, error = %e, "Tool execution failed");
                        (format!("Tool error: {e}"), false)
                    }
                },
                None => {
                    warn!(tool = %call.name, "Tool not found");
                    (format!("Tool '{}' not found", call.name), false)
                }
            };

            ToolCallRecord {
                id: call.id.clone(),
                name: call.name.clone(),
                arguments: call.arguments.clone(),
                result,
                success,
            }
        }
        .instrument(tool_span)
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::message::ToolCall;

    fn response_with_tool_call() -> ChatResponse {
        let mut response = ChatResponse::default();
        response.message.tool_calls = Some(vec![ToolCall::function(
            "call_1",
            "web_search",
            r#"{"query":"groq pricing"}"#,
        )]);
        response
    }

    #[test]
    fn classify_prefers_tool_calls() {
        let next = Runner::classify_response(&response_with_tool_call(), false);
        match next {
            NextStep::ToolCalls { calls } => {
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].name, "web_search");
            }
            NextStep::FinalOutput { .. } => panic!("expected tool calls"),
        }
    }

    #[test]
    fn classify_plain_text_output() {
        let response = ChatResponse::from_text("the answer");
        match Runner::classify_response(&response, false) {
            NextStep::FinalOutput { output } => {
                assert_eq!(output, Value::String("the answer".into()));
            }
            NextStep::ToolCalls { .. } => panic!("expected final output"),
        }
    }

    #[test]
    fn classify_structured_output_parses_json() {
        let response = ChatResponse::from_text(r#"{"urls": []}"#);
        match Runner::classify_response(&response, true) {
            NextStep::FinalOutput { output } => {
                assert!(output.is_object());
            }
            NextStep::ToolCalls { .. } => panic!("expected final output"),
        }
    }

    #[test]
    fn classify_structured_output_keeps_unparseable_text() {
        let response = ChatResponse::from_text("not json at all");
        match Runner::classify_response(&response, true) {
            NextStep::FinalOutput { output } => {
                assert_eq!(output, Value::String("not json at all".into()));
            }
            NextStep::ToolCalls { .. } => panic!("expected final output"),
        }
    }

    #[tokio::test]
    async fn unknown_tool_reports_not_found() {
        let call = ToolCallRequest {
            id: "call_1".into(),
            name: "missing".into(),
            arguments: Value::Null,
        };

        let record = Runner::execute_single_tool(&call, &[]).await;
        assert!(!record.success);
        assert!(record.result.contains("not found"));
    }
}
