//! Chat types and the provider trait for LLM operations.
//!
//! This module provides:
//! - [`ChatRequest`]: Request parameters for chat completions
//! - [`ChatResponse`]: Response from chat completions
//! - [`ChatProvider`]: Core trait for LLM providers
//!
//! # Example
//!
//! ```rust,ignore
//! use scout::prelude::*;
//!
//! let request = ChatRequest::new("gpt-4o")
//!     .system("You are helpful.")
//!     .user("Hello!")
//!     .temperature(0.7);
//!
//! let response = provider.chat(&request).await?;
//! println!("{}", response.text().unwrap_or_default());
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::message::Message;
use crate::tool::ToolDefinition;
use crate::usage::Usage;

/// A chat completion request to an LLM.
///
/// Aligns with OpenAI's Chat Completions API parameters; fields not used by
/// this pipeline (streaming, penalties, logprobs, ...) are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier (e.g., "gpt-4o", "Qwen/Qwen3-8B").
    #[serde(default)]
    pub model: String,

    /// Conversation messages.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 to 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Tools available for the model to call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,

    /// Controls how the model uses tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,

    /// Response format specification (for JSON mode / structured outputs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    /// Creates a new request with the specified model.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Creates a request with messages.
    #[must_use]
    pub fn with_messages(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Self::default()
        }
    }

    /// Adds a system message.
    #[must_use]
    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    /// Adds a user message.
    #[must_use]
    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Adds an assistant message.
    #[must_use]
    pub fn assistant(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(content));
        self
    }

    /// Sets max tokens.
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets top_p.
    #[must_use]
    pub const fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Sets tools.
    #[must_use]
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Sets tool choice.
    #[must_use]
    pub fn tool_choice(mut self, choice: impl Into<ToolChoice>) -> Self {
        self.tool_choice = Some(choice.into().to_value());
        self
    }

    /// Sets response format.
    #[must_use]
    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Sets structured output by inferring the JSON Schema from a Rust type.
    ///
    /// The type must derive [`schemars::JsonSchema`]. The response can be
    /// deserialized with [`ChatResponse::parse`].
    #[must_use]
    pub fn output_type<T: schemars::JsonSchema>(self) -> Self {
        self.response_format(ResponseFormat::from_type::<T>())
    }
}

/// Controls how the model uses tools.
#[derive(Debug, Clone, Default)]
pub enum ToolChoice {
    /// Model decides whether to use tools.
    #[default]
    Auto,
    /// Model must use at least one tool.
    Required,
    /// Model cannot use any tools.
    None,
    /// Model must use the specified function.
    Function(String),
}

impl ToolChoice {
    /// Converts to JSON value for serialization.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Auto => Value::String("auto".to_owned()),
            Self::Required => Value::String("required".to_owned()),
            Self::None => Value::String("none".to_owned()),
            Self::Function(name) => serde_json::json!({
                "type": "function",
                "function": {"name": name}
            }),
        }
    }
}

impl From<&str> for ToolChoice {
    fn from(s: &str) -> Self {
        match s {
            "auto" => Self::Auto,
            "required" => Self::Required,
            "none" => Self::None,
            name => Self::Function(name.to_owned()),
        }
    }
}

/// Response format specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Plain text response.
    Text,
    /// JSON object response.
    JsonObject,
    /// JSON response with schema (structured outputs).
    JsonSchema {
        /// Schema definition.
        json_schema: JsonSchemaSpec,
    },
}

impl ResponseFormat {
    /// Creates a JSON schema format.
    #[must_use]
    pub fn json_schema(name: impl Into<String>, schema: Value) -> Self {
        Self::JsonSchema {
            json_schema: JsonSchemaSpec {
                name: name.into(),
                schema,
                strict: Some(true),
            },
        }
    }

    /// Creates a JSON schema format by auto-generating the schema from a Rust type.
    #[must_use]
    pub fn from_type<T: schemars::JsonSchema>() -> Self {
        let (name, schema_value) = generate_json_schema::<T>();
        Self::json_schema(name, schema_value)
    }
}

/// Generate a JSON Schema from a Rust type that implements [`schemars::JsonSchema`].
///
/// Returns `(name, schema)` where `name` is derived from the type name and
/// `schema` is the JSON Schema definition with the `$schema` meta field
/// removed (LLM APIs don't need it).
#[must_use]
pub fn generate_json_schema<T: schemars::JsonSchema>() -> (String, Value) {
    let root = schemars::schema_for!(T);
    let mut schema_value = serde_json::to_value(&root).unwrap_or_default();

    if let Value::Object(ref mut map) = schema_value {
        map.remove("$schema");
    }

    let name = <T as schemars::JsonSchema>::schema_name();
    (name.into_owned(), schema_value)
}

/// JSON schema specification for structured outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchemaSpec {
    /// Schema name.
    pub name: String,
    /// JSON Schema definition.
    pub schema: Value,
    /// Whether to enforce strict validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural stop (end of response).
    #[default]
    Stop,
    /// Maximum token limit reached.
    Length,
    /// Model decided to call tools.
    ToolCalls,
    /// Content was filtered by safety systems.
    ContentFilter,
}

impl StopReason {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
            Self::ToolCalls => "tool_calls",
            Self::ContentFilter => "content_filter",
        }
    }

    /// Returns `true` if the model completed normally.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Stop | Self::ToolCalls)
    }

    /// Returns `true` if the response was truncated due to length.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::Length)
    }
}

/// A chat completion response from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated message.
    pub message: Message,

    /// Why the model stopped generating.
    pub stop_reason: StopReason,

    /// Token usage statistics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    /// Model identifier used for this response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Unique completion ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ChatResponse {
    /// Creates a new response with a message.
    #[must_use]
    pub const fn new(message: Message) -> Self {
        Self {
            message,
            stop_reason: StopReason::Stop,
            usage: None,
            model: None,
            id: None,
        }
    }

    /// Creates a response from text content.
    #[must_use]
    pub fn from_text(content: impl Into<String>) -> Self {
        Self::new(Message::assistant(content))
    }

    /// Sets the stop reason.
    #[must_use]
    pub const fn with_stop_reason(mut self, reason: StopReason) -> Self {
        self.stop_reason = reason;
        self
    }

    /// Sets usage statistics.
    #[must_use]
    pub const fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Returns the text content of the response.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.message.text()
    }

    /// Deserialize the response text into a concrete Rust type.
    ///
    /// Companion to [`ChatRequest::output_type`]: when the LLM produces
    /// structured JSON output, this parses the text content into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if the response has no text content or
    /// the text cannot be deserialized into `T`.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        let text = self.text().unwrap_or_default();
        serde_json::from_str(&text)
    }

    /// Returns `true` if the response contains tool calls.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        self.message.has_tool_calls()
    }

    /// Returns the tool calls if present.
    #[must_use]
    pub fn tool_calls(&self) -> Option<&[crate::message::ToolCall]> {
        self.message.tool_calls.as_deref()
    }
}

impl Default for ChatResponse {
    fn default() -> Self {
        Self::new(Message::default())
    }
}

/// Trait for providers that support chat completions.
///
/// This is the narrow interface through which the agent runner talks to an
/// inference endpoint. A single [`chat`](ChatProvider::chat) call maps to one
/// network request; no retry is performed at this layer.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a chat completion request and receive a complete response.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Get the name of this provider, used for error messages and logging.
    fn provider_name(&self) -> &'static str;

    /// Get the default model for this provider.
    fn default_model(&self) -> &str;

    /// Check if this provider supports tool/function calling.
    fn supports_tools(&self) -> bool {
        true
    }

    /// Check if this provider supports JSON mode / structured outputs.
    fn supports_json_mode(&self) -> bool {
        false
    }
}

/// Type alias for an Arc-wrapped [`ChatProvider`].
pub type SharedChatProvider = Arc<dyn ChatProvider>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    mod chat_request {
        use super::*;

        #[test]
        fn new_creates_with_model() {
            let req = ChatRequest::new("gpt-4o");
            assert_eq!(req.model, "gpt-4o");
            assert!(req.messages.is_empty());
        }

        #[test]
        fn builder_chain() {
            let req = ChatRequest::new("gpt-4o")
                .system("Be helpful")
                .user("Hello")
                .max_tokens(100)
                .temperature(0.7)
                .top_p(0.9);

            assert_eq!(req.messages.len(), 2);
            assert_eq!(req.max_tokens, Some(100));
            assert_eq!(req.temperature, Some(0.7));
            assert_eq!(req.top_p, Some(0.9));
        }

        #[test]
        fn serde_skips_none_values() {
            let req = ChatRequest::new("gpt-4o").user("Hello");
            let json = serde_json::to_string(&req).unwrap();

            assert!(json.contains("model"));
            assert!(json.contains("messages"));
            assert!(!json.contains("max_tokens"));
            assert!(!json.contains("temperature"));
        }

        #[test]
        fn tool_choice_function_integration() {
            let req = ChatRequest::new("gpt-4o").tool_choice("web_search");

            let choice = req.tool_choice.unwrap();
            assert_eq!(choice["type"], "function");
            assert_eq!(choice["function"]["name"], "web_search");
        }

        #[test]
        fn output_type_sets_json_schema_format() {
            #[derive(schemars::JsonSchema)]
            #[allow(dead_code)]
            struct Out {
                value: u32,
            }

            let req = ChatRequest::new("gpt-4o").output_type::<Out>();
            match req.response_format.unwrap() {
                ResponseFormat::JsonSchema { json_schema } => {
                    assert_eq!(json_schema.name, "Out");
                    assert_eq!(json_schema.strict, Some(true));
                }
                other => panic!("expected JsonSchema, got {other:?}"),
            }
        }
    }

    mod tool_choice {
        use super::*;

        #[test]
        fn string_variants_to_value() {
            assert_eq!(ToolChoice::Auto.to_value(), Value::String("auto".into()));
            assert_eq!(
                ToolChoice::Required.to_value(),
                Value::String("required".into())
            );
            assert_eq!(ToolChoice::None.to_value(), Value::String("none".into()));
        }

        #[test]
        fn from_str_parses() {
            assert!(matches!(ToolChoice::from("auto"), ToolChoice::Auto));
            assert!(matches!(ToolChoice::from("required"), ToolChoice::Required));
            match ToolChoice::from("get_weather") {
                ToolChoice::Function(name) => assert_eq!(name, "get_weather"),
                other => panic!("expected Function, got {other:?}"),
            }
        }
    }

    mod response_format {
        use super::*;

        #[test]
        fn json_schema_creates_with_spec() {
            let schema = serde_json::json!({
                "type": "object",
                "properties": { "name": {"type": "string"} }
            });
            let fmt = ResponseFormat::json_schema("Person", schema.clone());

            match fmt {
                ResponseFormat::JsonSchema { json_schema } => {
                    assert_eq!(json_schema.name, "Person");
                    assert_eq!(json_schema.schema, schema);
                    assert_eq!(json_schema.strict, Some(true));
                }
                other => panic!("expected JsonSchema, got {other:?}"),
            }
        }

        #[test]
        fn serde_tags_snake_case() {
            let json = serde_json::to_string(&ResponseFormat::JsonObject).unwrap();
            assert!(json.contains(r#""type":"json_object""#));
        }

        #[test]
        fn generate_schema_strips_meta() {
            #[derive(schemars::JsonSchema)]
            #[allow(dead_code)]
            struct Sample {
                field: String,
            }

            let (name, schema) = generate_json_schema::<Sample>();
            assert_eq!(name, "Sample");
            assert!(schema.get("$schema").is_none());
            assert!(schema["properties"]["field"].is_object());
        }
    }

    mod chat_response {
        use super::*;

        #[test]
        fn from_text_creates_assistant_message() {
            let resp = ChatResponse::from_text("Hello world");
            assert_eq!(resp.message.role.as_str(), "assistant");
            assert_eq!(resp.text().unwrap(), "Hello world");
        }

        #[test]
        fn parse_deserializes_json_text() {
            #[derive(serde::Deserialize)]
            struct Out {
                answer: u32,
            }

            let resp = ChatResponse::from_text(r#"{"answer": 42}"#);
            let out: Out = resp.parse().unwrap();
            assert_eq!(out.answer, 42);
        }

        #[test]
        fn stop_reason_predicates() {
            let truncated = ChatResponse::from_text("x").with_stop_reason(StopReason::Length);
            assert!(truncated.stop_reason.is_truncated());
            assert!(!truncated.stop_reason.is_complete());

            assert!(StopReason::ToolCalls.is_complete());
        }

        #[test]
        fn tool_calls_surface_from_message() {
            let mut resp = ChatResponse::default();
            assert!(!resp.has_tool_calls());

            resp.message.tool_calls = Some(vec![crate::message::ToolCall::function(
                "id-1",
                "web_search",
                "{}",
            )]);
            assert!(resp.has_tool_calls());
            assert_eq!(resp.tool_calls().unwrap().len(), 1);
        }
    }
}
