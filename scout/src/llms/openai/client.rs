//! OpenAI API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::chat::ChatRequest;
use crate::error::{LlmError, Result};
use crate::message::Message;
use crate::tool::ToolDefinition;

use super::config::OpenAIConfig;
use super::types::{
    OpenAIChatRequest, OpenAIFunction, OpenAIFunctionCall, OpenAIMessage, OpenAIResponseFormat,
    OpenAITool, OpenAIToolCall,
};

/// OpenAI error response.
#[derive(Debug, Clone, Deserialize)]
struct OpenAIErrorResponse {
    pub error: OpenAIError,
}

/// OpenAI error details.
#[derive(Debug, Clone, Deserialize)]
struct OpenAIError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub code: Option<String>,
}

/// OpenAI API client.
#[derive(Debug, Clone)]
pub struct OpenAI {
    pub(crate) config: Arc<OpenAIConfig>,
    pub(crate) client: Client,
}

impl OpenAI {
    /// Create a new OpenAI client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an auth error when no API key is configured, or an internal
    /// error if the HTTP client cannot be constructed.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::auth("openai", "API key is required").into());
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| LlmError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the default model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the chat completions URL.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Build request headers for JSON requests.
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
    }

    /// Convert a [`Message`] to OpenAI wire format.
    pub(crate) fn convert_message(msg: &Message) -> OpenAIMessage {
        let tool_calls = msg.tool_calls.as_ref().map(|calls| {
            calls
                .iter()
                .map(|tc| OpenAIToolCall {
                    id: tc.id.clone(),
                    call_type: "function".to_owned(),
                    function: OpenAIFunctionCall {
                        name: tc.function.name.clone(),
                        arguments: tc.function.arguments.clone(),
                    },
                })
                .collect()
        });

        OpenAIMessage {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
            tool_calls,
            tool_call_id: msg.tool_call_id.clone(),
            name: msg.name.clone(),
        }
    }

    /// Convert a [`ToolDefinition`] to OpenAI wire format.
    pub(crate) fn convert_tool(tool: &ToolDefinition) -> OpenAITool {
        OpenAITool {
            tool_type: "function".to_owned(),
            function: OpenAIFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
                strict: tool.strict,
            },
        }
    }

    /// Build the request body.
    pub(crate) fn build_body(&self, request: &ChatRequest) -> OpenAIChatRequest {
        let messages: Vec<OpenAIMessage> =
            request.messages.iter().map(Self::convert_message).collect();

        let tools = request
            .tools
            .as_ref()
            .map(|t| t.iter().map(Self::convert_tool).collect());

        let model = if request.model.is_empty() {
            self.config.model.clone()
        } else {
            request.model.clone()
        };

        OpenAIChatRequest {
            model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            tools,
            tool_choice: request.tool_choice.clone(),
            response_format: request
                .response_format
                .as_ref()
                .map(OpenAIResponseFormat::from_response_format),
        }
    }

    /// Parse an error response from the API.
    pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
        if let Ok(error_response) = serde_json::from_str::<OpenAIErrorResponse>(body) {
            let error = error_response.error;
            let code = error.code.unwrap_or_else(|| error.error_type.clone());

            return match status {
                401 => LlmError::auth("openai", error.message),
                429 => LlmError::rate_limited("openai"),
                400 if error.message.contains("context_length") => LlmError::context_exceeded(0, 0),
                _ => LlmError::provider_code("openai", code, error.message),
            };
        }

        LlmError::http_status(status, body.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::LlmErrorKind;

    #[test]
    fn test_message_conversion() {
        let msg = Message::user("Hello!");
        let converted = OpenAI::convert_message(&msg);

        assert_eq!(converted.role, "user");
        assert_eq!(converted.content.as_deref(), Some("Hello!"));
    }

    #[test]
    fn test_tool_result_conversion() {
        let msg = Message::tool("call_1", "42");
        let converted = OpenAI::convert_message(&msg);

        assert_eq!(converted.role, "tool");
        assert_eq!(converted.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn test_tool_conversion() {
        let tool = ToolDefinition::new(
            "web_search",
            "Search the web",
            serde_json::json!({ "type": "object", "properties": {} }),
        );

        let converted = OpenAI::convert_tool(&tool);
        assert_eq!(converted.function.name, "web_search");
        assert_eq!(converted.tool_type, "function");
    }

    #[test]
    fn test_body_falls_back_to_default_model() {
        let client = OpenAI::new(OpenAIConfig::new("key").with_model("Qwen/Qwen3-8B")).unwrap();
        let body = client.build_body(&ChatRequest::default().user("hi"));
        assert_eq!(body.model, "Qwen/Qwen3-8B");
    }

    #[test]
    fn test_parse_error_auth() {
        let body = r#"{"error": {"message": "bad key", "type": "invalid_request_error", "code": "invalid_api_key"}}"#;
        let err = OpenAI::parse_error(401, body);
        assert_eq!(err.kind, LlmErrorKind::Auth);
    }

    #[test]
    fn test_parse_error_unstructured_body() {
        let err = OpenAI::parse_error(502, "Bad Gateway");
        assert_eq!(err.kind, LlmErrorKind::HttpStatus);
        assert_eq!(err.code.as_deref(), Some("502"));
    }

    #[test]
    fn test_new_requires_api_key() {
        let result = OpenAI::new(OpenAIConfig::default());
        assert!(result.is_err());
    }
}
