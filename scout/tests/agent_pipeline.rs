//! Integration tests for the agent runner and pipeline stages.
//!
//! The inference side is scripted with a mock provider and the tool side with
//! an in-process recording tool, so no network is involved.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use scout::prelude::*;
use serde_json::Value;

/// A provider that replays a scripted sequence of responses.
struct ScriptedProvider {
    script: Mutex<Vec<Result<ChatResponse>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(script: Vec<Result<ChatResponse>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        assert!(!script.is_empty(), "provider called more times than scripted");
        script.remove(0)
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }
}

/// A search tool that records invocations and returns a fixed result.
struct RecordingSearchTool {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Tool for RecordingSearchTool {
    fn name(&self) -> String {
        "web_search".to_owned()
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "web_search",
            "Search the web for a query.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string" }
                },
                "required": ["query"]
            }),
        )
    }

    async fn call_json(&self, args: Value) -> std::result::Result<Value, ToolError> {
        assert_eq!(args["query"], "groq pricing");
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Value::String(
            "Groq pricing is documented at https://groq.com/pricing (Source: groq.com)".to_owned(),
        ))
    }
}

fn tool_call_response() -> ChatResponse {
    let mut response = ChatResponse::default().with_stop_reason(StopReason::ToolCalls);
    response.message.tool_calls = Some(vec![ToolCall::function(
        "call_1",
        "web_search",
        r#"{"query":"groq pricing"}"#,
    )]);
    response
}

#[tokio::test]
async fn runner_executes_tool_round_trip() {
    let tool_calls = Arc::new(AtomicUsize::new(0));
    let provider = ScriptedProvider::new(vec![
        Ok(tool_call_response()),
        Ok(ChatResponse::from_text(
            "See https://groq.com/pricing for pricing details.",
        )),
    ]);

    let agent = Agent::new("search")
        .instructions("Use the available tools.")
        .model("mock-model")
        .provider(provider.clone())
        .tool(Box::new(RecordingSearchTool {
            calls: tool_calls.clone(),
        }));

    let result = agent
        .run("Find Groq pricing pages.", RunConfig::default())
        .await
        .unwrap();

    assert_eq!(tool_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.call_count(), 2);
    assert_eq!(result.steps, 2);
    assert!(result.output_text().contains("https://groq.com/pricing"));
}

#[tokio::test]
async fn runner_stops_at_max_steps() {
    let provider = ScriptedProvider::new(vec![
        Ok(tool_call_response()),
        Ok(tool_call_response()),
        Ok(tool_call_response()),
    ]);

    let agent = Agent::new("search")
        .model("mock-model")
        .provider(provider.clone())
        .tool(Box::new(RecordingSearchTool {
            calls: Arc::new(AtomicUsize::new(0)),
        }))
        .max_steps(2);

    let err = agent
        .run("Find Groq pricing pages.", RunConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MaxSteps { max_steps: 2 }));
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn structured_output_parses_into_top_urls() {
    let provider = ScriptedProvider::new(vec![Ok(ChatResponse::from_text(
        r#"{"urls": [{"url": "https://groq.com/pricing", "title": "Groq Pricing"}]}"#,
    ))]);

    let agent = Agent::new("extract")
        .model("mock-model")
        .provider(provider)
        .output_type::<TopUrls>();

    let result = agent.run("input", RunConfig::default()).await.unwrap();
    let top: TopUrls = result.parse().unwrap();

    assert_eq!(top.urls.len(), 1);
    assert_eq!(top.urls[0].title, "Groq Pricing");
}

#[tokio::test]
async fn extraction_returns_structured_variant() {
    let provider = ScriptedProvider::new(vec![Ok(ChatResponse::from_text(
        r#"{"urls": [
            {"url": "https://groq.com/pricing", "title": "Groq Pricing"},
            {"url": "https://console.groq.com/docs/rate-limits", "title": "Rate Limits"}
        ]}"#,
    ))]);

    let extractor = ExtractionAgent::new(provider, "mock-model");
    let extraction = extractor
        .run("groq pricing", "see https://groq.com/pricing")
        .await
        .unwrap();

    let top = extraction.as_structured().unwrap();
    assert_eq!(top.urls.len(), 2);
}

#[tokio::test]
async fn extraction_soft_fails_to_unstructured() {
    // A plain-text reply must be surfaced for inspection, not raised.
    let provider = ScriptedProvider::new(vec![Ok(ChatResponse::from_text(
        "I could not find any URLs in the text.",
    ))]);

    let extractor = ExtractionAgent::new(provider, "mock-model");
    let extraction = extractor
        .run("groq pricing", "no links here")
        .await
        .unwrap();

    match extraction {
        Extraction::Unstructured(raw) => {
            assert_eq!(raw, Value::String("I could not find any URLs in the text.".into()));
        }
        Extraction::Structured(_) => panic!("expected unstructured extraction"),
    }
}

#[tokio::test]
async fn empty_query_is_rejected_before_any_provider_call() {
    let provider = ScriptedProvider::new(vec![]);
    let search = SearchAgent::new(provider.clone(), "mock-model");

    let err = search.run("   ", Vec::new()).await.unwrap_err();

    assert!(matches!(err, Error::Agent(_)));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn provider_failure_propagates_unmodified() {
    let provider = ScriptedProvider::new(vec![Err(Error::Llm(LlmError::network(
        "connection refused",
    )))]);

    let search = SearchAgent::new(provider, "mock-model");
    let err = search.run("groq pricing", Vec::new()).await.unwrap_err();

    match err {
        Error::Llm(llm) => assert!(llm.message.contains("connection refused")),
        other => panic!("expected LLM error, got {other:?}"),
    }
}

#[test]
fn top_urls_schema_requests_at_most_two_entries() {
    // The cap is a schema-level request to the model, not driver-side
    // truncation: it must be present in the generated schema.
    let schema = OutputSchema::from_type::<TopUrls>();
    assert_eq!(schema.schema()["properties"]["urls"]["maxItems"], 2);
}
