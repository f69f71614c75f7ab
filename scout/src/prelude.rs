//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use scout::prelude::*;
//! ```

pub use crate::agent::{Agent, OutputSchema, RunConfig, RunResult, Runner};
pub use crate::chat::{
    ChatProvider, ChatRequest, ChatResponse, ResponseFormat, SharedChatProvider, StopReason,
    ToolChoice,
};
pub use crate::config::{Config, DEFAULT_QUERY};
pub use crate::error::{Error, LlmError, Result, ToolError};
pub use crate::extract::{Extraction, ExtractionAgent, TopUrls, UrlFinding};
pub use crate::llms::{OpenAI, OpenAIConfig};
pub use crate::mcp::{McpClient, McpError, TransportConfig};
pub use crate::message::{FunctionCall, Message, Role, ToolCall};
pub use crate::pipeline::{Pipeline, PipelineMode, PipelineReport};
pub use crate::search::{SearchAgent, SearchResult};
pub use crate::tool::{BoxedTool, Tool, ToolDefinition};
pub use crate::usage::Usage;
