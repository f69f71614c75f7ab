//! Model Context Protocol (MCP) integration module.
//!
//! Provides a high-level client for connecting to MCP servers over remote
//! (streamable HTTP) or local (stdio subprocess) transports, and an adapter
//! that exposes the server's tools to the agent runner.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use scout::mcp::McpClient;
//!
//! let session = McpClient::http("http://localhost:8080").await?;
//! println!("Tools: {:?}", session.tool_names());
//!
//! // ... run agents with session.agent_tools() ...
//!
//! session.close().await;
//! ```
//!
//! The session is acquired and released explicitly: the pipeline opens one
//! session per run and closes it before any stage error propagates, so the
//! release ordering stays visible and testable.

mod client;
mod error;
mod tool;
mod transport;

pub use client::{McpClient, McpClientConfig};
pub use error::McpError;
pub use tool::McpTool;
pub use transport::TransportConfig;
