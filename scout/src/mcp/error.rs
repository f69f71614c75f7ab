//! MCP session error types.

/// Error type for MCP session operations.
///
/// Every variant is fatal to the pipeline run: there is no retry and no
/// partial-result recovery at this layer.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum McpError {
    /// Connecting to a remote MCP server failed.
    #[error("failed to connect to MCP server at {url}: {message}")]
    ConnectionFailed {
        /// The server URL.
        url: String,
        /// The underlying error message.
        message: String,
    },

    /// Spawning a local MCP server process failed.
    #[error("failed to spawn MCP server process '{command}': {message}")]
    ProcessSpawnFailed {
        /// The command that failed to spawn.
        command: String,
        /// The underlying error message.
        message: String,
    },

    /// Listing tools from the server failed.
    #[error("failed to list MCP tools: {0}")]
    ListToolsFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = McpError::ConnectionFailed {
            url: "http://localhost:8080".into(),
            message: "connection refused".into(),
        };
        let s = err.to_string();
        assert!(s.contains("http://localhost:8080"));
        assert!(s.contains("connection refused"));
    }
}
