//! Transport configuration for MCP connections.

/// How to reach an MCP server.
#[derive(Debug, Clone)]
pub enum TransportConfig {
    /// Remote server over streamable HTTP.
    Http {
        /// Server URL.
        url: String,
    },
    /// Local server process over stdio.
    Stdio {
        /// Command to spawn.
        command: String,
        /// Command arguments.
        args: Vec<String>,
        /// Optional working directory.
        cwd: Option<String>,
        /// Optional environment variables.
        env: Option<Vec<(String, String)>>,
    },
}

impl TransportConfig {
    /// Creates an HTTP transport configuration.
    #[must_use]
    pub fn http(url: impl Into<String>) -> Self {
        Self::Http { url: url.into() }
    }

    /// Creates a stdio transport configuration.
    #[must_use]
    pub fn stdio(command: impl Into<String>, args: &[&str]) -> Self {
        Self::Stdio {
            command: command.into(),
            args: args.iter().map(|s| (*s).to_owned()).collect(),
            cwd: None,
            env: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_constructor() {
        let config = TransportConfig::http("http://localhost:8080");
        assert!(matches!(config, TransportConfig::Http { url } if url == "http://localhost:8080"));
    }

    #[test]
    fn stdio_constructor_owns_args() {
        let config = TransportConfig::stdio("python", &["server.py"]);
        match config {
            TransportConfig::Stdio { command, args, .. } => {
                assert_eq!(command, "python");
                assert_eq!(args, vec!["server.py".to_owned()]);
            }
            TransportConfig::Http { .. } => unreachable!(),
        }
    }
}
