//! High-level MCP client for a single server session.

use rmcp::{
    ServiceExt,
    model::{ClientCapabilities, Implementation, InitializeRequestParams, Tool},
    service::ServerSink,
    transport::{StreamableHttpClientTransport, child_process::TokioChildProcess},
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::tool::BoxedTool;

use super::McpTool;
use super::error::McpError;
use super::transport::TransportConfig;

/// Configuration for MCP client identification.
#[derive(Debug, Clone)]
pub struct McpClientConfig {
    /// Client name sent to the server during the initialize handshake.
    pub name: String,
    /// Client version sent to the server during the initialize handshake.
    pub version: String,
}

impl Default for McpClientConfig {
    fn default() -> Self {
        Self {
            name: "scout".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// A scoped session with a single MCP server.
///
/// The session performs the initialize handshake on connect and caches the
/// server's tool list. It stays open until [`close`](McpClient::close) is
/// called; the pipeline owns exactly one session per run and closes it
/// explicitly, whether the run succeeds or fails.
///
/// # Examples
///
/// ```rust,ignore
/// // Remote server
/// let session = McpClient::http("http://localhost:8080").await?;
/// println!("Tools: {:?}", session.tool_names());
///
/// // Local process
/// let session = McpClient::stdio("python", &["server.py"]).await?;
/// ```
pub struct McpClient {
    sink: ServerSink,
    tools: Vec<Tool>,
    service: JoinHandle<()>,
}

impl McpClient {
    /// Connects to a remote MCP server over streamable HTTP.
    pub async fn http(url: impl Into<String>) -> Result<Self, McpError> {
        Self::connect(TransportConfig::http(url)).await
    }

    /// Spawns and connects to a local MCP server process.
    pub async fn stdio(command: impl Into<String>, args: &[&str]) -> Result<Self, McpError> {
        Self::connect(TransportConfig::stdio(command, args)).await
    }

    /// Connects using a transport configuration.
    pub async fn connect(config: TransportConfig) -> Result<Self, McpError> {
        Self::connect_with_config(config, McpClientConfig::default()).await
    }

    /// Connects with custom client identification.
    pub async fn connect_with_config(
        transport: TransportConfig,
        config: McpClientConfig,
    ) -> Result<Self, McpError> {
        let init_params = InitializeRequestParams {
            meta: None,
            protocol_version: Default::default(),
            capabilities: ClientCapabilities::default(),
            client_info: Implementation {
                name: config.name,
                version: config.version,
                ..Default::default()
            },
        };

        match transport {
            TransportConfig::Http { url } => Self::connect_http(&url, init_params).await,
            TransportConfig::Stdio {
                command,
                args,
                cwd,
                env,
            } => Self::connect_stdio(&command, &args, cwd, env, init_params).await,
        }
    }

    /// Returns the cached tools from the server.
    #[must_use]
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Returns the tool names.
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_ref()).collect()
    }

    /// Builds agent-facing tools, each bound to this session.
    ///
    /// The session itself stays owned by the caller so it can be closed after
    /// the agent run completes.
    #[must_use]
    pub fn agent_tools(&self) -> Vec<BoxedTool> {
        self.tools
            .iter()
            .map(|t| Box::new(McpTool::new(t.clone(), self.sink.clone())) as BoxedTool)
            .collect()
    }

    /// Closes the session, releasing the transport.
    ///
    /// Tools previously obtained via [`agent_tools`](Self::agent_tools) fail
    /// on any call made after the session is closed.
    pub async fn close(self) {
        self.service.abort();
        // Awaiting the aborted task yields a cancellation JoinError.
        let _ = self.service.await;
        debug!("MCP session closed");
    }
}

// Private connection helpers
impl McpClient {
    async fn connect_http(url: &str, init: InitializeRequestParams) -> Result<Self, McpError> {
        let transport = StreamableHttpClientTransport::from_uri(url);

        let service = init
            .serve(transport)
            .await
            .map_err(|e| McpError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let sink = service.peer().clone();
        let tools = service
            .peer()
            .list_tools(Default::default())
            .await
            .map_err(|e| McpError::ListToolsFailed(e.to_string()))?
            .tools;

        let handle = tokio::spawn(async move {
            let _ = service.waiting().await;
        });

        info!(url, tools = tools.len(), "MCP session open");

        Ok(Self {
            sink,
            tools,
            service: handle,
        })
    }

    async fn connect_stdio(
        command: &str,
        args: &[String],
        cwd: Option<String>,
        env: Option<Vec<(String, String)>>,
        init: InitializeRequestParams,
    ) -> Result<Self, McpError> {
        let mut cmd = tokio::process::Command::new(command);
        cmd.args(args);

        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        if let Some(env_vars) = env {
            for (key, value) in env_vars {
                cmd.env(key, value);
            }
        }

        let transport = TokioChildProcess::new(cmd).map_err(|e| McpError::ProcessSpawnFailed {
            command: command.to_string(),
            message: e.to_string(),
        })?;

        let service = init
            .serve(transport)
            .await
            .map_err(|e| McpError::ProcessSpawnFailed {
                command: command.to_string(),
                message: e.to_string(),
            })?;

        let sink = service.peer().clone();
        let tools = service
            .peer()
            .list_tools(Default::default())
            .await
            .map_err(|e| McpError::ListToolsFailed(e.to_string()))?
            .tools;

        let handle = tokio::spawn(async move {
            let _ = service.waiting().await;
        });

        info!(command, tools = tools.len(), "MCP session open");

        Ok(Self {
            sink,
            tools,
            service: handle,
        })
    }
}

impl std::fmt::Debug for McpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpClient")
            .field("tools", &self.tool_names())
            .finish_non_exhaustive()
    }
}
