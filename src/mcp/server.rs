//! MCP server implementation for Figma.
//!
//! This module implements the MCP server lifecycle:
//!
//! 1. **Initialisation**: Capability negotiation and version agreement
//! 2. **Operation**: Handling tool calls, resource reads and other requests
//! 3. **Shutdown**: Graceful connection termination
//!
//! Requests are handled one at a time, each to completion, including any
//! Figma API calls it makes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ResourceError, ToolError};
use crate::figma::FigmaApi;
use crate::mcp::handlers;
use crate::mcp::protocol::{
    ErrorCode, IncomingMessage, JsonRpcError, JsonRpcErrorData, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse, RequestId, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::resources::FilesCache;
use crate::mcp::tools::{tool_definitions, ToolCall};
use crate::mcp::transport::StdioTransport;

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize received, waiting for initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ListCapabilities>,
    /// Resource-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ListCapabilities>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: Some(ListCapabilities::default()),
            resources: Some(ListCapabilities::default()),
        }
    }
}

/// Capabilities of a static list (tools or resources).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListCapabilities {
    /// Whether the list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires a predicate fn(&T) -> bool
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Parameters for resources/read request.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceReadParams {
    /// URI of the resource.
    pub uri: String,
}

/// The MCP server for Figma.
pub struct McpServer {
    /// Current server state.
    state: ServerState,
    /// The transport layer.
    transport: StdioTransport,
    /// Negotiated protocol version (set after initialisation).
    protocol_version: Option<String>,
    /// Figma API used by the tools.
    api: Box<dyn FigmaApi>,
    /// Backing store of the cached files resource.
    files_cache: FilesCache,
}

impl McpServer {
    /// Creates a new MCP server.
    #[must_use]
    pub fn new(api: Box<dyn FigmaApi>, files_cache: FilesCache) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            transport: StdioTransport::new(),
            protocol_version: None,
            api,
            files_cache,
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Returns the negotiated protocol version, once initialised.
    #[must_use]
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// Runs the MCP server main loop with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        self.run_with_shutdown().await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: std::io::Result<Option<String>>,
    ) -> std::io::Result<bool> {
        let Some(line) = line_result? else {
            tracing::info!("stdin closed");
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        if line.trim().is_empty() {
            return Ok(false);
        }

        self.handle_line(&line).await?;

        Ok(self.state == ServerState::ShuttingDown)
    }

    /// Handles a single line of input.
    async fn handle_line(&mut self, line: &str) -> std::io::Result<()> {
        use crate::mcp::protocol::parse_message;

        match parse_message(line) {
            Ok(IncomingMessage::Request(req)) => {
                let outcome = self.handle_request(&req).await;
                self.transport.write_outcome(&outcome).await
            }
            Ok(IncomingMessage::Notification(notif)) => {
                self.handle_notification(&notif);
                Ok(())
            }
            Err(error) => {
                tracing::warn!(code = error.error.code, "Rejected malformed message");
                self.transport.write_error(&error).await
            }
        }
    }

    /// Handles an incoming request and returns the response to send.
    ///
    /// # Errors
    ///
    /// Returns the JSON-RPC error to send if the request fails.
    pub async fn handle_request(
        &mut self,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        tracing::debug!(id = %req.id, method = %req.method, "Request");

        match req.method.as_str() {
            "initialize" => self.handle_initialize(req),
            "ping" => Ok(Self::handle_ping(req)),
            "tools/list" => self.handle_tools_list(req),
            "tools/call" => self.handle_tools_call(req).await,
            "resources/list" => self.handle_resources_list(req),
            "resources/read" => self.handle_resources_read(req),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        }
    }

    /// Handles an incoming notification.
    pub fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            tracing::info!("Client initialised");
            self.state = ServerState::Running;
        }
    }

    /// Handles the initialize request.
    fn handle_initialize(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::new(
                Some(req.id.clone()),
                JsonRpcErrorData::with_message(
                    ErrorCode::InvalidRequest,
                    "Server already initialised",
                ),
            ));
        }

        let params: InitializeParams = req.parse_params("initialize")?;
        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                client_version = client.version.as_deref().unwrap_or("unknown"),
                requested_version = %params.protocol_version,
                "Client connected"
            );
        }

        let negotiated_version = MCP_PROTOCOL_VERSION.to_string();

        self.protocol_version = Some(negotiated_version.clone());
        self.state = ServerState::Initialising;

        let result = json!({
            "protocolVersion": negotiated_version,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/list request.
    fn handle_tools_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "tools": tool_definitions() }),
        ))
    }

    /// Handles the tools/call request.
    async fn handle_tools_call(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let params: ToolCallParams = req.parse_params("tool call")?;
        tracing::info!(tool = %params.name, "Tool call");

        let outcome = match ToolCall::parse(&params.name, &params.arguments) {
            Ok(call) => handlers::execute(self.api.as_ref(), call).await,
            Err(e) => Err(e),
        };

        let result = outcome.map_err(|e| tool_error_response(req.id.clone(), &e))?;

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            JsonRpcError::internal_error(
                req.id.clone(),
                "Internal error: failed to serialise result",
            )
        })?;

        Ok(JsonRpcResponse::success(req.id.clone(), result_value))
    }

    /// Handles the resources/list request.
    fn handle_resources_list(
        &self,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "resources": self.files_cache.definitions() }),
        ))
    }

    /// Handles the resources/read request.
    fn handle_resources_read(
        &self,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let params: ResourceReadParams = req.parse_params("resource read")?;

        let contents = self.files_cache.read(&params.uri).map_err(|e| {
            tracing::warn!(uri = %params.uri, error = %e, "Resource read failed");
            match e {
                ResourceError::NotFound { .. } => {
                    JsonRpcError::invalid_params(req.id.clone(), e.to_string())
                }
                ResourceError::ReadError { .. } => {
                    JsonRpcError::internal_error(req.id.clone(), e.to_string())
                }
            }
        })?;

        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "contents": contents }),
        ))
    }

    /// Handles the ping request.
    fn handle_ping(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({}))
    }

    /// Ensures the server is in the Running state.
    fn require_running(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        if self.state != ServerState::Running {
            return Err(JsonRpcError::new(
                Some(id.clone()),
                JsonRpcErrorData::with_message(ErrorCode::InvalidRequest, "Server not initialised"),
            ));
        }
        Ok(())
    }
}

/// Maps a failed tool call to the JSON-RPC error sent to the client.
fn tool_error_response(id: RequestId, error: &ToolError) -> JsonRpcError {
    tracing::warn!(error = %error, "Tool call failed");

    match error {
        ToolError::UnknownTool { name } => JsonRpcError::unknown_tool(id, name),
        ToolError::InvalidArguments { .. } => JsonRpcError::invalid_params(id, error.to_string()),
        ToolError::Figma(e) if e.is_invalid_input() => {
            JsonRpcError::invalid_params(id, error.to_string())
        }
        ToolError::Figma(_) | ToolError::Encode(_) => {
            JsonRpcError::internal_error(id, error.to_string())
        }
    }
}
