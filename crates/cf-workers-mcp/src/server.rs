//! MCP Server implementation
//!
//! Reads newline-delimited JSON-RPC messages, answers each on its own line.
//! All tool work is delegated to the [`Dispatcher`].

use std::sync::Arc;

use cf_workers_api::{Config, HttpTransport};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::dispatcher::Dispatcher;
use crate::protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, InitializeParams, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, ServerCapabilities,
    ServerInfo, ToolCallParams, ToolsCapability,
};
use crate::tools::ToolDescriptor;
use crate::{Error, Result};

pub const SERVER_NAME: &str = "cf-workers-mcp";

/// MCP Server for Cloudflare Workers management
///
/// # Example
///
/// ```ignore
/// use cf_workers_api::Config;
/// use cf_workers_mcp::WorkersMcpServer;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::new("account-id", "api-token")?;
///     WorkersMcpServer::from_config(config)?.run().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct WorkersMcpServer {
    dispatcher: Dispatcher,
}

impl WorkersMcpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Build a server that talks to the provider over HTTP.
    pub fn from_config(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let transport = HttpTransport::new(config.clone())?;
        Ok(Self::new(Dispatcher::new(config, Arc::new(transport))))
    }

    /// Serve MCP over stdin/stdout until stdin closes.
    pub async fn run(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        tracing::info!(
            account_id = self.dispatcher.config().account_id(),
            tools = self.tools().len(),
            "MCP server ready, listening on stdio"
        );

        self.serve(stdin, stdout).await
    }

    /// Serve MCP over an arbitrary line-oriented reader/writer pair.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            tracing::debug!(bytes = line.len(), "Received message");

            let response = match self.handle_message(line).await {
                Ok(response) => response,
                Err(Error::Json(e)) => {
                    tracing::warn!(error = %e, "Unparseable message");
                    error_line(PARSE_ERROR, format!("Parse error: {e}"))?
                }
                Err(e) => error_line(INTERNAL_ERROR, format!("Internal error: {e}"))?,
            };

            // Notifications get no reply
            if response.is_empty() {
                continue;
            }

            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle a single MCP message
    ///
    /// Returns the serialized response, or an empty string for notifications.
    /// Well-formed JSON that is not a JSON-RPC 2.0 request is answered with
    /// an invalid-request error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] when `message` is not valid JSON.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let message: Value = serde_json::from_str(message)?;
        let id = message.get("id").cloned().filter(|id| !id.is_null());

        let request: JsonRpcRequest = match serde_json::from_value::<JsonRpcRequest>(message) {
            Ok(request) if request.jsonrpc == "2.0" => request,
            Ok(request) => {
                let reason = format!("unsupported jsonrpc version '{}'", request.jsonrpc);
                return invalid_request(id, reason);
            }
            Err(e) => return invalid_request(id, e.to_string()),
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params)?,
            "initialized" | "notifications/initialized" => return Ok(String::new()),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id)?,
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            _ if request.id.is_none() => {
                tracing::debug!(method = %request.method, "Ignoring notification");
                return Ok(String::new());
            }
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: InitializeParams = serde_json::from_value(params).unwrap_or_default();
        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                client_version = client.version.as_deref().unwrap_or("unknown"),
                protocol = params.protocol_version.as_deref().unwrap_or("unspecified"),
                "Client connected"
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        let tools = serde_json::to_value(self.tools())?;
        Ok(JsonRpcResponse::success(id, json!({ "tools": tools })))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid params: {e}"),
                ));
            }
        };

        tracing::info!(tool = %params.name, "Tool call");
        let result = self.dispatcher.invoke(&params.name, params.arguments).await;

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        self.dispatcher.registry().list_tools()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

fn invalid_request(id: Option<Value>, reason: String) -> Result<String> {
    tracing::warn!(%reason, "Invalid JSON-RPC request");
    let response =
        JsonRpcResponse::error(id, INVALID_REQUEST, format!("Invalid Request: {reason}"));
    Ok(serde_json::to_string(&response)?)
}

fn error_line(code: i32, message: String) -> Result<String> {
    Ok(serde_json::to_string(&JsonRpcResponse::error(None, code, message))?)
}
