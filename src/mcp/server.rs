//! MCP server that reads JSON-RPC messages from stdin and writes
//! responses to stdout.
//!
//! The server exposes the memory bank tools via the Model Context
//! Protocol. Requests pass the admission guard before dispatch; tool
//! calls are serviced by the backend bridge. Diagnostics go to stderr
//! only, never into the JSON stream.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::bridge::BackendClient;
use crate::errors::Result;

use super::guard::AdmissionGuard;
use super::tools::{backend_method, payload_error, tool_definitions, wrap_tool_result};
use super::transport::{ErrorCode, JsonRpcRequest, JsonRpcResponse};

/// Runtime statistics for the MCP server.
struct ServerStats {
    started_at: Instant,
    total_requests: AtomicU64,
    tool_calls: AtomicU64,
    rejections: AtomicU64,
    errors: AtomicU64,
}

impl ServerStats {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_requests: AtomicU64::new(0),
            tool_calls: AtomicU64::new(0),
            rejections: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

/// The MCP server wrapping a backend client.
pub struct McpServer<B> {
    backend: B,
    guard: Mutex<AdmissionGuard>,
    stats: ServerStats,
}

impl<B: BackendClient> McpServer<B> {
    /// Creates a new MCP server with the given backend and admission guard.
    pub fn new(backend: B, guard: AdmissionGuard) -> Self {
        Self {
            backend,
            guard: Mutex::new(guard),
            stats: ServerStats::new(),
        }
    }

    /// Runs the server, reading JSON-RPC requests from stdin and writing
    /// responses to stdout. Runs until stdin is closed.
    ///
    /// Lines are handled strictly in arrival order; a line's response is
    /// written before the next line is handled. A failure to write a
    /// response is fatal and propagates to the caller.
    pub async fn run(&self) -> Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();

        info!("memory bank MCP server started, waiting for requests on stdin");

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }

            // Parse the incoming JSON
            let parsed: std::result::Result<JsonRpcRequest, _> = serde_json::from_str(&line);

            let response = match parsed {
                Ok(request) => self.handle_request(&request).await,
                Err(e) => Some(JsonRpcResponse::error(
                    Value::Null,
                    ErrorCode::ParseError,
                    format!("failed to parse JSON-RPC request: {}", e),
                )),
            };

            // Write response (if any) as a single line to stdout
            if let Some(resp) = response {
                let json_line = match serde_json::to_string(&resp) {
                    Ok(s) => s,
                    Err(e) => {
                        error!("failed to serialize response: {}", e);
                        continue;
                    }
                };
                let output = format!("{}\n", json_line);
                stdout.write_all(output.as_bytes()).await?;
                stdout.flush().await?;
            }
        }

        self.log_shutdown_stats();
        Ok(())
    }

    /// Dispatches a parsed JSON-RPC request to the appropriate handler.
    ///
    /// The admission guard is applied exactly once per request, before any
    /// routing or backend invocation. Returns `None` for notifications.
    pub async fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        let id = request.id.clone();

        let admitted = match self.guard.lock() {
            Ok(mut guard) => guard.admit(request),
            Err(_) => false,
        };
        if !admitted {
            self.stats.rejections.fetch_add(1, Ordering::Relaxed);
            debug!(method = %request.method, "request rejected by admission guard");
            return Some(JsonRpcResponse::error(
                id,
                ErrorCode::SecurityRejection,
                "security validation failed".to_string(),
            ));
        }

        let result = match request.method.as_str() {
            "initialize" => Some(self.handle_initialize(id)),
            "initialized" => {
                // Notification - no response required
                None
            }
            "notifications/initialized" => {
                // Alternative notification path - no response required
                None
            }
            "tools/list" => Some(self.handle_tools_list(id)),
            "tools/call" => Some(self.handle_tools_call(id, &request.params).await),
            "ping" => Some(JsonRpcResponse::success(id, json!({}))),
            _ => Some(JsonRpcResponse::error(
                id,
                ErrorCode::MethodNotFound,
                format!("method not found: {}", request.method),
            )),
        };

        // Track errors
        if let Some(ref resp) = result {
            if resp.error.is_some() {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
            }
        }

        result
    }

    /// Handles the `initialize` method, returning server capabilities.
    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "membank",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    /// Handles the `tools/list` method, returning all available tool definitions.
    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let tools = tool_definitions();
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    /// Handles the `tools/call` method, forwarding to the backend bridge.
    async fn handle_tools_call(&self, id: Value, params: &Option<Value>) -> JsonRpcResponse {
        let params = match params {
            Some(p) => p,
            None => {
                return JsonRpcResponse::error(
                    id,
                    ErrorCode::UnknownTool,
                    "missing params for tools/call".to_string(),
                );
            }
        };

        let tool_name = match params.get("name").and_then(|v| v.as_str()) {
            Some(name) => name,
            None => {
                return JsonRpcResponse::error(
                    id,
                    ErrorCode::UnknownTool,
                    "missing 'name' in tools/call params".to_string(),
                );
            }
        };

        let method = match backend_method(tool_name) {
            Some(m) => m,
            None => {
                return JsonRpcResponse::error(
                    id,
                    ErrorCode::UnknownTool,
                    format!("unknown tool: {}", tool_name),
                );
            }
        };

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        self.stats.tool_calls.fetch_add(1, Ordering::Relaxed);
        debug!(tool = tool_name, method, "dispatching tool call to bridge");

        match self.backend.invoke(method, &arguments).await {
            Ok(payload) => match payload_error(&payload) {
                Some(message) => JsonRpcResponse::error(id, ErrorCode::InternalError, message),
                None => JsonRpcResponse::success(id, wrap_tool_result(&payload)),
            },
            Err(e) => JsonRpcResponse::error(id, ErrorCode::InternalError, e.to_string()),
        }
    }

    /// Logs final runtime statistics when the input stream closes.
    fn log_shutdown_stats(&self) {
        let uptime = self.stats.started_at.elapsed();
        info!(
            uptime_secs = uptime.as_secs(),
            total_requests = self.stats.total_requests.load(Ordering::Relaxed),
            tool_calls = self.stats.tool_calls.load(Ordering::Relaxed),
            rejections = self.stats.rejections.load(Ordering::Relaxed),
            errors = self.stats.errors.load(Ordering::Relaxed),
            "memory bank MCP server shutting down"
        );
    }
}
