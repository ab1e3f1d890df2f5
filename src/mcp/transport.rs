//! JSON-RPC transport types for the MCP server.
//!
//! Provides serialization and deserialization of the JSON-RPC-shaped
//! messages exchanged between the MCP client and server over stdio. The
//! wire format follows the `{id, method, params}` / `{id, result|error}`
//! convention; a missing `jsonrpc` field on requests is tolerated.

use serde::{Deserialize, Serialize};

fn default_jsonrpc() -> String {
    "2.0".to_string()
}

/// A JSON-RPC request received from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version; defaults to `"2.0"` when absent.
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    /// Request identifier. May be a number, string, or null.
    /// Absent for notifications.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub id: serde_json::Value,
    /// The RPC method name.
    pub method: String,
    /// Optional parameters for the method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    /// Caller identity used for rate limiting. Absent callers share a
    /// single default bucket.
    #[serde(
        default,
        rename = "clientId",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_id: Option<String>,
}

/// A JSON-RPC response sent back to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version; always `"2.0"`.
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    /// The request identifier that this response corresponds to.
    /// Omitted on the wire when null, so parse-error responses carry no id.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub id: serde_json::Value,
    /// The result on success; absent on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// The error on failure; absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Creates a successful JSON-RPC response.
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Creates an error JSON-RPC response.
    pub fn error(id: serde_json::Value, code: ErrorCode, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: code.as_i32(),
                message,
                data: None,
            }),
        }
    }
}

/// A JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code.
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Error kinds produced by this server, mapped to fixed JSON-RPC codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON was received on a request line.
    ParseError,
    /// The request was rejected by the admission guard.
    SecurityRejection,
    /// The requested method does not exist.
    MethodNotFound,
    /// The named tool is not in the catalog, or the call params are malformed.
    UnknownTool,
    /// Internal server error, including all bridge failures.
    InternalError,
}

impl ErrorCode {
    /// Returns the numeric error code sent on the wire.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::SecurityRejection => -32600,
            Self::MethodNotFound => -32601,
            Self::UnknownTool => -32602,
            Self::InternalError => -32603,
        }
    }
}
