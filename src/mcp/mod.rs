//! MCP (Model Context Protocol) server for the memory bank.
//!
//! Provides a JSON-RPC interface over stdio so that AI assistants can
//! search and grow the knowledge store interactively. Requests are
//! size-capped and rate-limited before dispatch; tool calls are serviced
//! by an external bridge process.

/// Request admission: size cap and per-client rate limiting.
pub mod guard;

/// MCP server implementation.
pub mod server;

/// Tool definitions and result shaping.
pub mod tools;

/// JSON-RPC transport types.
pub mod transport;

pub use guard::AdmissionGuard;
pub use server::McpServer;
pub use tools::{backend_method, tool_definitions, ToolDefinition};
pub use transport::{ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
