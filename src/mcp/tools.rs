//! Tool catalog and result shaping for the memory bank.
//!
//! Each tool maps to one bridge method. Tool definitions include JSON
//! Schema descriptions so that MCP clients can discover available
//! capabilities; argument validation beyond the declared schema is left
//! to the knowledge store behind the bridge.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Knowledge entry types accepted by the store.
const ENTRY_TYPES: [&str; 6] = ["error", "solution", "decision", "memo", "code", "concept"];

/// Link types accepted between knowledge entries.
const LINK_TYPES: [&str; 5] = ["solves", "causes", "related", "implements", "references"];

/// A tool definition exposed by the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Returns the list of all tool definitions exposed by this MCP server.
///
/// The catalog is fixed at process start; the order is stable across calls.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "knowledge_search".to_string(),
            description: "Search the memory bank for knowledge entries matching a query."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query string"
                    },
                    "type": {
                        "type": "string",
                        "enum": ENTRY_TYPES,
                        "description": "Restrict results to one entry type"
                    },
                    "limit": {
                        "type": "number",
                        "default": 10,
                        "description": "Maximum number of results to return"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: "knowledge_add".to_string(),
            description: "Add a new knowledge entry to the memory bank.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "Short title for the entry"
                    },
                    "content": {
                        "type": "string",
                        "description": "Entry body"
                    },
                    "type": {
                        "type": "string",
                        "enum": ENTRY_TYPES,
                        "description": "Entry type"
                    },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Tags attached to the entry, in order"
                    },
                    "source_file": {
                        "type": "string",
                        "description": "File the entry originated from"
                    }
                },
                "required": ["title", "content", "type"]
            }),
        },
        ToolDefinition {
            name: "knowledge_link".to_string(),
            description: "Create a typed link between two knowledge entries.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "from_id": {
                        "type": "number",
                        "description": "Source entry id"
                    },
                    "to_id": {
                        "type": "number",
                        "description": "Target entry id"
                    },
                    "link_type": {
                        "type": "string",
                        "enum": LINK_TYPES,
                        "description": "Relationship from source to target"
                    }
                },
                "required": ["from_id", "to_id", "link_type"]
            }),
        },
        ToolDefinition {
            name: "knowledge_related".to_string(),
            description: "Retrieve knowledge entries linked to a given entry.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "number",
                        "description": "Entry id to find related entries for"
                    }
                },
                "required": ["id"]
            }),
        },
    ]
}

/// Maps a catalog tool name to the bridge method that services it.
///
/// Returns `None` for names outside the catalog; the tool set and the
/// dispatchable set are the same closed set.
pub fn backend_method(tool_name: &str) -> Option<&'static str> {
    match tool_name {
        "knowledge_search" => Some("search"),
        "knowledge_add" => Some("add"),
        "knowledge_link" => Some("link"),
        "knowledge_related" => Some("related"),
        _ => None,
    }
}

/// Extracts the error message from a bridge payload that reports failure
/// through an `error` field, if any.
pub fn payload_error(payload: &Value) -> Option<String> {
    match payload.get("error") {
        None | Some(Value::Null) => None,
        Some(Value::String(message)) => Some(message.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Wraps a successful bridge payload as a single text content block
/// containing its pretty-printed JSON serialization.
pub fn wrap_tool_result(payload: &Value) -> Value {
    let text = serde_json::to_string_pretty(payload).unwrap_or_default();
    json!({
        "content": [{ "type": "text", "text": text }]
    })
}
