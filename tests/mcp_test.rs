use membank::mcp::tools::*;
use membank::mcp::transport::*;
use serde_json::json;

#[test]
fn test_parse_jsonrpc_request() {
    let msg = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/list",
        "params": {}
    });

    let request: JsonRpcRequest = serde_json::from_value(msg).unwrap();
    assert_eq!(request.method, "tools/list");
    assert_eq!(request.id, serde_json::Value::Number(1.into()));
}

#[test]
fn test_tool_definitions() {
    let tools = tool_definitions();
    assert!(!tools.is_empty());

    let tool_names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert!(tool_names.contains(&"knowledge_search"));
    assert!(tool_names.contains(&"knowledge_add"));
    assert!(tool_names.contains(&"knowledge_link"));
    assert!(tool_names.contains(&"knowledge_related"));
}

#[test]
fn test_tool_definitions_stable_order() {
    let first = tool_definitions();
    let second = tool_definitions();
    let names = |tools: &[ToolDefinition]| -> Vec<String> {
        tools.iter().map(|t| t.name.clone()).collect()
    };
    assert_eq!(names(&first), names(&second));
    assert_eq!(
        names(&first),
        vec![
            "knowledge_search",
            "knowledge_add",
            "knowledge_link",
            "knowledge_related"
        ]
    );
}

#[test]
fn test_serialize_jsonrpc_response() {
    let response = JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id: serde_json::Value::Number(1.into()),
        result: Some(json!({"tools": []})),
        error: None,
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"jsonrpc\":\"2.0\""));
}

#[test]
fn test_error_response() {
    let response = JsonRpcResponse::error(
        serde_json::Value::Number(1.into()),
        ErrorCode::MethodNotFound,
        "Method not found".to_string(),
    );

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("-32601"));
}

#[test]
fn test_success_response_omits_error() {
    let response = JsonRpcResponse::success(
        serde_json::Value::Number(42.into()),
        json!({"result": "ok"}),
    );

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"result\""));
    assert!(!json.contains("\"error\""));
}

#[test]
fn test_error_response_omits_result() {
    let response = JsonRpcResponse::error(
        serde_json::Value::Number(1.into()),
        ErrorCode::InternalError,
        "something went wrong".to_string(),
    );

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("-32603"));
    assert!(!json.contains("\"result\""));
}

#[test]
fn test_all_error_codes() {
    assert_eq!(ErrorCode::ParseError.as_i32(), -32700);
    assert_eq!(ErrorCode::SecurityRejection.as_i32(), -32600);
    assert_eq!(ErrorCode::MethodNotFound.as_i32(), -32601);
    assert_eq!(ErrorCode::UnknownTool.as_i32(), -32602);
    assert_eq!(ErrorCode::InternalError.as_i32(), -32603);
}

#[test]
fn test_tool_definitions_count() {
    let tools = tool_definitions();
    assert_eq!(tools.len(), 4);
}

#[test]
fn test_tool_definitions_have_input_schemas() {
    let tools = tool_definitions();
    for tool in &tools {
        assert!(
            tool.input_schema.is_object(),
            "tool '{}' has no input schema",
            tool.name
        );
        assert_eq!(
            tool.input_schema["type"], "object",
            "tool '{}' schema type is not object",
            tool.name
        );
    }
}

#[test]
fn test_tool_schemas_match_catalog() {
    let tools = tool_definitions();

    let search = &tools[0];
    assert_eq!(search.input_schema["required"], json!(["query"]));
    assert_eq!(search.input_schema["properties"]["limit"]["default"], 10);

    let add = &tools[1];
    assert_eq!(
        add.input_schema["required"],
        json!(["title", "content", "type"])
    );
    assert_eq!(
        add.input_schema["properties"]["type"]["enum"],
        json!(["error", "solution", "decision", "memo", "code", "concept"])
    );
    assert_eq!(
        add.input_schema["properties"]["tags"]["items"]["type"],
        "string"
    );

    let link = &tools[2];
    assert_eq!(
        link.input_schema["required"],
        json!(["from_id", "to_id", "link_type"])
    );
    assert_eq!(
        link.input_schema["properties"]["link_type"]["enum"],
        json!(["solves", "causes", "related", "implements", "references"])
    );

    let related = &tools[3];
    assert_eq!(related.input_schema["required"], json!(["id"]));
}

#[test]
fn test_tool_definitions_serialization_roundtrip() {
    let tools = tool_definitions();
    let json = serde_json::to_string(&tools).unwrap();
    let deserialized: Vec<ToolDefinition> = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.len(), tools.len());
    for (orig, deser) in tools.iter().zip(deserialized.iter()) {
        assert_eq!(orig.name, deser.name);
        assert_eq!(orig.description, deser.description);
    }
}

#[test]
fn test_notification_without_id() {
    let msg = json!({
        "jsonrpc": "2.0",
        "method": "initialized"
    });

    let request: JsonRpcRequest = serde_json::from_value(msg).unwrap();
    assert_eq!(request.method, "initialized");
    assert!(request.id.is_null());
    assert!(request.params.is_none());
}

#[test]
fn test_request_with_string_id() {
    let msg = json!({
        "jsonrpc": "2.0",
        "id": "req-42",
        "method": "ping"
    });

    let request: JsonRpcRequest = serde_json::from_value(msg).unwrap();
    assert_eq!(request.id, serde_json::Value::String("req-42".to_string()));
    assert_eq!(request.method, "ping");
}
