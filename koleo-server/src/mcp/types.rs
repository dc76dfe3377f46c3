//! JSON-RPC types for the MCP stdio protocol.
//!
//! Only what the server needs: initialize, tools/list, tools/call, ping.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::tools::ToolResponse;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Tool definition returned by tools/list.
#[derive(Debug, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Parameters for tools/call.
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Content block in a tool result.
#[derive(Debug, Serialize)]
pub struct ToolResultContent {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub text: String,
}

/// Result of a tool call: rendered text plus the structured envelope.
#[derive(Debug, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolResultContent>,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent {
                content_type: "text",
                text: msg.into(),
            }],
            structured_content: None,
            is_error: true,
        }
    }
}

impl From<ToolResponse> for ToolResult {
    fn from(response: ToolResponse) -> Self {
        let text = if response.koleo_url.is_empty() {
            response.summary.clone()
        } else {
            format!("{}\nKoleo URL: {}", response.summary, response.koleo_url)
        };

        let is_error = response.error.is_some();
        let structured = serde_json::to_value(&response)
            .unwrap_or_else(|_| json!({"summary": response.summary}));

        Self {
            content: vec![ToolResultContent {
                content_type: "text",
                text,
            }],
            structured_content: Some(structured),
            is_error,
        }
    }
}

// JSON-RPC error codes.
pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
