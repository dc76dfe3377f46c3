//! MCP stdio server loop.
//!
//! Reads JSON-RPC requests line by line from stdin, dispatches, and
//! writes responses to stdout. Diagnostics go to stderr via tracing so
//! the protocol stream stays clean.

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::config::KoleoConfig;
use crate::koleo::KoleoApi;

use super::tools;
use super::types::{
    INVALID_PARAMS, JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR, ToolCallParams,
};

const SERVER_NAME: &str = "koleo";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Serve MCP over stdio until stdin closes.
pub async fn serve<C: KoleoApi>(client: &C, config: &KoleoConfig) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                let response = JsonRpcResponse::error(None, PARSE_ERROR, e.to_string());
                write_response(&mut stdout, &response).await?;
                continue;
            }
        };

        tracing::debug!(method = %request.method, "request");
        let Some(response) = handle_request(client, config, request).await else {
            continue;
        };
        write_response(&mut stdout, &response).await?;
    }

    Ok(())
}

/// Handle one request. Returns `None` for notifications, which get no
/// response on the wire.
async fn handle_request<C: KoleoApi>(
    client: &C,
    config: &KoleoConfig,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    match request.method.as_str() {
        "initialize" => Some(handle_initialize(request.id)),
        "notifications/initialized" | "initialized" => {
            request.id.map(|id| JsonRpcResponse::success(Some(id), json!({})))
        }
        "tools/list" => Some(JsonRpcResponse::success(
            request.id,
            json!({ "tools": tools::list_tools() }),
        )),
        "tools/call" => Some(handle_tools_call(client, config, request.id, request.params).await),
        "ping" => Some(JsonRpcResponse::success(request.id, json!({}))),
        other => Some(JsonRpcResponse::error(
            request.id,
            METHOD_NOT_FOUND,
            format!("Unknown method: {other}"),
        )),
    }
}

fn handle_initialize(id: Option<Value>) -> JsonRpcResponse {
    JsonRpcResponse::success(
        id,
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            }
        }),
    )
}

async fn handle_tools_call<C: KoleoApi>(
    client: &C,
    config: &KoleoConfig,
    id: Option<Value>,
    params: Value,
) -> JsonRpcResponse {
    let call: ToolCallParams = match serde_json::from_value(params) {
        Ok(call) => call,
        Err(e) => return JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string()),
    };

    let result = tools::call_tool(client, config, &call.name, &call.arguments).await;

    JsonRpcResponse::success(
        id,
        serde_json::to_value(result).unwrap_or_else(|_| json!({"error": "serialization failed"})),
    )
}

async fn write_response(
    stdout: &mut tokio::io::Stdout,
    response: &JsonRpcResponse,
) -> std::io::Result<()> {
    let mut payload = serde_json::to_vec(response)?;
    payload.push(b'\n');
    stdout.write_all(&payload).await?;
    stdout.flush().await
}
