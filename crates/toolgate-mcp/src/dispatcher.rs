//! JSON-RPC dispatch.
//!
//! Routes protocol methods (`initialize`, `ping`, `tools/list`) directly
//! and every tool method through the gate pipeline. The session identifier
//! travels as a `session_id` member of `params`; it is lifted out before
//! the remaining arguments reach the gate's schema check.

use serde_json::{json, Value};
use tracing::debug;

use toolgate_core::{RequestId, SessionId};
use toolgate_gate::ToolCall;

use crate::error::{McpError, McpResult};
use crate::pipeline::process_tool_call;
use crate::server::McpServer;
use crate::tools;
use crate::types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

const PROTOCOL_VERSION: &str = "2024-11-05";
const ANONYMOUS_SESSION: &str = "anonymous";

/// Parse a raw line into a JSON-RPC request.
pub fn parse_jsonrpc_request(raw: &str) -> McpResult<JsonRpcRequest> {
    let request: JsonRpcRequest = serde_json::from_str(raw)
        .map_err(|e| McpError::SerializationError(format!("malformed request: {}", e)))?;
    if request.jsonrpc != "2.0" {
        return Err(McpError::InvalidJsonRpc(format!(
            "unsupported jsonrpc version: {}",
            request.jsonrpc
        )));
    }
    Ok(request)
}

/// Dispatch one request, always producing a response.
pub fn dispatch_jsonrpc(server: &McpServer, request: &JsonRpcRequest) -> JsonRpcResponse {
    debug!(method = %request.method, "dispatching request");
    match route(server, request) {
        Ok(result) => JsonRpcResponse::success(request.id.clone(), result),
        Err(e) => JsonRpcResponse::error(
            request.id.clone(),
            JsonRpcError {
                code: e.json_rpc_code(),
                message: e.to_string(),
                data: None,
            },
        ),
    }
}

fn route(server: &McpServer, request: &JsonRpcRequest) -> McpResult<Value> {
    match request.method.as_str() {
        "initialize" => Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": server.config().server_name,
                "version": server.config().server_version,
            },
            "capabilities": {"tools": {}},
        })),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({"tools": tools::descriptors()})),
        method if tools::is_tool(method) => {
            let (session_id, arguments) = split_session(&request.params)?;
            let call = ToolCall::new(method, session_id, arguments);
            let request_id = RequestId::new(request.id.to_string());
            process_tool_call(server, &call, &request_id)
        }
        method => Err(McpError::MethodNotFound(method.to_string())),
    }
}

/// Lift `session_id` out of the params object. An absent session falls back
/// to the anonymous session; a present-but-malformed one is rejected rather
/// than coerced, so a typo never lands a call on shared anonymous state.
/// Non-object params are passed through untouched so the gate's schema
/// check reports them.
fn split_session(params: &Value) -> McpResult<(SessionId, Value)> {
    match params {
        Value::Object(map) => {
            let mut arguments = map.clone();
            let session = match arguments.remove("session_id") {
                Some(Value::String(s)) => s,
                Some(_) => {
                    return Err(McpError::InvalidRequest(
                        "session_id must be a string".into(),
                    ));
                }
                None => ANONYMOUS_SESSION.to_string(),
            };
            Ok((SessionId::new(session), Value::Object(arguments)))
        }
        other => Ok((SessionId::new(ANONYMOUS_SESSION), other.clone())),
    }
}
