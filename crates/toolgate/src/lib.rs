//! Toolgate root library.
//!
//! The root binary is a thin orchestrator: it loads configuration, builds
//! the gated tool server, and routes JSON-RPC requests. Root-level methods
//! (`gate/status`, `audit/list`) are handled here; everything else is
//! delegated to the tool server's dispatcher, which runs each tool call
//! through the policy gate.

pub mod config;
pub mod error;

pub use config::{GateConfig, McpConfig, RootConfig, Transport};
pub use error::{RootError, RootResult};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use toolgate_mcp::{McpServer, McpServerConfig};

// ---------------------------------------------------------------------------
// JSON-RPC types
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
    pub id: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: serde_json::Value,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response.
    pub fn error(id: serde_json::Value, code: i64, message: String) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
            id,
        }
    }
}

/// Standard JSON-RPC error codes.
pub mod rpc_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    /// Policy gate denial.
    pub const ACCESS_DENIED: i64 = -32003;
}

// ---------------------------------------------------------------------------
// Root state
// ---------------------------------------------------------------------------

/// Runtime state for the root orchestrator.
///
/// Created by `initialize_root`, consumed by `handle_request` and
/// `shutdown_root`.
pub struct RootState {
    pub config: RootConfig,
    initialized: bool,
    pub server: Option<McpServer>,
}

impl RootState {
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// Build the tool server configuration from root configuration, keeping the
/// server's fixture defaults for anything the root config leaves unset.
fn server_config(config: &RootConfig) -> McpServerConfig {
    let defaults = McpServerConfig::default();
    McpServerConfig {
        server_name: config.mcp.server_name.clone(),
        server_version: config.mcp.server_version.clone(),
        default_permissions: config.gate.default_permissions.clone(),
        trusted_hosts: config
            .gate
            .trusted_hosts
            .clone()
            .unwrap_or(defaults.trusted_hosts),
        approved_contacts: config
            .gate
            .approved_contacts
            .clone()
            .unwrap_or(defaults.approved_contacts),
        untrusted_content_flag: config.gate.untrusted_content_flag.clone(),
        files_root: config.gate.files_root.clone().unwrap_or(defaults.files_root),
    }
}

/// Initialize the root component with the provided configuration.
pub fn initialize_root(config: RootConfig) -> RootResult<RootState> {
    config.validate()?;

    info!(
        data_dir = %config.data_dir.display(),
        transport = ?config.mcp.transport,
        "initializing toolgate root"
    );

    let server = McpServer::new(server_config(&config))?;

    info!("toolgate root initialized");

    Ok(RootState {
        config,
        initialized: true,
        server: Some(server),
    })
}

/// Process a JSON-RPC request through the root orchestrator.
pub fn handle_request(state: &RootState, request: &JsonRpcRequest) -> JsonRpcResponse {
    if !state.is_initialized() {
        return JsonRpcResponse::error(
            request.id.clone(),
            rpc_codes::INTERNAL_ERROR,
            "root not initialized".into(),
        );
    }

    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::error(
            request.id.clone(),
            rpc_codes::INVALID_REQUEST,
            format!("unsupported JSON-RPC version: {}", request.jsonrpc),
        );
    }

    info!(method = %request.method, "handling request");

    match request.method.as_str() {
        "gate/status" => handle_gate_status(state, request),
        "audit/list" => handle_audit_list(state, request),
        _ => {
            // Delegate initialize, ping, tools/list, and tool calls.
            if let Some(server) = &state.server {
                let mcp_request = toolgate_mcp::JsonRpcRequest {
                    jsonrpc: request.jsonrpc.clone(),
                    method: request.method.clone(),
                    params: request.params.clone().unwrap_or(serde_json::Value::Null),
                    id: request.id.clone(),
                };
                let mcp_response = toolgate_mcp::dispatch_jsonrpc(server, &mcp_request);
                JsonRpcResponse {
                    jsonrpc: "2.0".into(),
                    result: mcp_response.result,
                    error: mcp_response.error.map(|e| JsonRpcError {
                        code: e.code,
                        message: e.message,
                        data: e.data,
                    }),
                    id: request.id.clone(),
                }
            } else {
                warn!(method = %request.method, "unknown method (no server)");
                JsonRpcResponse::error(
                    request.id.clone(),
                    rpc_codes::METHOD_NOT_FOUND,
                    format!("unknown method: {}", request.method),
                )
            }
        }
    }
}

/// Gracefully shut down the root component. Idempotent.
pub fn shutdown_root(state: &mut RootState) -> RootResult<()> {
    if !state.initialized {
        return Ok(());
    }

    info!("shutting down toolgate root");
    state.server = None;
    state.initialized = false;
    Ok(())
}

// ---------------------------------------------------------------------------
// Request handlers (internal)
// ---------------------------------------------------------------------------

fn handle_gate_status(state: &RootState, request: &JsonRpcRequest) -> JsonRpcResponse {
    let (tools, sessions) = state
        .server
        .as_ref()
        .map(|s| {
            (
                s.gate().registry().call_names(),
                s.gate().contexts().session_count(),
            )
        })
        .unwrap_or_default();

    let status = serde_json::json!({
        "initialized": state.is_initialized(),
        "tools": tools,
        "sessions": sessions,
    });
    JsonRpcResponse::success(request.id.clone(), status)
}

fn handle_audit_list(state: &RootState, request: &JsonRpcRequest) -> JsonRpcResponse {
    let limit = request
        .params
        .as_ref()
        .and_then(|p| p.get("limit"))
        .and_then(|l| l.as_u64())
        .unwrap_or(20) as usize;

    let server = match &state.server {
        Some(s) => s,
        None => {
            return JsonRpcResponse::error(
                request.id.clone(),
                rpc_codes::INTERNAL_ERROR,
                "no server".into(),
            );
        }
    };

    let entries = match server.audit().entries() {
        Ok(e) => e,
        Err(e) => {
            return JsonRpcResponse::error(
                request.id.clone(),
                rpc_codes::INTERNAL_ERROR,
                e.to_string(),
            );
        }
    };

    let chain_intact = match server.audit().verify_chain() {
        Ok(ok) => ok,
        Err(e) => {
            return JsonRpcResponse::error(
                request.id.clone(),
                rpc_codes::INTERNAL_ERROR,
                e.to_string(),
            );
        }
    };

    let total = entries.len();
    let recent: Vec<serde_json::Value> = entries
        .iter()
        .rev()
        .take(limit)
        .filter_map(|e| serde_json::to_value(e).ok())
        .collect();

    JsonRpcResponse::success(
        request.id.clone(),
        serde_json::json!({ "entries": recent, "total": total, "chain_intact": chain_intact }),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(method: &str, params: Option<serde_json::Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: serde_json::json!(1),
        }
    }

    #[test]
    fn test_initialize_root() {
        let state = initialize_root(RootConfig::default()).unwrap();
        assert!(state.is_initialized());
    }

    #[test]
    fn test_initialize_root_invalid_config() {
        let mut config = RootConfig::default();
        config.gate.untrusted_content_flag = "".into();
        assert!(initialize_root(config).is_err());
    }

    #[test]
    fn test_handle_request_initialize() {
        let state = initialize_root(RootConfig::default()).unwrap();
        let response = handle_request(&state, &make_request("initialize", None));
        assert!(response.error.is_none());
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "toolgate");
    }

    #[test]
    fn test_handle_request_gate_status() {
        let state = initialize_root(RootConfig::default()).unwrap();
        let response = handle_request(&state, &make_request("gate/status", None));
        let result = response.result.unwrap();
        assert_eq!(result["initialized"], true);
        assert_eq!(result["tools"].as_array().unwrap().len(), 8);
        assert_eq!(result["sessions"], 0);
    }

    #[test]
    fn test_handle_request_audit_list_empty() {
        let state = initialize_root(RootConfig::default()).unwrap();
        let response = handle_request(&state, &make_request("audit/list", None));
        let result = response.result.unwrap();
        assert_eq!(result["total"], 0);
        assert!(result["entries"].as_array().unwrap().is_empty());
        assert_eq!(result["chain_intact"], true);
    }

    #[test]
    fn test_handle_request_tool_call_delegated() {
        let state = initialize_root(RootConfig::default()).unwrap();
        let response = handle_request(
            &state,
            &make_request(
                "run_query",
                Some(serde_json::json!({"session_id": "sess-1", "sql": "SELECT id FROM tickets"})),
            ),
        );
        assert!(response.error.is_none(), "error: {:?}", response.error);
        assert!(response.result.unwrap()["rows"].is_array());
    }

    #[test]
    fn test_handle_request_denied_tool_call() {
        let state = initialize_root(RootConfig::default()).unwrap();
        let response = handle_request(
            &state,
            &make_request(
                "run_query",
                Some(serde_json::json!({"sql": "DROP TABLE tickets"})),
            ),
        );
        assert_eq!(response.error.unwrap().code, rpc_codes::ACCESS_DENIED);
    }

    #[test]
    fn test_handle_request_unknown_method() {
        let state = initialize_root(RootConfig::default()).unwrap();
        let response = handle_request(&state, &make_request("nonexistent/method", None));
        assert_eq!(response.error.unwrap().code, rpc_codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_handle_request_bad_version() {
        let state = initialize_root(RootConfig::default()).unwrap();
        let request = JsonRpcRequest {
            jsonrpc: "1.0".into(),
            method: "initialize".into(),
            params: None,
            id: serde_json::json!(1),
        };
        let response = handle_request(&state, &request);
        assert_eq!(response.error.unwrap().code, rpc_codes::INVALID_REQUEST);
    }

    #[test]
    fn test_audit_list_after_calls() {
        let state = initialize_root(RootConfig::default()).unwrap();
        handle_request(
            &state,
            &make_request(
                "run_query",
                Some(serde_json::json!({"sql": "SELECT id FROM tickets"})),
            ),
        );
        handle_request(
            &state,
            &make_request(
                "run_query",
                Some(serde_json::json!({"sql": "DELETE FROM tickets"})),
            ),
        );

        let response = handle_request(
            &state,
            &make_request("audit/list", Some(serde_json::json!({"limit": 1}))),
        );
        let result = response.result.unwrap();
        assert_eq!(result["total"], 2);
        assert_eq!(result["chain_intact"], true);
        // Most recent entry first, and it was the denial.
        let entries = result["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["decision"], "deny");
        assert_eq!(entries[0]["hash"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_shutdown_root() {
        let mut state = initialize_root(RootConfig::default()).unwrap();
        shutdown_root(&mut state).unwrap();
        assert!(!state.is_initialized());

        // Idempotent.
        shutdown_root(&mut state).unwrap();

        let response = handle_request(&state, &make_request("initialize", None));
        assert_eq!(response.error.unwrap().code, rpc_codes::INTERNAL_ERROR);
    }

    #[test]
    fn test_custom_gate_config_flows_through() {
        let mut config = RootConfig::default();
        config.gate.default_permissions = vec![];
        let state = initialize_root(config).unwrap();

        // Without read_secrets the secret read denies.
        let response = handle_request(
            &state,
            &make_request(
                "read_secret",
                Some(serde_json::json!({"session_id": "sess-1", "name": "deploy_key"})),
            ),
        );
        assert_eq!(response.error.unwrap().code, rpc_codes::ACCESS_DENIED);
    }
}
