//! Domain types for the gated tool server.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use toolgate_core::{RequestId, SessionId, Timestamp};

// ---------------------------------------------------------------------------
// Server configuration
// ---------------------------------------------------------------------------

/// Full MCP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerConfig {
    pub server_name: String,
    pub server_version: String,
    /// Permissions granted to a session on its first call.
    pub default_permissions: Vec<String>,
    /// Hosts `fetch_article` may be pointed at.
    pub trusted_hosts: Vec<String>,
    /// Recipients `send_message` may deliver to.
    pub approved_contacts: Vec<String>,
    /// Flag set once a session fetches external content.
    pub untrusted_content_flag: String,
    /// Directory `list_directory` is confined to. Created and seeded at
    /// server startup.
    pub files_root: PathBuf,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            server_name: "toolgate-mcp".into(),
            server_version: "0.1.0".into(),
            default_permissions: vec!["read_secrets".into()],
            trusted_hosts: vec!["news.example.com".into(), "docs.example.com".into()],
            approved_contacts: vec!["alice".into(), "bob".into(), "+15550100".into()],
            untrusted_content_flag: "viewed_untrusted_content".into(),
            files_root: std::env::temp_dir().join("toolgate-sandbox"),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 types
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: serde_json::Value,
}

/// JSON-RPC 2.0 response.
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
    pub fn error(id: serde_json::Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Audit entry
// ---------------------------------------------------------------------------

/// One pipeline audit record per tool invocation, allow or deny.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_id: String,
    pub session_id: SessionId,
    pub request_id: RequestId,
    pub tool: String,
    /// "allow" or "deny".
    pub decision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: Timestamp,
    pub duration_ms: u64,
    pub metadata: HashMap<String, String>,
    /// Chain hash assigned by the audit log when the entry is recorded.
    /// Empty until then, and excluded from the hashed serialization.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hash: String,
}
