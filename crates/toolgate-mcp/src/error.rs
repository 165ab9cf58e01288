//! MCP server error types.
//!
//! Display impls carry only caller-safe text. Gate denials surface as
//! `AccessDenied` or `InvalidRequest`; everything unexpected collapses to
//! `Internal` with the detail logged server-side.

use thiserror::Error;

use toolgate_gate::GateError;

/// Result type alias for MCP operations.
pub type McpResult<T> = Result<T, McpError>;

#[derive(Debug, Error)]
pub enum McpError {
    // -- Transport / initialization errors --
    #[error("server initialization failed: {0}")]
    InitializationFailed(String),

    #[error("transport error: {0}")]
    TransportError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    // -- Dispatch errors --
    #[error("method not found: {0}")]
    MethodNotFound(String),

    #[error("invalid JSON-RPC request: {0}")]
    InvalidJsonRpc(String),

    // -- Gate outcomes --
    #[error("invalid params: {0}")]
    InvalidRequest(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    // -- Tool execution errors --
    #[error("tool execution failed: {0}")]
    ToolExecutionFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    // -- Audit errors --
    #[error("audit recording failed: {0}")]
    AuditFailed(String),

    // -- Serialization --
    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("internal error")]
    Internal(String),
}

impl McpError {
    /// Returns a JSON-RPC error code for this error variant.
    pub fn json_rpc_code(&self) -> i64 {
        match self {
            McpError::InvalidJsonRpc(_) => -32600,
            McpError::MethodNotFound(_) => -32601,
            McpError::InvalidRequest(_) => -32602,
            McpError::SerializationError(_) => -32700,
            McpError::AccessDenied(_) => -32003,
            McpError::Internal(_) => -32603,
            _ => -32000,
        }
    }
}

impl From<GateError> for McpError {
    fn from(e: GateError) -> Self {
        McpError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_error_variants_display() {
        let errors: Vec<McpError> = vec![
            McpError::InitializationFailed("test".into()),
            McpError::TransportError("test".into()),
            McpError::ConfigError("test".into()),
            McpError::MethodNotFound("test".into()),
            McpError::InvalidJsonRpc("test".into()),
            McpError::InvalidRequest("test".into()),
            McpError::AccessDenied("test".into()),
            McpError::ToolExecutionFailed("test".into()),
            McpError::StorageError("test".into()),
            McpError::AuditFailed("test".into()),
            McpError::SerializationError("test".into()),
            McpError::Internal("test".into()),
        ];
        for err in &errors {
            assert!(!format!("{}", err).is_empty());
        }
    }

    #[test]
    fn test_json_rpc_error_codes() {
        assert_eq!(McpError::InvalidJsonRpc("x".into()).json_rpc_code(), -32600);
        assert_eq!(McpError::MethodNotFound("x".into()).json_rpc_code(), -32601);
        assert_eq!(McpError::InvalidRequest("x".into()).json_rpc_code(), -32602);
        assert_eq!(
            McpError::SerializationError("x".into()).json_rpc_code(),
            -32700
        );
        assert_eq!(McpError::AccessDenied("x".into()).json_rpc_code(), -32003);
        assert_eq!(McpError::Internal("x".into()).json_rpc_code(), -32603);
        assert_eq!(McpError::TransportError("x".into()).json_rpc_code(), -32000);
    }

    #[test]
    fn test_internal_display_hides_detail() {
        let err = McpError::Internal("sqlite handle dropped".into());
        assert_eq!(format!("{}", err), "internal error");
    }

    #[test]
    fn test_from_gate_error() {
        let err: McpError = GateError::ContextLock.into();
        assert!(matches!(err, McpError::Internal(_)));
        assert_eq!(err.json_rpc_code(), -32603);
    }
}
