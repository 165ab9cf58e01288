//! Secret read handler.

use serde_json::json;

use toolgate_gate::ToolCall;

use crate::error::{McpError, McpResult};
use crate::server::McpServer;

/// Return the named secret. The permission and flag guards have already
/// run; the miss message stays generic so secret names cannot be probed.
pub fn read_secret(server: &McpServer, call: &ToolCall) -> McpResult<serde_json::Value> {
    let name = call
        .arg_str("name")
        .ok_or_else(|| McpError::InvalidRequest("name is required".into()))?;

    let value = server
        .stores()
        .secrets
        .get(name)
        .ok_or_else(|| McpError::AccessDenied("secret not found".into()))?;

    Ok(json!({"name": name, "value": value}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::McpServerConfig;
    use toolgate_core::SessionId;

    fn make_call(name: &str) -> ToolCall {
        ToolCall::new(
            "read_secret",
            SessionId::new("sess-1"),
            serde_json::json!({"name": name}),
        )
    }

    #[test]
    fn test_read_secret_returns_value() {
        let server = McpServer::new(McpServerConfig::default()).unwrap();
        let result = read_secret(&server, &make_call("deploy_key")).unwrap();
        assert_eq!(result["value"], "dk-5f2a9c01");
    }

    #[test]
    fn test_read_secret_miss_is_generic() {
        let server = McpServer::new(McpServerConfig::default()).unwrap();
        let err = read_secret(&server, &make_call("nonexistent")).unwrap_err();
        assert_eq!(err.to_string(), "access denied: secret not found");
    }
}
