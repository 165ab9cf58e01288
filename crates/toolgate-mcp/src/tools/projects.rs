//! Project lookup handler.

use serde_json::json;

use toolgate_gate::ToolCall;

use crate::error::{McpError, McpResult};
use crate::server::McpServer;

/// Return the project record. The tenant-scope guard has already verified
/// ownership; a miss here uses the guard's message so the two paths are
/// indistinguishable.
pub fn fetch_project(server: &McpServer, call: &ToolCall) -> McpResult<serde_json::Value> {
    let project_id = call
        .arg_str("project_id")
        .ok_or_else(|| McpError::InvalidRequest("project_id is required".into()))?;

    let project = server
        .stores()
        .projects
        .get(project_id)
        .ok_or_else(|| McpError::AccessDenied("project not found".into()))?;

    Ok(json!({
        "project_id": project.project_id,
        "name": project.name,
        "status": project.status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::McpServerConfig;
    use toolgate_core::SessionId;

    #[test]
    fn test_fetch_project_returns_record() {
        let server = McpServer::new(McpServerConfig::default()).unwrap();
        let call = ToolCall::new(
            "fetch_project",
            SessionId::new("sess-1"),
            serde_json::json!({"project_id": "proj-acme-1", "api_key": "key-acme"}),
        );
        let result = fetch_project(&server, &call).unwrap();
        assert_eq!(result["name"], "Checkout revamp");
        // The response never echoes the tenant or the api key.
        assert!(result.get("tenant").is_none());
        assert!(result.get("api_key").is_none());
    }
}
