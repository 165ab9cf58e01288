//! Repository initialization handler.

use serde_json::json;

use toolgate_gate::ToolCall;

use crate::error::{McpError, McpResult};
use crate::server::McpServer;

/// Record the new repository. The name-format guard has already confirmed
/// the name is safe to hand to tooling; nothing here is interpolated into
/// a shell.
pub fn init_repository(server: &McpServer, call: &ToolCall) -> McpResult<serde_json::Value> {
    let repo_name = call
        .arg_str("repo_name")
        .ok_or_else(|| McpError::InvalidRequest("repo_name is required".into()))?;

    let mut repos = server
        .stores()
        .repositories
        .lock()
        .map_err(|_| McpError::StorageError("lock poisoned".into()))?;
    if repos.iter().any(|r| r == repo_name) {
        return Err(McpError::ToolExecutionFailed(
            "repository already exists".into(),
        ));
    }
    repos.push(repo_name.to_string());

    Ok(json!({"status": "initialized", "repo_name": repo_name}))
}
