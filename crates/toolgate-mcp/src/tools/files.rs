//! Directory listing handler, confined to the sandbox files root.

use serde_json::json;

use toolgate_gate::ToolCall;
use toolgate_guards::path::resolve_within;

use crate::error::{McpError, McpResult};
use crate::server::McpServer;

/// List the entries of a directory under the files root. The containment
/// guard has already run; the handler resolves the path the same way, so
/// a miss here uses the guard's neutral message.
pub fn list_directory(server: &McpServer, call: &ToolCall) -> McpResult<serde_json::Value> {
    let path = call
        .arg_str("path")
        .ok_or_else(|| McpError::InvalidRequest("path is required".into()))?;

    let base = server
        .stores()
        .files_root
        .canonicalize()
        .map_err(|e| McpError::StorageError(format!("files root unavailable: {}", e)))?;
    let resolved = resolve_within(&base, path)
        .ok_or_else(|| McpError::AccessDenied("path not found".into()))?;

    let mut entries: Vec<String> = std::fs::read_dir(&resolved)
        .map_err(|_| McpError::ToolExecutionFailed("not a directory".into()))?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();

    Ok(json!({
        "path": path,
        "entries": entries,
        "count": entries.len(),
    }))
}
