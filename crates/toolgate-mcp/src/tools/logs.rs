//! Log search handler.

use regex::Regex;
use serde_json::json;

use toolgate_gate::ToolCall;

use crate::error::{McpError, McpResult};
use crate::server::McpServer;

const DEFAULT_MAX_MATCHES: u64 = 20;
const MATCH_CAP: u64 = 100;

/// Match the vetted pattern against the fixture log lines.
pub fn search_logs(server: &McpServer, call: &ToolCall) -> McpResult<serde_json::Value> {
    let pattern = call
        .arg_str("pattern")
        .ok_or_else(|| McpError::InvalidRequest("pattern is required".into()))?;
    let max_matches = call
        .arg_u64("max_matches")
        .unwrap_or(DEFAULT_MAX_MATCHES)
        .min(MATCH_CAP) as usize;

    // The complexity guard already compiled this pattern once; a failure
    // here means the guard and handler disagree, which is a server bug.
    let regex = Regex::new(pattern)
        .map_err(|e| McpError::ToolExecutionFailed(format!("pattern failed: {}", e)))?;

    let matches: Vec<&String> = server
        .stores()
        .log_lines
        .iter()
        .filter(|line| regex.is_match(line))
        .take(max_matches)
        .collect();

    Ok(json!({"matches": matches, "count": matches.len()}))
}
