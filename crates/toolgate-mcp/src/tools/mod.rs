//! Tool handlers for the demonstration server.
//!
//! Handlers run only after the gate has allowed the call, so they assume
//! schema-valid arguments and enforce no policy of their own. Lookups that
//! miss still use the same neutral messages the guards use.

mod articles;
mod files;
mod logs;
mod messages;
mod projects;
mod query;
mod repos;
mod secrets;

use serde_json::json;

use toolgate_gate::ToolCall;

use crate::error::{McpError, McpResult};
use crate::server::McpServer;

/// All tool names the server dispatches, sorted.
pub const TOOL_NAMES: &[&str] = &[
    "fetch_article",
    "fetch_project",
    "init_repository",
    "list_directory",
    "read_secret",
    "run_query",
    "search_logs",
    "send_message",
];

/// Whether `method` names a dispatchable tool.
pub fn is_tool(method: &str) -> bool {
    TOOL_NAMES.contains(&method)
}

/// Execute an allowed tool call against the server's stores.
pub fn dispatch_tool(server: &McpServer, call: &ToolCall) -> McpResult<serde_json::Value> {
    match call.name.as_str() {
        "fetch_project" => projects::fetch_project(server, call),
        "send_message" => messages::send_message(server, call),
        "run_query" => query::run_query(server, call),
        "init_repository" => repos::init_repository(server, call),
        "search_logs" => logs::search_logs(server, call),
        "list_directory" => files::list_directory(server, call),
        "fetch_article" => articles::fetch_article(server, call),
        "read_secret" => secrets::read_secret(server, call),
        other => Err(McpError::MethodNotFound(other.to_string())),
    }
}

/// Descriptors for `tools/list`.
pub fn descriptors() -> serde_json::Value {
    json!([
        {
            "name": "fetch_project",
            "description": "Fetch a project record owned by the caller's tenant",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project_id": {"type": "string"},
                    "api_key": {"type": "string"}
                },
                "required": ["project_id", "api_key"]
            }
        },
        {
            "name": "send_message",
            "description": "Queue a message to an approved contact",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "recipient": {"type": "string"},
                    "body": {"type": "string"}
                },
                "required": ["recipient", "body"]
            }
        },
        {
            "name": "run_query",
            "description": "Run a read-only SELECT against the ticket database",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "sql": {"type": "string"}
                },
                "required": ["sql"]
            }
        },
        {
            "name": "init_repository",
            "description": "Initialize a repository with the given name",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "repo_name": {"type": "string"}
                },
                "required": ["repo_name"]
            }
        },
        {
            "name": "search_logs",
            "description": "Search server logs with a regular expression",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "pattern": {"type": "string"},
                    "max_matches": {"type": "integer"}
                },
                "required": ["pattern"]
            }
        },
        {
            "name": "list_directory",
            "description": "List a directory inside the sandboxed files root",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "path": {"type": "string"}
                },
                "required": ["path"]
            }
        },
        {
            "name": "fetch_article",
            "description": "Fetch an article from a trusted host",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "url": {"type": "string"}
                },
                "required": ["url"]
            }
        },
        {
            "name": "read_secret",
            "description": "Read a named secret",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"}
                },
                "required": ["name"]
            }
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_tool() {
        assert!(is_tool("run_query"));
        assert!(is_tool("read_secret"));
        assert!(!is_tool("initialize"));
        assert!(!is_tool("tools/list"));
    }

    #[test]
    fn test_descriptors_cover_every_tool() {
        let descriptors = descriptors();
        let listed: Vec<&str> = descriptors
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        for name in TOOL_NAMES {
            assert!(listed.contains(name), "missing descriptor for {}", name);
        }
        assert_eq!(listed.len(), TOOL_NAMES.len());
    }
}
