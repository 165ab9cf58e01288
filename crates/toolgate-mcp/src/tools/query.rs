//! Read-only SQL handler.

use rusqlite::types::ValueRef;
use serde_json::json;

use toolgate_gate::ToolCall;

use crate::error::{McpError, McpResult};
use crate::server::McpServer;

const MAX_ROWS: usize = 50;

/// Execute the already-vetted SELECT against the ticket database.
pub fn run_query(server: &McpServer, call: &ToolCall) -> McpResult<serde_json::Value> {
    let sql = call
        .arg_str("sql")
        .ok_or_else(|| McpError::InvalidRequest("sql is required".into()))?;

    let conn = server
        .stores()
        .tickets
        .lock()
        .map_err(|_| McpError::StorageError("lock poisoned".into()))?;

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| McpError::ToolExecutionFailed(format!("query failed: {}", e)))?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut rows = stmt
        .query([])
        .map_err(|e| McpError::ToolExecutionFailed(format!("query failed: {}", e)))?;

    let mut out = Vec::new();
    while let Some(row) = rows
        .next()
        .map_err(|e| McpError::ToolExecutionFailed(format!("query failed: {}", e)))?
    {
        if out.len() >= MAX_ROWS {
            break;
        }
        let mut record = serde_json::Map::new();
        for (i, column) in columns.iter().enumerate() {
            let value = match row.get_ref(i) {
                Ok(ValueRef::Null) => serde_json::Value::Null,
                Ok(ValueRef::Integer(n)) => json!(n),
                Ok(ValueRef::Real(f)) => json!(f),
                Ok(ValueRef::Text(t)) => json!(String::from_utf8_lossy(t)),
                Ok(ValueRef::Blob(b)) => json!(hex::encode(b)),
                Err(e) => {
                    return Err(McpError::ToolExecutionFailed(format!("query failed: {}", e)))
                }
            };
            record.insert(column.clone(), value);
        }
        out.push(serde_json::Value::Object(record));
    }

    Ok(json!({"columns": columns, "rows": out}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::McpServerConfig;
    use toolgate_core::SessionId;

    fn make_call(sql: &str) -> ToolCall {
        ToolCall::new(
            "run_query",
            SessionId::new("sess-1"),
            serde_json::json!({"sql": sql}),
        )
    }

    #[test]
    fn test_run_query_returns_rows() {
        let server = McpServer::new(McpServerConfig::default()).unwrap();
        let result = run_query(
            &server,
            &make_call("SELECT id, title FROM tickets WHERE status = 'open' ORDER BY id"),
        )
        .unwrap();
        assert_eq!(result["columns"], serde_json::json!(["id", "title"]));
        assert_eq!(result["rows"].as_array().unwrap().len(), 3);
        assert_eq!(result["rows"][0]["id"], 1);
    }

    #[test]
    fn test_run_query_null_assignee() {
        let server = McpServer::new(McpServerConfig::default()).unwrap();
        let result = run_query(
            &server,
            &make_call("SELECT assignee FROM tickets WHERE id = 4"),
        )
        .unwrap();
        assert!(result["rows"][0]["assignee"].is_null());
    }

    #[test]
    fn test_run_query_bad_sql_is_execution_failure() {
        let server = McpServer::new(McpServerConfig::default()).unwrap();
        let err = run_query(&server, &make_call("SELECT nope FROM tickets")).unwrap_err();
        assert!(matches!(err, McpError::ToolExecutionFailed(_)));
    }
}
