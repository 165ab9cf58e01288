//! Invocation pipeline: gate evaluation, execution, audit.
//!
//! The audit entry is appended before the outcome is returned, for both
//! allowed and denied calls, so the log is a complete record of what the
//! gate decided.

use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, warn};

use toolgate_core::{RequestId, Timestamp};
use toolgate_gate::{DenyReason, ToolCall};

use crate::error::{McpError, McpResult};
use crate::server::McpServer;
use crate::tools;
use crate::types::AuditEntry;

/// Run one tool call through the gate and, if allowed, execute it.
pub fn process_tool_call(
    server: &McpServer,
    call: &ToolCall,
    request_id: &RequestId,
) -> McpResult<serde_json::Value> {
    let started = Instant::now();

    let verdict = server.gate().evaluate(call)?;

    if !verdict.allowed {
        let reason = verdict.reason();
        warn!(
            tool = %call.name,
            session = %call.session_id,
            reason = reason.as_deref().unwrap_or(""),
            "call denied"
        );
        record(server, call, request_id, "deny", reason.clone(), &started)?;
        return Err(deny_to_error(verdict.deny));
    }

    let result = tools::dispatch_tool(server, call);
    let failure = result.as_ref().err().map(|e| e.to_string());
    record(server, call, request_id, "allow", failure, &started)?;

    info!(tool = %call.name, session = %call.session_id, "call executed");
    result
}

fn deny_to_error(deny: Option<DenyReason>) -> McpError {
    match deny {
        Some(DenyReason::InvalidInput(msg)) => McpError::InvalidRequest(msg),
        Some(DenyReason::Policy(msg)) => McpError::AccessDenied(msg),
        Some(DenyReason::Internal) | None => McpError::Internal("gate denied internally".into()),
    }
}

fn record(
    server: &McpServer,
    call: &ToolCall,
    request_id: &RequestId,
    decision: &str,
    reason: Option<String>,
    started: &Instant,
) -> McpResult<()> {
    let entry = AuditEntry {
        entry_id: uuid::Uuid::new_v4().to_string(),
        session_id: call.session_id.clone(),
        request_id: request_id.clone(),
        tool: call.name.clone(),
        decision: decision.to_string(),
        reason,
        timestamp: Timestamp::now(),
        duration_ms: started.elapsed().as_millis() as u64,
        metadata: HashMap::new(),
        hash: String::new(),
    };
    server.audit().record(entry)?;
    Ok(())
}
