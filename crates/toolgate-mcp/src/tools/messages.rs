//! Outbound message handler.

use serde_json::json;

use toolgate_gate::ToolCall;

use crate::error::{McpError, McpResult};
use crate::server::McpServer;
use crate::stores::OutboundMessage;

/// Queue a message for an approved recipient.
pub fn send_message(server: &McpServer, call: &ToolCall) -> McpResult<serde_json::Value> {
    let recipient = call
        .arg_str("recipient")
        .ok_or_else(|| McpError::InvalidRequest("recipient is required".into()))?;
    let body = call
        .arg_str("body")
        .ok_or_else(|| McpError::InvalidRequest("body is required".into()))?;

    let mut outbox = server
        .stores()
        .outbox
        .lock()
        .map_err(|_| McpError::StorageError("lock poisoned".into()))?;
    outbox.push(OutboundMessage {
        recipient: recipient.to_string(),
        body: body.to_string(),
    });
    let queued = outbox.len();

    Ok(json!({"status": "queued", "queue_length": queued}))
}
