//! Article fetch handler.

use serde_json::json;

use toolgate_gate::ToolCall;

use crate::error::{McpError, McpResult};
use crate::server::McpServer;

/// Return the article body for an allow-listed URL. By the time this runs
/// the gate has already flagged the session as having viewed untrusted
/// content.
pub fn fetch_article(server: &McpServer, call: &ToolCall) -> McpResult<serde_json::Value> {
    let url = call
        .arg_str("url")
        .ok_or_else(|| McpError::InvalidRequest("url is required".into()))?;

    let article = server
        .stores()
        .articles
        .get(url)
        .ok_or_else(|| McpError::ToolExecutionFailed("article not found".into()))?;

    Ok(json!({
        "url": article.url,
        "title": article.title,
        "body": article.body,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::McpServerConfig;
    use toolgate_core::SessionId;

    #[test]
    fn test_fetch_article_returns_fixture() {
        let server = McpServer::new(McpServerConfig::default()).unwrap();
        let call = ToolCall::new(
            "fetch_article",
            SessionId::new("sess-1"),
            serde_json::json!({"url": "https://docs.example.com/getting-started"}),
        );
        let result = fetch_article(&server, &call).unwrap();
        assert_eq!(result["title"], "Getting started");
    }

    #[test]
    fn test_fetch_article_missing_url() {
        let server = McpServer::new(McpServerConfig::default()).unwrap();
        let call = ToolCall::new(
            "fetch_article",
            SessionId::new("sess-1"),
            serde_json::json!({"url": "https://news.example.com/not-there"}),
        );
        assert!(fetch_article(&server, &call).is_err());
    }
}
