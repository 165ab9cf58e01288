//! Read-only SQL validation.

use toolgate_gate::{Decision, DenyReason, GateResult, Guard, SessionContext, ToolCall};

const DENY_MESSAGE: &str = "only a single read-only SELECT statement is permitted";

/// Write and DDL keywords rejected as whole tokens anywhere in the statement.
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "insert", "update", "delete", "drop", "alter", "create", "replace", "attach", "detach",
    "pragma", "vacuum", "reindex",
];

/// Permits exactly one SELECT statement with no separators and no
/// write or DDL keywords.
///
/// This blocks stacked statements (`SELECT 1; DROP TABLE t`) and writes
/// smuggled through a "query" argument. Column or table names that merely
/// contain a forbidden word (e.g. `created_at`) pass, because the check
/// is token-based.
pub struct ReadOnlyStatement {
    arg: &'static str,
}

impl ReadOnlyStatement {
    pub fn new(arg: &'static str) -> Self {
        Self { arg }
    }
}

impl Guard for ReadOnlyStatement {
    fn name(&self) -> &'static str {
        "read_only_statement"
    }

    fn check(&self, call: &ToolCall, _ctx: &SessionContext) -> GateResult<Decision> {
        let sql = match call.arg_str(self.arg) {
            Some(s) => s.trim(),
            None => {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} is required",
                    self.arg
                ))));
            }
        };
        if sql.is_empty() {
            return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                "{} must not be empty",
                self.arg
            ))));
        }

        let lowered = sql.to_lowercase();
        if !lowered.starts_with("select") {
            return Ok(Decision::Deny(DenyReason::Policy(DENY_MESSAGE.into())));
        }
        if lowered.contains(';') {
            return Ok(Decision::Deny(DenyReason::Policy(DENY_MESSAGE.into())));
        }

        let has_forbidden = lowered
            .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .any(|token| FORBIDDEN_KEYWORDS.contains(&token));
        if has_forbidden {
            return Ok(Decision::Deny(DenyReason::Policy(DENY_MESSAGE.into())));
        }

        Ok(Decision::Allow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgate_core::SessionId;

    fn check(sql: &str) -> Decision {
        let guard = ReadOnlyStatement::new("sql");
        let call = ToolCall::new(
            "run_query",
            SessionId::new("sess-1"),
            serde_json::json!({"sql": sql}),
        );
        let ctx = SessionContext::new(SessionId::new("sess-1"), vec![]);
        guard.check(&call, &ctx).unwrap()
    }

    #[test]
    fn test_plain_select_allows() {
        assert_eq!(check("SELECT id, title FROM tickets"), Decision::Allow);
        assert_eq!(
            check("select * from tickets where status = 'open'"),
            Decision::Allow
        );
    }

    #[test]
    fn test_stacked_statements_deny() {
        assert!(matches!(
            check("SELECT 1; DROP TABLE tickets"),
            Decision::Deny(DenyReason::Policy(_))
        ));
        assert!(matches!(
            check("SELECT 1;"),
            Decision::Deny(DenyReason::Policy(_))
        ));
    }

    #[test]
    fn test_non_select_denies() {
        assert!(matches!(
            check("DELETE FROM tickets"),
            Decision::Deny(DenyReason::Policy(_))
        ));
        assert!(matches!(
            check("PRAGMA table_info(tickets)"),
            Decision::Deny(DenyReason::Policy(_))
        ));
    }

    #[test]
    fn test_write_keyword_inside_select_denies() {
        assert!(matches!(
            check("SELECT * FROM tickets WHERE id IN (DELETE FROM tickets)"),
            Decision::Deny(DenyReason::Policy(_))
        ));
    }

    #[test]
    fn test_identifier_containing_keyword_allows() {
        // `created_at` contains "create" as a substring but not as a token.
        assert_eq!(
            check("SELECT created_at FROM tickets"),
            Decision::Allow
        );
    }

    #[test]
    fn test_empty_sql_is_invalid_input() {
        assert!(matches!(
            check("   "),
            Decision::Deny(DenyReason::InvalidInput(_))
        ));
    }
}
