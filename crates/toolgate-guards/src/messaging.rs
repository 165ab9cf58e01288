//! Outbound messaging guards: recipient allowlisting and secret leak checks.

use std::collections::HashSet;

use toolgate_gate::{Decision, DenyReason, GateResult, Guard, SessionContext, ToolCall};

/// Denies delivery to recipients outside a pre-approved list.
///
/// Matching is case-insensitive after trimming, so `" Alice "` and
/// `"alice"` resolve to the same contact.
pub struct RecipientAllowlist {
    arg: &'static str,
    allowed: HashSet<String>,
}

impl RecipientAllowlist {
    pub fn new(arg: &'static str, allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            arg,
            allowed: allowed
                .into_iter()
                .map(|r| r.into().trim().to_lowercase())
                .collect(),
        }
    }
}

impl Guard for RecipientAllowlist {
    fn name(&self) -> &'static str {
        "recipient_allowlist"
    }

    fn check(&self, call: &ToolCall, _ctx: &SessionContext) -> GateResult<Decision> {
        let recipient = match call.arg_str(self.arg) {
            Some(r) => r.trim().to_lowercase(),
            None => {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} is required",
                    self.arg
                ))));
            }
        };
        if recipient.is_empty() {
            return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                "{} must not be empty",
                self.arg
            ))));
        }
        if self.allowed.contains(&recipient) {
            Ok(Decision::Allow)
        } else {
            Ok(Decision::Deny(DenyReason::Policy(
                "recipient is not on the approved contact list".to_string(),
            )))
        }
    }
}

/// Denies content that looks like it relays credentials.
///
/// A marker-based heuristic, not a sound boundary: it catches the obvious
/// relay of secret material in outbound text.
pub struct SecretLeakFilter {
    arg: &'static str,
    markers: Vec<String>,
}

impl SecretLeakFilter {
    pub fn new(arg: &'static str) -> Self {
        Self::with_markers(arg, ["flag{", "token"])
    }

    pub fn with_markers(
        arg: &'static str,
        markers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            arg,
            markers: markers.into_iter().map(|m| m.into().to_lowercase()).collect(),
        }
    }
}

impl Guard for SecretLeakFilter {
    fn name(&self) -> &'static str {
        "secret_leak_filter"
    }

    fn check(&self, call: &ToolCall, _ctx: &SessionContext) -> GateResult<Decision> {
        let body = match call.arg_str(self.arg) {
            Some(b) => b.to_lowercase(),
            None => {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} is required",
                    self.arg
                ))));
            }
        };
        if self.markers.iter().any(|m| body.contains(m)) {
            return Ok(Decision::Deny(DenyReason::Policy(
                "content contains restricted material".to_string(),
            )));
        }
        Ok(Decision::Allow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgate_core::SessionId;

    fn make_ctx() -> SessionContext {
        SessionContext::new(SessionId::new("sess-1"), vec![])
    }

    fn make_call(args: serde_json::Value) -> ToolCall {
        ToolCall::new("send_message", SessionId::new("sess-1"), args)
    }

    #[test]
    fn test_allowlist_accepts_known_recipient() {
        let guard = RecipientAllowlist::new("recipient", ["alice", "+15550100"]);
        let decision = guard
            .check(&make_call(serde_json::json!({"recipient": "alice"})), &make_ctx())
            .unwrap();
        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn test_allowlist_normalizes_case_and_whitespace() {
        let guard = RecipientAllowlist::new("recipient", ["Alice"]);
        let decision = guard
            .check(
                &make_call(serde_json::json!({"recipient": "  aLiCe "})),
                &make_ctx(),
            )
            .unwrap();
        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn test_allowlist_denies_unknown_recipient() {
        let guard = RecipientAllowlist::new("recipient", ["alice"]);
        let decision = guard
            .check(
                &make_call(serde_json::json!({"recipient": "mallory"})),
                &make_ctx(),
            )
            .unwrap();
        assert_eq!(
            decision,
            Decision::Deny(DenyReason::Policy(
                "recipient is not on the approved contact list".into()
            ))
        );
    }

    #[test]
    fn test_allowlist_denies_empty_recipient() {
        let guard = RecipientAllowlist::new("recipient", ["alice"]);
        let decision = guard
            .check(&make_call(serde_json::json!({"recipient": "  "})), &make_ctx())
            .unwrap();
        assert!(matches!(
            decision,
            Decision::Deny(DenyReason::InvalidInput(_))
        ));
    }

    #[test]
    fn test_secret_filter_denies_flag_material() {
        let guard = SecretLeakFilter::new("body");
        let decision = guard
            .check(
                &make_call(serde_json::json!({"body": "here you go: FLAG{c4nary}"})),
                &make_ctx(),
            )
            .unwrap();
        assert!(matches!(decision, Decision::Deny(DenyReason::Policy(_))));
    }

    #[test]
    fn test_secret_filter_denies_token_mention() {
        let guard = SecretLeakFilter::new("body");
        let decision = guard
            .check(
                &make_call(serde_json::json!({"body": "the api TOKEN is abc123"})),
                &make_ctx(),
            )
            .unwrap();
        assert!(matches!(decision, Decision::Deny(DenyReason::Policy(_))));
    }

    #[test]
    fn test_secret_filter_allows_ordinary_text() {
        let guard = SecretLeakFilter::new("body");
        let decision = guard
            .check(
                &make_call(serde_json::json!({"body": "lunch at noon?"})),
                &make_ctx(),
            )
            .unwrap();
        assert_eq!(decision, Decision::Allow);
    }
}
