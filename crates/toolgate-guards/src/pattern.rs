//! Regex complexity limits.
//!
//! Backtracking engines blow up on patterns like `(a+)+` against
//! non-matching input. Even on a linear-time engine, oversized patterns
//! and deep group nesting burn memory at compile time, so the guard
//! bounds length and group count and rejects the classic catastrophic
//! shapes outright.

use regex::Regex;

use toolgate_gate::{Decision, DenyReason, GateResult, Guard, SessionContext, ToolCall};

/// Quantifier immediately following a quantified group, e.g. `(a+)+`.
const NESTED_QUANTIFIER_SHAPES: &[&str] = &["+)+", "*)+", "+)*", "*)*"];

/// Two bare quantifiers back to back, e.g. `a++` or `a*+`.
const OVERLAPPING_QUANTIFIER_SHAPES: &[&str] = &["++", "**", "+*", "*+"];

/// Bounds pattern length and capturing groups, and rejects nested or
/// overlapping quantifiers. The pattern must also compile.
pub struct PatternComplexity {
    arg: &'static str,
    max_length: usize,
    max_groups: usize,
}

impl PatternComplexity {
    pub fn new(arg: &'static str) -> Self {
        Self::with_limits(arg, 128, 12)
    }

    pub fn with_limits(arg: &'static str, max_length: usize, max_groups: usize) -> Self {
        Self {
            arg,
            max_length,
            max_groups,
        }
    }

    fn capturing_groups(pattern: &str) -> usize {
        let bytes = pattern.as_bytes();
        let mut count = 0;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 1,
                b'(' => {
                    if bytes.get(i + 1) != Some(&b'?') {
                        count += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        count
    }
}

impl Guard for PatternComplexity {
    fn name(&self) -> &'static str {
        "pattern_complexity"
    }

    fn check(&self, call: &ToolCall, _ctx: &SessionContext) -> GateResult<Decision> {
        let pattern = match call.arg_str(self.arg) {
            Some(p) => p,
            None => {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} is required",
                    self.arg
                ))));
            }
        };

        if pattern.is_empty() {
            return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                "{} must not be empty",
                self.arg
            ))));
        }
        if pattern.len() > self.max_length {
            return Ok(Decision::Deny(DenyReason::Policy(format!(
                "pattern exceeds {} characters",
                self.max_length
            ))));
        }
        if Self::capturing_groups(pattern) > self.max_groups {
            return Ok(Decision::Deny(DenyReason::Policy(format!(
                "pattern exceeds {} capturing groups",
                self.max_groups
            ))));
        }
        if NESTED_QUANTIFIER_SHAPES.iter().any(|s| pattern.contains(s)) {
            return Ok(Decision::Deny(DenyReason::Policy(
                "pattern contains a nested quantifier".to_string(),
            )));
        }
        if OVERLAPPING_QUANTIFIER_SHAPES
            .iter()
            .any(|s| pattern.contains(s))
        {
            return Ok(Decision::Deny(DenyReason::Policy(
                "pattern contains overlapping quantifiers".to_string(),
            )));
        }
        if Regex::new(pattern).is_err() {
            return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                "{} is not a valid pattern",
                self.arg
            ))));
        }

        Ok(Decision::Allow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgate_core::SessionId;

    fn check(pattern: &str) -> Decision {
        let guard = PatternComplexity::new("pattern");
        let call = ToolCall::new(
            "search_logs",
            SessionId::new("sess-1"),
            serde_json::json!({"pattern": pattern}),
        );
        let ctx = SessionContext::new(SessionId::new("sess-1"), vec![]);
        guard.check(&call, &ctx).unwrap()
    }

    #[test]
    fn test_reasonable_patterns_allow() {
        assert_eq!(check(r"error \d+"), Decision::Allow);
        assert_eq!(check(r"(GET|POST) /api/\w+"), Decision::Allow);
        assert_eq!(check(r"timeout after (\d+)ms"), Decision::Allow);
    }

    #[test]
    fn test_nested_quantifier_denies() {
        assert!(matches!(
            check("(a+)+"),
            Decision::Deny(DenyReason::Policy(_))
        ));
        assert!(matches!(
            check("(x*)*y"),
            Decision::Deny(DenyReason::Policy(_))
        ));
    }

    #[test]
    fn test_overlapping_quantifiers_deny() {
        assert!(matches!(
            check("a++b"),
            Decision::Deny(DenyReason::Policy(_))
        ));
        assert!(matches!(
            check("a*+"),
            Decision::Deny(DenyReason::Policy(_))
        ));
    }

    #[test]
    fn test_oversized_pattern_denies() {
        let long = "a".repeat(129);
        assert!(matches!(
            check(&long),
            Decision::Deny(DenyReason::Policy(_))
        ));
    }

    #[test]
    fn test_too_many_groups_denies() {
        let groups = "(a)".repeat(13);
        assert!(matches!(
            check(&groups),
            Decision::Deny(DenyReason::Policy(_))
        ));
    }

    #[test]
    fn test_non_capturing_groups_not_counted() {
        let groups = "(?:a)".repeat(13);
        assert_eq!(check(&groups), Decision::Allow);
    }

    #[test]
    fn test_escaped_paren_not_counted() {
        assert_eq!(PatternComplexity::capturing_groups(r"\(a\)(b)"), 1);
    }

    #[test]
    fn test_invalid_pattern_is_invalid_input() {
        assert!(matches!(
            check("[unclosed"),
            Decision::Deny(DenyReason::InvalidInput(_))
        ));
    }
}
