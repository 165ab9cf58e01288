//! Argument format and length guards.

use regex::Regex;

use toolgate_gate::{Decision, DenyReason, GateResult, Guard, SessionContext, ToolCall};

/// Denies unless a name argument matches a compiled pattern.
///
/// The default constructor accepts only letters, digits, dots, underscores,
/// and dashes, which keeps the value safe to hand to anything
/// shell-adjacent downstream.
pub struct NameFormat {
    arg: &'static str,
    pattern: Regex,
    deny_message: String,
}

impl NameFormat {
    /// Shell-safe default: `^[A-Za-z0-9._-]+$`.
    pub fn shell_safe(arg: &'static str) -> Result<Self, regex::Error> {
        Self::new(
            arg,
            r"^[A-Za-z0-9._-]+$",
            format!("{} may only contain letters, numbers, dots, underscores, or dashes", arg),
        )
    }

    pub fn new(
        arg: &'static str,
        pattern: &str,
        deny_message: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            arg,
            pattern: Regex::new(pattern)?,
            deny_message: deny_message.into(),
        })
    }
}

impl Guard for NameFormat {
    fn name(&self) -> &'static str {
        "name_format"
    }

    fn check(&self, call: &ToolCall, _ctx: &SessionContext) -> GateResult<Decision> {
        let value = match call.arg_str(self.arg) {
            Some(v) => v,
            None => {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} is required",
                    self.arg
                ))));
            }
        };
        if self.pattern.is_match(value) {
            Ok(Decision::Allow)
        } else {
            Ok(Decision::Deny(DenyReason::Policy(self.deny_message.clone())))
        }
    }
}

/// Length bound for one string field.
#[derive(Debug, Clone)]
pub struct FieldLimit {
    pub arg: &'static str,
    pub max_chars: usize,
}

impl FieldLimit {
    pub fn new(arg: &'static str, max_chars: usize) -> Self {
        Self { arg, max_chars }
    }
}

/// Denies empty or over-length string fields.
///
/// Only declared fields are checked; absence is left to the argument
/// schema, so the guard composes with optional parameters.
pub struct FieldLimits {
    limits: Vec<FieldLimit>,
}

impl FieldLimits {
    pub fn new(limits: Vec<FieldLimit>) -> Self {
        Self { limits }
    }
}

impl Guard for FieldLimits {
    fn name(&self) -> &'static str {
        "field_limits"
    }

    fn check(&self, call: &ToolCall, _ctx: &SessionContext) -> GateResult<Decision> {
        for limit in &self.limits {
            let value = match call.arg_str(limit.arg) {
                Some(v) => v,
                None => continue,
            };
            if value.trim().is_empty() {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} must not be empty",
                    limit.arg
                ))));
            }
            if value.chars().count() > limit.max_chars {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} must be {} characters or fewer",
                    limit.arg, limit.max_chars
                ))));
            }
        }
        Ok(Decision::Allow)
    }
}
