//! Domain types for the policy gate.

use serde::{Deserialize, Serialize};
use std::fmt;

use toolgate_core::{FlagName, PermissionName, SessionId};

use crate::context::SessionContext;
use crate::error::GateResult;

// ---------------------------------------------------------------------------
// ToolCall — a proposed tool invocation
// ---------------------------------------------------------------------------

/// A proposed tool invocation: name, JSON arguments, and the calling session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: serde_json::Value,
    pub session_id: SessionId,
}

impl ToolCall {
    pub fn new(
        name: impl Into<String>,
        session_id: SessionId,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            arguments,
            session_id,
        }
    }

    /// Fetch a string argument by name.
    pub fn arg_str(&self, name: &str) -> Option<&str> {
        self.arguments.get(name)?.as_str()
    }

    /// Fetch an unsigned integer argument by name.
    pub fn arg_u64(&self, name: &str) -> Option<u64> {
        self.arguments.get(name)?.as_u64()
    }
}

// ---------------------------------------------------------------------------
// Decision and DenyReason
// ---------------------------------------------------------------------------

/// Outcome of a single guard or of a full chain evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Why a call was denied.
///
/// Display strings are stable and safe to return to callers. Guards that
/// look up resources must use the same `Policy` message for "not found"
/// and "unauthorized" so callers cannot enumerate foreign resources.
/// `Internal` carries no detail; the cause is logged server-side only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenyReason {
    InvalidInput(String),
    Policy(String),
    Internal,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            DenyReason::Policy(msg) => write!(f, "{}", msg),
            DenyReason::Internal => write!(f, "internal error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Effect — declared context mutation applied after an allowed call
// ---------------------------------------------------------------------------

/// A context mutation declared alongside a guard chain.
///
/// Effects apply exactly once, in declaration order, after every guard in
/// the chain allows. Flag effects are idempotent; counter effects are
/// cumulative. Revocation is permanent for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    AddFlag(FlagName),
    RevokePermissions(Vec<PermissionName>),
    IncrementCounter(String),
}

// ---------------------------------------------------------------------------
// Verdict — the gate's answer for one call
// ---------------------------------------------------------------------------

/// The gate's answer for a single call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deny: Option<DenyReason>,
}

impl Verdict {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            deny: None,
        }
    }

    pub fn deny(reason: DenyReason) -> Self {
        Self {
            allowed: false,
            deny: Some(reason),
        }
    }

    /// Caller-safe reason string, if denied.
    pub fn reason(&self) -> Option<String> {
        self.deny.as_ref().map(|d| d.to_string())
    }
}

// ---------------------------------------------------------------------------
// Guard trait
// ---------------------------------------------------------------------------

/// A named predicate over a tool call and the caller's session context.
///
/// Guards are pure over their inputs: they never mutate the context and
/// never panic on malformed input. Unexpected internal failure is returned
/// as `Err`, which the gate converts into a logged deny.
pub trait Guard: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, call: &ToolCall, ctx: &SessionContext) -> GateResult<Decision>;
}
