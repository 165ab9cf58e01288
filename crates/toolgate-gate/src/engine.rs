//! Gate evaluation engine.
//!
//! `PolicyGate::evaluate` runs one call through its registered chain:
//! schema validation first, then guards in registration order with
//! short-circuit on the first deny, then effects exactly once if every
//! guard allowed. Every evaluation emits an audit event before returning.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use toolgate_core::{PermissionName, SessionId, Timestamp};

use crate::context::ContextStore;
use crate::error::{GateError, GateResult};
use crate::registry::GateRegistry;
use crate::types::{Decision, DenyReason, Effect, ToolCall, Verdict};

// ---------------------------------------------------------------------------
// AuditSink trait — gate audit event emission
// ---------------------------------------------------------------------------

/// How one evaluation ended, for audit purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateOutcome {
    Allowed,
    DeniedInvalidInput,
    DeniedPolicy,
    DeniedInternal,
}

/// One audit record per evaluation, allow or deny.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateAuditEvent {
    pub tool: String,
    pub session_id: SessionId,
    pub outcome: GateOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: Timestamp,
}

/// Trait for emitting gate audit events.
///
/// Events are emitted before `evaluate` returns, so a sink that persists
/// synchronously gets a write-ahead record of every decision.
pub trait AuditSink: Send + Sync {
    fn emit(&self, event: &GateAuditEvent) -> Result<(), String>;
}

/// In-memory audit sink for tests and for serving recent decisions.
#[derive(Default)]
pub struct InMemoryAuditSink {
    events: Mutex<Vec<GateAuditEvent>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<GateAuditEvent> {
        self.events
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl AuditSink for InMemoryAuditSink {
    fn emit(&self, event: &GateAuditEvent) -> Result<(), String> {
        self.events
            .lock()
            .map_err(|_| "audit sink lock poisoned".to_string())?
            .push(event.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PolicyGate
// ---------------------------------------------------------------------------

/// The policy gate: registry + context store + audit sink.
pub struct PolicyGate {
    registry: GateRegistry,
    contexts: ContextStore,
    audit_sink: Arc<dyn AuditSink>,
}

impl PolicyGate {
    pub fn new(
        registry: GateRegistry,
        default_permissions: Vec<PermissionName>,
        audit_sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            registry,
            contexts: ContextStore::new(default_permissions),
            audit_sink,
        }
    }

    pub fn registry(&self) -> &GateRegistry {
        &self.registry
    }

    pub fn contexts(&self) -> &ContextStore {
        &self.contexts
    }

    /// Evaluate one call against its registered chain.
    ///
    /// The session's context is created on first use and held locked for
    /// the whole evaluation, so guards plus effects are atomic per call.
    /// Unregistered names deny; the message does not echo the name back.
    pub fn evaluate(&self, call: &ToolCall) -> GateResult<Verdict> {
        let chain = self.registry.chain(&call.name);

        let decision = self.contexts.with_session(&call.session_id, |ctx| {
            let chain = match chain {
                Some(c) => c,
                None => {
                    return Decision::Deny(DenyReason::Policy(
                        "tool is not registered".to_string(),
                    ));
                }
            };

            if let Err(msg) = chain.schema.validate(&call.arguments) {
                return Decision::Deny(DenyReason::InvalidInput(msg));
            }

            for guard in &chain.guards {
                match guard.check(call, ctx) {
                    Ok(Decision::Allow) => {}
                    Ok(Decision::Deny(reason)) => {
                        debug!(
                            tool = %call.name,
                            guard = guard.name(),
                            "guard denied call"
                        );
                        return Decision::Deny(reason);
                    }
                    Err(e) => {
                        error!(
                            tool = %call.name,
                            guard = guard.name(),
                            error = %e,
                            "guard failed; denying call"
                        );
                        return Decision::Deny(DenyReason::Internal);
                    }
                }
            }

            // All guards allowed: apply effects exactly once, in order.
            for effect in &chain.effects {
                match effect {
                    Effect::AddFlag(flag) => ctx.set_flag(flag.clone()),
                    Effect::RevokePermissions(perms) => {
                        for perm in perms {
                            ctx.revoke_permission(perm.clone());
                        }
                    }
                    Effect::IncrementCounter(name) => ctx.increment_counter(name),
                }
            }

            Decision::Allow
        })?;

        let (outcome, reason) = match &decision {
            Decision::Allow => (GateOutcome::Allowed, None),
            Decision::Deny(DenyReason::InvalidInput(msg)) => {
                (GateOutcome::DeniedInvalidInput, Some(msg.clone()))
            }
            Decision::Deny(DenyReason::Policy(msg)) => {
                (GateOutcome::DeniedPolicy, Some(msg.clone()))
            }
            Decision::Deny(DenyReason::Internal) => (GateOutcome::DeniedInternal, None),
        };

        let event = GateAuditEvent {
            tool: call.name.clone(),
            session_id: call.session_id.clone(),
            outcome,
            reason,
            timestamp: Timestamp::now(),
        };
        self.audit_sink
            .emit(&event)
            .map_err(GateError::AuditSink)?;

        Ok(match decision {
            Decision::Allow => Verdict::allow(),
            Decision::Deny(reason) => Verdict::deny(reason),
        })
    }
}
