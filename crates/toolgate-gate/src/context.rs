//! Per-session mutable context and its thread-safe store.
//!
//! The context is the only mutable state the gate touches. Two invariants
//! hold for the lifetime of a session: flags are monotonic (set once, never
//! cleared) and a revoked permission can never be re-granted. Reconnecting
//! with a fresh session id is the only reset.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use toolgate_core::{FlagName, PermissionName, SessionId, Timestamp};

use crate::error::{GateError, GateResult};

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// Mutable per-session state consulted by guards and mutated by effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: SessionId,
    flags: HashSet<FlagName>,
    permissions: HashSet<PermissionName>,
    revoked: HashSet<PermissionName>,
    counters: HashMap<String, u64>,
    pub created_at: Timestamp,
}

impl SessionContext {
    pub fn new(session_id: SessionId, permissions: Vec<PermissionName>) -> Self {
        Self {
            session_id,
            flags: HashSet::new(),
            permissions: permissions.into_iter().collect(),
            revoked: HashSet::new(),
            counters: HashMap::new(),
            created_at: Timestamp::now(),
        }
    }

    pub fn has_flag(&self, flag: &FlagName) -> bool {
        self.flags.contains(flag)
    }

    /// Set a flag. Idempotent; there is deliberately no way to clear one.
    pub fn set_flag(&mut self, flag: FlagName) {
        self.flags.insert(flag);
    }

    /// A permission counts as held only if it was granted and never revoked.
    pub fn has_permission(&self, permission: &PermissionName) -> bool {
        self.permissions.contains(permission) && !self.revoked.contains(permission)
    }

    /// Grant a permission. Returns false without granting if the permission
    /// was previously revoked in this session.
    pub fn grant_permission(&mut self, permission: PermissionName) -> bool {
        if self.revoked.contains(&permission) {
            return false;
        }
        self.permissions.insert(permission);
        true
    }

    /// Revoke a permission for the remainder of the session.
    pub fn revoke_permission(&mut self, permission: PermissionName) {
        self.permissions.remove(&permission);
        self.revoked.insert(permission);
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn increment_counter(&mut self, name: &str) {
        let entry = self.counters.entry(name.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
    }
}

// ---------------------------------------------------------------------------
// ContextStore
// ---------------------------------------------------------------------------

/// Thread-safe store of session contexts.
///
/// A single mutex covers the whole map, so guard evaluation plus effect
/// application happens atomically per call: concurrent calls on the same
/// session serialize their read-modify-write.
pub struct ContextStore {
    sessions: Mutex<HashMap<SessionId, SessionContext>>,
    default_permissions: Vec<PermissionName>,
}

impl ContextStore {
    pub fn new(default_permissions: Vec<PermissionName>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            default_permissions,
        }
    }

    /// Run `f` against the session's context, creating the context with the
    /// store's default permissions if this is the session's first call.
    pub fn with_session<R>(
        &self,
        session_id: &SessionId,
        f: impl FnOnce(&mut SessionContext) -> R,
    ) -> GateResult<R> {
        let mut sessions = self.sessions.lock().map_err(|_| GateError::ContextLock)?;
        let ctx = sessions.entry(session_id.clone()).or_insert_with(|| {
            SessionContext::new(session_id.clone(), self.default_permissions.clone())
        });
        Ok(f(ctx))
    }

    /// Snapshot a session's context, if it exists.
    pub fn snapshot(&self, session_id: &SessionId) -> GateResult<Option<SessionContext>> {
        let sessions = self.sessions.lock().map_err(|_| GateError::ContextLock)?;
        Ok(sessions.get(session_id).cloned())
    }

    /// Drop a session entirely. A later call with the same id starts fresh.
    pub fn remove(&self, session_id: &SessionId) -> GateResult<()> {
        let mut sessions = self.sessions.lock().map_err(|_| GateError::ContextLock)?;
        sessions.remove(session_id);
        Ok(())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }
}
