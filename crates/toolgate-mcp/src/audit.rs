//! Audit recording for tool invocations.
//!
//! Every invocation is recorded atomically before the response is returned.
//! Entries are hash-chained for tamper evidence: each entry's hash covers
//! the previous entry's hash plus its own serialized content (minus the
//! hash member itself), and is stored on the entry so the whole chain can
//! be recomputed and verified later.

use sha2::{Digest, Sha256};
use std::sync::Mutex;

use crate::error::{McpError, McpResult};
use crate::types::AuditEntry;

/// Entries plus the chain head, guarded together so concurrent records
/// cannot chain to the same predecessor.
struct ChainState {
    entries: Vec<AuditEntry>,
    head: Option<[u8; 32]>,
}

/// Thread-safe audit log that stores entries in memory with hash chaining.
pub struct AuditLog {
    state: Mutex<ChainState>,
}

impl AuditLog {
    /// Create a new empty audit log.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChainState {
                entries: Vec::new(),
                head: None,
            }),
        }
    }

    /// Record an audit entry. Returns the entry's chain hash, which is also
    /// stored on the entry itself.
    ///
    /// Read-prev, append, and head update happen under one lock, so every
    /// entry chains to the entry stored immediately before it.
    pub fn record(&self, mut entry: AuditEntry) -> McpResult<String> {
        entry.hash.clear();
        let entry_json = serde_json::to_vec(&entry).map_err(|e| {
            McpError::AuditFailed(format!("failed to serialize audit entry: {}", e))
        })?;

        let mut state = self
            .state
            .lock()
            .map_err(|_| McpError::AuditFailed("lock poisoned".into()))?;

        let hash = chain_hash(state.head.as_ref(), &entry_json);
        let hash_hex = hex::encode(hash);

        entry.hash = hash_hex.clone();
        state.head = Some(hash);
        state.entries.push(entry);

        Ok(hash_hex)
    }

    /// Get all recorded audit entries.
    pub fn entries(&self) -> McpResult<Vec<AuditEntry>> {
        let state = self
            .state
            .lock()
            .map_err(|_| McpError::AuditFailed("lock poisoned".into()))?;
        Ok(state.entries.clone())
    }

    /// Get the number of recorded entries.
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    /// Check if the audit log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recompute the chain over the stored entries and compare it against
    /// each entry's stored hash and the current head. Returns `Ok(false)`
    /// if any entry was altered, reordered, or removed after recording.
    pub fn verify_chain(&self) -> McpResult<bool> {
        let state = self
            .state
            .lock()
            .map_err(|_| McpError::AuditFailed("lock poisoned".into()))?;

        let mut prev: Option<[u8; 32]> = None;
        for entry in state.entries.iter() {
            let mut unhashed = entry.clone();
            unhashed.hash.clear();
            let entry_json = serde_json::to_vec(&unhashed).map_err(|e| {
                McpError::AuditFailed(format!("failed to serialize for verification: {}", e))
            })?;

            let hash = chain_hash(prev.as_ref(), &entry_json);
            if hex::encode(hash) != entry.hash {
                return Ok(false);
            }
            prev = Some(hash);
        }

        Ok(prev == state.head)
    }
}

fn chain_hash(prev: Option<&[u8; 32]>, entry_json: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    if let Some(h) = prev {
        hasher.update(h);
    }
    hasher.update(entry_json);
    hasher.finalize().into()
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}
