//! Tenant scoping for resource lookups.
//!
//! Mitigates the confused-deputy pattern where a caller passes someone
//! else's resource id alongside their own api key. The looked-up resource
//! must belong to the tenant the key maps to, and the deny message for a
//! foreign resource is byte-identical to the one for a nonexistent
//! resource, so probing cannot distinguish the two.

use std::collections::HashMap;
use std::sync::Arc;

use toolgate_core::TenantId;
use toolgate_gate::{Decision, DenyReason, GateResult, Guard, SessionContext, ToolCall};

/// Maps api keys to tenants and resource ids to owning tenants.
#[derive(Debug, Clone, Default)]
pub struct TenantDirectory {
    keys: HashMap<String, TenantId>,
    resources: HashMap<String, TenantId>,
}

impl TenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_key(&mut self, key: impl Into<String>, tenant: TenantId) {
        self.keys.insert(key.into(), tenant);
    }

    pub fn add_resource(&mut self, resource_id: impl Into<String>, tenant: TenantId) {
        self.resources.insert(resource_id.into(), tenant);
    }

    pub fn tenant_for_key(&self, key: &str) -> Option<&TenantId> {
        self.keys.get(key)
    }

    pub fn owner_of(&self, resource_id: &str) -> Option<&TenantId> {
        self.resources.get(resource_id)
    }
}

/// Denies resource access outside the caller's tenant.
pub struct TenantScope {
    directory: Arc<TenantDirectory>,
    key_arg: &'static str,
    resource_arg: &'static str,
    not_found_message: String,
}

impl TenantScope {
    pub fn new(
        directory: Arc<TenantDirectory>,
        key_arg: &'static str,
        resource_arg: &'static str,
        not_found_message: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            key_arg,
            resource_arg,
            not_found_message: not_found_message.into(),
        }
    }
}

impl Guard for TenantScope {
    fn name(&self) -> &'static str {
        "tenant_scope"
    }

    fn check(&self, call: &ToolCall, _ctx: &SessionContext) -> GateResult<Decision> {
        let key = match call.arg_str(self.key_arg) {
            Some(k) => k,
            None => {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} is required",
                    self.key_arg
                ))));
            }
        };
        let resource_id = match call.arg_str(self.resource_arg) {
            Some(r) => r,
            None => {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} is required",
                    self.resource_arg
                ))));
            }
        };

        let tenant = match self.directory.tenant_for_key(key) {
            Some(t) => t,
            None => {
                return Ok(Decision::Deny(DenyReason::Policy(
                    "invalid api key".to_string(),
                )));
            }
        };

        match self.directory.owner_of(resource_id) {
            Some(owner) if owner == tenant => Ok(Decision::Allow),
            // Same message whether the resource is foreign or missing.
            _ => Ok(Decision::Deny(DenyReason::Policy(
                self.not_found_message.clone(),
            ))),
        }
    }
}
