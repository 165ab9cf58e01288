//! Permission and flag gating.

use toolgate_core::{FlagName, PermissionName};
use toolgate_gate::{Decision, DenyReason, GateResult, Guard, SessionContext, ToolCall};

/// Denies unless the session holds a permission.
///
/// The deny message is deliberately generic: it does not say whether the
/// permission was never granted or was revoked mid-session.
pub struct RequirePermission {
    permission: PermissionName,
}

impl RequirePermission {
    pub fn new(permission: impl Into<PermissionName>) -> Self {
        Self {
            permission: permission.into(),
        }
    }
}

impl Guard for RequirePermission {
    fn name(&self) -> &'static str {
        "require_permission"
    }

    fn check(&self, _call: &ToolCall, ctx: &SessionContext) -> GateResult<Decision> {
        if ctx.has_permission(&self.permission) {
            Ok(Decision::Allow)
        } else {
            Ok(Decision::Deny(DenyReason::Policy(
                "permission denied".to_string(),
            )))
        }
    }
}

/// Denies while the session carries a flag.
///
/// Paired with a monotonic flag such as `viewed_untrusted_content`, this
/// demotes a session permanently once it has touched untrusted data.
pub struct DenyIfFlag {
    flag: FlagName,
}

impl DenyIfFlag {
    pub fn new(flag: impl Into<FlagName>) -> Self {
        Self { flag: flag.into() }
    }
}

impl Guard for DenyIfFlag {
    fn name(&self) -> &'static str {
        "deny_if_flag"
    }

    fn check(&self, _call: &ToolCall, ctx: &SessionContext) -> GateResult<Decision> {
        if ctx.has_flag(&self.flag) {
            Ok(Decision::Deny(DenyReason::Policy(
                "access restricted for this session".to_string(),
            )))
        } else {
            Ok(Decision::Allow)
        }
    }
}
