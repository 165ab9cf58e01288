//! Content-facing heuristics: host allowlisting and directive quarantine.

use std::collections::HashSet;

use toolgate_gate::{Decision, DenyReason, GateResult, Guard, SessionContext, ToolCall};

/// Denies URLs whose host is not on a configured allowlist.
///
/// Parsing is intentionally strict: anything that does not look like
/// `http(s)://host[/path]` is rejected as invalid input, so schemes like
/// `file://` never reach the host comparison.
pub struct HostAllowlist {
    arg: &'static str,
    hosts: HashSet<String>,
}

impl HostAllowlist {
    pub fn new(arg: &'static str, hosts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            arg,
            hosts: hosts.into_iter().map(|h| h.into().to_lowercase()).collect(),
        }
    }

    fn host_of(url: &str) -> Option<String> {
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))?;
        let host = rest.split(['/', '?', '#']).next()?;
        if host.is_empty() {
            return None;
        }
        Some(host.to_lowercase())
    }
}

impl Guard for HostAllowlist {
    fn name(&self) -> &'static str {
        "host_allowlist"
    }

    fn check(&self, call: &ToolCall, _ctx: &SessionContext) -> GateResult<Decision> {
        let url = match call.arg_str(self.arg) {
            Some(u) => u,
            None => {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} is required",
                    self.arg
                ))));
            }
        };
        let host = match Self::host_of(url) {
            Some(h) => h,
            None => {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} must be an http or https URL",
                    self.arg
                ))));
            }
        };
        if self.hosts.contains(&host) {
            Ok(Decision::Allow)
        } else {
            Ok(Decision::Deny(DenyReason::Policy(
                "host is not on the trusted list".to_string(),
            )))
        }
    }
}

/// Denies text carrying directive-like markers.
///
/// An illustrative denylist, not a sound defense against prompt
/// injection: it quarantines the obvious "call tool X" and embedded-link
/// payloads before they travel further.
pub struct DirectiveQuarantine {
    arg: &'static str,
    markers: Vec<String>,
}

impl DirectiveQuarantine {
    pub fn new(arg: &'static str) -> Self {
        Self::with_markers(
            arg,
            ["call tool", "http://", "https://", "!!!", "root credential"],
        )
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

impl Guard for DirectiveQuarantine {
    fn name(&self) -> &'static str {
        "directive_quarantine"
    }

    fn check(&self, call: &ToolCall, _ctx: &SessionContext) -> GateResult<Decision> {
        let text = match call.arg_str(self.arg) {
            Some(t) => t.to_lowercase(),
            None => {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} is required",
                    self.arg
                ))));
            }
        };
        if self.markers.iter().any(|m| text.contains(m)) {
            return Ok(Decision::Deny(DenyReason::Policy(
                "content contains directive-like markers".to_string(),
            )));
        }
        Ok(Decision::Allow)
    }
}
