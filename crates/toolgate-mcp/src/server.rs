//! Server assembly: gate, stores, and audit wired together.

use std::sync::Arc;
use tracing::info;

use toolgate_core::PermissionName;
use toolgate_gate::{AuditSink, GateAuditEvent, InMemoryAuditSink, PolicyGate};

use crate::audit::AuditLog;
use crate::error::{McpError, McpResult};
use crate::policy::default_registry;
use crate::stores::Stores;
use crate::types::McpServerConfig;

/// The gated tool server.
///
/// Owns the policy gate, the fixture stores the tools execute against,
/// and both audit surfaces: the gate's decision sink and the pipeline's
/// hash-chained invocation log.
pub struct McpServer {
    config: McpServerConfig,
    gate: PolicyGate,
    gate_events: Arc<InMemoryAuditSink>,
    audit: AuditLog,
    stores: Stores,
}

impl McpServer {
    /// Create a server with the default policy table.
    pub fn new(config: McpServerConfig) -> McpResult<Self> {
        validate_config(&config)?;

        let stores = Stores::new(&config.files_root)?;
        let registry = default_registry(&config, Arc::new(stores.tenant_directory()))?;
        let gate_events = Arc::new(InMemoryAuditSink::new());
        let default_permissions: Vec<PermissionName> = config
            .default_permissions
            .iter()
            .map(PermissionName::new)
            .collect();
        let gate = PolicyGate::new(
            registry,
            default_permissions,
            gate_events.clone() as Arc<dyn AuditSink>,
        );

        info!(
            server_name = %config.server_name,
            tools = gate.registry().len(),
            "tool server assembled"
        );

        Ok(Self {
            config,
            gate,
            gate_events,
            audit: AuditLog::new(),
            stores,
        })
    }

    pub fn config(&self) -> &McpServerConfig {
        &self.config
    }

    pub fn gate(&self) -> &PolicyGate {
        &self.gate
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Recent gate decisions, oldest first.
    pub fn gate_events(&self) -> Vec<GateAuditEvent> {
        self.gate_events.events()
    }
}

fn validate_config(config: &McpServerConfig) -> McpResult<()> {
    if config.server_name.trim().is_empty() {
        return Err(McpError::ConfigError("server_name must not be empty".into()));
    }
    if config.untrusted_content_flag.trim().is_empty() {
        return Err(McpError::ConfigError(
            "untrusted_content_flag must not be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_new_with_defaults() {
        let server = McpServer::new(McpServerConfig::default()).unwrap();
        assert_eq!(server.config().server_name, "toolgate-mcp");
        assert_eq!(server.gate().registry().len(), 8);
        assert!(server.audit().is_empty());
        assert!(server.gate_events().is_empty());
    }

    #[test]
    fn test_server_rejects_empty_name() {
        let config = McpServerConfig {
            server_name: "  ".into(),
            ..Default::default()
        };
        assert!(McpServer::new(config).is_err());
    }

    #[test]
    fn test_server_rejects_empty_flag_name() {
        let config = McpServerConfig {
            untrusted_content_flag: "".into(),
            ..Default::default()
        };
        assert!(McpServer::new(config).is_err());
    }
}
