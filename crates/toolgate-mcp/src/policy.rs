//! Default policy table: which guards and effects gate which tool.
//!
//! Built once at server startup. Chain order matters; the cheap checks
//! run first and the first deny wins.

use std::sync::Arc;

use toolgate_core::{FlagName, PermissionName};
use toolgate_gate::{ArgKind, ArgSchema, ArgSpec, Effect, GateRegistry, GuardChain};
use toolgate_guards::{
    DenyIfFlag, DirectiveQuarantine, FieldLimit, FieldLimits, HostAllowlist, NameFormat,
    PathContainment, PatternComplexity, ReadOnlyStatement, RecipientAllowlist, RequirePermission,
    SecretLeakFilter, TenantDirectory, TenantScope,
};

use crate::error::{McpError, McpResult};
use crate::types::McpServerConfig;

/// Build the registration table for the demonstration tools.
pub fn default_registry(
    config: &McpServerConfig,
    directory: Arc<TenantDirectory>,
) -> McpResult<GateRegistry> {
    let untrusted_flag = FlagName::new(config.untrusted_content_flag.clone());
    let mut registry = GateRegistry::new();

    registry.register(
        "fetch_project",
        GuardChain::new(
            ArgSchema::new(vec![
                ArgSpec::required("project_id", ArgKind::String),
                ArgSpec::required("api_key", ArgKind::String),
            ]),
            vec![Arc::new(TenantScope::new(
                directory,
                "api_key",
                "project_id",
                "project not found",
            ))],
            vec![Effect::IncrementCounter("projects_fetched".into())],
        ),
    );

    registry.register(
        "send_message",
        GuardChain::new(
            ArgSchema::new(vec![
                ArgSpec::required("recipient", ArgKind::String),
                ArgSpec::required("body", ArgKind::String),
            ]),
            vec![
                Arc::new(RecipientAllowlist::new(
                    "recipient",
                    config.approved_contacts.clone(),
                )),
                Arc::new(FieldLimits::new(vec![FieldLimit::new("body", 5000)])),
                Arc::new(DirectiveQuarantine::new("body")),
                Arc::new(SecretLeakFilter::new("body")),
            ],
            vec![Effect::IncrementCounter("messages_sent".into())],
        ),
    );

    registry.register(
        "run_query",
        GuardChain::new(
            ArgSchema::new(vec![ArgSpec::required("sql", ArgKind::String)]),
            vec![Arc::new(ReadOnlyStatement::new("sql"))],
            vec![],
        ),
    );

    let repo_format = NameFormat::shell_safe("repo_name")
        .map_err(|e| McpError::ConfigError(format!("repo name pattern: {}", e)))?;
    registry.register(
        "init_repository",
        GuardChain::new(
            ArgSchema::new(vec![ArgSpec::required("repo_name", ArgKind::String)]),
            vec![Arc::new(repo_format)],
            vec![Effect::IncrementCounter("repos_initialized".into())],
        ),
    );

    registry.register(
        "search_logs",
        GuardChain::new(
            ArgSchema::new(vec![
                ArgSpec::required("pattern", ArgKind::String),
                ArgSpec::optional("max_matches", ArgKind::Integer),
            ]),
            vec![Arc::new(PatternComplexity::new("pattern"))],
            vec![],
        ),
    );

    // The files root exists by the time the policy table is built; the
    // guard resolves it once and checks every path against the real base.
    let containment = PathContainment::new("path", &config.files_root)
        .map_err(|e| McpError::ConfigError(format!("files root: {}", e)))?;
    registry.register(
        "list_directory",
        GuardChain::new(
            ArgSchema::new(vec![ArgSpec::required("path", ArgKind::String)]),
            vec![Arc::new(containment)],
            vec![Effect::IncrementCounter("directories_listed".into())],
        ),
    );

    registry.register(
        "fetch_article",
        GuardChain::new(
            ArgSchema::new(vec![ArgSpec::required("url", ArgKind::String)]),
            vec![Arc::new(HostAllowlist::new(
                "url",
                config.trusted_hosts.clone(),
            ))],
            // Fetching external content demotes the session permanently.
            vec![Effect::AddFlag(untrusted_flag.clone())],
        ),
    );

    registry.register(
        "read_secret",
        GuardChain::new(
            ArgSchema::new(vec![ArgSpec::required("name", ArgKind::String)]),
            vec![
                Arc::new(RequirePermission::new(PermissionName::new("read_secrets"))),
                Arc::new(DenyIfFlag::new(untrusted_flag)),
            ],
            vec![Effect::IncrementCounter("secrets_read".into())],
        ),
    );

    Ok(registry)
}
