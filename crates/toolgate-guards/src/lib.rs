//! Guard library for the policy gate.
//!
//! Each guard is an independent, named predicate constructed with its
//! configuration. The set covers the recurring mitigations of tool-serving
//! servers: permission and flag gating, tenant scoping, recipient
//! allowlisting, read-only SQL validation, shell-safe name formats, regex
//! complexity limits, filesystem path containment, and content heuristics
//! for directives and secrets.

pub mod content;
pub mod format;
pub mod messaging;
pub mod path;
pub mod pattern;
pub mod session;
pub mod sql;
pub mod tenant;

pub use content::{DirectiveQuarantine, HostAllowlist};
pub use format::{FieldLimit, FieldLimits, NameFormat};
pub use messaging::{RecipientAllowlist, SecretLeakFilter};
pub use path::PathContainment;
pub use pattern::PatternComplexity;
pub use session::{DenyIfFlag, RequirePermission};
pub use sql::ReadOnlyStatement;
pub use tenant::{TenantDirectory, TenantScope};
