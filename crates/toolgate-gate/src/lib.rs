//! Policy gate for tool-serving servers.
//!
//! A gate is an ordered chain of named guard predicates evaluated against a
//! proposed tool call before it executes. The first deny short-circuits the
//! chain; declared effects mutate the caller's session context only after
//! every guard allows, and they apply exactly once per call.

pub mod context;
pub mod engine;
pub mod error;
pub mod registry;
pub mod types;

pub use context::{ContextStore, SessionContext};
pub use engine::{AuditSink, GateAuditEvent, GateOutcome, InMemoryAuditSink, PolicyGate};
pub use error::{GateError, GateResult};
pub use registry::{ArgKind, ArgSchema, ArgSpec, GateRegistry, GuardChain};
pub use types::{Decision, DenyReason, Effect, Guard, ToolCall, Verdict};
