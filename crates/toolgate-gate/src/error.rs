use thiserror::Error;

/// Result type alias for gate operations.
pub type GateResult<T> = Result<T, GateError>;

/// Errors raised by the gate itself, as opposed to policy denials.
///
/// Display implementations never include argument values, so internal
/// failures can be logged without leaking caller input.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("context store lock poisoned")]
    ContextLock,

    #[error("guard failure: {0}")]
    GuardFailure(String),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("audit sink error: {0}")]
    AuditSink(String),

    #[error("internal error: {0}")]
    Internal(String),
}
