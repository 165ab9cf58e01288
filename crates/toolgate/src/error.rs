use thiserror::Error;

use toolgate_gate::GateError;
use toolgate_mcp::McpError;

/// Result type alias for root operations.
pub type RootResult<T> = Result<T, RootError>;

#[derive(Debug, Error)]
pub enum RootError {
    #[error("gate error: {0}")]
    Gate(#[from] GateError),

    #[error("server error: {0}")]
    Mcp(#[from] McpError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<toml::de::Error> for RootError {
    fn from(e: toml::de::Error) -> Self {
        RootError::Config(format!("TOML parse error: {}", e))
    }
}
