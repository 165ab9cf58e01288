//! JSON-RPC 2.0 tool server gated by the policy engine.
//!
//! Every tool method runs the same pipeline: parse, gate evaluation,
//! execution on allow, and an audit record appended atomically before the
//! response goes out. The default policy table wires the guard library to
//! a set of demonstration tools backed by in-memory and SQLite fixtures.

pub mod audit;
pub mod dispatcher;
pub mod error;
pub mod pipeline;
pub mod policy;
pub mod server;
pub mod stores;
pub mod tools;
pub mod types;

pub use audit::AuditLog;
pub use dispatcher::{dispatch_jsonrpc, parse_jsonrpc_request};
pub use error::{McpError, McpResult};
pub use server::McpServer;
pub use types::{AuditEntry, JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServerConfig};
