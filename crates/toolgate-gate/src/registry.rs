//! Registration table: call name to argument schema, guard chain, and effects.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{Effect, Guard};

// ---------------------------------------------------------------------------
// Argument schema
// ---------------------------------------------------------------------------

/// JSON type expected for a declared argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgKind {
    String,
    Integer,
    Boolean,
    Object,
    Array,
}

impl ArgKind {
    fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            ArgKind::String => value.is_string(),
            ArgKind::Integer => value.is_i64() || value.is_u64(),
            ArgKind::Boolean => value.is_boolean(),
            ArgKind::Object => value.is_object(),
            ArgKind::Array => value.is_array(),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ArgKind::String => "a string",
            ArgKind::Integer => "an integer",
            ArgKind::Boolean => "a boolean",
            ArgKind::Object => "an object",
            ArgKind::Array => "an array",
        }
    }
}

/// One declared argument.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub required: bool,
}

impl ArgSpec {
    pub fn required(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub fn optional(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Declared argument schema for one call name.
///
/// Validation runs before any guard: a mismatch denies the call as invalid
/// input regardless of what the rest of the chain would say.
#[derive(Debug, Clone, Default)]
pub struct ArgSchema {
    pub args: Vec<ArgSpec>,
}

impl ArgSchema {
    pub fn new(args: Vec<ArgSpec>) -> Self {
        Self { args }
    }

    /// Check `arguments` against the schema. Returns a caller-safe message
    /// naming the first offending parameter on mismatch.
    pub fn validate(&self, arguments: &serde_json::Value) -> Result<(), String> {
        let map = match arguments.as_object() {
            Some(m) => m,
            None => return Err("arguments must be an object".to_string()),
        };

        for spec in &self.args {
            match map.get(spec.name) {
                Some(value) => {
                    if !spec.kind.matches(value) {
                        return Err(format!("{} must be {}", spec.name, spec.kind.describe()));
                    }
                }
                None if spec.required => {
                    return Err(format!("{} is required", spec.name));
                }
                None => {}
            }
        }

        for key in map.keys() {
            if !self.args.iter().any(|spec| spec.name == key) {
                return Err(format!("unexpected parameter: {}", key));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GuardChain and GateRegistry
// ---------------------------------------------------------------------------

/// Ordered guards plus declared effects for one call name.
pub struct GuardChain {
    pub schema: ArgSchema,
    pub guards: Vec<Arc<dyn Guard>>,
    pub effects: Vec<Effect>,
}

impl GuardChain {
    pub fn new(schema: ArgSchema, guards: Vec<Arc<dyn Guard>>, effects: Vec<Effect>) -> Self {
        Self {
            schema,
            guards,
            effects,
        }
    }

    pub fn guard_names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }
}

/// Static registration table mapping call names to their chains.
///
/// Built once at startup; the gate denies any name not present here.
#[derive(Default)]
pub struct GateRegistry {
    chains: HashMap<String, GuardChain>,
}

impl GateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, chain: GuardChain) {
        self.chains.insert(name.into(), chain);
    }

    pub fn chain(&self, name: &str) -> Option<&GuardChain> {
        self.chains.get(name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.chains.contains_key(name)
    }

    /// Registered call names, sorted for stable listings.
    pub fn call_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.chains.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
