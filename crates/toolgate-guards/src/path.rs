//! Filesystem containment for path arguments.
//!
//! Mitigates the prefix-collision bypass where a naive string prefix check
//! accepts `safe_files_sensitive` as if it lived inside `safe_files`. The
//! base directory and the requested path are both resolved to real paths
//! and compared component-wise, so `..` segments, symlinks, and colliding
//! sibling names all land outside the base. A path that fails to resolve
//! gets the same deny message as one that escapes, so probing cannot
//! distinguish missing from forbidden.

use std::path::{Path, PathBuf};

use toolgate_gate::{Decision, DenyReason, GateResult, Guard, SessionContext, ToolCall};

const NOT_FOUND_MESSAGE: &str = "path not found";

/// Resolve `path` against a canonical base directory and require the result
/// to stay inside it. Relative paths are joined onto the base; absolute
/// paths stand alone. Comparison is on path components, never on string
/// prefixes.
pub fn resolve_within(base: &Path, path: &str) -> Option<PathBuf> {
    let joined = if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        base.join(path)
    };
    let resolved = joined.canonicalize().ok()?;
    if resolved.starts_with(base) {
        Some(resolved)
    } else {
        None
    }
}

/// Denies path arguments that resolve outside the configured base directory.
pub struct PathContainment {
    path_arg: &'static str,
    base: PathBuf,
}

impl PathContainment {
    /// The base directory must exist; it is resolved to a real path once
    /// here, so later checks compare against a canonical root.
    pub fn new(path_arg: &'static str, base: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self {
            path_arg,
            base: base.as_ref().canonicalize()?,
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl Guard for PathContainment {
    fn name(&self) -> &'static str {
        "path_containment"
    }

    fn check(&self, call: &ToolCall, _ctx: &SessionContext) -> GateResult<Decision> {
        let path = match call.arg_str(self.path_arg) {
            Some(p) => p,
            None => {
                return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                    "{} is required",
                    self.path_arg
                ))));
            }
        };
        if path.contains('\0') {
            return Ok(Decision::Deny(DenyReason::InvalidInput(format!(
                "{} must not contain null bytes",
                self.path_arg
            ))));
        }

        match resolve_within(&self.base, path) {
            Some(_) => Ok(Decision::Allow),
            // Same message whether the path is missing or escapes the base.
            None => Ok(Decision::Deny(DenyReason::Policy(
                NOT_FOUND_MESSAGE.to_string(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use toolgate_core::SessionId;

    /// Base directory plus a sibling whose name collides on string prefix.
    fn make_colliding_dirs() -> (TempDir, PathBuf, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let allowed = tmp.path().join("safe_files");
        let sensitive = tmp.path().join("safe_files_sensitive");
        fs::create_dir_all(&allowed).unwrap();
        fs::create_dir_all(&sensitive).unwrap();
        fs::write(allowed.join("manifest.txt"), "ok\n").unwrap();
        fs::write(sensitive.join("secret.txt"), "s3cr3t\n").unwrap();
        (tmp, allowed, sensitive)
    }

    fn make_call(path: &str) -> ToolCall {
        ToolCall::new(
            "list_directory",
            SessionId::new("sess-1"),
            serde_json::json!({"path": path}),
        )
    }

    fn make_ctx() -> SessionContext {
        SessionContext::new(SessionId::new("sess-1"), vec![])
    }

    #[test]
    fn test_path_inside_base_allows() {
        let (_tmp, allowed, _) = make_colliding_dirs();
        let guard = PathContainment::new("path", &allowed).unwrap();
        let decision = guard.check(&make_call("manifest.txt"), &make_ctx()).unwrap();
        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn test_base_itself_allows() {
        let (_tmp, allowed, _) = make_colliding_dirs();
        let guard = PathContainment::new("path", &allowed).unwrap();
        let decision = guard.check(&make_call("."), &make_ctx()).unwrap();
        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn test_colliding_prefix_sibling_denies() {
        let (_tmp, allowed, sensitive) = make_colliding_dirs();
        let guard = PathContainment::new("path", &allowed).unwrap();

        // The sibling is a real directory whose name merely starts with the
        // base's name. A string prefix check would accept it.
        let decision = guard
            .check(&make_call(sensitive.to_str().unwrap()), &make_ctx())
            .unwrap();
        assert_eq!(
            decision,
            Decision::Deny(DenyReason::Policy("path not found".into()))
        );

        let file = sensitive.join("secret.txt");
        let decision = guard
            .check(&make_call(file.to_str().unwrap()), &make_ctx())
            .unwrap();
        assert!(matches!(decision, Decision::Deny(DenyReason::Policy(_))));
    }

    #[test]
    fn test_parent_traversal_denies() {
        let (_tmp, allowed, _) = make_colliding_dirs();
        let guard = PathContainment::new("path", &allowed).unwrap();
        let decision = guard
            .check(&make_call("../safe_files_sensitive/secret.txt"), &make_ctx())
            .unwrap();
        assert!(matches!(decision, Decision::Deny(DenyReason::Policy(_))));
    }

    #[test]
    fn test_escape_and_missing_are_indistinguishable() {
        let (_tmp, allowed, sensitive) = make_colliding_dirs();
        let guard = PathContainment::new("path", &allowed).unwrap();
        let escape = guard
            .check(&make_call(sensitive.to_str().unwrap()), &make_ctx())
            .unwrap();
        let missing = guard.check(&make_call("no-such-file.txt"), &make_ctx()).unwrap();
        assert_eq!(escape, missing);
    }

    #[test]
    fn test_symlink_out_of_base_denies() {
        let (tmp, allowed, _) = make_colliding_dirs();
        let outside = tmp.path().join("outside.txt");
        fs::write(&outside, "x\n").unwrap();
        std::os::unix::fs::symlink(&outside, allowed.join("link.txt")).unwrap();

        let guard = PathContainment::new("path", &allowed).unwrap();
        let decision = guard.check(&make_call("link.txt"), &make_ctx()).unwrap();
        assert!(matches!(decision, Decision::Deny(DenyReason::Policy(_))));
    }

    #[test]
    fn test_missing_argument_denies_invalid_input() {
        let (_tmp, allowed, _) = make_colliding_dirs();
        let guard = PathContainment::new("path", &allowed).unwrap();
        let call = ToolCall::new(
            "list_directory",
            SessionId::new("sess-1"),
            serde_json::json!({}),
        );
        let decision = guard.check(&call, &make_ctx()).unwrap();
        assert!(matches!(
            decision,
            Decision::Deny(DenyReason::InvalidInput(_))
        ));
    }

    #[test]
    fn test_null_byte_denies_invalid_input() {
        let (_tmp, allowed, _) = make_colliding_dirs();
        let guard = PathContainment::new("path", &allowed).unwrap();
        let decision = guard.check(&make_call("a\0b"), &make_ctx()).unwrap();
        assert!(matches!(
            decision,
            Decision::Deny(DenyReason::InvalidInput(_))
        ));
    }

    #[test]
    fn test_nonexistent_base_fails_construction() {
        assert!(PathContainment::new("path", "/no/such/base/dir").is_err());
    }

    #[test]
    fn test_resolve_within_joins_relative_paths() {
        let (_tmp, allowed, _) = make_colliding_dirs();
        let base = allowed.canonicalize().unwrap();
        let resolved = resolve_within(&base, "manifest.txt").unwrap();
        assert_eq!(resolved, base.join("manifest.txt"));
        assert!(resolve_within(&base, "../safe_files_sensitive").is_none());
    }
}
