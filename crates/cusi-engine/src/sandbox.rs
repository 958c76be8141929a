//! Confines user-supplied paths to the device root.
//!
//! Everything here is lexical. The device file system is on the other end of
//! the serial link, so `.` and `..` are resolved on the string alone and an
//! escaping path is rejected before any frame is built.

use std::fmt;

const SEPARATOR: char = '/';

/// Errors produced while confining a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SandboxError {
    /// The path starts at the device's file system root.
    #[error("absolute path is not permitted: {0}")]
    AbsolutePathRejected(String),

    /// The path resolves outside the sandbox root.
    #[error("forbidden path: {0}")]
    PathEscape(String),

    /// The path contains a NUL byte, which the wire format uses as a
    /// terminator.
    #[error("path contains a NUL byte: {0:?}")]
    NulByte(String),
}

/// A normalized absolute device path inside the sandbox root.
///
/// Only [`normalize`] creates these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SandboxedPath(String);

impl SandboxedPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes, as the firmware counts it.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SandboxedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SandboxedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve `user_path` relative to `root`.
///
/// An empty `user_path` resolves to the root itself.
pub fn normalize(root: &str, user_path: &str) -> Result<SandboxedPath, SandboxError> {
    if user_path.contains('\0') {
        return Err(SandboxError::NulByte(user_path.to_string()));
    }
    if user_path.starts_with(SEPARATOR) {
        return Err(SandboxError::AbsolutePathRejected(user_path.to_string()));
    }

    let root = clean(root);
    let resolved = clean(&format!("{root}{SEPARATOR}{user_path}"));
    if !is_within(&root, &resolved) {
        return Err(SandboxError::PathEscape(user_path.to_string()));
    }

    Ok(SandboxedPath(resolved))
}

/// Whole-segment prefix test: `/flash` contains `/flash/x` but not `/flashy`.
fn is_within(root: &str, path: &str) -> bool {
    if root == "/" {
        return path.starts_with(SEPARATOR);
    }
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
        None => false,
    }
}

/// Lexically simplify a `/`-separated path: drop empty and `.` segments and
/// let `..` consume the preceding segment. `..` never climbs above a leading
/// `/`.
fn clean(path: &str) -> String {
    let rooted = path.starts_with(SEPARATOR);
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/flash";

    #[test]
    fn relative_path_is_joined() {
        assert_eq!(normalize(ROOT, "path").unwrap().as_str(), "/flash/path");
        assert_eq!(
            normalize(ROOT, "lib/umqtt/simple.py").unwrap().as_str(),
            "/flash/lib/umqtt/simple.py"
        );
    }

    #[test]
    fn absolute_paths_rejected() {
        assert_eq!(
            normalize(ROOT, "/"),
            Err(SandboxError::AbsolutePathRejected("/".to_string()))
        );
        assert_eq!(
            normalize(ROOT, "/root"),
            Err(SandboxError::AbsolutePathRejected("/root".to_string()))
        );
        assert!(matches!(
            normalize(ROOT, "/flash/main.py"),
            Err(SandboxError::AbsolutePathRejected(_))
        ));
    }

    #[test]
    fn escapes_rejected() {
        assert_eq!(
            normalize(ROOT, "../"),
            Err(SandboxError::PathEscape("../".to_string()))
        );
        assert!(matches!(
            normalize(ROOT, "a/../../etc"),
            Err(SandboxError::PathEscape(_))
        ));
        assert!(matches!(
            normalize(ROOT, "../flashy"),
            Err(SandboxError::PathEscape(_))
        ));
    }

    #[test]
    fn nul_bytes_rejected() {
        assert_eq!(
            normalize(ROOT, "a\0b"),
            Err(SandboxError::NulByte("a\0b".to_string()))
        );
        assert!(matches!(
            normalize(ROOT, "lib/\0"),
            Err(SandboxError::NulByte(_))
        ));
    }

    #[test]
    fn dot_segments_resolved_lexically() {
        assert_eq!(
            normalize(ROOT, "./path/./to/../../other/").unwrap().as_str(),
            "/flash/other"
        );
        assert_eq!(
            normalize(ROOT, "a//b/").unwrap().as_str(),
            "/flash/a/b"
        );
    }

    #[test]
    fn climbing_back_into_root_is_allowed() {
        assert_eq!(
            normalize(ROOT, "../flash/boot.py").unwrap().as_str(),
            "/flash/boot.py"
        );
    }

    #[test]
    fn empty_and_dot_resolve_to_root() {
        assert_eq!(normalize(ROOT, "").unwrap().as_str(), "/flash");
        assert_eq!(normalize(ROOT, ".").unwrap().as_str(), "/flash");
        assert_eq!(normalize(ROOT, "lib/..").unwrap().as_str(), "/flash");
    }

    #[test]
    fn root_itself_is_cleaned() {
        assert_eq!(normalize("/flash/", "a").unwrap().as_str(), "/flash/a");
        assert_eq!(normalize("/", "a/b").unwrap().as_str(), "/a/b");
    }

    #[test]
    fn clean_matches_lexical_rules() {
        assert_eq!(clean("/"), "/");
        assert_eq!(clean("/.."), "/");
        assert_eq!(clean("/a/b/../c/."), "/a/c");
        assert_eq!(clean("a/../.."), "..");
        assert_eq!(clean(""), ".");
    }

    #[test]
    fn display_and_len() {
        let path = normalize(ROOT, "main.py").unwrap();
        assert_eq!(path.to_string(), "/flash/main.py");
        assert_eq!(path.len(), 14);
        assert!(!path.is_empty());
        assert_eq!(path.into_string(), "/flash/main.py");
    }
}
