//! Architectural Enforcement Integration Tests
//!
//! Source scans that keep the workspace layered:
//! - `papo-core` stays headless (no terminal UI crates)
//! - production code does no blocking I/O inside the async runtime
//! - surfaces never touch the wire format directly
//!
//! This library holds the scanning helpers shared by the tests.

use std::path::{Path, PathBuf};

/// Workspace root (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../.."))
}

/// All `.rs` files under `dir` (relative to the workspace root)
pub fn rust_sources(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Lines of production code in a source file, numbered from 1.
///
/// Everything from the first `#[cfg(test)]` on is test code. Line comments
/// are stripped.
pub fn production_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(idx, line)| (idx + 1, line.split("//").next().unwrap_or(line)))
        .filter(|(_, code)| !code.trim().is_empty())
        .collect()
}

/// A forbidden pattern found in production code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to the workspace root
    pub file: String,
    /// 1-based line number
    pub line: usize,
    /// The offending pattern
    pub pattern: &'static str,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} uses `{}`", self.file, self.line, self.pattern)
    }
}

/// Scan production code under `dir` for any of `patterns`
pub fn find_violations(dir: &str, patterns: &[&'static str]) -> Vec<Violation> {
    let root = workspace_root();
    let mut violations = Vec::new();

    for path in rust_sources(dir) {
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        let file = path
            .strip_prefix(&root)
            .unwrap_or(&path)
            .display()
            .to_string();

        for (line, code) in production_lines(&content) {
            for pattern in patterns {
                if code.contains(pattern) {
                    violations.push(Violation {
                        file: file.clone(),
                        line,
                        pattern,
                    });
                }
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_tests() {
        let source = "use a;\n// comment only\nfn f() {} // trailing\n#[cfg(test)]\nmod tests {}\n";

        assert_eq!(
            production_lines(source),
            vec![(1, "use a;"), (3, "fn f() {} ")]
        );
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
