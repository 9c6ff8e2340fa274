//! Integration Test: Workspace Layering
//!
//! **Policy**:
//! - `papo-core` is headless: no ratatui or crossterm, in code or manifest
//! - async production code uses tokio I/O, never `std::fs`/`std::net` or
//!   `std::thread::sleep`
//! - surfaces render `SessionMessage`s and never encode or decode frames

use architectural_enforcement::{find_violations, rust_sources, workspace_root, Violation};

fn assert_clean(violations: &[Violation], policy: &str) {
    if violations.is_empty() {
        return;
    }

    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!(
        "\n{policy}: found {} violation(s) in production code",
        violations.len()
    );
}

#[test]
fn test_sources_are_scanned() {
    // Guard against a wrong root silently passing every scan
    assert!(!rust_sources("papo/core/src").is_empty());
    assert!(!rust_sources("tui/src").is_empty());
}

#[test]
fn test_core_has_no_ui_dependencies() {
    let violations = find_violations("papo/core/src", &["ratatui", "crossterm"]);
    assert_clean(&violations, "papo-core must stay headless");

    let manifest = std::fs::read_to_string(workspace_root().join("papo/core/Cargo.toml"))
        .expect("read papo-core manifest");
    assert!(!manifest.contains("ratatui"));
    assert!(!manifest.contains("crossterm"));
}

#[test]
fn test_no_blocking_io_in_core() {
    let violations = find_violations(
        "papo/core/src",
        &["std::fs", "std::net", "std::thread::sleep", "reqwest::blocking"],
    );
    assert_clean(&violations, "papo-core must use async I/O");
}

#[test]
fn test_no_blocking_io_in_surfaces() {
    // main.rs opens the log file before the UI starts; everything else is async
    let violations: Vec<Violation> = find_violations(
        "tui/src",
        &["std::net", "std::thread::sleep", "std::io::stdin()"],
    )
    .into_iter()
    .filter(|v| !v.file.ends_with("main.rs"))
    .collect();
    assert_clean(&violations, "surfaces must use async I/O");
}

#[test]
fn test_surfaces_do_not_touch_wire_format() {
    let violations = find_violations(
        "tui/src",
        &["serde_json", "protocol::", "decode(", "encode(", "ClientIntent"],
    );
    assert_clean(&violations, "surfaces must go through the session");
}
