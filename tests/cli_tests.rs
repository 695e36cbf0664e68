//! CLI integration tests
//!
//! These tests verify the command-line tool by running the binary.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn xml_structure_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_xml-structure"))
}

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(xml_structure_bin())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).to_str().unwrap().to_string()
}

// ============================================================================
// Text output
// ============================================================================

#[test]
fn test_cli_text_report() {
    let output = run(&[&fixture("feed.xml")]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "scan should succeed");
    assert_eq!(
        stdout,
        concat!(
            "Overview\n",
            "========\n",
            "feed{1}:\n",
            "  entry{2}:\n",
            "    dc:creator{3}:\n",
            "    title{2}:\n",
            "  title{1}:\n",
            "\n",
            "\n",
            "Details\n",
            "=======\n",
            "feed{1}:\n",
            "  entry{2} (\n",
            "   id{2}\n",
            "   xml:lang{1}\n",
            "  ):\n",
            "    dc:creator{3}:\n",
            "    title{2}:\n",
            "  title{1}:\n",
            "\n",
        )
    );
}

#[test]
fn test_cli_no_progress_when_not_a_terminal() {
    let output = run(&[&fixture("feed.xml")]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert!(!stderr.contains("ETA"), "unexpected progress: {}", stderr);
}

#[test]
fn test_cli_html() {
    let output = run(&["--html", "--no-progress", &fixture("page.html")]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "html scan should succeed");
    assert!(stdout.starts_with("Overview\n========\nhtml{1}:\n"));
    assert!(stdout.contains("      li{3}:\n"));
    assert!(stdout.contains("        a{2} (\n         class{1}\n         href{2}\n        ):\n"));
}

// ============================================================================
// JSON output
// ============================================================================

#[test]
fn test_cli_json() {
    let output = run(&["--format", "json", &fixture("feed.xml")]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "json scan should succeed");
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["name"], "feed");
    assert_eq!(json["children"][0]["name"], "entry");
    assert_eq!(json["children"][0]["count"], 2);
}

#[test]
fn test_cli_unknown_format() {
    let output = run(&["--format", "yaml", &fixture("feed.xml")]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Unknown format"), "got: {}", stderr);
    assert!(output.stdout.is_empty());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_cli_missing_argument() {
    let output = run(&[]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Usage"), "should print usage: {}", stderr);
}

#[test]
fn test_cli_missing_file() {
    let output = run(&[&fixture("does-not-exist.xml")]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.starts_with("Error: "), "got: {}", stderr);
    assert!(stderr.contains("does-not-exist.xml"));
}

#[test]
fn test_cli_malformed_document_prints_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xml");
    std::fs::write(&path, "<r><a></r>").unwrap();

    let output = run(&[path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "no partial report expected");
}

#[test]
fn test_cli_max_depth() {
    let output = run(&["--max-depth", "2", &fixture("feed.xml")]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("limit exceeded"), "got: {}", stderr);

    let output = run(&["--max-depth", "3", &fixture("feed.xml")]);
    assert!(output.status.success());
}

#[test]
fn test_cli_permissive_allows_deep_documents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deep.xml");
    let depth = 1500;
    let document = format!("{}{}", "<n>".repeat(depth), "</n>".repeat(depth));
    std::fs::write(&path, document).unwrap();
    let path = path.to_str().unwrap();

    let output = run(&[path]);
    assert_eq!(output.status.code(), Some(1), "default depth limit is 1000");

    let output = run(&["--permissive", path]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let output = run(&["--strict", "--permissive", path]);
    assert!(!output.status.success(), "presets are exclusive");
}
