//! CLI tests for the cartograph binary
//!
//! Spawns the built binary against temporary repositories and checks the
//! JSON envelopes and exit codes.

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn cartograph(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cartograph"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run cartograph binary")
}

fn json_stdout(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| panic!("invalid JSON ({}): {}", e, stdout))
}

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("app")).unwrap();
    fs::write(root.join("app/models.py"), "class User:\n    def save(self):\n        pass\n").unwrap();
    fs::write(
        root.join("app/views.py"),
        "from app.models import User\n\ndef index():\n    return User()\n",
    )
    .unwrap();
    fs::write(root.join("main.go"), "package main\n\nfunc main() {\n}\n").unwrap();
    temp_dir
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[test]
fn test_version() {
    let output = cartograph(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("cartograph "));

    let output = cartograph(&["--version", "--output", "json"]);
    let json = json_stdout(&output);
    assert_eq!(json["tool"], "cartograph");
    assert_eq!(json["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_scan_json() {
    let repo = fixture();
    let root = path_arg(repo.path());
    let output = cartograph(&["scan", "--root", &root, "--output", "json"]);
    assert!(output.status.success());

    let json = json_stdout(&output);
    let paths: Vec<&str> = json["data"]["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["relativePath"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["app/models.py", "app/views.py", "main.go"]);
    assert_eq!(json["data"]["summary"]["errors"], 0);
}

#[test]
fn test_symbols_kind_filter() {
    let repo = fixture();
    let root = path_arg(repo.path());
    let output = cartograph(&["symbols", "--root", &root, "--kind", "class", "--output", "json"]);
    let json = json_stdout(&output);
    assert_eq!(json["data"]["kind"], "Class");
    assert_eq!(json["data"]["count"], 1);
    assert_eq!(json["data"]["symbols"][0]["name"], "User");
}

#[test]
fn test_graph_dot() {
    let repo = fixture();
    let root = path_arg(repo.path());
    let output = cartograph(&["graph", "--root", &root, "--format", "dot"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("digraph cartograph {"));
    assert!(stdout.contains("\"module:app/views.py\" -> \"module:app/models.py\""));
}

#[test]
fn test_analyze_save_then_query() {
    let repo = fixture();
    let root = path_arg(repo.path());
    let work = TempDir::new().unwrap();
    let saved = path_arg(&work.path().join("analysis.json"));

    let output = cartograph(&["analyze", "--root", &root, "--save", &saved, "--output", "json"]);
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["data"]["overview"]["totalFiles"], 3);
    assert_eq!(json["data"]["saved_to"], saved.as_str());

    let output = cartograph(&["search", "--analysis", &saved, "--query", "user", "--output", "json"]);
    let json = json_stdout(&output);
    assert_eq!(json["data"]["results"][0]["document"]["symbol"], "User");

    let output = cartograph(&["suggest", "--analysis", &saved, "--prefix", "us", "--output", "json"]);
    let json = json_stdout(&output);
    assert_eq!(json["data"]["suggestions"][0], "User");

    let output = cartograph(&["kinds", "--analysis", &saved, "--output", "json"]);
    let json = json_stdout(&output);
    let kinds: Vec<&str> = json["data"]["kinds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k.as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"Class"));
    assert!(kinds.contains(&"File"));

    let changes = work.path().join("changes.json");
    fs::write(&changes, r#"[{"filePath": "app/models.py", "additions": 2}]"#).unwrap();
    let output = cartograph(&[
        "impact",
        "--analysis",
        &saved,
        "--changes",
        &path_arg(&changes),
        "--pr",
        "5",
        "--output",
        "json",
    ]);
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["data"]["prNumber"], 5);
    assert_eq!(json["data"]["downstreamFiles"][0], "app/views.py");
    assert_eq!(json["data"]["totalAdditions"], 2);
}

#[test]
fn test_missing_root_reports_error_code() {
    let work = TempDir::new().unwrap();
    let missing = path_arg(&work.path().join("missing"));
    let output = cartograph(&["scan", "--root", &missing, "--output", "json"]);
    assert_eq!(output.status.code(), Some(1));
    let json = json_stdout(&output);
    assert_eq!(json["data"]["error"], "CART-REPO-002");
}

#[test]
fn test_bad_arguments_exit_with_usage() {
    let output = cartograph(&["teleport"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));

    let output = cartograph(&["search", "--query", "x", "--output", "json"]);
    assert_eq!(output.status.code(), Some(2));
    let json = json_stdout(&output);
    assert_eq!(json["data"]["error"], "CART-ARG-001");
}
