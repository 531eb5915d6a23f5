//! Integration tests for the `strata` binary.
//!
//! Each test builds a throwaway project in a temp directory with a
//! file-backed DuckDB so state carries across invocations.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Path to the compiled strata binary
fn strata_bin() -> String {
    env!("CARGO_BIN_EXE_strata").to_string()
}

/// Run `strata` in `project` and return (stdout, stderr, exit code).
fn run_strata(project: &Path, args: &[&str]) -> (String, String, Option<i32>) {
    let output = Command::new(strata_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env_remove("STRATA_CONFIG")
        .env_remove("STRATA_DATABASE")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute strata with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code(),
    )
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup_project(target: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        &root.join("strata.yml"),
        r#"
name: cli_test
database:
  type: duckdb
  path: warehouse.duckdb
modules:
  - modules/core/module.json
"#,
    );
    write(
        &root.join("modules/core/module.json"),
        &format!(
            r#"{{
  "module": "core",
  "version": "{target}",
  "dialects": {{
    "duckdb": [
      {{ "version": "1.0.0", "upgrade": ["upgrade_1_0_0.sql"] }},
      {{ "version": "1.1.0", "upgrade": ["upgrade_1_1_0.sql"] }}
    ]
  }}
}}"#
        ),
    );
    write(
        &root.join("modules/core/duckdb/upgrade_1_0_0.sql"),
        "CREATE TABLE customers (id INTEGER);",
    );
    write(
        &root.join("modules/core/duckdb/upgrade_1_1_0.sql"),
        "ALTER TABLE customers ADD COLUMN email VARCHAR;",
    );
    dir
}

#[test]
fn test_plan_sync_status_cycle() {
    let project = setup_project("1.1.0");
    // Database path is relative to the working directory, so pin it.
    let db_path = project.path().join("warehouse.duckdb");
    let db = db_path.to_str().unwrap();

    let (stdout, stderr, code) = run_strata(project.path(), &["plan", "--database", db]);
    assert_eq!(code, Some(0), "plan failed: {stderr}");
    assert!(stdout.contains("upgrade_1_0_0.sql"));
    assert!(stdout.contains("2 script(s) pending"));

    let (stdout, stderr, code) = run_strata(project.path(), &["sync", "--database", db]);
    assert_eq!(code, Some(0), "sync failed: {stderr}");
    assert!(stdout.contains("2 script(s) applied"));

    let (stdout, _, code) = run_strata(
        project.path(),
        &["status", "--database", db, "--output", "json"],
    );
    assert_eq!(code, Some(0));
    let entries: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let scripts: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["script_name"].as_str().unwrap())
        .collect();
    assert_eq!(scripts, vec!["upgrade_1_0_0.sql", "upgrade_1_1_0.sql"]);

    let (stdout, _, code) = run_strata(project.path(), &["sync", "--database", db]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("0 script(s) applied"));

    let (_, _, code) = run_strata(project.path(), &["plan", "--database", db, "--exit-code"]);
    assert_eq!(code, Some(0));
}

#[test]
fn test_sync_single_module_with_retarget() {
    let project = setup_project("1.0.0");
    let db_path = project.path().join("warehouse.duckdb");
    let db = db_path.to_str().unwrap();

    let (_, stderr, code) = run_strata(project.path(), &["sync", "--database", db]);
    assert_eq!(code, Some(0), "sync failed: {stderr}");

    let (_, _, code) = run_strata(project.path(), &["plan", "--database", db, "--exit-code"]);
    assert_eq!(code, Some(0));

    let (stdout, stderr, code) = run_strata(
        project.path(),
        &[
            "sync",
            "--database",
            db,
            "--module",
            "core",
            "--to-version",
            "1.1.0",
            "--output",
            "json",
        ],
    );
    assert_eq!(code, Some(0), "sync failed: {stderr}");
    let applied: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(applied[0]["script"], "upgrade_1_1_0.sql");
    assert_eq!(applied[0]["version"], "1.1.0");
}

#[test]
fn test_plan_exit_code_when_pending() {
    let project = setup_project("1.1.0");
    let (_, _, code) = run_strata(
        project.path(),
        &["plan", "--database", ":memory:", "--exit-code"],
    );
    assert_eq!(code, Some(2));
}

#[test]
fn test_sync_reports_failing_script() {
    let project = setup_project("1.1.0");
    write(
        &project.path().join("modules/core/duckdb/upgrade_1_1_0.sql"),
        "ALTER TABLE missing_table ADD COLUMN x INTEGER;",
    );

    let (_, stderr, code) = run_strata(project.path(), &["sync", "--database", ":memory:"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("[S003]"), "stderr: {stderr}");
    assert!(stderr.contains("upgrade_1_1_0.sql"));
}

#[test]
fn test_unknown_module_is_rejected() {
    let project = setup_project("1.1.0");
    let (_, stderr, code) = run_strata(
        project.path(),
        &["sync", "--database", ":memory:", "--module", "billing"],
    );
    assert_eq!(code, Some(1));
    assert!(stderr.contains("Module 'billing' is not listed"));
}

#[test]
fn test_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_strata(dir.path(), &["status"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("[E001]"), "stderr: {stderr}");
}

#[test]
fn test_init_then_sync() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(strata_bin())
        .current_dir(dir.path())
        .args(["init", "demo"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let project = dir.path().join("demo");
    assert!(project.join("strata.yml").exists());
    assert!(project
        .join("modules/example/duckdb/upgrade_1_0_0.sql")
        .exists());

    let (stdout, stderr, code) = run_strata(&project, &["sync", "--database", ":memory:"]);
    assert_eq!(code, Some(0), "sync failed: {stderr}");
    assert!(stdout.contains("1 script(s) applied"));

    let output = Command::new(strata_bin())
        .current_dir(dir.path())
        .args(["init", "demo"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_status_reads_ledger_without_module_descriptors() {
    let project = setup_project("1.0.0");
    let db_path = project.path().join("warehouse.duckdb");
    let db = db_path.to_str().unwrap();

    let (_, stderr, code) = run_strata(project.path(), &["sync", "--database", db]);
    assert_eq!(code, Some(0), "sync failed: {stderr}");

    write(&project.path().join("modules/core/module.json"), "{ not json");
    let (_, _, code) = run_strata(project.path(), &["plan", "--database", db]);
    assert_eq!(code, Some(1));

    let (stdout, stderr, code) = run_strata(
        project.path(),
        &["status", "--database", db, "--output", "json"],
    );
    assert_eq!(code, Some(0), "status failed: {stderr}");
    let entries: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(entries[0]["script_name"], "upgrade_1_0_0.sql");
    assert_eq!(entries.as_array().unwrap().len(), 1);
}
