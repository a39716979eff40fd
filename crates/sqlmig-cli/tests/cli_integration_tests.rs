//! End-to-end tests for the sqlmig binary
//!
//! Each test works in its own temp project with a file database.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Path to the compiled sqlmig binary
fn sqlmig_bin() -> String {
    env!("CARGO_BIN_EXE_sqlmig").to_string()
}

/// Run `sqlmig` inside `project` and return (stdout, stderr, exit code).
fn run_sqlmig(project: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(sqlmig_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env_remove("SQLMIG_DATABASE")
        .env_remove("SQLMIG_TARGET")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute sqlmig with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Temp project with `sqlmig.yml` pointing at a file database.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("sqlmig.yml"),
        "name: test_app\nmigrations_dir: migrations\ndatabase:\n  path: data/app.duckdb\n",
    )
    .unwrap();
    fs::create_dir(dir.path().join("migrations")).unwrap();
    dir
}

fn write_migration(project: &Path, file_name: &str, sql: &str) -> PathBuf {
    let path = project.join("migrations").join(file_name);
    fs::write(&path, sql).unwrap();
    path
}

fn status_json(project: &Path) -> Vec<serde_json::Value> {
    let (stdout, stderr, code) = run_sqlmig(project, &["status", "--output", "json"]);
    assert_eq!(code, 0, "status failed: {stderr}");
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn test_migrate_then_rerun_is_noop() {
    let project = project();
    write_migration(
        project.path(),
        "20230101120000_create_users.sql",
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR);",
    );
    write_migration(
        project.path(),
        "20230102120000_seed_users.sql",
        "INSERT INTO users VALUES (1, 'ada');",
    );

    let (stdout, stderr, code) = run_sqlmig(project.path(), &["migrate"]);
    assert_eq!(code, 0, "first run failed: {stderr}");
    assert!(stdout.contains("Applied 2 migrations"), "stdout: {stdout}");
    assert!(project.path().join("data/app.duckdb").exists());

    let (stdout, stderr, code) = run_sqlmig(project.path(), &["migrate"]);
    assert_eq!(code, 0, "second run failed: {stderr}");
    assert!(stdout.contains("up to date"), "stdout: {stdout}");

    let statuses = status_json(project.path());
    assert_eq!(statuses.len(), 2);
    assert!(statuses.iter().all(|s| s["state"] == "applied"));
    assert_eq!(statuses[0]["version"], "20230101120000_create_users");
}

#[test]
fn test_create_then_migrate() {
    let project = project();

    let (stdout, stderr, code) = run_sqlmig(project.path(), &["create", "--name", "add_orders"]);
    assert_eq!(code, 0, "create failed: {stderr}");
    assert!(stdout.contains("Created migration file:"));

    let created: Vec<String> = fs::read_dir(project.path().join("migrations"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(created.len(), 1);
    assert!(created[0].ends_with("_add_orders.sql"));

    // The template holds only comments; it is still recorded.
    let (_, stderr, code) = run_sqlmig(project.path(), &["migrate"]);
    assert_eq!(code, 0, "migrate failed: {stderr}");
    let statuses = status_json(project.path());
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0]["state"], "applied");
}

#[test]
fn test_create_rejects_invalid_name() {
    let project = project();
    let (_, stderr, code) = run_sqlmig(project.path(), &["create", "--name", "add-orders"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("C005"), "stderr: {stderr}");
}

#[test]
fn test_invalid_filename_blocks_batch() {
    let project = project();
    write_migration(
        project.path(),
        "20230101120000_create_users.sql",
        "CREATE TABLE users (id INTEGER);",
    );
    write_migration(project.path(), "2023_bad.sql", "CREATE TABLE bad (id INTEGER);");

    let (_, stderr, code) = run_sqlmig(project.path(), &["migrate"]);
    assert_eq!(code, 3);
    assert!(stderr.contains("2023_bad.sql"), "stderr: {stderr}");

    let (_, _, code) = run_sqlmig(project.path(), &["validate"]);
    assert_eq!(code, 3);

    // Nothing was applied, including the valid file.
    let statuses = status_json(project.path());
    assert!(statuses.is_empty());
}

#[test]
fn test_failed_migration_stops_and_resumes() {
    let project = project();
    write_migration(
        project.path(),
        "20230101120000_create_users.sql",
        "CREATE TABLE users (id INTEGER);",
    );
    let broken = write_migration(
        project.path(),
        "20230102120000_add_orders.sql",
        "CREATE TABLE orders (id INTEGER); CREATE TABLEE broken;",
    );
    write_migration(
        project.path(),
        "20230103120000_seed.sql",
        "INSERT INTO orders VALUES (1);",
    );

    let (_, stderr, code) = run_sqlmig(project.path(), &["migrate"]);
    assert_eq!(code, 4);
    assert!(
        stderr.contains("20230102120000_add_orders"),
        "stderr: {stderr}"
    );

    let statuses = status_json(project.path());
    let states: Vec<&str> = statuses
        .iter()
        .map(|s| s["state"].as_str().unwrap())
        .collect();
    assert_eq!(states, vec!["applied", "pending", "pending"]);

    fs::write(&broken, "CREATE TABLE orders (id INTEGER);").unwrap();
    let (stdout, stderr, code) = run_sqlmig(project.path(), &["migrate"]);
    assert_eq!(code, 0, "resume failed: {stderr}");
    assert!(stdout.contains("Applied 2 migrations"), "stdout: {stdout}");
}

#[test]
fn test_status_does_not_create_database() {
    let project = project();
    write_migration(
        project.path(),
        "20230101120000_create_users.sql",
        "CREATE TABLE users (id INTEGER);",
    );

    let (stdout, _, code) = run_sqlmig(project.path(), &["status"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("0 applied, 1 pending, 0 missing"), "stdout: {stdout}");
    assert!(!project.path().join("data/app.duckdb").exists());
}

#[test]
fn test_target_selects_database() {
    let project = project();
    fs::write(
        project.path().join("sqlmig.yml"),
        r#"
database:
  path: dev.duckdb
targets:
  ci:
    database:
      path: ci.duckdb
"#,
    )
    .unwrap();
    write_migration(
        project.path(),
        "20230101120000_create_users.sql",
        "CREATE TABLE users (id INTEGER);",
    );

    let (_, stderr, code) = run_sqlmig(project.path(), &["--target", "ci", "migrate"]);
    assert_eq!(code, 0, "migrate failed: {stderr}");
    assert!(project.path().join("ci.duckdb").exists());
    assert!(!project.path().join("dev.duckdb").exists());

    let (_, stderr, code) = run_sqlmig(project.path(), &["--target", "nope", "migrate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Available targets: ci"), "stderr: {stderr}");
}

#[test]
fn test_database_flag_overrides_config() {
    let project = project();
    write_migration(
        project.path(),
        "20230101120000_create_users.sql",
        "CREATE TABLE users (id INTEGER);",
    );
    let db_path = project.path().join("override.duckdb");

    let (_, stderr, code) = run_sqlmig(
        project.path(),
        &["--database", db_path.to_str().unwrap(), "migrate"],
    );
    assert_eq!(code, 0, "migrate failed: {stderr}");
    assert!(db_path.exists());
    assert!(!project.path().join("data/app.duckdb").exists());
}

#[test]
fn test_in_memory_database_warns() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("migrations")).unwrap();
    write_migration(
        dir.path(),
        "20230101120000_create_users.sql",
        "CREATE TABLE users (id INTEGER);",
    );

    let (_, stderr, code) = run_sqlmig(dir.path(), &["migrate"]);
    assert_eq!(code, 0, "migrate failed: {stderr}");
    assert!(stderr.contains("Warning: database is :memory:"), "stderr: {stderr}");

    let project = project();
    let (_, stderr, code) = run_sqlmig(project.path(), &["migrate"]);
    assert_eq!(code, 0, "migrate failed: {stderr}");
    assert!(!stderr.contains("Warning"), "stderr: {stderr}");
}

#[test]
fn test_commit_in_migration_exits_with_execution_code() {
    let project = project();
    write_migration(
        project.path(),
        "20230101120000_escape.sql",
        "CREATE TABLE x (id INTEGER); COMMIT; CREATE TABLE y (id INTEGER);",
    );

    let (_, stderr, code) = run_sqlmig(project.path(), &["migrate"]);
    assert_eq!(code, 4);
    assert!(stderr.contains("COMMIT statements are not allowed"), "stderr: {stderr}");

    let statuses = status_json(project.path());
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0]["state"], "pending");
}
