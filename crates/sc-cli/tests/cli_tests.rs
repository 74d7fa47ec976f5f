//! End-to-end tests driving the `schemachain` binary against a scratch
//! project directory.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn schemachain_bin() -> String {
    env!("CARGO_BIN_EXE_schemachain").to_string()
}

/// Run a `schemachain` command in `project` and return (stdout, stderr, success).
fn run(project: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(schemachain_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env_remove("SCHEMACHAIN_DATABASE")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute schemachain with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

/// A project with the given config and numbered migration scripts.
fn project(config: &str, scripts: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    if !config.is_empty() {
        fs::write(dir.path().join("schemachain.yml"), config).unwrap();
    }
    let migrations = dir.path().join("migrations");
    fs::create_dir(&migrations).unwrap();
    for (i, script) in scripts.iter().enumerate() {
        fs::write(migrations.join(format!("{:03}.sql", i + 1)), script).unwrap();
    }
    dir
}

fn add_script(dir: &TempDir, number: usize, script: &str) {
    fs::write(
        dir.path().join("migrations").join(format!("{:03}.sql", number)),
        script,
    )
    .unwrap();
}

fn status_json(dir: &TempDir) -> serde_json::Value {
    let (stdout, stderr, _) = run(dir.path(), &["status", "--json"]);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("status --json is not JSON ({e}): {stdout}\n{stderr}"))
}

const SQLITE_CONFIG: &str = "database:\n  type: sqlite\n  path: app.db\n";
const USERS: &str = "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);";
const POSTS: &str = "CREATE TABLE posts (id INTEGER PRIMARY KEY, user_id INTEGER);";
const TAGS: &str = "CREATE TABLE tags (id INTEGER PRIMARY KEY);";

// ── apply ──────────────────────────────────────────────────────────────

#[test]
fn test_apply_then_up_to_date() {
    let dir = project(SQLITE_CONFIG, &[USERS, POSTS]);

    let (stdout, stderr, ok) = run(dir.path(), &["apply"]);
    assert!(ok, "apply failed: {stderr}");
    assert!(stdout.contains("Applied 2 migrations; schema at version 2"), "{stdout}");
    assert!(dir.path().join("app.db").exists());

    let (stdout, _, ok) = run(dir.path(), &["apply"]);
    assert!(ok);
    assert!(stdout.contains("Schema is up to date at version 2"), "{stdout}");

    add_script(&dir, 3, TAGS);
    let (stdout, _, ok) = run(dir.path(), &["apply"]);
    assert!(ok);
    assert!(stdout.contains("Applied 1 migration; schema at version 3"), "{stdout}");
}

#[test]
fn test_apply_without_config_uses_defaults() {
    let dir = project("", &[USERS]);

    let (stdout, stderr, ok) = run(dir.path(), &["apply"]);
    assert!(ok, "apply failed: {stderr}");
    assert!(stdout.contains("schema at version 1"));
    assert!(dir.path().join("schemachain.db").exists());
}

#[test]
fn test_apply_duckdb_project() {
    let dir = project("database:\n  type: duckdb\n  path: app.duckdb\n", &[USERS, POSTS]);

    let (stdout, stderr, ok) = run(dir.path(), &["apply"]);
    assert!(ok, "apply failed: {stderr}");
    assert!(stdout.contains("schema at version 2"));

    let status = status_json(&dir);
    assert_eq!(status["current"]["version"], 2);
}

#[test]
fn test_apply_failure_rolls_back() {
    let dir = project(SQLITE_CONFIG, &[USERS, POSTS, "CREATE TABLE broken ("]);

    let (_, stderr, ok) = run(dir.path(), &["apply"]);
    assert!(!ok);
    assert!(stderr.contains("apply migration script 3"), "{stderr}");
    assert!(!stderr.contains("committed before the failure"));

    let status = status_json(&dir);
    assert_eq!(status["current"]["version"], 0);
    assert_eq!(status["pending"], serde_json::json!([1, 2, 3]));
}

#[test]
fn test_apply_no_transaction_keeps_progress() {
    let dir = project(SQLITE_CONFIG, &[USERS, POSTS, "CREATE TABLE broken ("]);

    let (_, stderr, ok) = run(dir.path(), &["apply", "--no-transaction"]);
    assert!(!ok);
    assert!(stderr.contains("2 migration(s) were committed"), "{stderr}");

    let status = status_json(&dir);
    assert_eq!(status["current"]["version"], 2);
}

#[test]
fn test_apply_exclude() {
    let dir = project(SQLITE_CONFIG, &[USERS, POSTS]);

    let (stdout, _, ok) = run(dir.path(), &["apply", "--exclude", "2"]);
    assert!(ok);
    assert!(stdout.contains("Applied 1 migration; schema at version 1"), "{stdout}");

    let (stdout, _, ok) = run(dir.path(), &["apply"]);
    assert!(ok);
    assert!(stdout.contains("schema at version 2"), "{stdout}");
}

#[test]
fn test_config_exclude_and_extension() {
    let config = format!("{SQLITE_CONFIG}migrations:\n  extension: sql\nexclude: [1]\n");
    let dir = project(&config, &[USERS, POSTS]);
    fs::write(dir.path().join("migrations").join("README.md"), "not sql").unwrap();

    let status = status_json(&dir);
    assert_eq!(status["available"], 2);
    assert_eq!(status["pending"], serde_json::json!([2]));
}

// ── drift ──────────────────────────────────────────────────────────────

#[test]
fn test_edited_script_is_rejected() {
    let dir = project(SQLITE_CONFIG, &[USERS, POSTS]);
    assert!(run(dir.path(), &["apply"]).2);

    add_script(&dir, 2, "CREATE TABLE posts (id INTEGER PRIMARY KEY, body TEXT);");

    let (_, stderr, ok) = run(dir.path(), &["status"]);
    assert!(!ok);
    assert!(stderr.contains("integrity check failed"), "{stderr}");

    add_script(&dir, 3, TAGS);
    let (_, stderr, ok) = run(dir.path(), &["apply"]);
    assert!(!ok);
    assert!(stderr.contains("integrity check failed"), "{stderr}");

    let (stdout, stderr, ok) = run(dir.path(), &["apply", "--no-verify"]);
    assert!(ok, "{stderr}");
    assert!(stdout.contains("schema at version 3"), "{stdout}");
}

#[test]
fn test_status_tolerates_drift_when_verification_is_off() {
    let config = format!("{SQLITE_CONFIG}verify_checksums: false\n");
    let dir = project(&config, &[USERS, POSTS]);
    assert!(run(dir.path(), &["apply"]).2);

    add_script(&dir, 2, "CREATE TABLE posts (id INTEGER PRIMARY KEY, body TEXT);");

    let (stdout, stderr, ok) = run(dir.path(), &["status"]);
    assert!(ok, "{stderr}");
    assert!(stdout.contains("Pending:    none"), "{stdout}");
    assert!(stderr.contains("checksum verification is off"), "{stderr}");

    let status = status_json(&dir);
    assert_eq!(status["checksum_valid"], false);
    assert_eq!(status["checksum_enforced"], false);

    add_script(&dir, 3, TAGS);
    let (stdout, stderr, ok) = run(dir.path(), &["apply"]);
    assert!(ok, "{stderr}");
    assert!(stdout.contains("schema at version 3"), "{stdout}");
}

#[test]
fn test_reformatted_script_is_not_drift() {
    let dir = project(SQLITE_CONFIG, &[USERS]);
    assert!(run(dir.path(), &["apply"]).2);

    add_script(
        &dir,
        1,
        "CREATE TABLE users (\n    id INTEGER PRIMARY KEY,\n    name TEXT\n);\n",
    );
    let (stdout, stderr, ok) = run(dir.path(), &["status"]);
    assert!(ok, "{stderr}");
    assert!(stdout.contains("Pending:    none"), "{stdout}");
}

#[test]
fn test_removed_script_is_overrun() {
    let dir = project(SQLITE_CONFIG, &[USERS, POSTS]);
    assert!(run(dir.path(), &["apply"]).2);

    fs::remove_file(dir.path().join("migrations").join("002.sql")).unwrap();

    let (_, stderr, ok) = run(dir.path(), &["apply"]);
    assert!(!ok);
    assert!(stderr.contains("exceeds available migrations"), "{stderr}");
}

// ── status / checksums ─────────────────────────────────────────────────

#[test]
fn test_status_text() {
    let dir = project(SQLITE_CONFIG, &[USERS, POSTS]);

    let (stdout, stderr, ok) = run(dir.path(), &["status"]);
    assert!(ok, "{stderr}");
    assert!(stdout.contains("Version:    0 of 2"), "{stdout}");
    assert!(stdout.contains("Pending:    1, 2"), "{stdout}");
}

#[test]
fn test_checksums_match_recorded_version() {
    let dir = project(SQLITE_CONFIG, &[USERS, POSTS]);
    assert!(run(dir.path(), &["apply"]).2);

    let (stdout, stderr, ok) = run(dir.path(), &["checksums", "--json"]);
    assert!(ok, "{stderr}");
    let chain: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let chain = chain.as_array().unwrap();
    assert_eq!(chain.len(), 3);
    assert_eq!(chain[0]["version"], 0);
    assert!(chain[0].get("file").is_none());
    assert_eq!(chain[2]["file"], "002.sql");

    let status = status_json(&dir);
    assert_eq!(status["current"]["checksum"], chain[2]["checksum"]);
}

#[test]
fn test_checksums_text() {
    let dir = project(SQLITE_CONFIG, &[USERS]);

    let (stdout, _, ok) = run(dir.path(), &["checksums"]);
    assert!(ok);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("(empty)"));
    assert!(lines[1].ends_with("001.sql"));
}

// ── errors ─────────────────────────────────────────────────────────────

#[test]
fn test_missing_migrations_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("schemachain.yml"), SQLITE_CONFIG).unwrap();

    let (_, stderr, ok) = run(dir.path(), &["apply"]);
    assert!(!ok);
    assert!(stderr.contains("[MG001]"), "{stderr}");
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = project("unknown_key: true\n", &[USERS]);

    let (_, stderr, ok) = run(dir.path(), &["apply"]);
    assert!(!ok);
    assert!(stderr.contains("Failed to load project configuration"), "{stderr}");
}

#[test]
fn test_database_override() {
    let dir = project(SQLITE_CONFIG, &[USERS]);
    let other = dir.path().join("other.db");
    let other = other.to_str().unwrap();

    let (_, stderr, ok) = run(dir.path(), &["apply", "--database", other]);
    assert!(ok, "{stderr}");
    assert!(Path::new(other).exists());
    assert!(!dir.path().join("app.db").exists());
}
