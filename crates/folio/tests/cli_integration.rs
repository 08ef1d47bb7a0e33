//! CLI integration tests for the Folio command-line interface.
//!
//! These tests cover help output, argument parsing, and the commands that
//! can run without a live backend.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the folio binary.
fn folio() -> Command {
    Command::cargo_bin("folio").unwrap()
}

/// A folio command isolated from the user's config, tokens and logs.
fn isolated(dir: &TempDir) -> Command {
    let mut cmd = folio();
    cmd.env("FOLIO_CONFIG_DIR", dir.path())
        .env_remove("FOLIO_SERVER_URL")
        .env_remove("FOLIO_PASSWORD")
        .current_dir(dir.path());
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    folio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Folio"))
        .stdout(predicate::str::contains("journal publishing platform"));
}

#[test]
fn test_version_displays() {
    folio()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"));
}

#[test]
fn test_help_lists_subcommands() {
    folio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("journals"))
        .stdout(predicate::str::contains("request"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_auth_help_lists_subcommands() {
    folio()
        .args(["auth", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("refresh"));
}

#[test]
fn test_journals_help_lists_subcommands() {
    folio()
        .args(["journals", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("public"))
        .stdout(predicate::str::contains("mine"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("submit"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Flag Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_global_flags_accepted() {
    folio()
        .args(["--verbose", "--json", "--server", "http://localhost:5000/api", "--help"])
        .assert()
        .success();
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument Validation Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_no_subcommand_fails() {
    folio().assert().failure();
}

#[test]
fn test_login_requires_email() {
    folio()
        .args(["auth", "login"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--email"));
}

#[test]
fn test_journals_get_requires_id() {
    folio()
        .args(["journals", "get"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<ID>"));
}

#[test]
fn test_request_requires_method_and_path() {
    folio()
        .args(["request", "GET"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<PATH>"));
}

#[test]
fn test_invalid_server_url_rejected() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["--server", "not a url", "auth", "status"])
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Offline Commands
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_auth_status_without_session() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["--json", "auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"access_token\": false"))
        .stdout(predicate::str::contains("\"refresh_token\": false"));
}

#[test]
fn test_auth_status_reads_token_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tokens.json"),
        r#"{"accessToken":"access-token-123456","refreshToken":"refresh-token-654321"}"#,
    )
    .unwrap();

    isolated(&dir)
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acce...3456"))
        .stdout(predicate::str::contains("refr...4321"));
}

#[test]
fn test_logout_without_session() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No stored session"));
}

#[test]
fn test_status_reports_unreachable_backend() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["--json", "--server", "http://127.0.0.1:1/api", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reachable\": false"))
        .stdout(predicate::str::contains("\"logged_in\": false"));
}
