//! Integration tests for the `voglander` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! offline views and error handling without a running backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

const SANDBOX: &str = "/tmp/voglander-cli-test-nonexistent";

/// Build a [`Command`] for the `voglander` binary with env isolation.
///
/// Clears all `VOGLANDER_*` and build-environment variables and points
/// config/data directories at a nonexistent path so tests never touch the
/// user's real configuration or session.
fn voglander_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("voglander");
    cmd.env("HOME", SANDBOX)
        .env("XDG_CONFIG_HOME", SANDBOX)
        .env("XDG_DATA_HOME", SANDBOX)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("VOGLANDER_PROFILE")
        .env_remove("VOGLANDER_BASE_URL")
        .env_remove("VOGLANDER_OUTPUT")
        .env_remove("VOGLANDER_TIMEOUT")
        .env_remove("VOGLANDER_TOKEN_FILE")
        .env_remove("VOGLANDER_USERNAME")
        .env_remove("VOGLANDER_PASSWORD")
        .env_remove("VUE_APP_API_BASE_URL")
        .env_remove("VUE_APP_TITLE")
        .env_remove("NODE_ENV");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = voglander_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    voglander_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Voglander devices")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("login"))
            .and(predicate::str::contains("open")),
    );
}

#[test]
fn test_version_flag() {
    voglander_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("voglander"));
}

#[test]
fn test_devices_help_lists_every_operation() {
    let expected = [
        "get",
        "find",
        "list",
        "page",
        "count",
        "insert",
        "insert-batch",
        "update",
        "update-batch",
        "delete",
        "delete-where",
        "delete-batch",
    ];
    let output = voglander_cmd().args(["devices", "--help"]).output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    for name in expected {
        assert!(text.contains(name), "missing '{name}' in:\n{text}");
    }
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    voglander_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    voglander_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("voglander"));
}

#[test]
fn test_completions_fish() {
    voglander_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = voglander_cmd().arg("frobnicate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_output_format() {
    let output = voglander_cmd()
        .args(["routes", "--output", "xml"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_insert_requires_payload() {
    let output = voglander_cmd().args(["devices", "insert"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--data"));
}

#[test]
fn test_malformed_where_is_rejected() {
    let output = voglander_cmd()
        .args(["devices", "list", "--where", "nokey"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("FIELD=VALUE"));
}

#[test]
fn test_delete_where_without_filter_is_usage_error() {
    let output = voglander_cmd()
        .args(["devices", "delete-where", "--yes"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--where"));
}

#[test]
fn test_invalid_base_url_is_usage_error() {
    let output = voglander_cmd()
        .args(["devices", "count", "--base-url", "not a url"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_config_show_succeeds() {
    voglander_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_path_points_at_toml() {
    voglander_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_routes_plain_lists_paths() {
    voglander_cmd()
        .args(["routes", "-o", "plain"])
        .assert()
        .success()
        .stdout("/\n/about\n/device\n/api-test\n");
}

#[test]
fn test_env_defaults() {
    let output = voglander_cmd().args(["env", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    let env: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(env["api_base_url"], "http://localhost:8081/");
    assert_eq!(env["env_base_url"], "http://localhost:8087/");
    assert_eq!(env["mode"], "other");
    assert_eq!(env["profile"], "default");
    assert_eq!(env["timeout_secs"], 10);
}

#[test]
fn test_env_honors_vue_app_variables() {
    let output = voglander_cmd()
        .args(["env", "-o", "json"])
        .env("VUE_APP_API_BASE_URL", "http://10.1.2.3:8087")
        .env("VUE_APP_TITLE", "Lab")
        .env("NODE_ENV", "development")
        .output()
        .unwrap();
    assert!(output.status.success());
    let env: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(env["api_base_url"], "http://10.1.2.3:8087/");
    assert_eq!(env["env_base_url"], "http://10.1.2.3:8087/");
    assert_eq!(env["title"], "Lab");
    assert_eq!(env["mode"], "development");
}

#[test]
fn test_open_about_renders_without_backend() {
    voglander_cmd()
        .args(["open", "/about", "--base-url", "http://127.0.0.1:9"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("About Voglander")
                .and(predicate::str::contains("Backend:  http://localhost:8087/")),
        );
}

#[test]
fn test_open_unknown_route_is_not_found() {
    let output = voglander_cmd()
        .args(["open", "/login", "--base-url", "http://127.0.0.1:9"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("/login"));
}

#[test]
fn test_unreachable_backend_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = voglander_cmd()
        .args(["devices", "count", "--base-url", "http://127.0.0.1:9"])
        .arg("--token-file")
        .arg(dir.path().join("token.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}
