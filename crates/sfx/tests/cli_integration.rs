//! CLI integration tests for the sfx command-line interface.
//!
//! Every test runs against config files in a temp directory, with the
//! SFX_* variables cleared and HOME pointed at the same directory, so the
//! machine's real config never leaks in. Nothing here touches the network.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get an isolated command for the sfx binary.
fn sfx(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sfx").unwrap();
    cmd.env_remove("SFX_AUTH_TOKEN")
        .env_remove("SFX_API_URL")
        .env_remove("SFX_CUSTOM_APP_URL")
        .env_remove("RUST_LOG")
        .env("HOME", home)
        .env("NETRC", home.join(".netrc"))
        .arg("--system-config")
        .arg(home.join("system.conf"));
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    sfx(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_version_displays() {
    let home = TempDir::new().unwrap();
    sfx(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sfx"));
}

#[test]
fn test_config_help_lists_actions() {
    let home = TempDir::new().unwrap();
    sfx(home.path())
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("which"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn test_zero_timeout_rejected_by_parser() {
    let home = TempDir::new().unwrap();
    sfx(home.path())
        .args(["--auth-token", "abc", "--timeout-seconds", "0", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout-seconds"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Show
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_show_from_home_file() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join(".signalfx.conf"),
        r#"{"auth_token": "home-secret", "api_url": "https://api.eu0.signalfx.com"}"#,
    )
    .unwrap();

    sfx(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.eu0.signalfx.com"))
        .stdout(predicate::str::contains("(from user config)"))
        .stdout(predicate::str::contains("home-secret").not());
}

#[test]
fn test_config_show_json_caller_wins() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("system.conf"),
        r#"{"auth_token": "sys-token", "custom_app_url": "https://corp.signalfx.com"}"#,
    )
    .unwrap();

    let output = sfx(home.path())
        .args(["--json", "--auth-token", "caller-token", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["auth_token"], "****");
    assert_eq!(value["auth_token_source"], "caller");
    assert_eq!(value["api_url"], "https://api.signalfx.com");
    assert_eq!(value["custom_app_url"], "https://corp.signalfx.com");
}

#[test]
fn test_config_show_token_from_netrc() {
    let home = TempDir::new().unwrap();
    let netrc = home.path().join("custom-netrc");
    fs::write(&netrc, "machine api.signalfx.com login me password nrc\n").unwrap();

    let output = sfx(home.path())
        .arg("--json")
        .arg("--netrc")
        .arg(&netrc)
        .args(["config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["auth_token_source"], "netrc");
}

#[test]
fn test_config_show_env_token() {
    let home = TempDir::new().unwrap();
    sfx(home.path())
        .env("SFX_AUTH_TOKEN", "env-token")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(from provider options)"))
        .stdout(predicate::str::contains("env-token").not());
}

#[test]
fn test_missing_token_fails() {
    let home = TempDir::new().unwrap();
    sfx(home.path())
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "auth_token: required field is not set",
        ));
}

#[test]
fn test_malformed_home_config_fails() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".signalfx.conf"), "{not json").unwrap();

    sfx(home.path())
        .args(["--auth-token", "abc", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn test_malformed_netrc_fails_even_with_token() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".netrc"), "machine api.signalfx.com password\n").unwrap();

    sfx(home.path())
        .args(["--auth-token", "abc", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error parsing netrc file"));
}

#[test]
fn test_option_pairs_feed_provider_options() {
    let home = TempDir::new().unwrap();

    let output = sfx(home.path())
        .args([
            "--json",
            "-o",
            "auth_token=from-option",
            "-o",
            "api_url=https://api.us2.signalfx.com",
            "--api-url",
            "https://api.us1.signalfx.com",
            "config",
            "show",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["auth_token_source"], "caller");
    assert_eq!(value["api_url"], "https://api.us1.signalfx.com");
}

#[test]
fn test_unknown_option_key_fails() {
    let home = TempDir::new().unwrap();
    sfx(home.path())
        .args(["-o", "realm=us1", "--auth-token", "abc", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid option 'realm': unknown option"));
}

#[test]
fn test_option_without_equals_rejected_by_parser() {
    let home = TempDir::new().unwrap();
    sfx(home.path())
        .args(["-o", "auth_token", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Which / Path
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_which_lists_sources_in_order() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".signalfx.conf"), "{}").unwrap();

    let output = sfx(home.path())
        .args(["--json", "config", "which"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let kinds: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, ["system", "home", "netrc"]);
    assert_eq!(value[0]["applied"], false);
    assert_eq!(value[1]["applied"], true);
}

#[test]
fn test_config_path_honors_override() {
    let home = TempDir::new().unwrap();
    let custom = home.path().join("elsewhere.conf");

    sfx(home.path())
        .arg("--home-config")
        .arg(&custom)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("elsewhere.conf"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_check_builds_client() {
    let home = TempDir::new().unwrap();

    let output = sfx(home.path())
        .args([
            "--json",
            "--auth-token",
            "abc",
            "--api-url",
            "https://api.us1.signalfx.com",
            "--timeout-seconds",
            "30",
            "check",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["ready"], true);
    assert_eq!(value["base_url"], "https://api.us1.signalfx.com/");
    assert_eq!(value["timeout_seconds"], 30);
    assert!(value["user_agent"].as_str().unwrap().starts_with("sfx/"));
}

#[test]
fn test_check_rejects_bad_url() {
    let home = TempDir::new().unwrap();
    sfx(home.path())
        .args(["--auth-token", "abc", "--api-url", "::nope::", "check"])
        .assert()
        .failure();
}
