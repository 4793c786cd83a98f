//! Integration tests for the `wxdeck` binary.
//!
//! Argument parsing, help, completions and config handling run without a
//! backend. Session flows run against a wiremock server with tokens kept
//! in a file under a temporary data directory.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `wxdeck` binary with env isolation.
///
/// Config, data and home directories all point into `home`, and every
/// `WXDECK_*` variable that could leak in from the caller is cleared.
fn wxdeck_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wxdeck");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("WXDECK_CONFIG", home.join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("WXDECK_PROFILE")
        .env_remove("WXDECK_API_URL")
        .env_remove("WXDECK_OUTPUT")
        .env_remove("WXDECK_INSECURE")
        .env_remove("WXDECK_TIMEOUT")
        .env_remove("WXDECK_PASSWORD")
        .env_remove("WXDECK_NEW_PASSWORD");
    cmd
}

/// Write a config whose default profile keeps its token in a file.
fn write_config(home: &Path, api_url: &str) {
    let toml = format!(
        "default_profile = \"lab\"\n\n\
         [profiles.lab]\n\
         api_url = \"{api_url}\"\n\
         token_store = \"file\"\n"
    );
    std::fs::write(home.join("config.toml"), toml).unwrap();
}

/// An unsigned access token carrying the claims the backend issues.
fn token(role: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    let claims = json!({
        "sub": "7",
        "exp": exp,
        "email": "ops@example.com",
        "full_name": "Ops Desk",
        "role": role,
    });
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

async fn mock_login(server: &MockServer, role: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_string_contains("username=ops%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token(role),
            "token_type": "bearer",
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn login(home: &Path) {
    wxdeck_cmd(home)
        .args(["login", "--email", "ops@example.com"])
        .env("WXDECK_PASSWORD", "hunter2")
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged in as ops@example.com"));
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_usage() {
    let home = TempDir::new().unwrap();
    let output = wxdeck_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn help_lists_resources() {
    let home = TempDir::new().unwrap();
    wxdeck_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("weather-station")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("api-keys"))
            .and(predicate::str::contains("readings")),
    );
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    wxdeck_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wxdeck"));
}

#[test]
fn completions_for_zsh() {
    let home = TempDir::new().unwrap();
    wxdeck_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wxdeck"));
}

#[test]
fn conflicting_range_flags_are_rejected() {
    let home = TempDir::new().unwrap();
    wxdeck_cmd(home.path())
        .args(["readings", "history", "3", "--last", "6h", "--start", "2026-01-01T00:00:00Z"])
        .assert()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn config_set_then_show_and_profiles() {
    let home = TempDir::new().unwrap();

    wxdeck_cmd(home.path())
        .args(["-p", "lab", "config", "set", "api_url", "https://wx.example.com/api/v1"])
        .assert()
        .success();
    wxdeck_cmd(home.path())
        .args(["-p", "lab", "config", "set", "token_store", "file"])
        .assert()
        .success();

    wxdeck_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.lab]")
                .and(predicate::str::contains("https://wx.example.com/api/v1"))
                .and(predicate::str::contains("token_store = \"file\"")),
        );

    wxdeck_cmd(home.path())
        .args(["config", "use", "lab"])
        .assert()
        .success();
    wxdeck_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab *"));
}

#[test]
fn config_use_unknown_profile_fails() {
    let home = TempDir::new().unwrap();
    wxdeck_cmd(home.path())
        .args(["config", "use", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    wxdeck_cmd(home.path())
        .args(["config", "set", "site", "default"])
        .assert()
        .code(2);
}

#[test]
fn config_edits_leave_an_unreadable_file_alone() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("config.toml");
    let original = "default_profile = \"lab\"\n\n\
                    [profiles.lab]\n\
                    api_url = \"https://wx.example.com/api/v1\"\n\n\
                    [profiles.field]\n\
                    timeout = \"soon\"\n";
    std::fs::write(&path, original).unwrap();

    wxdeck_cmd(home.path())
        .args(["config", "set", "email", "ops@example.com"])
        .assert()
        .failure();
    wxdeck_cmd(home.path())
        .args(["config", "use", "field"])
        .assert()
        .failure();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

// ── Session guard ───────────────────────────────────────────────────

#[test]
fn protected_command_without_login_exits_auth() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), "http://127.0.0.1:9/api/v1");
    wxdeck_cmd(home.path())
        .args(["devices", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("login"));
}

#[test]
fn logout_without_session_is_harmless() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), "http://127.0.0.1:9/api/v1");
    wxdeck_cmd(home.path())
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("Not logged in"));
}

// ── Against a mock backend ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn health_needs_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "healthy", "database": "connected"})),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_config(home.path(), &format!("{}/api/v1", server.uri()));
    wxdeck_cmd(home.path())
        .args(["health", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("healthy"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn login_persists_token_for_later_commands() {
    let server = MockServer::start().await;
    mock_login(&server, "admin").await;
    let bearer = format!("Bearer {}", token("admin"));
    Mock::given(method("GET"))
        .and(path("/api/v1/devices/"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [{
                "id": 3,
                "type": "ESP32",
                "location": "Backyard mast",
                "function": "sensor",
                "status": "online",
                "last_seen": "2026-10-19T08:00:00Z",
                "created_at": "2026-01-01T00:00:00Z",
                "updated_at": "2026-10-19T08:00:00Z",
            }],
            "total": 1,
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_config(home.path(), &format!("{}/api/v1", server.uri()));
    login(home.path());

    let output = wxdeck_cmd(home.path())
        .args(["devices", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let devices: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(devices[0]["location"], "Backyard mast");
    assert_eq!(devices[0]["type"], "ESP32");

    wxdeck_cmd(home.path())
        .args(["whoami", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ops@example.com"));

    wxdeck_cmd(home.path())
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged out"));
    wxdeck_cmd(home.path())
        .args(["devices", "list"])
        .assert()
        .code(3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn non_admin_is_kept_out_of_admin_pages() {
    let server = MockServer::start().await;
    mock_login(&server, "user").await;

    let home = TempDir::new().unwrap();
    write_config(home.path(), &format!("{}/api/v1", server.uri()));
    login(home.path());

    wxdeck_cmd(home.path())
        .args(["users", "list"])
        .assert()
        .code(5);
    wxdeck_cmd(home.path())
        .args(["settings", "list"])
        .assert()
        .code(5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rejected_credentials_exit_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect email or password"})),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_config(home.path(), &format!("{}/api/v1", server.uri()));
    wxdeck_cmd(home.path())
        .args(["login", "--email", "ops@example.com"])
        .env("WXDECK_PASSWORD", "wrong")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Incorrect email or password"));
}
