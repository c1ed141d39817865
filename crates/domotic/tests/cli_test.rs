//! Integration tests for the `domotic` CLI binary.
//!
//! Argument parsing, help output, completions and error exit codes run
//! without a server; the session flows run against a wiremock API.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `domotic` binary with env isolation.
///
/// Clears all `DOMOTIC_*` env vars, points config directories at a
/// nonexistent path and keeps session files inside `storage`.
fn domotic_cmd(storage: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("domotic");
    cmd.env("HOME", "/tmp/domotic-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/domotic-cli-test-nonexistent")
        .env("DOMOTIC_STORAGE_DIR", storage)
        .env("NO_COLOR", "1")
        .env_remove("DOMOTIC_PROFILE")
        .env_remove("DOMOTIC_BASE_URL")
        .env_remove("DOMOTIC_OUTPUT")
        .env_remove("DOMOTIC_INSECURE")
        .env_remove("DOMOTIC_TIMEOUT")
        .env_remove("DOMOTIC_PASSWORD");
    cmd
}

/// Write a durable session file holding `token`.
fn seed_token(storage: &Path, token: &str) {
    std::fs::create_dir_all(storage).unwrap();
    std::fs::write(
        storage.join("local.json"),
        json!({ "token": token }).to_string(),
    )
    .unwrap();
}

/// A local URL nothing listens on.
fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = domotic_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_resources() {
    let dir = tempfile::tempdir().unwrap();
    domotic_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("homes")
            .and(predicate::str::contains("rooms"))
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("esp32"))
            .and(predicate::str::contains("widgets")),
    );
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    domotic_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("domotic"));
}

#[test]
fn test_completions_zsh() {
    let dir = tempfile::tempdir().unwrap();
    domotic_cmd(dir.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    let output = domotic_cmd(dir.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("foobar"));
}

#[test]
fn test_unknown_label_rejected_by_parser() {
    let dir = tempfile::tempdir().unwrap();
    domotic_cmd(dir.path())
        .args([
            "devices", "create", "--room", "1", "--name", "x", "--label", "TOASTER",
        ])
        .assert()
        .code(2);
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_labels_plain() {
    let dir = tempfile::tempdir().unwrap();
    domotic_cmd(dir.path())
        .args(["labels", "--output", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("CO2_SENSOR")
                .and(predicate::str::contains("SMART_PLUG"))
                .and(predicate::str::contains("NUMERIC_INPUT"))
                .and(predicate::str::contains("OTHER").not()),
        );
}

#[test]
fn test_config_path() {
    let dir = tempfile::tempdir().unwrap();
    domotic_cmd(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_status_when_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    domotic_cmd(dir.path())
        .args(["status", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""authenticated": false"#));
}

// ── Error exit codes ────────────────────────────────────────────────

#[test]
fn test_resource_commands_require_login() {
    let dir = tempfile::tempdir().unwrap();
    domotic_cmd(dir.path())
        .args(["homes", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_validation_before_request() {
    let dir = tempfile::tempdir().unwrap();
    seed_token(dir.path(), "tok");
    domotic_cmd(dir.path())
        .args(["--base-url", &dead_url()])
        .args(["homes", "create", "--name", "", "--address", "Main St"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Home name and address are required"));
}

#[test]
fn test_unreachable_server_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    seed_token(dir.path(), "tok");
    domotic_cmd(dir.path())
        .args(["--base-url", &dead_url()])
        .args(["devices", "control", "5", "toggle"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("No response received from server"));
}

#[test]
fn test_widget_add_needs_device_when_not_interactive() {
    let dir = tempfile::tempdir().unwrap();
    seed_token(dir.path(), "tok");
    domotic_cmd(dir.path())
        .args(["--base-url", &dead_url()])
        .args(["widgets", "add"])
        .assert()
        .code(2);
}

#[test]
fn test_delete_without_yes_is_refused_when_not_interactive() {
    let dir = tempfile::tempdir().unwrap();
    seed_token(dir.path(), "tok");
    domotic_cmd(dir.path())
        .args(["--base-url", &dead_url()])
        .args(["esp32", "delete", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

// ── Flows against a mock API ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_list_homes() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(json!({ "email": "ann@example.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "ann", "email": "ann@example.com", "token": "jwt-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/homes/all"))
        .and(header("authorization", "Bearer jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "id": 2, "name": "cabin", "address": "Lake Rd" },
                { "id": 1, "name": "Attic flat", "address": "Main St" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    domotic_cmd(dir.path())
        .args(["--base-url", &server.uri()])
        .args(["login", "--email", "ann@example.com", "--remember"])
        .env("DOMOTIC_PASSWORD", "pw")
        .assert()
        .success();

    let stored = std::fs::read_to_string(dir.path().join("local.json")).unwrap();
    assert!(stored.contains("jwt-1"));

    domotic_cmd(dir.path())
        .args(["--base-url", &server.uri()])
        .args(["homes", "list", "--output", "plain"])
        .assert()
        .success()
        .stdout("1\n2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_message_surfaces() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    seed_token(dir.path(), "tok");

    Mock::given(method("GET"))
        .and(path("/api/homes/9"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Home not found" })),
        )
        .mount(&server)
        .await;

    domotic_cmd(dir.path())
        .args(["--base-url", &server.uri()])
        .args(["homes", "get", "9"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Home not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_keeps_widgets() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("local.json"),
        json!({
            "token": "tok",
            "dashboard_widgets": json!([{
                "deviceId": 5,
                "device": { "id": 5, "name": "Lamp", "type": "LIGHT", "controlType": "SWITCH", "currentValue": "1" },
                "roomName": "Kitchen",
                "homeName": "Villa"
            }]).to_string()
        })
        .to_string(),
    )
    .unwrap();

    domotic_cmd(dir.path())
        .args(["--base-url", &dead_url(), "logout"])
        .assert()
        .success();

    let stored = std::fs::read_to_string(dir.path().join("local.json")).unwrap();
    assert!(!stored.contains(r#""token""#));

    // Listing widgets needs a session again, but the board survived.
    seed_token_preserving(dir.path(), "tok2");
    domotic_cmd(dir.path())
        .args(["--base-url", &dead_url(), "widgets", "list", "--output", "plain"])
        .assert()
        .success()
        .stdout("5\n");
}

/// Add a token to an existing durable file without dropping other keys.
fn seed_token_preserving(storage: &Path, token: &str) {
    let file = storage.join("local.json");
    let mut map: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    map.insert("token".into(), json!(token));
    std::fs::write(file, serde_json::Value::Object(map).to_string()).unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_homes_list_with_room_counts() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    seed_token(dir.path(), "tok");

    Mock::given(method("POST"))
        .and(path("/api/homes/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "id": 1, "name": "Villa", "address": "Main St" }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/rooms/all/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "id": 10, "name": "Kitchen", "homeId": 1 },
                { "id": 11, "name": "Hall", "homeId": 1 }
            ]
        })))
        .mount(&server)
        .await;

    domotic_cmd(dir.path())
        .args(["--base-url", &server.uri()])
        .args(["homes", "list", "--rooms", "--output", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""name": "Villa""#)
                .and(predicate::str::contains(r#""rooms": 2"#)),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_esp32_and_device_lists() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    seed_token(dir.path(), "tok");

    Mock::given(method("POST"))
        .and(path("/api/v1/esp32/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "id": 3, "title": "garage", "token": "abcdef0123456789" }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/rooms/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10, "name": "Kitchen", "homeId": 1
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/devices/all/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{
                "id": 5, "roomId": 10, "name": "Lamp", "type": "LIGHT",
                "controlType": "SWITCH", "currentValue": "1", "esp32DeviceId": 3
            }]
        })))
        .mount(&server)
        .await;

    domotic_cmd(dir.path())
        .args(["--base-url", &server.uri()])
        .args(["esp32", "list", "--output", "plain"])
        .assert()
        .success()
        .stdout("3\n");

    domotic_cmd(dir.path())
        .args(["--base-url", &server.uri()])
        .args(["devices", "list", "--room", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lamp"));
}
