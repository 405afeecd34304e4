use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");

    let mut cmd = cargo_bin_cmd!("postfeed");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("provider = \"ghost\""));
    assert!(content.contains("cache_enabled = true"));
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# existing").expect("write existing");

    let mut cmd = cargo_bin_cmd!("postfeed");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn list_outputs_sorted_json_under_stub_provider() {
    let mut cmd = cargo_bin_cmd!("postfeed");
    let output = cmd
        .env("POSTFEED__SOURCE__PROVIDER", "stub")
        .args(["list", "--json"])
        .output()
        .expect("run list");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let items = value.get("items").and_then(Value::as_array).expect("items");
    assert_eq!(items.len(), 3);
    // Newest first
    assert_eq!(
        items[0].get("slug").and_then(Value::as_str),
        Some("content-pipeline")
    );
}

#[test]
fn list_respects_limit() {
    let mut cmd = cargo_bin_cmd!("postfeed");
    let output = cmd
        .env("POSTFEED__SOURCE__PROVIDER", "stub")
        .args(["list", "--json", "--limit", "2"])
        .output()
        .expect("run list");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let items = value.get("items").and_then(Value::as_array).expect("items");
    assert_eq!(items.len(), 2);
}

#[test]
fn show_renders_post_json() {
    let mut cmd = cargo_bin_cmd!("postfeed");
    let output = cmd
        .env("POSTFEED__SOURCE__PROVIDER", "stub")
        .args(["show", "campaign-postmortem", "--json"])
        .output()
        .expect("run show");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(
        value.get("title").and_then(Value::as_str),
        Some("Campaign Postmortem")
    );
}

#[test]
fn show_unknown_slug_fails_with_message() {
    let mut cmd = cargo_bin_cmd!("postfeed");
    cmd.env("POSTFEED__SOURCE__PROVIDER", "stub")
        .args(["show", "no-such-post"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Post not found"));
}

#[test]
fn doctor_reports_ok_for_stub_provider() {
    let mut cmd = cargo_bin_cmd!("postfeed");
    cmd.env("POSTFEED__SOURCE__PROVIDER", "stub")
        .args(["doctor", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"overall\": \"ok\""));
}

#[test]
fn doctor_warns_when_ghost_credential_missing() {
    let mut cmd = cargo_bin_cmd!("postfeed");
    let output = cmd
        .env("POSTFEED__SOURCE__PROVIDER", "ghost")
        .env("POSTFEED__GHOST__API_URL", "https://demo.ghost.io")
        .env("POSTFEED__GHOST__CONTENT_KEY_ENV", "POSTFEED_TEST_UNSET")
        .env_remove("POSTFEED_TEST_UNSET")
        .args(["doctor", "--json"])
        .output()
        .expect("run doctor");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(
        value.pointer("/source/status").and_then(Value::as_str),
        Some("warn")
    );
}
