//! Integration tests for init and config commands

#![allow(deprecated)]

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::{codex_cmd, init_home};

#[test]
fn test_init_creates_layout() {
    let temp = TempDir::new().unwrap();

    codex_cmd()
        .arg("init")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized codex"));

    let config = fs::read_to_string(temp.path().join("config.json")).unwrap();
    assert!(config.contains("\"currency\": \"CAD\""));
    assert!(config.contains("\"port\": 8501"));

    let data = fs::read_to_string(temp.path().join("data/codex_data.json")).unwrap();
    assert!(data.contains("\"lumber_calculations\": []"));
}

#[test]
fn test_init_uses_codex_home() {
    let temp = TempDir::new().unwrap();

    codex_cmd()
        .env("CODEX_HOME", temp.path())
        .arg("init")
        .assert()
        .success();

    assert!(temp.path().join("config.json").exists());
}

#[test]
fn test_init_already_initialized_fails() {
    let temp = TempDir::new().unwrap();

    codex_cmd().arg("init").arg(temp.path()).assert().success();
    codex_cmd()
        .arg("init")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_config_get() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["config", "user.currency"])
        .assert()
        .success()
        .stdout("CAD\n");
}

#[test]
fn test_config_set_persists() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["config", "modules.finance.enabled", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set modules.finance.enabled = false"));

    let config = fs::read_to_string(temp.path().join("config.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&config).unwrap();
    assert_eq!(value["modules"]["finance"]["enabled"], false);
}

#[test]
fn test_config_set_invalid_value_fails() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["config", "user.currency", "JPY"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid currency"));
}

#[test]
fn test_config_unknown_key() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["config", "user.shoe_size"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("codex config --list"));
}

#[test]
fn test_config_list() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["config", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("user.name = Friend"))
        .stdout(predicate::str::contains("server.port = 8501"));
}

#[test]
fn test_config_outside_codex_home() {
    let temp = TempDir::new().unwrap();

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["config", "user.name"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("codex init"));
}

#[test]
fn test_config_set_repairs_bad_value_on_disk() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());

    let config = temp.path().join("config.json");
    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    value["user"]["currency"] = serde_json::json!("JPY");
    fs::write(&config, serde_json::to_string(&value).unwrap()).unwrap();

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["config", "user.currency", "CAD"])
        .assert()
        .success();

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["config", "user.currency"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CAD"));
}
