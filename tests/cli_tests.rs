//! Integration tests for stats, calc and export

#![allow(deprecated)]

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::{codex_cmd, init_home};

#[test]
fn test_stats_on_fresh_codex() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Journal entries:   0"))
        .stdout(predicate::str::contains("Lumber calcs:      0"));
}

#[test]
fn test_stats_requires_init() {
    let temp = TempDir::new().unwrap();

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .arg("stats")
        .assert()
        .code(2);
}

#[test]
fn test_calc_prints_estimate() {
    let temp = TempDir::new().unwrap();

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["calc", "2x4x8", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2x4 - 8ft"))
        .stdout(predicate::str::contains("Quantity (with 10% waste): 11"))
        .stdout(predicate::str::contains("$65.89"));
}

#[test]
fn test_calc_with_custom_waste() {
    let temp = TempDir::new().unwrap();

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["calc", "plywood_3/4", "4", "--waste", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quantity (with 0% waste): 4"))
        .stdout(predicate::str::contains("$239.96"));
}

#[test]
fn test_calc_prints_configured_currency() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["config", "user.currency", "EUR"])
        .assert()
        .success();

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["calc", "2x4x8", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("€65.89"))
        .stdout(predicate::str::contains("$").not());
}

#[test]
fn test_calc_unknown_lumber() {
    let temp = TempDir::new().unwrap();

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["calc", "2x3x7", "1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown lumber type"));
}

#[test]
fn test_calc_waste_out_of_range() {
    let temp = TempDir::new().unwrap();

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["calc", "2x4x8", "1", "--waste", "45"])
        .assert()
        .code(3);
}

#[test]
fn test_calc_save_records_calculation() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["calc", "4x4x8", "2", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved calculation"));

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lumber calcs:      1"));
}

#[test]
fn test_calc_save_requires_init() {
    let temp = TempDir::new().unwrap();

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["calc", "4x4x8", "2", "--save"])
        .assert()
        .code(2);
}

#[test]
fn test_calc_respects_disabled_module() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["config", "modules.carpentry.enabled", "false"])
        .assert()
        .success();

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["calc", "2x4x8", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("module is disabled"));
}

#[test]
fn test_export_to_stdout() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());

    let output = codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .arg("export")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["meta"]["version"], "1.0.0");
    assert!(value["journal"].as_array().unwrap().is_empty());
}

#[test]
fn test_export_to_file() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());
    let out = temp.path().join("backup.json");

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .arg("export")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported data"));

    let text = fs::read_to_string(out).unwrap();
    assert!(text.contains("\"finance\""));
}

#[test]
fn test_unknown_top_level_keys_survive_a_save() {
    let temp = TempDir::new().unwrap();
    init_home(temp.path());

    let data_path = temp.path().join("data/codex_data.json");
    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&data_path).unwrap()).unwrap();
    value["codex_conversations"] = serde_json::json!([{"role": "user"}]);
    fs::write(&data_path, serde_json::to_string(&value).unwrap()).unwrap();

    codex_cmd()
        .arg("--home")
        .arg(temp.path())
        .args(["calc", "2x4x8", "1", "--save"])
        .assert()
        .success();

    let after: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&data_path).unwrap()).unwrap();
    assert_eq!(after["codex_conversations"][0]["role"], "user");
    assert_eq!(after["lumber_calculations"].as_array().unwrap().len(), 1);
}
