use std::fs;

use predicates::prelude::predicate;
use serde_json::{Value, json};
use tempfile::tempdir;

#[test]
fn prints_resolved_default_configuration() {
    let output = assert_cmd::cargo::cargo_bin_cmd!("timesheet-dq")
        .env("RUST_LOG", "off")
        .arg("config")
        .output()
        .expect("run config");
    assert_eq!(output.status.code(), Some(0));

    let config: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    assert_eq!(config["profile"], json!("tolerant"));
    assert_eq!(config["activity_code_invalid_ratio_threshold"], json!(0.01));
    assert_eq!(config["whitespace_warn_ratio"], json!(0.02));
    assert_eq!(config["max_daily_hours"], json!(24.0));
    assert_eq!(
        config["allowed_activity_codes"],
        json!(["DEV", "TEST", "MEETING", "TRAINING", "SUPPORT"])
    );
}

#[test]
fn profile_flag_overrides_file_profile() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("gate.yaml");
    fs::write(&path, "profile: tolerant\nevidence_sample_cap: 3\n").expect("write config");

    let output = assert_cmd::cargo::cargo_bin_cmd!("timesheet-dq")
        .env("RUST_LOG", "off")
        .args(["config", "--profile", "strict", "--config"])
        .arg(&path)
        .output()
        .expect("run config");
    assert_eq!(output.status.code(), Some(0));

    let config: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    assert_eq!(config["profile"], json!("strict"));
    assert_eq!(config["whitespace_warn_ratio"], json!(0.0));
    assert_eq!(config["evidence_sample_cap"], json!(3));
}

#[test]
fn unknown_keys_exit_three() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("gate.json");
    fs::write(&path, r#"{"max_hours": 10}"#).expect("write config");

    assert_cmd::cargo::cargo_bin_cmd!("timesheet-dq")
        .env("RUST_LOG", "off")
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("input_usage_error"));
}
