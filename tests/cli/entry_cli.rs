use predicates::prelude::predicate;
use serde_json::{Value, json};

#[test]
fn help_is_available() {
    assert_cmd::cargo::cargo_bin_cmd!("timesheet-dq")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_is_available() {
    assert_cmd::cargo::cargo_bin_cmd!("timesheet-dq")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn check_help_lists_default_paths() {
    assert_cmd::cargo::cargo_bin_cmd!("timesheet-dq")
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/opt/ml/processing/input"))
        .stdout(predicate::str::contains("dq_result.json"));
}

#[test]
fn unknown_profile_is_usage_error() {
    let output = assert_cmd::cargo::cargo_bin_cmd!("timesheet-dq")
        .args(["check", "--profile", "lenient"])
        .output()
        .expect("run check");
    assert_eq!(output.status.code(), Some(3));

    let error: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(error["error"], json!("input_usage_error"));
    assert_eq!(error["details"]["kind"], json!("cli_parse_error"));
}

#[test]
fn missing_subcommand_is_usage_error() {
    assert_cmd::cargo::cargo_bin_cmd!("timesheet-dq")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("cli_parse_error"));
}
