use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

const HEADER: &str = "Employee,Employee Nr.,Cost Center,Activity Code,Date,Hours,Description\n";

struct Workspace {
    _root: TempDir,
    input_dir: PathBuf,
    output: PathBuf,
}

fn workspace(csv: &str) -> Workspace {
    let root = tempdir().expect("tempdir");
    let input_dir = root.path().join("input");
    fs::create_dir(&input_dir).expect("input dir");
    fs::write(input_dir.join("timesheet.csv"), csv).expect("write csv");
    let output = root.path().join("output").join("dq_result.json");
    Workspace {
        _root: root,
        input_dir,
        output,
    }
}

fn valid_rows(count: usize) -> String {
    (0..count)
        .map(|i| {
            format!(
                "Employee {i},{},CC-1,DEV,2024-01-{:02},8,Work\n",
                100 + i,
                1 + i % 28
            )
        })
        .collect()
}

fn check_cmd(ws: &Workspace) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("timesheet-dq");
    cmd.env("RUST_LOG", "off").args([
        "check",
        "--input-dir",
        path_str(&ws.input_dir),
        "--output",
        path_str(&ws.output),
    ]);
    cmd
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf8 path")
}

fn read_output(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read output")).expect("output json")
}

fn stdout_json(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("stdout json")
}

fn parse_stderr_json_lines(stderr: &[u8]) -> Vec<Value> {
    let text = String::from_utf8(stderr.to_vec()).expect("stderr utf8");
    text.lines()
        .filter(|line| line.trim_start().starts_with('{'))
        .map(|line| serde_json::from_str(line).expect("stderr json line"))
        .collect()
}

#[test]
fn clean_export_passes_with_exit_zero() {
    let ws = workspace(&format!("{HEADER}{}", valid_rows(50)));

    let output = check_cmd(&ws).output().expect("run check");
    assert_eq!(output.status.code(), Some(0));

    let document = read_output(&ws.output);
    assert_eq!(document["status"], json!("PASSED"));
    assert_eq!(document["row_count"], json!(50));
    assert_eq!(document["affected_employee_count"], json!(0));
    assert_eq!(stdout_json(&output.stdout), document);
}

#[test]
fn invalid_hours_fail_with_exit_one() {
    let ws = workspace(&format!(
        "{HEADER}{}Ada,900,CC-1,DEV,2024-01-02,30,Crunch\n",
        valid_rows(10)
    ));

    let output = check_cmd(&ws).output().expect("run check");
    assert_eq!(output.status.code(), Some(1));

    let document = read_output(&ws.output);
    assert_eq!(document["status"], json!("FAILED"));
    assert_eq!(document["failures"][0]["rule"], json!("Invalid Hours"));
    assert_eq!(document["failures"][0]["count"], json!(1));
    assert_eq!(
        document["affected_employees"],
        json!([{"Employee": "Ada", "EmployeeNr": 900}])
    );
}

#[test]
fn warnings_only_exit_zero() {
    let ws = workspace(&format!(
        "{HEADER}{}Employee 0,100,CC-1,DEV,2024-01-01,1,Again\n",
        valid_rows(10)
    ));

    let output = check_cmd(&ws).output().expect("run check");
    assert_eq!(output.status.code(), Some(0));
    let document = read_output(&ws.output);
    assert_eq!(document["status"], json!("WARN"));
    assert_eq!(document["warnings"][0]["rule"], json!("Duplicate Entries"));
}

#[test]
fn strict_profile_flags_single_bad_activity_code() {
    let ws = workspace(&format!(
        "{HEADER}{}Ada,900,CC-1,LUNCH,2024-01-02,1,Break\n",
        valid_rows(200)
    ));

    check_cmd(&ws).assert().code(0);
    assert_eq!(read_output(&ws.output)["status"], json!("PASSED"));

    check_cmd(&ws).args(["--profile", "strict"]).assert().code(1);
    let document = read_output(&ws.output);
    assert_eq!(
        document["failures"][0]["rule"],
        json!("Invalid Activity Code")
    );
}

#[test]
fn missing_input_writes_unreadable_verdict() {
    let root = tempdir().expect("tempdir");
    let input_dir = root.path().join("input");
    fs::create_dir(&input_dir).expect("input dir");
    let output = root.path().join("out").join("dq_result.json");

    assert_cmd::cargo::cargo_bin_cmd!("timesheet-dq")
        .env("RUST_LOG", "off")
        .args([
            "check",
            "--input-dir",
            path_str(&input_dir),
            "--output",
            path_str(&output),
        ])
        .assert()
        .code(1);

    let document = read_output(&output);
    assert_eq!(document["status"], json!("FAILED"));
    assert_eq!(document["row_count"], json!(0));
    assert_eq!(document["unique_employees"], json!(0));
    assert_eq!(document["affected_employees"], json!([]));
    assert_eq!(document["warnings"], json!([]));
    assert_eq!(document["failures"][0]["rule"], json!("Unreadable Input"));
    assert_eq!(document["failures"][0]["cause"], json!("environment"));
    assert!(document["timestamp"].as_str().is_some_and(|ts| ts.ends_with('Z')));
}

#[test]
fn missing_columns_fail_before_rules() {
    let ws = workspace("Employee,Employee Nr.,Date,Hours\nAda,1,2024-01-02,99\n");

    check_cmd(&ws).assert().code(1);
    let document = read_output(&ws.output);
    assert_eq!(document["failures"].as_array().map(Vec::len), Some(1));
    assert_eq!(document["failures"][0]["rule"], json!("Missing Columns"));
    assert_eq!(
        document["failures"][0]["details"],
        json!("Cost Center, Activity Code")
    );
}

#[test]
fn explicit_input_conflicts_with_input_dir() {
    let ws = workspace(HEADER);
    let input = ws.input_dir.join("timesheet.csv");

    let output = check_cmd(&ws)
        .args(["--input", path_str(&input)])
        .output()
        .expect("run check");
    assert_eq!(output.status.code(), Some(3));
    let errors = parse_stderr_json_lines(&output.stderr);
    assert_eq!(errors[0]["error"], json!("input_usage_error"));
}

#[test]
fn invalid_config_is_usage_error_without_verdict() {
    let ws = workspace(&format!("{HEADER}{}", valid_rows(5)));
    let config = ws.input_dir.join("gate.toml");
    fs::write(&config, "null_threshold = 2.0\n").expect("write config");

    let output = check_cmd(&ws)
        .args(["--config", path_str(&config)])
        .output()
        .expect("run check");
    assert_eq!(output.status.code(), Some(3));
    assert!(!ws.output.exists());
    let errors = parse_stderr_json_lines(&output.stderr);
    assert_eq!(errors[0]["error"], json!("input_usage_error"));
    assert_eq!(errors[0]["code"], json!(3));
}

#[test]
fn emit_pipeline_reports_steps_on_stderr() {
    let ws = workspace(&format!("{HEADER}{}", valid_rows(5)));

    let output = check_cmd(&ws)
        .arg("--emit-pipeline")
        .output()
        .expect("run check");
    assert_eq!(output.status.code(), Some(0));

    let lines = parse_stderr_json_lines(&output.stderr);
    let report = lines.last().expect("pipeline report");
    assert_eq!(report["command"], json!("check"));
    assert_eq!(report["input"]["sources"][0]["source"], json!("directory"));
    assert_eq!(report["input"]["sources"][0]["format"], json!("csv"));
    assert_eq!(report["steps"][0], json!("check_locate_input"));
    assert_eq!(report["steps"][5], json!("check_write_verdict"));
    assert!(report["deterministic_guards"].as_array().is_some());
}

#[test]
fn emit_pipeline_labels_explicit_input_by_extension() {
    let ws = workspace(&format!("{HEADER}{}", valid_rows(5)));
    let csv = ws.input_dir.join("timesheet.csv");
    let txt = ws.input_dir.join("timesheet.txt");
    fs::copy(&csv, &txt).expect("copy export");

    for (input, format) in [(&csv, json!("csv")), (&txt, Value::Null)] {
        let output = assert_cmd::cargo::cargo_bin_cmd!("timesheet-dq")
            .env("RUST_LOG", "off")
            .args([
                "--emit-pipeline",
                "check",
                "--input",
                path_str(input),
                "--output",
                path_str(&ws.output),
            ])
            .output()
            .expect("run check");
        assert_eq!(output.status.code(), Some(0));

        let lines = parse_stderr_json_lines(&output.stderr);
        let report = lines.last().expect("pipeline report");
        assert_eq!(report["input"]["sources"][0]["source"], json!("path"));
        assert_eq!(report["input"]["sources"][0]["format"], format);
    }
}
