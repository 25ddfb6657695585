use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::domain::config::GateConfig;
use crate::domain::error::GateError;
use crate::domain::finding::Finding;
use crate::domain::record::Dataset;
use crate::domain::verdict::Verdict;
use crate::engine::{self, load, verdict::unreadable_input_verdict};
use crate::io::writer;

pub const DEFAULT_INPUT_DIR: &str = "/opt/ml/processing/input";
pub const DEFAULT_OUTPUT_PATH: &str = "/opt/ml/processing/output/dq_result.json";

/// Input arguments for check command execution API.
#[derive(Debug, Clone)]
pub struct CheckCommandArgs {
    pub input_dir: PathBuf,
    /// Explicit input table; skips directory discovery when set.
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub config: GateConfig,
}

impl Default for CheckCommandArgs {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            input: None,
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            config: GateConfig::default(),
        }
    }
}

/// Structured command response that carries exit-code mapping and JSON payload.
///
/// `payload` is the verdict document when `verdict_written` is set and an error object
/// otherwise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckCommandResponse {
    pub exit_code: i32,
    pub payload: Value,
    pub verdict_written: bool,
}

/// Evaluates the input, persists the verdict and maps its status to an exit code.
pub fn run(args: &CheckCommandArgs, now: DateTime<Utc>) -> CheckCommandResponse {
    let verdict = evaluate(args, now);

    if let Err(source) = writer::write_json_atomic(&args.output, &verdict) {
        let error = GateError::WriteOutput {
            path: args.output.display().to_string(),
            source,
        };
        error!(error = %error, "verdict could not be persisted");
        return CheckCommandResponse {
            exit_code: 1,
            payload: json!({
                "error": "output_write_error",
                "message": error.to_string(),
            }),
            verdict_written: false,
        };
    }
    info!(
        status = verdict.status.as_str(),
        output = %args.output.display(),
        "verdict written"
    );

    match serde_json::to_value(&verdict) {
        Ok(payload) => CheckCommandResponse {
            exit_code: verdict.status.exit_code(),
            payload,
            verdict_written: true,
        },
        Err(error) => CheckCommandResponse {
            exit_code: 1,
            payload: json!({
                "error": "internal_error",
                "message": format!("failed to serialize verdict: {error}"),
            }),
            verdict_written: true,
        },
    }
}

/// Ordered step names reported by `--emit-pipeline`.
pub fn pipeline_steps() -> Vec<String> {
    vec![
        "check_locate_input".to_string(),
        "check_load_records".to_string(),
        "check_validate_schema".to_string(),
        "check_evaluate_rules".to_string(),
        "check_aggregate_findings".to_string(),
        "check_write_verdict".to_string(),
    ]
}

/// Determinism guards applied by `check`.
pub fn deterministic_guards() -> Vec<String> {
    vec![
        "check_first_input_in_listing_order".to_string(),
        "check_rule_order_fixed".to_string(),
        "check_evidence_sample_first_rows_in_input_order".to_string(),
        "check_affected_employees_sorted".to_string(),
        "check_verdict_written_atomically".to_string(),
        "check_exit_mapping_0_1_3".to_string(),
    ]
}

fn evaluate(args: &CheckCommandArgs, now: DateTime<Utc>) -> Verdict {
    let dataset = match read_input(args) {
        Ok(dataset) => dataset,
        Err(error) => {
            error!(cause = ?error.cause(), error = %error, "input could not be read");
            return unreadable_input_verdict(&error, now);
        }
    };

    let verdict = engine::run_gate(&dataset, &args.config, now);
    log_findings(&verdict.failures);
    log_findings(&verdict.warnings);
    info!(
        status = verdict.status.as_str(),
        rows = verdict.row_count,
        failures = verdict.failures.len(),
        warnings = verdict.warnings.len(),
        affected_employees = verdict.affected_employee_count,
        "data quality check finished"
    );
    verdict
}

fn read_input(args: &CheckCommandArgs) -> Result<Dataset, GateError> {
    let path = match &args.input {
        Some(path) => path.clone(),
        None => load::locate_input(&args.input_dir)?,
    };
    info!(path = %path.display(), "input located");
    load::load_dataset(&path)
}

fn log_findings(findings: &[Finding]) {
    for finding in findings {
        if finding.is_failure() {
            warn!(rule = finding.rule.as_str(), count = ?finding.count, "{}", finding.message);
        } else {
            info!(rule = finding.rule.as_str(), count = ?finding.count, "{}", finding.message);
        }
    }
}
