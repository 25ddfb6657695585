use chrono::{DateTime, Utc};

use crate::domain::error::GateError;
use crate::domain::finding::{Finding, RuleId};
use crate::domain::record::{Dataset, Field};
use crate::domain::verdict::{Status, Verdict};
use crate::engine::aggregate::Aggregation;
use crate::engine::schema::missing_columns_finding;
use crate::util::time::format_timestamp;

/// `FAILED` beats `WARN` beats `PASSED`.
pub fn derive_status(failures: &[Finding], warnings: &[Finding]) -> Status {
    if !failures.is_empty() {
        Status::Failed
    } else if !warnings.is_empty() {
        Status::Warn
    } else {
        Status::Passed
    }
}

pub fn build_verdict(
    dataset: &Dataset,
    aggregation: Aggregation,
    generated_at: DateTime<Utc>,
) -> Verdict {
    let status = derive_status(&aggregation.failures, &aggregation.warnings);
    Verdict {
        status,
        row_count: dataset.len(),
        unique_employees: dataset.unique_employee_count(),
        affected_employee_count: aggregation.affected_employees.len(),
        affected_employees: aggregation.affected_employees,
        failures: aggregation.failures,
        warnings: aggregation.warnings,
        timestamp: format_timestamp(generated_at),
    }
}

/// Terminal verdict for an incomplete header. No rule results are included.
pub fn schema_failure_verdict(
    dataset: &Dataset,
    missing: &[Field],
    generated_at: DateTime<Utc>,
) -> Verdict {
    Verdict {
        status: Status::Failed,
        row_count: dataset.len(),
        unique_employees: 0,
        affected_employee_count: 0,
        affected_employees: Vec::new(),
        failures: vec![missing_columns_finding(missing)],
        warnings: Vec::new(),
        timestamp: format_timestamp(generated_at),
    }
}

/// Minimal verdict written when the input cannot be located or parsed.
pub fn unreadable_input_verdict(error: &GateError, generated_at: DateTime<Utc>) -> Verdict {
    Verdict {
        status: Status::Failed,
        row_count: 0,
        unique_employees: 0,
        affected_employee_count: 0,
        affected_employees: Vec::new(),
        failures: vec![Finding::failure_with_cause(
            RuleId::UnreadableInput,
            error.cause(),
            "Input table could not be read",
            error.to_string(),
        )],
        warnings: Vec::new(),
        timestamp: format_timestamp(generated_at),
    }
}
