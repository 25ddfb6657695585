use serde::Serialize;

use crate::domain::finding::{AffectedEmployee, Finding};

/// Overall outcome of one gate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Failed,
    Warn,
    Passed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Failed => "FAILED",
            Self::Warn => "WARN",
            Self::Passed => "PASSED",
        }
    }

    /// Only a failed verdict halts the surrounding pipeline.
    pub fn stops_pipeline(self) -> bool {
        self == Self::Failed
    }

    pub fn exit_code(self) -> i32 {
        if self.stops_pipeline() { 1 } else { 0 }
    }
}

/// Terminal document written once per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub status: Status,
    pub row_count: usize,
    pub unique_employees: usize,
    pub affected_employee_count: usize,
    pub affected_employees: Vec<AffectedEmployee>,
    pub failures: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub timestamp: String,
}
