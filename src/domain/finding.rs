use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::record::{Field, employee_nr_value};

/// Stable rule identifiers as they appear in the verdict document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RuleId {
    #[serde(rename = "Unreadable Input")]
    UnreadableInput,
    #[serde(rename = "Missing Columns")]
    MissingColumns,
    #[serde(rename = "High Null Ratio")]
    HighNullRatio,
    #[serde(rename = "Invalid Hours")]
    InvalidHours,
    #[serde(rename = "Daily Overbooking")]
    DailyOverbooking,
    #[serde(rename = "Invalid Activity Code")]
    InvalidActivityCode,
    #[serde(rename = "Future Date")]
    FutureDate,
    #[serde(rename = "Leading/Trailing Whitespace")]
    LeadingTrailingWhitespace,
    #[serde(rename = "Duplicate Entries")]
    DuplicateEntries,
    #[serde(rename = "Unexpected Error")]
    UnexpectedError,
}

impl RuleId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnreadableInput => "Unreadable Input",
            Self::MissingColumns => "Missing Columns",
            Self::HighNullRatio => "High Null Ratio",
            Self::InvalidHours => "Invalid Hours",
            Self::DailyOverbooking => "Daily Overbooking",
            Self::InvalidActivityCode => "Invalid Activity Code",
            Self::FutureDate => "Future Date",
            Self::LeadingTrailingWhitespace => "Leading/Trailing Whitespace",
            Self::DuplicateEntries => "Duplicate Entries",
            Self::UnexpectedError => "Unexpected Error",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Failure,
    Warning,
}

/// Closed set of reasons a run can fail outside ordinary rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    Environment,
    Schema,
    Parse,
    RuleInternal,
}

/// Evidence attached to a finding: a bounded row sample, or a single message for
/// schema and environment failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FindingDetails {
    Text(String),
    Records(Vec<Map<String, Value>>),
}

/// One validation outcome. Severity is implied by the verdict list the finding lands in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub rule: RuleId,
    #[serde(skip)]
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<FailureCause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FindingDetails>,
}

impl Finding {
    /// Failure carrying a textual detail and a typed cause.
    pub fn failure_with_cause(
        rule: RuleId,
        cause: FailureCause,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            severity: Severity::Failure,
            message: message.into(),
            cause: Some(cause),
            column: None,
            ratio: None,
            count: None,
            details: Some(FindingDetails::Text(details.into())),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }

    /// Number of sampled evidence rows, zero for textual details.
    pub fn sample_len(&self) -> usize {
        match &self.details {
            Some(FindingDetails::Records(rows)) => rows.len(),
            _ => 0,
        }
    }
}

/// Employee implicated by at least one failing rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AffectedEmployee {
    #[serde(rename = "Employee")]
    pub employee: Option<String>,
    #[serde(rename = "EmployeeNr", serialize_with = "serialize_employee_nr")]
    pub employee_nr: Option<String>,
}

fn serialize_employee_nr<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(raw) => employee_nr_value(raw).serialize(serializer),
        None => serializer.serialize_none(),
    }
}
