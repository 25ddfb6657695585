//! Ordered battery of timesheet checks.
//!
//! Each check reads the dataset through a [`RuleContext`] and reports zero or more
//! [`RuleHit`]s carrying the indices of the matching rows. Checks are independent; the
//! declared order only fixes the order findings are displayed in.

pub mod field;
pub mod group;

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::config::{CheckId, GateConfig};
use crate::domain::error::RuleError;
use crate::domain::finding::{FailureCause, RuleId, Severity};
use crate::domain::record::{Dataset, Field, Record};

/// Signature shared by every check.
pub type CheckFn = fn(&RuleContext<'_>) -> Result<Vec<RuleHit>, RuleError>;

/// Read-only inputs available to a check.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub dataset: &'a Dataset,
    pub config: &'a GateConfig,
    /// Date of the run; anything later is in the future.
    pub processing_date: NaiveDate,
}

/// How sample rows of a hit are rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Evidence {
    /// Count only, no row sample.
    None,
    /// Listed columns of each matching row.
    Fields(Vec<Field>),
    /// Entry columns plus the booked total of the row's (employee number, date) group.
    DailyTotals(BTreeMap<(String, NaiveDate), f64>),
    /// Free-form explanation with no row reference.
    Text(String),
}

/// Raw outcome of a check before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleHit {
    pub rule: RuleId,
    pub severity: Severity,
    pub message: String,
    pub cause: Option<FailureCause>,
    pub column: Option<Field>,
    pub ratio: Option<f64>,
    /// Matching row indices in dataset order.
    pub rows: Vec<usize>,
    pub evidence: Evidence,
}

impl RuleHit {
    pub fn failure(rule: RuleId, message: String, rows: Vec<usize>, evidence: Evidence) -> Self {
        Self {
            rule,
            severity: Severity::Failure,
            message,
            cause: None,
            column: None,
            ratio: None,
            rows,
            evidence,
        }
    }

    pub fn warning(rule: RuleId, message: String, rows: Vec<usize>, evidence: Evidence) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::failure(rule, message, rows, evidence)
        }
    }

    pub fn with_column(mut self, column: Field, ratio: f64) -> Self {
        self.column = Some(column);
        self.ratio = Some(ratio);
        self
    }

    /// Synthetic failure standing in for a check that could not complete.
    pub fn unexpected(error: &RuleError) -> Self {
        Self {
            cause: Some(FailureCause::RuleInternal),
            ..Self::failure(
                RuleId::UnexpectedError,
                format!("Check `{}` could not complete", error.check()),
                Vec::new(),
                Evidence::Text(error.to_string()),
            )
        }
    }
}

/// Checks in display order.
pub fn default_checks() -> Vec<(CheckId, CheckFn)> {
    vec![
        (CheckId::NullRatio, field::null_ratio as CheckFn),
        (CheckId::HoursRange, field::hours_range as CheckFn),
        (CheckId::DailyOverbooking, group::daily_overbooking as CheckFn),
        (CheckId::ActivityCode, field::activity_code as CheckFn),
        (CheckId::FutureDate, field::future_date as CheckFn),
        (CheckId::Whitespace, field::whitespace as CheckFn),
        (CheckId::Duplicates, group::duplicates as CheckFn),
    ]
}

/// Runs every enabled check against one dataset.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    config: GateConfig,
    checks: Vec<(CheckId, CheckFn)>,
}

impl RuleEngine {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            checks: default_checks(),
        }
    }

    pub fn with_checks(config: GateConfig, checks: Vec<(CheckId, CheckFn)>) -> Self {
        Self { config, checks }
    }

    /// Evaluates all enabled checks. A check that errors or panics is reported as an
    /// `Unexpected Error` hit in its slot and the remaining checks still run.
    pub fn evaluate(&self, dataset: &Dataset, processing_date: NaiveDate) -> Vec<RuleHit> {
        let context = RuleContext {
            dataset,
            config: &self.config,
            processing_date,
        };

        let mut hits = Vec::new();
        for (check, run) in &self.checks {
            if !self.config.checks.is_enabled(*check) {
                debug!(%check, "check disabled");
                continue;
            }
            match run_guarded(*check, *run, &context) {
                Ok(mut produced) => {
                    debug!(%check, hits = produced.len(), "check evaluated");
                    hits.append(&mut produced);
                }
                Err(error) => {
                    warn!(%check, %error, "check could not complete");
                    hits.push(RuleHit::unexpected(&error));
                }
            }
        }
        hits
    }
}

fn run_guarded(
    check: CheckId,
    run: CheckFn,
    context: &RuleContext<'_>,
) -> Result<Vec<RuleHit>, RuleError> {
    match panic::catch_unwind(AssertUnwindSafe(|| run(context))) {
        Ok(result) => result,
        Err(payload) => Err(RuleError::Panicked {
            check,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Indices of the records matching `predicate`, in dataset order.
pub(crate) fn matching_rows(
    dataset: &Dataset,
    predicate: impl Fn(&Record) -> bool,
) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| predicate(record))
        .map(|(index, _)| index)
        .collect()
}

/// Share of `count` in `total`; zero for an empty dataset.
pub(crate) fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

pub(crate) fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
