use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::domain::finding::{AffectedEmployee, Finding, FindingDetails, Severity};
use crate::domain::record::{Dataset, Field, Record, hours_value};
use crate::engine::rules::{Evidence, RuleHit};

const TOTAL_HOURS_KEY: &str = "Total Hours";
const DAILY_TOTAL_FIELDS: [Field; 4] = [
    Field::Employee,
    Field::EmployeeNr,
    Field::Date,
    Field::Hours,
];

/// Findings split by severity plus the employees implicated by failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub failures: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub affected_employees: Vec<AffectedEmployee>,
}

/// Folds rule hits into immutable findings, bounding every evidence sample.
#[derive(Debug)]
pub struct FindingAggregator<'a> {
    dataset: &'a Dataset,
    sample_cap: usize,
    failures: Vec<Finding>,
    warnings: Vec<Finding>,
    affected: BTreeSet<AffectedEmployee>,
}

impl<'a> FindingAggregator<'a> {
    pub fn new(dataset: &'a Dataset, sample_cap: usize) -> Self {
        Self {
            dataset,
            sample_cap,
            failures: Vec::new(),
            warnings: Vec::new(),
            affected: BTreeSet::new(),
        }
    }

    pub fn push(&mut self, hit: RuleHit) {
        let records = self.dataset.records();
        if hit.severity == Severity::Failure {
            self.affected.extend(
                hit.rows
                    .iter()
                    .filter_map(|index| records.get(*index))
                    .filter_map(affected_employee),
            );
        }

        let (count, details) = match &hit.evidence {
            Evidence::Text(text) => (None, Some(FindingDetails::Text(text.clone()))),
            Evidence::None => (Some(hit.rows.len()), None),
            evidence => (
                Some(hit.rows.len()),
                Some(FindingDetails::Records(self.sample(&hit.rows, evidence))),
            ),
        };

        let finding = Finding {
            rule: hit.rule,
            severity: hit.severity,
            message: hit.message,
            cause: hit.cause,
            column: hit.column,
            ratio: hit.ratio.map(round_ratio),
            count,
            details,
        };
        match finding.severity {
            Severity::Failure => self.failures.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }

    pub fn finish(self) -> Aggregation {
        Aggregation {
            failures: self.failures,
            warnings: self.warnings,
            affected_employees: self.affected.into_iter().collect(),
        }
    }

    /// Renders the first `sample_cap` matching rows in dataset order.
    fn sample(&self, rows: &[usize], evidence: &Evidence) -> Vec<Map<String, Value>> {
        rows.iter()
            .take(self.sample_cap)
            .filter_map(|index| self.dataset.records().get(*index))
            .map(|record| match evidence {
                Evidence::Fields(fields) => project(record, fields),
                Evidence::DailyTotals(totals) => {
                    let mut row = project(record, &DAILY_TOTAL_FIELDS);
                    let total = record
                        .employee_key()
                        .zip(record.date)
                        .and_then(|key| totals.get(&key).copied());
                    row.insert(TOTAL_HOURS_KEY.to_string(), hours_value(total));
                    row
                }
                Evidence::None | Evidence::Text(_) => Map::new(),
            })
            .collect()
    }
}

/// Aggregates hits in the order the rule engine produced them.
pub fn aggregate(dataset: &Dataset, hits: Vec<RuleHit>, sample_cap: usize) -> Aggregation {
    let mut aggregator = FindingAggregator::new(dataset, sample_cap);
    for hit in hits {
        aggregator.push(hit);
    }
    aggregator.finish()
}

fn project(record: &Record, fields: &[Field]) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| (field.header().to_string(), record.field_value(*field)))
        .collect()
}

fn affected_employee(record: &Record) -> Option<AffectedEmployee> {
    if record.employee.is_none() && record.employee_nr.is_none() {
        return None;
    }
    Some(AffectedEmployee {
        employee: record.employee.clone(),
        employee_nr: record.employee_key(),
    })
}

fn round_ratio(ratio: f64) -> f64 {
    (ratio * 10_000.0).round() / 10_000.0
}
