use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::domain::error::RuleError;
use crate::domain::finding::RuleId;
use crate::domain::record::Field;

use super::{Evidence, RuleContext, RuleHit, matching_rows};

/// Sums present hours per (normalized employee number, date) and fails every row of a group
/// whose total exceeds `max_daily_hours`. Rows without employee number or date do not group.
pub fn daily_overbooking(context: &RuleContext<'_>) -> Result<Vec<RuleHit>, RuleError> {
    let mut totals: BTreeMap<(String, NaiveDate), f64> = BTreeMap::new();
    for record in context.dataset.records() {
        if let Some(key) = record.employee_key().zip(record.date) {
            *totals.entry(key).or_default() += record.hours.unwrap_or(0.0);
        }
    }

    let max = context.config.max_daily_hours;
    let overbooked: BTreeMap<(String, NaiveDate), f64> = totals
        .into_iter()
        .map(|(key, total)| (key, round_hours(total)))
        .filter(|(_, total)| *total > max)
        .collect();
    if overbooked.is_empty() {
        return Ok(Vec::new());
    }

    let rows = matching_rows(context.dataset, |record| {
        record
            .employee_key()
            .zip(record.date)
            .is_some_and(|key| overbooked.contains_key(&key))
    });
    let message = format!(
        "{} employee-day(s) booked above {max} hours across {} row(s)",
        overbooked.len(),
        rows.len()
    );

    Ok(vec![RuleHit::failure(
        RuleId::DailyOverbooking,
        message,
        rows,
        Evidence::DailyTotals(overbooked),
    )])
}

/// Rows repeating an earlier (normalized employee number, date, cost center) key. Absent
/// key parts compare equal to each other.
pub fn duplicates(context: &RuleContext<'_>) -> Result<Vec<RuleHit>, RuleError> {
    let mut seen = BTreeSet::new();
    let mut rows = Vec::new();
    for (index, record) in context.dataset.records().iter().enumerate() {
        let key = (
            record.employee_key(),
            record.date,
            record.cost_center.as_deref(),
        );
        if !seen.insert(key) {
            rows.push(index);
        }
    }
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let message = format!(
        "{} duplicate row(s) share employee number, date and cost center with an earlier row",
        rows.len()
    );
    Ok(vec![RuleHit::warning(
        RuleId::DuplicateEntries,
        message,
        rows,
        Evidence::Fields(vec![
            Field::Employee,
            Field::EmployeeNr,
            Field::Date,
            Field::CostCenter,
            Field::Hours,
        ]),
    )])
}

/// Rounds a summed total to micro-hours; `8.1 + 8.1 + 7.8` must total exactly 24.
fn round_hours(total: f64) -> f64 {
    (total * 1_000_000.0).round() / 1_000_000.0
}
