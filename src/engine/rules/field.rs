use crate::domain::error::RuleError;
use crate::domain::finding::RuleId;
use crate::domain::record::{Field, REQUIRED_FIELDS};

use super::{Evidence, RuleContext, RuleHit, matching_rows, percent, ratio};

const ENTRY_FIELDS: [Field; 4] = [Field::Employee, Field::EmployeeNr, Field::Date, Field::Hours];

/// One failure per required field whose absent ratio exceeds `null_threshold`.
pub fn null_ratio(context: &RuleContext<'_>) -> Result<Vec<RuleHit>, RuleError> {
    let total = context.dataset.len();
    let mut hits = Vec::new();
    for field in REQUIRED_FIELDS {
        let rows = matching_rows(context.dataset, |record| record.is_absent(field));
        let null_ratio = ratio(rows.len(), total);
        if null_ratio > context.config.null_threshold {
            let message = format!(
                "Too many NULL values in {}: {}",
                field.header(),
                percent(null_ratio)
            );
            hits.push(
                RuleHit::failure(RuleId::HighNullRatio, message, rows, Evidence::None)
                    .with_column(field, null_ratio),
            );
        }
    }
    Ok(hits)
}

/// Hours must be present and within `(0, max_daily_hours]`.
pub fn hours_range(context: &RuleContext<'_>) -> Result<Vec<RuleHit>, RuleError> {
    let max = context.config.max_daily_hours;
    let rows = matching_rows(context.dataset, |record| match record.hours {
        Some(hours) => hours <= 0.0 || hours > max,
        None => true,
    });
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let message = format!(
        "{} row(s) with missing hours or hours outside (0, {max}]",
        rows.len()
    );
    Ok(vec![RuleHit::failure(
        RuleId::InvalidHours,
        message,
        rows,
        Evidence::Fields(ENTRY_FIELDS.to_vec()),
    )])
}

/// Present activity codes must belong to the allow-list. Absent codes are left to the
/// null-ratio check.
pub fn activity_code(context: &RuleContext<'_>) -> Result<Vec<RuleHit>, RuleError> {
    let config = context.config;
    let rows = matching_rows(context.dataset, |record| {
        record
            .activity_code
            .as_deref()
            .is_some_and(|code| !config.is_activity_code_allowed(code))
    });
    let invalid_ratio = ratio(rows.len(), context.dataset.len());
    if rows.is_empty() || invalid_ratio <= config.activity_code_invalid_ratio_threshold {
        return Ok(Vec::new());
    }
    let message = format!(
        "{} row(s) ({}) with activity codes outside {}",
        rows.len(),
        percent(invalid_ratio),
        config.allowed_activity_codes.join(", ")
    );
    Ok(vec![
        RuleHit::failure(
            RuleId::InvalidActivityCode,
            message,
            rows,
            Evidence::Fields(vec![
                Field::Employee,
                Field::EmployeeNr,
                Field::Date,
                Field::ActivityCode,
            ]),
        )
        .with_column(Field::ActivityCode, invalid_ratio),
    ])
}

/// Dates strictly after the processing date.
pub fn future_date(context: &RuleContext<'_>) -> Result<Vec<RuleHit>, RuleError> {
    let today = context.processing_date;
    let rows = matching_rows(context.dataset, |record| {
        record.date.is_some_and(|date| date > today)
    });
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let message = format!("{} row(s) dated after {today}", rows.len());
    Ok(vec![RuleHit::failure(
        RuleId::FutureDate,
        message,
        rows,
        Evidence::Fields(ENTRY_FIELDS.to_vec()),
    )])
}

/// Warns about text values with leading or trailing whitespace in each configured
/// column that the dataset actually carries.
pub fn whitespace(context: &RuleContext<'_>) -> Result<Vec<RuleHit>, RuleError> {
    let total = context.dataset.len();
    let mut hits = Vec::new();
    for field in &context.config.whitespace_fields {
        let field = *field;
        if !context.dataset.has_field(field) {
            continue;
        }
        let rows = matching_rows(context.dataset, |record| {
            record
                .text(field)
                .is_some_and(|value| value.trim() != value)
        });
        let affected_ratio = ratio(rows.len(), total);
        if rows.is_empty() || affected_ratio <= context.config.whitespace_warn_ratio {
            continue;
        }
        let message = format!(
            "Leading/trailing spaces detected in column {}: {} row(s) ({})",
            field.header(),
            rows.len(),
            percent(affected_ratio)
        );
        hits.push(
            RuleHit::warning(
                RuleId::LeadingTrailingWhitespace,
                message,
                rows,
                Evidence::Fields(vec![Field::Employee, Field::EmployeeNr, field]),
            )
            .with_column(field, affected_ratio),
        );
    }
    Ok(hits)
}
