use crate::domain::finding::{FailureCause, Finding, RuleId};
use crate::domain::record::{Dataset, Field};

/// Required fields absent from the dataset header, in `required` order.
pub fn missing_fields(dataset: &Dataset, required: &[Field]) -> Vec<Field> {
    required
        .iter()
        .copied()
        .filter(|field| !dataset.has_field(*field))
        .collect()
}

/// The single terminal finding reported when the header is incomplete.
pub fn missing_columns_finding(missing: &[Field]) -> Finding {
    let names = missing
        .iter()
        .map(|field| field.header())
        .collect::<Vec<_>>()
        .join(", ");
    Finding::failure_with_cause(
        RuleId::MissingColumns,
        FailureCause::Schema,
        format!("Missing required columns: {names}"),
        names,
    )
}
