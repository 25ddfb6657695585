use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Columns that must be present in every timesheet extract.
pub const REQUIRED_FIELDS: [Field; 6] = [
    Field::Employee,
    Field::EmployeeNr,
    Field::CostCenter,
    Field::ActivityCode,
    Field::Date,
    Field::Hours,
];

/// Known timesheet columns, serialized by their exact CSV header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "Employee")]
    Employee,
    #[serde(rename = "Employee Nr.")]
    EmployeeNr,
    #[serde(rename = "Cost Center")]
    CostCenter,
    #[serde(rename = "Activity Code")]
    ActivityCode,
    #[serde(rename = "Date")]
    Date,
    #[serde(rename = "Hours")]
    Hours,
    #[serde(rename = "Description")]
    Description,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Self::Employee,
        Self::EmployeeNr,
        Self::CostCenter,
        Self::ActivityCode,
        Self::Date,
        Self::Hours,
        Self::Description,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::EmployeeNr => "Employee Nr.",
            Self::CostCenter => "Cost Center",
            Self::ActivityCode => "Activity Code",
            Self::Date => "Date",
            Self::Hours => "Hours",
            Self::Description => "Description",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.header() == header)
    }

    /// Whether the column keeps its raw cell text after normalization.
    pub fn is_text(self) -> bool {
        !matches!(self, Self::Date | Self::Hours)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One normalized timesheet row. Absent or unparseable cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub employee: Option<String>,
    pub employee_nr: Option<String>,
    pub cost_center: Option<String>,
    pub activity_code: Option<String>,
    pub date: Option<NaiveDate>,
    pub hours: Option<f64>,
    pub description: Option<String>,
}

impl Record {
    pub fn is_absent(&self, field: Field) -> bool {
        match field {
            Field::Date => self.date.is_none(),
            Field::Hours => self.hours.is_none(),
            text => self.text(text).is_none(),
        }
    }

    /// Raw cell text of a text column; always `None` for `Date` and `Hours`.
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Employee => self.employee.as_deref(),
            Field::EmployeeNr => self.employee_nr.as_deref(),
            Field::CostCenter => self.cost_center.as_deref(),
            Field::ActivityCode => self.activity_code.as_deref(),
            Field::Description => self.description.as_deref(),
            Field::Date | Field::Hours => None,
        }
    }

    /// Normalized employee number used for grouping and deduplication.
    pub fn employee_key(&self) -> Option<String> {
        self.employee_nr.as_deref().map(employee_key)
    }

    /// JSON rendering of one column for evidence samples.
    pub fn field_value(&self, field: Field) -> Value {
        match field {
            Field::Date => self
                .date
                .map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Null),
            Field::Hours => hours_value(self.hours),
            Field::EmployeeNr => self
                .employee_nr
                .as_deref()
                .map(employee_nr_value)
                .unwrap_or(Value::Null),
            text => self
                .text(text)
                .map(|value| Value::String(value.to_string()))
                .unwrap_or(Value::Null),
        }
    }
}

/// Renders an hours amount as a JSON number, `null` when absent.
pub fn hours_value(hours: Option<f64>) -> Value {
    hours
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Employee numbers are identifiers that may arrive as integers (`1001`, `1001.0`) or as
/// free text (`E-17`); integer literals are emitted as JSON integers.
pub fn employee_nr_value(raw: &str) -> Value {
    match integral_employee_nr(raw) {
        Some(number) => Value::Number(Number::from(number)),
        None => Value::String(raw.to_string()),
    }
}

/// Identity of an employee number: `1001`, ` 1001 ` and `1001.0` share the key `1001`;
/// other values compare by their trimmed text.
pub fn employee_key(raw: &str) -> String {
    match integral_employee_nr(raw) {
        Some(number) => number.to_string(),
        None => raw.trim().to_string(),
    }
}

fn integral_employee_nr(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(number) = trimmed.parse::<i64>() {
        return Some(number);
    }
    match trimmed.parse::<f64>() {
        Ok(number)
            if number.is_finite()
                && number.fract() == 0.0
                && number.abs() < 9_007_199_254_740_992.0 =>
        {
            Some(number as i64)
        }
        _ => None,
    }
}

/// Ordered timesheet rows sharing one header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    fields: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(fields: Vec<String>, records: Vec<Record>) -> Self {
        Self { fields, records }
    }

    /// Dataset whose header lists every known column.
    pub fn with_all_fields(records: Vec<Record>) -> Self {
        Self::new(
            Field::ALL
                .iter()
                .map(|field| field.header().to_string())
                .collect(),
            records,
        )
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.fields.iter().any(|name| name == field.header())
    }

    /// Number of distinct present employee numbers.
    pub fn unique_employee_count(&self) -> usize {
        self.records
            .iter()
            .filter_map(Record::employee_key)
            .collect::<BTreeSet<_>>()
            .len()
    }
}
