use csv::StringRecord;

use crate::domain::record::{Dataset, Field, Record};
use crate::io::reader::CsvTable;
use crate::util::time::parse_calendar_date;

/// Cell values read as missing, matching the usual spreadsheet/pandas NA markers.
const NA_TOKENS: [&str; 18] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#NA", "#N/A N/A", "1.#IND", "1.#QNAN", "-1.#IND", "-1.#QNAN",
];

/// Column positions of the known fields within one CSV header.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnIndex {
    positions: [Option<usize>; Field::ALL.len()],
}

impl ColumnIndex {
    fn from_headers(headers: &[String]) -> Self {
        let mut positions = [None; Field::ALL.len()];
        for (slot, field) in positions.iter_mut().zip(Field::ALL) {
            *slot = headers.iter().position(|header| header == field.header());
        }
        Self { positions }
    }

    fn cell<'a>(&self, row: &'a StringRecord, field: Field) -> Option<&'a str> {
        let slot = Field::ALL.iter().position(|known| *known == field)?;
        let position = self.positions[slot]?;
        row.get(position).filter(|cell| !is_na(cell))
    }
}

/// Converts a raw CSV table into typed records. Unparseable hours or dates become absent.
pub fn build_dataset(table: CsvTable) -> Dataset {
    let columns = ColumnIndex::from_headers(&table.headers);
    let records = table
        .rows
        .iter()
        .map(|row| normalize_row(&columns, row))
        .collect();
    Dataset::new(table.headers, records)
}

fn normalize_row(columns: &ColumnIndex, row: &StringRecord) -> Record {
    let text = |field| columns.cell(row, field).map(ToOwned::to_owned);
    Record {
        employee: text(Field::Employee),
        employee_nr: text(Field::EmployeeNr),
        cost_center: text(Field::CostCenter),
        activity_code: text(Field::ActivityCode),
        date: columns.cell(row, Field::Date).and_then(parse_calendar_date),
        hours: columns.cell(row, Field::Hours).and_then(parse_hours),
        description: text(Field::Description),
    }
}

pub fn is_na(cell: &str) -> bool {
    cell.is_empty() || NA_TOKENS.contains(&cell)
}

/// Parses a finite decimal; anything else is absent.
pub fn parse_hours(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|hours| hours.is_finite())
}
