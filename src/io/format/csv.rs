use std::io::Read;

use csv::StringRecord;

use crate::io::IoError;

/// Raw CSV contents: the header row and every data row as read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

/// Reads a headed CSV table. Short rows are kept (missing cells read as absent);
/// rows with more cells than the header are rejected.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvTable, IoError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(ToOwned::to_owned)
        .collect();

    let mut rows = Vec::new();
    for row in csv_reader.records() {
        let record = row?;
        if record.len() > headers.len() {
            return Err(IoError::RaggedRow {
                line: record.position().map(|pos| pos.line()).unwrap_or_default(),
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(record);
    }

    Ok(CsvTable { headers, rows })
}
