use std::io::Read;

use serde::de::DeserializeOwned;

use crate::io::format::{csv, json, toml, yaml};
use crate::io::{Format, IoError};

pub use csv::CsvTable;

pub fn read_table<R: Read>(reader: R) -> Result<CsvTable, IoError> {
    csv::read_csv(reader)
}

/// Deserializes a single structured document such as a configuration file.
pub fn read_document<T: DeserializeOwned, R: Read>(
    reader: R,
    format: Format,
) -> Result<T, IoError> {
    match format {
        Format::Json => json::read_json(reader),
        Format::Yaml => yaml::read_yaml(reader),
        Format::Toml => toml::read_toml(reader),
        Format::Csv => Err(IoError::UnsupportedDocument { format: "csv" }),
    }
}
