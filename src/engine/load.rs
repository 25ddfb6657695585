use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::error::GateError;
use crate::domain::record::Dataset;
use crate::engine::normalize::build_dataset;
use crate::io::{Format, locate, reader};

/// Finds the input table inside `dir`.
pub fn locate_input(dir: &Path) -> Result<PathBuf, GateError> {
    let extension = Format::Csv.as_str();
    let found = locate::first_file_with_extension(dir, extension).map_err(|source| {
        GateError::ListInput {
            dir: dir.display().to_string(),
            source,
        }
    })?;
    found.ok_or_else(|| GateError::InputNotFound {
        dir: dir.display().to_string(),
        extension: extension.to_string(),
    })
}

/// Reads and normalizes the input table at `path`.
pub fn load_dataset(path: &Path) -> Result<Dataset, GateError> {
    let file = File::open(path).map_err(|source| GateError::OpenInput {
        path: path.display().to_string(),
        source,
    })?;
    let table = reader::read_table(file).map_err(|source| GateError::ParseInput {
        path: path.display().to_string(),
        source,
    })?;
    debug!(columns = table.headers.len(), "parsed csv header");

    let dataset = build_dataset(table);
    info!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.fields().len(),
        "loaded timesheet records"
    );
    Ok(dataset)
}
