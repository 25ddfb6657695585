use std::fs;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::io::IoError;
use crate::io::format::json;

/// Writes `value` as pretty JSON to `path` through a sibling temp file, so readers
/// never observe a partially written document.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), IoError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    json::write_json_pretty(&mut file, value)?;
    file.persist(path).map_err(|error| IoError::Io(error.error))?;
    Ok(())
}
