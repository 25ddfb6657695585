use std::fs;
use std::path::{Path, PathBuf};

use crate::io::IoError;

/// Returns the first regular file in `dir` whose extension matches `extension`
/// (case-insensitive), in directory listing order. The listing order is whatever
/// the filesystem yields; no further tie-break is applied.
pub fn first_file_with_extension(dir: &Path, extension: &str) -> Result<Option<PathBuf>, IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension));
        if matches {
            return Ok(Some(path));
        }
    }
    Ok(None)
}
