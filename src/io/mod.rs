pub mod error;
pub mod format;
pub mod locate;
pub mod reader;
pub mod writer;

use std::fmt;
use std::path::Path;

pub use error::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
    Yaml,
    Toml,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn resolve_input_format(input: &Path) -> Result<Format, IoError> {
    format_from_path(input).ok_or_else(|| IoError::UnsupportedPathExtension {
        kind: "input",
        path: input.to_string_lossy().into_owned(),
    })
}

pub fn resolve_config_format(config: &Path) -> Result<Format, IoError> {
    match format_from_path(config) {
        Some(Format::Csv) | None => Err(IoError::UnsupportedPathExtension {
            kind: "config",
            path: config.to_string_lossy().into_owned(),
        }),
        Some(format) => Ok(format),
    }
}

fn format_from_path(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some(Format::Csv),
        "json" => Some(Format::Json),
        "yaml" | "yml" => Some(Format::Yaml),
        "toml" => Some(Format::Toml),
        _ => None,
    }
}
