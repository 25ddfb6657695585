use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("unsupported {kind} file extension: {path}")]
    UnsupportedPathExtension { kind: &'static str, path: String },

    #[error("{format} documents are not supported here")]
    UnsupportedDocument { format: &'static str },

    #[error("json parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("yaml parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv line {line} has {found} fields, expected at most {expected}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
}
