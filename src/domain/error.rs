use thiserror::Error;

use crate::domain::config::CheckId;
use crate::domain::finding::FailureCause;
use crate::io::IoError;

/// Errors that stop a run before any rule can be evaluated.
#[derive(Debug, Error)]
pub enum GateError {
    /// No candidate file in the input directory.
    #[error("no `.{extension}` input file found in `{dir}`")]
    InputNotFound { dir: String, extension: String },

    /// Input directory could not be listed.
    #[error("failed to list input directory `{dir}`: {source}")]
    ListInput {
        dir: String,
        #[source]
        source: IoError,
    },

    /// Input file exists but could not be opened.
    #[error("failed to open input file `{path}`: {source}")]
    OpenInput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input could not be parsed as a table.
    #[error("failed to parse input file `{path}`: {source}")]
    ParseInput {
        path: String,
        #[source]
        source: IoError,
    },

    /// Verdict document could not be persisted.
    #[error("failed to write verdict to `{path}`: {source}")]
    WriteOutput {
        path: String,
        #[source]
        source: IoError,
    },
}

impl GateError {
    pub fn cause(&self) -> FailureCause {
        match self {
            Self::ParseInput { .. } => FailureCause::Parse,
            Self::InputNotFound { .. }
            | Self::ListInput { .. }
            | Self::OpenInput { .. }
            | Self::WriteOutput { .. } => FailureCause::Environment,
        }
    }
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration `{field}`: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

/// A check could not complete; folded into an `Unexpected Error` finding.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("check `{check}` failed: {message}")]
    Internal { check: CheckId, message: String },

    #[error("check `{check}` panicked: {message}")]
    Panicked { check: CheckId, message: String },
}

impl RuleError {
    pub fn check(&self) -> CheckId {
        match self {
            Self::Internal { check, .. } | Self::Panicked { check, .. } => *check,
        }
    }
}
