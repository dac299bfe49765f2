//! Errors raised by the validation pipeline.
//!
//! Every variant renders a fixed, caller-facing message. Context (paths,
//! reasons, offending rows) is carried in fields so tests and logs can see
//! what failed without the message changing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Format,
    Options,
    Limits,
    Environment,
    Command,
    UnsupportedProjection,
}

#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("Failed: Input file not specified")]
    MissingInput,

    #[error("Failed: Input file doesnt exists")]
    InputNotFound { path: PathBuf },

    #[error("Failed: .shx file missing")]
    MissingSidecar { path: PathBuf, sidecar: PathBuf },

    #[error("Failed: Input file could not be read")]
    Io {
        operation: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed: Invalid GeoJSON")]
    InvalidGeoJson { reason: &'static str },

    #[error("Failed: Missing Lat/Lng columns")]
    MissingCoordinateColumns { headers: Vec<String> },

    #[error("Failed: Invalid Lat/Lng Values")]
    InvalidCoordinateValues { row: u64 },

    #[error("Failed: Invalid GeoCSV")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Failed: Missing companion file")]
    MissingCompanion { entries: Vec<String> },

    #[error("Failed: Unable to read zip file")]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("Failed: Incorrect Parameter Type \"options\".")]
    InvalidOptions { reason: &'static str },

    #[error("Failed: Incorrect Parameter Type \"limits\"")]
    InvalidLimits { reason: &'static str },

    #[error("Failed: Limit Parameters are missing")]
    MissingLimits,

    #[error("Failed: Check GDAL is installed")]
    ToolUnavailable {
        program: String,
        detail: Option<String>,
    },

    #[error("Failed: Command Failed")]
    CommandFailed { program: String, stderr: String },

    #[error("Failed: Command Failed")]
    ReportPattern {
        pattern: &'static str,
        source: regex::Error,
    },

    #[error("Failed: Projection not Supported")]
    UnsupportedProjection,
}

impl ValidatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingInput
            | Self::InputNotFound { .. }
            | Self::MissingSidecar { .. }
            | Self::Io { .. } => ErrorKind::Input,
            Self::InvalidGeoJson { .. }
            | Self::MissingCoordinateColumns { .. }
            | Self::InvalidCoordinateValues { .. }
            | Self::Csv { .. }
            | Self::MissingCompanion { .. }
            | Self::Zip { .. } => ErrorKind::Format,
            Self::InvalidOptions { .. } => ErrorKind::Options,
            Self::InvalidLimits { .. } | Self::MissingLimits => ErrorKind::Limits,
            Self::ToolUnavailable { .. } => ErrorKind::Environment,
            Self::CommandFailed { .. } | Self::ReportPattern { .. } => ErrorKind::Command,
            Self::UnsupportedProjection => ErrorKind::UnsupportedProjection,
        }
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
