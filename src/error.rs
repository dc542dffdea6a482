//! Error types for the update recorder.
//!
//! Every failure is returned to the host optimizer; none of these are fatal to
//! the optimization itself.
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification used by hosts deciding how loudly to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed configuration; logging stays disabled.
    Config,
    /// Directory or file failure; the current run is not logged.
    Io,
    /// Lifecycle call out of order; a bug in the caller.
    Precondition,
}

/// Recorder errors.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("{owner} failed to find the required parameter '{key}'")]
    MissingKey { owner: String, key: String },

    #[error("{owner} parameter '{key}' must be {expected}")]
    InvalidKey {
        owner: String,
        key: String,
        expected: &'static str,
    },

    #[error("{owner} parameter '{key}' must be non-empty")]
    EmptyKey { owner: String, key: String },

    #[error("{owner} parameter '{key}' must be a relative path without '..' (got {value:?})")]
    UnsafePath {
        owner: String,
        key: String,
        value: String,
    },

    #[error("unable to locate package '{package}'")]
    PackageNotFound { package: String },

    #[error("unable to create the update logging directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to create/open update log file {}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to remove previous update log file {}", path.display())]
    RemoveStale {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write update log file {}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to persist update log file {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{operation} called while recorder is {state}")]
    Precondition {
        operation: &'static str,
        state: &'static str,
    },
}

impl RecorderError {
    /// Classify the error for host-side reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingKey { .. }
            | Self::InvalidKey { .. }
            | Self::EmptyKey { .. }
            | Self::UnsafePath { .. } => ErrorKind::Config,
            Self::PackageNotFound { .. }
            | Self::CreateDir { .. }
            | Self::OpenFile { .. }
            | Self::RemoveStale { .. }
            | Self::WriteFile { .. }
            | Self::Persist { .. } => ErrorKind::Io,
            Self::Precondition { .. } => ErrorKind::Precondition,
        }
    }
}

/// Result alias for recorder operations.
pub type Result<T> = std::result::Result<T, RecorderError>;
