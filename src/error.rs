//! Centralized error types for spamprep.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the pipeline stages.
#[derive(Error, Debug)]
pub enum PrepError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A corpus directory does not exist or is not a directory.
    #[error("Corpus directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Invalid configuration, detected before any corpus I/O.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// No usable term survived tokenization and stopword removal.
    #[error("Empty vocabulary: {0}")]
    EmptyVocabulary(String),

    /// A stage was called with an out-of-range parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Writing or reading a persisted table failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An export operation failed.
    #[error("Export error: {0}")]
    Export(String),
}

/// Convenience alias for `Result<T, PrepError>`.
pub type Result<T> = std::result::Result<T, PrepError>;

impl PrepError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (rare, prefer `PrepError::io`).
impl From<std::io::Error> for PrepError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}

/// Failure to turn a single file into a message.
///
/// Always recovered by the corpus assembler: the file is skipped and counted.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The file could not be opened or read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The content is blank or rejected by the MIME parser.
    #[error("not a message envelope: {0}")]
    InvalidEnvelope(String),
}
