//! Error types for the preprocessing pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or transforming graph data
#[derive(Error, Debug)]
pub enum PrepError {
    /// A line does not parse into the expected token shape
    #[error("{}:{}: {}", path.display(), line, reason)]
    InputFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A raw node id has no entry in the index mapping
    #[error("{}:{}: unknown node id {}", path.display(), line, id)]
    UnknownNode {
        path: PathBuf,
        line: usize,
        id: u64,
    },

    /// A node or feature index outside [0, len)
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// Declared node count does not match a matrix shape
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: String, found: String },

    /// I/O error with the offending path attached
    #[error("{}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PrepError {
    /// Wrap an I/O error with the file it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrepError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build an `InputFormat` error for a 1-based line number.
    pub fn format(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        PrepError::InputFormat {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}

pub type PrepResult<T> = Result<T, PrepError>;
