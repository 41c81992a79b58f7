//! Errors produced while writing output files.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the output writers.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem error creating a directory or writing a file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being created or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A document could not be serialized.
    #[error("JSON serialization error writing {path}: {source}")]
    Serialize {
        /// Path being written.
        path: PathBuf,
        /// Underlying serializer error.
        #[source]
        source: serde_json::Error,
    },
}

impl PersistError {
    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a serialization error.
    pub fn serialize(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Serialize {
            path: path.into(),
            source,
        }
    }
}
