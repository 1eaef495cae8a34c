//! Error types for stockpot-cli

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for stockpot-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in stockpot-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from the simulator
    #[error("{0}")]
    Core(#[from] stockpot_core::Error),

    /// Configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// File operation failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Report could not be written to its destination
    #[error("Failed to write report: {0}")]
    Write(#[source] std::io::Error),

    /// Background simulation task died
    #[error("Task error: {0}")]
    Task(String),

    /// Output serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config(message.into())
    }

    /// Creates a task error.
    pub fn task<S: Into<String>>(message: S) -> Self {
        Error::Task(message.into())
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn io_with_path(source: std::io::Error, path: &Path) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attaches the destination path to a report write failure.
    pub fn at_path(self, path: &Path) -> Self {
        match self {
            Error::Write(source) => Error::io_with_path(source, path),
            other => other,
        }
    }
}
