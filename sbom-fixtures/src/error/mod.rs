//! Error types and error handling

use std::path::PathBuf;

use thiserror::Error;

/// Fixture generation error type
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Requested tool is not in the registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Reading or writing the project tree failed
    #[error("Filesystem error at {}: {source}", path.display())]
    Io {
        /// Path being created, read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Generated path would escape the project directory
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Manifest or requirements file does not parse
    #[error("Invalid manifest {}: {message}", path.display())]
    Manifest {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FixtureError {
    /// Wrap an I/O error with the path it occurred at
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Parse failure in a manifest or requirements file
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }
}
