//! CLI error types.

use std::path::PathBuf;

use kc_provider::{ClientError, ProviderError};
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reconciliation failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The HTTP client could not be built.
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// A state or configuration file is unusable.
    #[error("{}: {message}", path.display())]
    File {
        /// Offending file.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation cancelled.
    #[error("operation cancelled")]
    Cancelled,
}

impl CliError {
    /// Creates a file error.
    pub fn file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::File {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
