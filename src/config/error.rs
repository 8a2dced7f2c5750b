//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading or validating [`Config`](super::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A setting violates a pipeline invariant.
    #[error("invalid setting {name}: {reason}")]
    OutOfRange { name: &'static str, reason: String },

    #[error("{name}: path does not exist: {path}")]
    PathNotFound { name: &'static str, path: PathBuf },

    #[error("{name}: expected a file: {path}")]
    NotAFile { name: &'static str, path: PathBuf },

    #[error("{name}: expected a directory: {path}")]
    NotADirectory { name: &'static str, path: PathBuf },
}
