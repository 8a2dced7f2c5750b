use std::path::PathBuf;

use thiserror::Error;

/// Errors loading benchmark files.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("failed to read benchmark {path}: {source}")]
    BenchmarkIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed benchmark {path}: {source}")]
    BenchmarkFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type EvaluationResult<T> = Result<T, EvaluationError>;
