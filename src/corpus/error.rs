use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while reading and flattening the statute corpus.
///
/// Every variant is fatal to ingestion. Bad files are never skipped.
pub enum IngestionError {
    /// The corpus directory contains no `*.json` documents.
    #[error("no JSON documents found in {dir}")]
    NoDocuments {
        /// Scanned directory.
        dir: PathBuf,
    },

    /// Directory listing or file read failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON.
    #[error("file {file} is not valid JSON: {source}")]
    Parse {
        /// Offending file name.
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Root element is not an array.
    #[error("file {file}: root element must be an array of records")]
    InvalidRoot {
        /// Offending file name.
        file: String,
    },

    /// An array element is not an object.
    #[error("file {file}: record {index} is not an object")]
    InvalidRecord {
        /// Offending file name.
        file: String,
        /// Zero-based position in the root array.
        index: usize,
    },

    /// A clause value is not a string.
    #[error("file {file}: value for key '{key}' is not a string")]
    NonStringValue {
        /// Offending file name.
        file: String,
        /// Clause title whose value was rejected.
        key: String,
    },

    /// Two clauses produced the same identifier.
    #[error("duplicate clause identifier: {id}")]
    DuplicateClause {
        /// Colliding identifier.
        id: String,
    },

    /// Documents were valid but contained no clauses at all.
    #[error("corpus contains no clauses")]
    EmptyCorpus,
}

/// Convenience result type for ingestion.
pub type IngestionResult<T> = Result<T, IngestionError>;
