use std::path::PathBuf;

use thiserror::Error;

use crate::constants::DimValidationError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors returned by the index manager and its backing stores.
pub enum StorageError {
    /// Vector store failure (connectivity, upsert, search, count).
    #[error("vector store error: {0}")]
    VectorDb(#[from] VectorDbError),

    /// Build was attempted on a collection that already holds points.
    #[error("collection '{collection}' already holds {count} points; refusing to rebuild")]
    NotEmpty {
        /// Collection name.
        collection: String,
        /// Existing point count.
        count: u64,
    },

    /// Load was attempted on an empty collection.
    #[error("collection '{collection}' is empty; build the index first")]
    EmptyIndex {
        /// Collection name.
        collection: String,
    },

    /// The collection holds points but no matching document store, so the build that wrote
    /// them never completed.
    #[error("index in collection '{collection}' is incomplete: {reason}")]
    IncompleteIndex {
        /// Collection name.
        collection: String,
        /// What was missing or inconsistent.
        reason: String,
    },

    /// Retrieval before the index was built or loaded.
    #[error("index not ready: call init, build_index or load_index first")]
    NotReady,

    /// Requested result count was zero.
    #[error("invalid k: must be greater than 0, got {k}")]
    InvalidTopK {
        /// Requested count.
        k: usize,
    },

    /// Embedding dimension does not match the collection.
    #[error("embedding dimension check failed: {0}")]
    Dimension(#[from] DimValidationError),

    /// Two clause identifiers map to the same point id.
    #[error("point id collision between '{first}' and '{second}'")]
    PointIdCollision {
        /// First clause identifier.
        first: String,
        /// Second clause identifier.
        second: String,
    },

    /// Document store could not be read or written.
    #[error("document store I/O failed at '{path}': {source}")]
    DocStoreIo {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Document store contents are not valid JSON.
    #[error("document store at '{path}' is malformed: {source}")]
    DocStoreFormat {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid index configuration.
    #[error("invalid index configuration: {reason}")]
    InvalidConfig {
        /// Error message.
        reason: String,
    },
}

/// Convenience result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
