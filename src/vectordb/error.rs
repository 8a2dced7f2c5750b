use thiserror::Error;

/// Errors returned by [`VectorStore`](super::VectorStore) operations.
#[derive(Debug, Error)]
pub enum VectorDbError {
    #[error("cannot reach vector store at '{url}': {message}")]
    ConnectionFailed { url: String, message: String },

    #[error("failed to create collection '{collection}': {message}")]
    CreateCollectionFailed { collection: String, message: String },

    #[error("failed to delete collection '{collection}': {message}")]
    DeleteCollectionFailed { collection: String, message: String },

    #[error("collection '{collection}' does not exist")]
    CollectionNotFound { collection: String },

    #[error("failed to upsert clause points into '{collection}': {message}")]
    UpsertFailed { collection: String, message: String },

    #[error("similarity search in '{collection}' failed: {message}")]
    SearchFailed { collection: String, message: String },

    #[error("failed to count points in '{collection}': {message}")]
    CountFailed { collection: String, message: String },

    /// A vector's length differs from the collection's configured size.
    #[error("vector has {actual} dimensions, collection expects {expected}")]
    InvalidDimension { expected: usize, actual: usize },

    /// A stored point lacks a clause field, so the clause cannot be rebuilt.
    #[error("point {point_id} payload is missing '{field}'")]
    MalformedPayload { point_id: u64, field: &'static str },
}
