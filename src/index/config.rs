use std::path::PathBuf;

use super::error::{StorageError, StorageResult};
use crate::constants::{DEFAULT_COLLECTION_NAME, DEFAULT_EMBEDDING_DIM, EMBED_BATCH_SIZE};

#[derive(Debug, Clone)]
/// Configuration for [`IndexManager`](super::IndexManager).
pub struct IndexConfig {
    /// Vector collection name.
    pub collection_name: String,
    /// Directory holding the document store.
    pub persist_dir: PathBuf,
    /// Vector dimension the collection is created with.
    pub embedding_dim: usize,
    /// Clauses embedded per encoder call during build.
    pub embed_batch_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            persist_dir: PathBuf::from("./storage"),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            embed_batch_size: EMBED_BATCH_SIZE,
        }
    }
}

impl IndexConfig {
    pub fn new(collection_name: impl Into<String>, persist_dir: impl Into<PathBuf>) -> Self {
        Self {
            collection_name: collection_name.into(),
            persist_dir: persist_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }

    pub fn validate(&self) -> StorageResult<()> {
        if self.collection_name.trim().is_empty() {
            return Err(StorageError::InvalidConfig {
                reason: "collection_name must not be empty".to_string(),
            });
        }
        if self.embedding_dim == 0 {
            return Err(StorageError::InvalidConfig {
                reason: "embedding_dim must be greater than 0".to_string(),
            });
        }
        if self.embed_batch_size == 0 {
            return Err(StorageError::InvalidConfig {
                reason: "embed_batch_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
