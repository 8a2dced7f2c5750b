//! Persistent clause index: vector collection plus document store.
//!
//! [`IndexManager::init`] decides between building and loading by inspecting the collection's
//! point count, so running ingestion against an already-populated store never re-embeds.
//! Build holds the index write lock until every clause is embedded, upserted and persisted;
//! retrieval takes the read lock, so readers see either the empty or the fully-built index.

pub mod config;
pub mod docstore;
pub mod error;
pub mod manager;


pub use config::IndexConfig;
pub use docstore::{DOCSTORE_FILE, DocStore};
pub use error::{StorageError, StorageResult};
pub use manager::{IndexManager, IndexStatus};
