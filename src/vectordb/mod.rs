//! Vector store access.
//!
//! [`VectorStore`] is the narrow interface the index needs: create a collection, upsert
//! clause points, nearest-neighbour search and an exact count. [`QdrantStore`] implements it
//! over gRPC; the in-memory [`MockVectorStore`] backs tests.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{QdrantStore, VectorStore};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockFailure, MockVectorStore, cosine_similarity};
pub use model::{SearchResult, VectorPoint};

/// How long an upsert waits before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteConsistency {
    /// Wait until the points are indexed and searchable (`wait=true`).
    Strong,
    /// Return once the server acknowledges receipt (`wait=false`).
    Eventual,
}

impl From<WriteConsistency> for bool {
    fn from(c: WriteConsistency) -> bool {
        matches!(c, WriteConsistency::Strong)
    }
}
