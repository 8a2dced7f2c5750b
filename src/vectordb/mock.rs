use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::WriteConsistency;
use super::client::VectorStore;
use super::error::VectorDbError;
use super::model::{SearchResult, VectorPoint};

/// Store operation a [`MockVectorStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockFailure {
    Upsert,
    Search,
    Count,
    Delete,
}

/// In-memory [`VectorStore`] with exact cosine search.
///
/// Equal scores come back in clause ordinal order, so ties follow ingestion order.
#[derive(Debug, Default)]
pub struct MockVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
    failures: RwLock<HashSet<MockFailure>>,
    upsert_batches: AtomicUsize,
}

#[derive(Debug)]
struct Collection {
    vector_size: u64,
    points: HashMap<u64, VectorPoint>,
}

impl MockVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points stored in `collection`, or `None` if it was never created.
    pub fn point_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.points.len())
    }

    /// Number of non-empty `upsert_points` calls that succeeded.
    pub fn upsert_batches(&self) -> usize {
        self.upsert_batches.load(Ordering::SeqCst)
    }

    /// Makes every later `op` call fail until [`recover`](Self::recover).
    pub fn fail(&self, op: MockFailure) {
        self.failures.write().insert(op);
    }

    pub fn recover(&self, op: MockFailure) {
        self.failures.write().remove(&op);
    }

    fn injected(&self, op: MockFailure, collection: &str) -> Result<(), VectorDbError> {
        if !self.failures.read().contains(&op) {
            return Ok(());
        }

        let collection = collection.to_string();
        let message = format!("injected {op:?} failure");
        Err(match op {
            MockFailure::Upsert => VectorDbError::UpsertFailed {
                collection,
                message,
            },
            MockFailure::Search => VectorDbError::SearchFailed {
                collection,
                message,
            },
            MockFailure::Count => VectorDbError::CountFailed {
                collection,
                message,
            },
            MockFailure::Delete => VectorDbError::DeleteCollectionFailed {
                collection,
                message,
            },
        })
    }
}

impl VectorStore for MockVectorStore {
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.collections
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Collection {
                vector_size,
                points: HashMap::new(),
            });
        Ok(())
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
        _consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        self.injected(MockFailure::Upsert, collection)?;
        if points.is_empty() {
            return Ok(());
        }

        let mut collections = self.collections.write();
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            })?;

        // One bad point rejects the whole batch.
        if let Some(bad) = points
            .iter()
            .find(|p| p.vector.len() as u64 != coll.vector_size)
        {
            return Err(VectorDbError::InvalidDimension {
                expected: coll.vector_size as usize,
                actual: bad.vector.len(),
            });
        }

        coll.points.extend(points.into_iter().map(|p| (p.id, p)));
        self.upsert_batches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchResult>, VectorDbError> {
        self.injected(MockFailure::Search, collection)?;

        let collections = self.collections.read();
        let coll = collections
            .get(collection)
            .ok_or_else(|| VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            })?;

        if query.len() as u64 != coll.vector_size {
            return Err(VectorDbError::InvalidDimension {
                expected: coll.vector_size as usize,
                actual: query.len(),
            });
        }

        let mut results: Vec<SearchResult> = coll
            .points
            .values()
            .map(|p| SearchResult {
                id: p.id,
                score: cosine_similarity(&query, &p.vector),
                clause: p.clause.clone(),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.clause.ordinal().cmp(&b.clause.ordinal()))
        });
        results.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(results)
    }

    async fn count(&self, collection: &str) -> Result<u64, VectorDbError> {
        self.injected(MockFailure::Count, collection)?;

        Ok(self
            .collections
            .read()
            .get(collection)
            .map_or(0, |c| c.points.len() as u64))
    }

    async fn delete_collection(&self, name: &str) -> Result<(), VectorDbError> {
        self.injected(MockFailure::Delete, name)?;
        self.collections.write().remove(name);
        Ok(())
    }
}

/// Cosine similarity; 0.0 for empty, mismatched or zero-norm inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}
