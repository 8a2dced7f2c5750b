use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::config::IndexConfig;
use super::docstore::DocStore;
use super::error::{StorageError, StorageResult};
use crate::constants::validate_embedding_dim;
use crate::corpus::{ClauseRecord, IngestionError};
use crate::embedding::{EmbeddingError, TextEmbedder};
use crate::error::{PipelineError, PipelineResult};
use crate::hashing::clause_point_id;
use crate::retrieval::{Bm25Index, Candidate};
use crate::vectordb::{VectorPoint, VectorStore, WriteConsistency};

/// Outcome of [`IndexManager::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// The store was empty and the supplied clauses were embedded.
    Built { clauses: usize },
    /// The store already held points; nothing was embedded.
    Loaded { clauses: u64 },
}

#[derive(Debug, Clone)]
struct ReadyIndex {
    documents: Arc<DocStore>,
    lexical: Arc<Bm25Index>,
}

impl ReadyIndex {
    fn from_docstore(documents: DocStore) -> Self {
        let lexical = Arc::new(Bm25Index::build(documents.clauses()));
        Self {
            documents: Arc::new(documents),
            lexical,
        }
    }
}

#[derive(Debug)]
enum IndexState {
    Empty,
    Ready(ReadyIndex),
}

/// Owns the lifecycle of the clause vector index.
pub struct IndexManager<V: VectorStore> {
    store: V,
    embedder: Arc<dyn TextEmbedder>,
    config: IndexConfig,
    state: RwLock<IndexState>,
}

impl<V: VectorStore> std::fmt::Debug for IndexManager<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexManager")
            .field("config", &self.config)
            .field("embedding_dim", &self.embedder.embedding_dim())
            .finish_non_exhaustive()
    }
}

impl<V: VectorStore> IndexManager<V> {
    pub fn new(
        store: V,
        embedder: Arc<dyn TextEmbedder>,
        config: IndexConfig,
    ) -> StorageResult<Self> {
        config.validate()?;
        validate_embedding_dim(embedder.embedding_dim(), config.embedding_dim)?;

        Ok(Self {
            store,
            embedder,
            config,
            state: RwLock::new(IndexState::Empty),
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn store(&self) -> &V {
        &self.store
    }

    /// Number of indexed clauses in the backing store.
    pub async fn count(&self) -> StorageResult<u64> {
        Ok(self.store.count(&self.config.collection_name).await?)
    }

    pub async fn is_ready(&self) -> bool {
        matches!(*self.state.read().await, IndexState::Ready(_))
    }

    /// Persisted clause records of a ready index.
    pub async fn documents(&self) -> Option<Arc<DocStore>> {
        match &*self.state.read().await {
            IndexState::Ready(ready) => Some(ready.documents.clone()),
            IndexState::Empty => None,
        }
    }

    /// Lexical index over the document store, used by hybrid retrieval.
    pub async fn lexical(&self) -> Option<Arc<Bm25Index>> {
        match &*self.state.read().await {
            IndexState::Ready(ready) => Some(ready.lexical.clone()),
            IndexState::Empty => None,
        }
    }

    /// Builds when the store is empty, loads otherwise.
    ///
    /// `load_clauses` only runs when the store is empty or holds an incomplete index, so the
    /// corpus is never read for a fully-built collection. An incomplete index (points without a
    /// matching document store, as left by an interrupted build) is dropped and rebuilt.
    #[instrument(skip(self, load_clauses), fields(collection = %self.config.collection_name))]
    pub async fn init<F>(&self, load_clauses: F) -> PipelineResult<IndexStatus>
    where
        F: FnOnce() -> Result<Vec<ClauseRecord>, IngestionError>,
    {
        let mut state = self.state.write().await;
        let count = self.count().await?;

        if count > 0 {
            match self.load_locked(&mut state, count) {
                Ok(loaded) => return Ok(IndexStatus::Loaded { clauses: loaded }),
                Err(PipelineError::Storage(StorageError::IncompleteIndex { reason, .. })) => {
                    warn!(points = count, %reason, "Discarding incomplete index");
                    self.store
                        .delete_collection(&self.config.collection_name)
                        .await
                        .map_err(StorageError::from)?;
                }
                Err(e) => return Err(e),
            }
        }

        let clauses = load_clauses()?;
        if clauses.is_empty() {
            return Err(StorageError::EmptyIndex {
                collection: self.config.collection_name.clone(),
            }
            .into());
        }

        let built = self.build_locked(&mut state, clauses).await?;
        Ok(IndexStatus::Built { clauses: built })
    }

    /// Embeds and upserts `clauses`, then persists the document store.
    ///
    /// Fails with [`StorageError::NotEmpty`] if the collection already holds points. On any
    /// later failure the collection is dropped, so no partial index survives the call.
    #[instrument(skip(self, clauses), fields(collection = %self.config.collection_name, clauses = clauses.len()))]
    pub async fn build_index(&self, clauses: Vec<ClauseRecord>) -> PipelineResult<usize> {
        let mut state = self.state.write().await;
        self.build_locked(&mut state, clauses).await
    }

    /// Attaches to an existing, non-empty collection without re-embedding.
    ///
    /// The document store is the build's completion marker: without one that matches the
    /// collection, this fails with [`StorageError::IncompleteIndex`].
    #[instrument(skip(self), fields(collection = %self.config.collection_name))]
    pub async fn load_index(&self) -> PipelineResult<u64> {
        let mut state = self.state.write().await;
        let count = self.count().await?;
        self.load_locked(&mut state, count)
    }

    /// Embeds `query` and returns the `k` nearest clauses, best first.
    ///
    /// A query without embeddable content (e.g. punctuation only) retrieves nothing.
    pub async fn retrieve(&self, query: &str, k: usize) -> PipelineResult<Vec<Candidate>> {
        if k == 0 {
            return Err(StorageError::InvalidTopK { k }.into());
        }

        let state = self.state.read().await;
        if !matches!(*state, IndexState::Ready(_)) {
            return Err(StorageError::NotReady.into());
        }

        let vector = self.embedder.embed(query)?;
        validate_embedding_dim(vector.len(), self.config.embedding_dim)
            .map_err(StorageError::from)?;

        // Cosine distance is undefined for a zero vector (no embeddable tokens).
        if vector.iter().all(|v| *v == 0.0) {
            debug!("Query embedded to a zero vector, nothing to retrieve");
            return Ok(Vec::new());
        }

        let results = self
            .store
            .search(&self.config.collection_name, vector, k as u64)
            .await
            .map_err(StorageError::from)?;
        drop(state);

        debug!(k, hits = results.len(), "Dense retrieval complete");

        Ok(results
            .into_iter()
            .map(|r| Candidate::new(Arc::new(r.clause), r.score))
            .collect())
    }

    async fn build_locked(
        &self,
        state: &mut IndexState,
        clauses: Vec<ClauseRecord>,
    ) -> PipelineResult<usize> {
        if clauses.is_empty() {
            return Err(IngestionError::EmptyCorpus.into());
        }

        let collection = &self.config.collection_name;
        self.store
            .ensure_collection(collection, self.config.embedding_dim as u64)
            .await
            .map_err(StorageError::from)?;

        let existing = self.count().await?;
        if existing > 0 {
            return Err(StorageError::NotEmpty {
                collection: collection.clone(),
                count: existing,
            }
            .into());
        }

        check_point_ids(&clauses)?;

        let total = clauses.len();
        info!(clauses = total, "Building index");

        // The document store marks a completed build, so a stale one must not outlive this call.
        DocStore::remove(&self.config.persist_dir)?;

        let documents = DocStore::new(collection, clauses);
        let written = match self.write_points(documents.clauses()).await {
            Ok(()) => documents
                .persist(&self.config.persist_dir)
                .map_err(PipelineError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            self.discard_partial_build().await;
            return Err(e);
        }

        info!(
            clauses = total,
            fingerprint = documents.fingerprint(),
            persist_dir = %self.config.persist_dir.display(),
            "Index built"
        );

        *state = IndexState::Ready(ReadyIndex::from_docstore(documents));
        Ok(total)
    }

    async fn write_points(&self, clauses: &[ClauseRecord]) -> PipelineResult<()> {
        let collection = &self.config.collection_name;
        let total = clauses.len();
        let mut embedded = 0usize;

        for chunk in clauses.chunks(self.config.embed_batch_size) {
            let texts: Vec<&str> = chunk.iter().map(|c| c.text()).collect();
            let vectors = self.embedder.embed_batch(&texts)?;
            if vectors.len() != chunk.len() {
                return Err(EmbeddingError::InferenceFailed {
                    reason: format!(
                        "encoder returned {} vectors for {} texts",
                        vectors.len(),
                        chunk.len()
                    ),
                }
                .into());
            }

            let mut points = Vec::with_capacity(chunk.len());
            for (clause, vector) in chunk.iter().zip(vectors) {
                validate_embedding_dim(vector.len(), self.config.embedding_dim)
                    .map_err(StorageError::from)?;
                points.push(VectorPoint::new(clause.clone(), vector));
            }

            self.store
                .upsert_points(collection, points, WriteConsistency::Strong)
                .await
                .map_err(StorageError::from)?;

            embedded += chunk.len();
            debug!(embedded, total, "Embedded batch");
        }

        Ok(())
    }

    async fn discard_partial_build(&self) {
        let collection = &self.config.collection_name;
        match self.store.delete_collection(collection).await {
            Ok(()) => warn!("Build failed; partial collection dropped"),
            // A later init still detects the missing document store and rebuilds.
            Err(e) => warn!(error = %e, "Build failed; partial collection could not be dropped"),
        }
    }

    fn load_locked(&self, state: &mut IndexState, count: u64) -> PipelineResult<u64> {
        let collection = &self.config.collection_name;
        if count == 0 {
            return Err(StorageError::EmptyIndex {
                collection: collection.clone(),
            }
            .into());
        }

        let incomplete = |reason: String| StorageError::IncompleteIndex {
            collection: collection.clone(),
            reason,
        };

        let Some(docs) = DocStore::load(&self.config.persist_dir)? else {
            return Err(incomplete(format!(
                "no document store in {}",
                self.config.persist_dir.display()
            ))
            .into());
        };
        if docs.collection() != collection {
            return Err(incomplete(format!(
                "document store belongs to collection '{}'",
                docs.collection()
            ))
            .into());
        }
        if !docs.fingerprint_matches() {
            return Err(incomplete("document store fingerprint does not match its clauses".into())
                .into());
        }
        if docs.len() as u64 != count {
            return Err(incomplete(format!(
                "document store holds {} clauses, collection holds {count} points",
                docs.len()
            ))
            .into());
        }

        info!(
            vectors = count,
            sample_id = docs.clauses().first().map(|c| c.id()).unwrap_or(""),
            fingerprint = docs.fingerprint(),
            "Index loaded"
        );
        *state = IndexState::Ready(ReadyIndex::from_docstore(docs));
        Ok(count)
    }
}

fn check_point_ids(clauses: &[ClauseRecord]) -> PipelineResult<()> {
    let mut seen: HashMap<u64, &str> = HashMap::with_capacity(clauses.len());
    for clause in clauses {
        if let Some(first) = seen.insert(clause_point_id(clause.id()), clause.id()) {
            if first == clause.id() {
                return Err(IngestionError::DuplicateClause {
                    id: clause.id().to_string(),
                }
                .into());
            }
            return Err(StorageError::PointIdCollision {
                first: first.to_string(),
                second: clause.id().to_string(),
            }
            .into());
        }
    }
    Ok(())
}
