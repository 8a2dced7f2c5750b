use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, DeleteCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use tracing::debug;

use super::error::VectorDbError;
use super::model::{SearchResult, VectorPoint};
use crate::vectordb::WriteConsistency;

#[derive(Clone)]
/// Direct Qdrant client wrapper.
pub struct QdrantStore {
    client: Qdrant,
    url: String,
}

impl QdrantStore {
    /// Creates a client for `url`.
    pub fn new(url: &str) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn create_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        let vectors_config = VectorParamsBuilder::new(vector_size, Distance::Cosine);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(vectors_config)
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}

/// Minimal async interface the index manager needs from a vector store.
pub trait VectorStore: Send + Sync {
    /// Ensures a collection exists (creates it with cosine distance if missing).
    fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Upserts points.
    fn upsert_points(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
        consistency: WriteConsistency,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Returns up to `limit` nearest points, best first.
    fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, VectorDbError>> + Send;

    /// Exact number of points in the collection; 0 when it does not exist.
    fn count(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<u64, VectorDbError>> + Send;

    /// Drops the collection and its points. Missing collections are not an error.
    fn delete_collection(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;
}

impl VectorStore for QdrantStore {
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        let exists = self.client.collection_exists(name).await.map_err(|e| {
            VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            }
        })?;

        if !exists {
            debug!(collection = name, vector_size, "Creating collection");
            self.create_collection(name, vector_size).await?;
        }

        Ok(())
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
        consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        if points.is_empty() {
            return Ok(());
        }

        let qdrant_points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| {
                let payload = p.payload();
                PointStruct::new(p.id, p.vector, payload)
            })
            .collect();

        self.client
            .upsert_points(
                UpsertPointsBuilder::new(collection, qdrant_points).wait(consistency.into()),
            )
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchResult>, VectorDbError> {
        let search_builder = SearchPointsBuilder::new(collection, query, limit).with_payload(true);

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        search_result
            .result
            .into_iter()
            .map(SearchResult::from_scored_point)
            .collect()
    }

    async fn count(&self, collection: &str) -> Result<u64, VectorDbError> {
        let exists = self.client.collection_exists(collection).await.map_err(|e| {
            VectorDbError::CountFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            }
        })?;
        if !exists {
            return Ok(0);
        }

        let response = self
            .client
            .count(CountPointsBuilder::new(collection).exact(true))
            .await
            .map_err(|e| VectorDbError::CountFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }

    async fn delete_collection(&self, name: &str) -> Result<(), VectorDbError> {
        let delete_failed = |e: qdrant_client::QdrantError| VectorDbError::DeleteCollectionFailed {
            collection: name.to_string(),
            message: e.to_string(),
        };

        if !self.client.collection_exists(name).await.map_err(delete_failed)? {
            return Ok(());
        }

        debug!(collection = name, "Deleting collection");
        self.client
            .delete_collection(DeleteCollectionBuilder::new(name))
            .await
            .map_err(delete_failed)?;

        Ok(())
    }
}

impl<T: VectorStore> VectorStore for std::sync::Arc<T> {
    fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send {
        (**self).ensure_collection(name, vector_size)
    }

    fn upsert_points(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
        consistency: WriteConsistency,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send {
        (**self).upsert_points(collection, points, consistency)
    }

    fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, VectorDbError>> + Send {
        (**self).search(collection, query, limit)
    }

    fn count(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<u64, VectorDbError>> + Send {
        (**self).count(collection)
    }

    fn delete_collection(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send {
        (**self).delete_collection(name)
    }
}
