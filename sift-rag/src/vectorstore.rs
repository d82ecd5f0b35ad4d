//! Vector store trait for persisting chunks and fetching candidates.

use async_trait::async_trait;

use crate::document::{Chunk, Query, ScoredResult};
use crate::error::Result;

/// A storage backend for embedded chunks with nearest-neighbor search.
///
/// Implementations manage named collections of [`Chunk`]s. Each collection
/// has a fixed dimensionality chosen at creation time.
///
/// # Example
///
/// ```rust,ignore
/// use sift_rag::{InMemoryVectorStore, Query, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("policies", 384).await?;
/// store.upsert("policies", &chunks).await?;
/// let candidates = store.search("policies", &Query::new(embedding), 20).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection. No-op if it already exists.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Delete a named collection and all its data.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Upsert chunks into a collection.
    ///
    /// Chunks whose embedding length differs from the collection's
    /// dimensionality are rejected with
    /// [`RagError::DimensionMismatch`](crate::RagError::DimensionMismatch).
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Delete chunks by their IDs from a collection.
    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()>;

    /// Number of chunks stored in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;

    /// Return at most `limit` chunks matching `query.filter`, nearest first.
    ///
    /// Results are ordered by ascending cosine distance with zero-based ranks.
    async fn search(
        &self,
        collection: &str,
        query: &Query,
        limit: usize,
    ) -> Result<Vec<ScoredResult>>;
}
