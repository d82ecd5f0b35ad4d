//! In-memory vector store using cosine distance.
//!
//! This module provides [`InMemoryVectorStore`], a vector store backed by a
//! `HashMap` protected by a `tokio::sync::RwLock`. It scores with the
//! functions in [`scorer`](crate::scorer) and is suitable for development,
//! testing, and small corpora.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{Chunk, Query, ScoredResult};
use crate::error::{RagError, Result};
use crate::scorer;
use crate::vectorstore::VectorStore;

const BACKEND: &str = "InMemory";

/// Chunks of one collection, kept in insertion order.
#[derive(Debug)]
struct Collection {
    dimensions: usize,
    chunks: Vec<Chunk>,
    /// Chunk id to its position in `chunks`.
    index: HashMap<String, usize>,
}

impl Collection {
    fn new(dimensions: usize) -> Self {
        Self { dimensions, chunks: Vec::new(), index: HashMap::new() }
    }

    fn upsert(&mut self, chunk: &Chunk) {
        match self.index.get(&chunk.id) {
            Some(&pos) => self.chunks[pos] = chunk.clone(),
            None => {
                self.index.insert(chunk.id.clone(), self.chunks.len());
                self.chunks.push(chunk.clone());
            }
        }
    }

    fn remove(&mut self, ids: &[&str]) {
        let ids: HashSet<&str> = ids.iter().copied().collect();
        let before = self.chunks.len();
        self.chunks.retain(|c| !ids.contains(c.id.as_str()));
        if self.chunks.len() != before {
            self.index =
                self.chunks.iter().enumerate().map(|(pos, c)| (c.id.clone(), pos)).collect();
        }
    }
}

/// An in-memory vector store using cosine distance for search.
///
/// Collections map a name to chunks kept in insertion order, so equal
/// distances always come back in the order the chunks were first stored.
/// Upserting an existing id replaces the chunk in place.
///
/// # Example
///
/// ```rust,ignore
/// use sift_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("docs", 384).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing(collection: &str) -> RagError {
    RagError::VectorStoreError {
        backend: BACKEND.to_string(),
        message: format!("collection '{collection}' does not exist"),
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.entry(name.to_string()).or_insert_with(|| Collection::new(dimensions));
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(name);
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections.get_mut(collection).ok_or_else(|| missing(collection))?;

        // Validate the whole batch before touching the collection.
        if let Some(bad) = chunks.iter().find(|c| c.embedding.len() != store.dimensions) {
            return Err(RagError::DimensionMismatch {
                expected: store.dimensions,
                actual: bad.embedding.len(),
            });
        }

        for chunk in chunks {
            store.upsert(chunk);
        }
        debug!(collection, upserted = chunks.len(), total = store.chunks.len(), "upserted chunks");
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections.get_mut(collection).ok_or_else(|| missing(collection))?;
        store.remove(ids);
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        let store = collections.get(collection).ok_or_else(|| missing(collection))?;
        Ok(store.chunks.len())
    }

    async fn search(
        &self,
        collection: &str,
        query: &Query,
        limit: usize,
    ) -> Result<Vec<ScoredResult>> {
        let candidates = {
            let collections = self.collections.read().await;
            let store = collections.get(collection).ok_or_else(|| missing(collection))?;
            if query.embedding.len() != store.dimensions {
                return Err(RagError::DimensionMismatch {
                    expected: store.dimensions,
                    actual: query.embedding.len(),
                });
            }
            store
                .chunks
                .iter()
                .filter(|c| scorer::matches_filter(c, &query.filter))
                .cloned()
                .collect::<Vec<_>>()
        };

        let scored = scorer::score(&query.embedding, candidates)?;
        scorer::top_k(scored, limit)
    }
}
