//! Retrieval orchestrator.
//!
//! The [`Retriever`] composes an [`EmbeddingProvider`], a [`VectorStore`],
//! and an optional [`Reranker`] around the pure functions in
//! [`scorer`](crate::scorer).
//!
//! # Example
//!
//! ```rust,ignore
//! use sift_rag::{InMemoryVectorStore, RetrievalConfig, Retriever, SearchType};
//!
//! let retriever = Retriever::builder()
//!     .config(RetrievalConfig::builder().search_type(SearchType::Mmr).top_k(3).build()?)
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! retriever.create_collection("policies").await?;
//! retriever.ingest("policies", &documents).await?;
//! let results = retriever.retrieve("policies", "vacation policy", &Default::default()).await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::analysis::{RetrievalSummary, summarize};
use crate::config::{RetrievalConfig, SearchType};
use crate::document::{Chunk, Document, MetadataFilter, Query, ScoredResult, assign_ranks};
use crate::embedding::{EmbeddingProvider, ensure_dimensions};
use crate::error::{RagError, Result};
use crate::reranker::Reranker;
use crate::scorer;
use crate::vectorstore::VectorStore;

/// The retrieval orchestrator.
///
/// Coordinates ingestion (embed → store) and retrieval (embed → fetch
/// candidates → top-k or MMR → threshold → rerank). Construct one via
/// [`Retriever::builder()`].
pub struct Retriever {
    config: RetrievalConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    reranker: Option<Arc<dyn Reranker>>,
}

impl Retriever {
    /// Create a new [`RetrieverBuilder`].
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// Return a reference to the retrieval configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Create a named collection sized for the embedding provider.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if the vector store operation fails.
    pub async fn create_collection(&self, name: &str) -> Result<()> {
        let dimensions = self.embedding_provider.dimensions();
        self.vector_store.create_collection(name, dimensions).await.map_err(|e| {
            error!(collection = name, error = %e, "failed to create collection");
            RagError::PipelineError(format!("failed to create collection '{name}': {e}"))
        })
    }

    /// Delete a named collection from the vector store.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if the vector store operation fails.
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        self.vector_store.delete_collection(name).await.map_err(|e| {
            error!(collection = name, error = %e, "failed to delete collection");
            RagError::PipelineError(format!("failed to delete collection '{name}': {e}"))
        })
    }

    /// Embed and store documents, one chunk per document.
    ///
    /// Returns the chunks that were stored.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if embedding or storage fails and
    /// [`RagError::DimensionMismatch`] if the provider returns a vector of the
    /// wrong length.
    pub async fn ingest(&self, collection: &str, documents: &[Document]) -> Result<Vec<Chunk>> {
        if documents.is_empty() {
            info!(collection, chunk_count = 0, "ingested documents (empty)");
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(collection, error = %e, "embedding failed during ingestion");
            RagError::PipelineError(format!(
                "{} embedding failed during ingestion: {e}",
                self.embedding_provider.name()
            ))
        })?;
        if embeddings.len() != documents.len() {
            return Err(RagError::PipelineError(format!(
                "embedding provider returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }

        let mut chunks = Vec::with_capacity(documents.len());
        for (document, embedding) in documents.iter().zip(embeddings) {
            ensure_dimensions(self.embedding_provider.as_ref(), &embedding)?;
            chunks.push(Chunk {
                id: document.id.clone(),
                text: document.text.clone(),
                embedding,
                metadata: document.metadata.clone(),
            });
        }

        self.vector_store.upsert(collection, &chunks).await.map_err(|e| {
            error!(collection, error = %e, "upsert failed during ingestion");
            RagError::PipelineError(format!("upsert failed in collection '{collection}': {e}"))
        })?;

        info!(collection, chunk_count = chunks.len(), "ingested documents");
        Ok(chunks)
    }

    /// Number of chunks stored in a collection.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if the vector store operation fails.
    pub async fn count(&self, collection: &str) -> Result<usize> {
        self.vector_store.count(collection).await.map_err(|e| {
            error!(collection, error = %e, "failed to count collection");
            RagError::PipelineError(format!("failed to count collection '{collection}': {e}"))
        })
    }

    /// Retrieve results for `query_text`, restricted to chunks matching `filter`.
    ///
    /// Returns results ordered as selected (ascending distance for similarity
    /// search, MMR selection order otherwise), after the distance threshold and
    /// reranker, with ranks renumbered from zero.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if embedding, search, or reranking
    /// fails, and propagates scorer errors unchanged.
    pub async fn retrieve(
        &self,
        collection: &str,
        query_text: &str,
        filter: &MetadataFilter,
    ) -> Result<Vec<ScoredResult>> {
        let query = Query { embedding: self.embed_query(query_text).await?, filter: filter.clone() };
        let candidates = self.fetch(collection, &query, self.config.candidate_limit()).await?;
        let fetched = candidates.len();

        let selected = match self.config.search_type {
            SearchType::Similarity => scorer::top_k(candidates, self.config.top_k)?,
            SearchType::Mmr => scorer::diversify(
                candidates,
                self.config.top_k,
                self.config.fetch_k,
                self.config.lambda_mult,
            )?,
        };
        let selected = match self.config.max_distance {
            Some(max) => scorer::within_distance(selected, max),
            None => selected,
        };

        let mut results = if let Some(reranker) = &self.reranker {
            reranker.rerank(query_text, selected).await.map_err(|e| {
                error!(error = %e, "reranking failed");
                RagError::PipelineError(format!("reranking failed: {e}"))
            })?
        } else {
            selected
        };
        assign_ranks(&mut results);

        info!(collection, fetched, result_count = results.len(), "retrieval completed");
        Ok(results)
    }

    /// Compare plain similarity retrieval across several `k` values.
    ///
    /// The query is embedded once. Each entry summarizes the distances returned
    /// for that `k`, or is `None` when nothing was retrieved.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidArgument`] if any `k` is zero and
    /// [`RagError::PipelineError`] if embedding or search fails.
    pub async fn analyze(
        &self,
        collection: &str,
        query_text: &str,
        k_values: &[usize],
    ) -> Result<Vec<(usize, Option<RetrievalSummary>)>> {
        if k_values.contains(&0) {
            return Err(RagError::InvalidArgument("k must be greater than zero".to_string()));
        }
        let query = Query::new(self.embed_query(query_text).await?);

        let mut summaries = Vec::with_capacity(k_values.len());
        for &k in k_values {
            let results = self.fetch(collection, &query, k).await?;
            summaries.push((k, summarize(k, &results)));
        }
        Ok(summaries)
    }

    async fn embed_query(&self, query_text: &str) -> Result<Vec<f32>> {
        let embedding = self.embedding_provider.embed(query_text).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::PipelineError(format!("query embedding failed: {e}"))
        })?;
        ensure_dimensions(self.embedding_provider.as_ref(), &embedding)?;
        Ok(embedding)
    }

    async fn fetch(&self, collection: &str, query: &Query, limit: usize) -> Result<Vec<ScoredResult>> {
        self.vector_store.search(collection, query, limit).await.map_err(|e| {
            error!(collection, error = %e, "vector store search failed");
            RagError::PipelineError(format!("search failed in collection '{collection}': {e}"))
        })
    }
}

/// Builder for constructing a [`Retriever`].
///
/// The embedding provider and vector store are required. The config defaults
/// to [`RetrievalConfig::default()`] and the reranker is optional.
#[derive(Default)]
pub struct RetrieverBuilder {
    config: Option<RetrievalConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    reranker: Option<Arc<dyn Reranker>>,
}

impl RetrieverBuilder {
    /// Set the retrieval configuration.
    pub fn config(mut self, config: RetrievalConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set an optional reranker applied after selection.
    pub fn reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Build the [`Retriever`], validating the config and required fields.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required field is missing or the
    /// config is invalid.
    pub fn build(self) -> Result<Retriever> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;

        Ok(Retriever { config, embedding_provider, vector_store, reranker: self.reranker })
    }
}
