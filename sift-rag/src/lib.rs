//! Retrieval scoring and ranking for retrieval-augmented generation.
//!
//! This crate provides:
//! - Cosine distance scoring of candidate chunks against a query embedding
//! - Metadata filtering, top-k truncation, and MMR diversity re-ranking
//! - Async traits for embedding providers, vector stores, and rerankers
//! - An in-memory vector store and a [`Retriever`] that ties them together
//!
//! The scoring functions in [`scorer`] are pure and synchronous; everything
//! that talks to an external collaborator is async.

pub mod analysis;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod reranker;
pub mod retriever;
pub mod scorer;
pub mod similarity;
pub mod vectorstore;

pub use analysis::{RetrievalSummary, summarize};
pub use config::{RetrievalConfig, RetrievalConfigBuilder, SearchType};
pub use document::{
    Chunk, Document, Metadata, MetadataFilter, MetadataValue, Query, RelevanceTier, ScoredResult,
};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use reranker::{KeywordBoostReranker, NoOpReranker, Reranker};
pub use retriever::{Retriever, RetrieverBuilder};
pub use scorer::{diversify, filter, rank, score, top_k, within_distance};
pub use similarity::{cosine_distance, cosine_similarity};
pub use vectorstore::VectorStore;
