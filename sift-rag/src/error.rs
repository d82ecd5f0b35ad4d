//! Error types for the `sift-rag` crate.

use thiserror::Error;

/// Errors that can occur while scoring, storing, or retrieving chunks.
#[derive(Debug, Error)]
pub enum RagError {
    /// Two vectors compared together have different lengths.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimensionality of the reference vector (query or collection).
        expected: usize,
        /// The dimensionality of the offending vector.
        actual: usize,
    },

    /// A scorer argument is out of range (`k`, `fetch_k`, `lambda`).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during result reranking.
    #[error("Reranker error ({reranker}): {message}")]
    RerankerError {
        /// The reranker that produced the error.
        reranker: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the retrieval orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),

    /// Reading a configuration or corpus file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration or corpus file is not valid JSON for the expected shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
