//! Embedding provider trait for turning text into query and chunk vectors.

use async_trait::async_trait;

use crate::error::{RagError, Result};

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding model behind a unified async
/// interface. Every vector a provider returns must have
/// [`dimensions`](EmbeddingProvider::dimensions) entries; the retriever
/// rejects anything else with [`RagError::DimensionMismatch`].
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) sequentially; backends that support
/// native batching should override it.
///
/// # Example
///
/// ```rust,ignore
/// use sift_rag::EmbeddingProvider;
///
/// let provider = MyEmbeddingProvider::new();
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Short name used in logs and error messages.
    fn name(&self) -> &str {
        "embedding"
    }
}

/// Verify that `embedding` has the provider's advertised dimensionality.
pub(crate) fn ensure_dimensions(provider: &dyn EmbeddingProvider, embedding: &[f32]) -> Result<()> {
    let expected = provider.dimensions();
    if embedding.len() != expected {
        return Err(RagError::DimensionMismatch { expected, actual: embedding.len() });
    }
    Ok(())
}
