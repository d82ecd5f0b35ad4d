//! Reranker trait for reordering retrieved results.

use async_trait::async_trait;

use crate::document::ScoredResult;
use crate::error::Result;

/// A reranker that reorders retrieved results.
///
/// Implementations can use cross-encoder models, keyword boosts, or other
/// signals beyond embedding distance. The retriever renumbers `rank` after
/// reranking, so implementations only need to return the new order.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Rerank results given the original query text.
    async fn rerank(&self, query: &str, results: Vec<ScoredResult>) -> Result<Vec<ScoredResult>>;
}

/// A no-op reranker that returns results unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReranker;

#[async_trait]
impl Reranker for NoOpReranker {
    async fn rerank(&self, _query: &str, results: Vec<ScoredResult>) -> Result<Vec<ScoredResult>> {
        Ok(results)
    }
}

/// Moves results whose text contains query keywords closer to the query.
///
/// Each query word longer than three characters that occurs in a chunk's text
/// (case-insensitive) lowers that result's distance by `boost`, floored at 0.
/// Results are then re-sorted by ascending distance; ties keep their order.
#[derive(Debug, Clone, Copy)]
pub struct KeywordBoostReranker {
    boost: f32,
}

impl KeywordBoostReranker {
    /// Create a reranker that subtracts `boost` from the distance per keyword hit.
    pub fn new(boost: f32) -> Self {
        Self { boost }
    }
}

#[async_trait]
impl Reranker for KeywordBoostReranker {
    async fn rerank(
        &self,
        query: &str,
        mut results: Vec<ScoredResult>,
    ) -> Result<Vec<ScoredResult>> {
        let keywords: Vec<String> = query
            .split_whitespace()
            .filter(|w| w.chars().count() > 3)
            .map(str::to_lowercase)
            .collect();

        for r in &mut results {
            let text = r.chunk.text.to_lowercase();
            let hits = keywords.iter().filter(|kw| text.contains(kw.as_str())).count();
            r.distance = (r.distance - hits as f32 * self.boost).max(0.0);
        }
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(results)
    }
}
