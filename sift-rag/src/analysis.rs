//! Summary statistics for comparing retrieval depth.

use serde::{Deserialize, Serialize};

use crate::document::ScoredResult;

/// Distance statistics for one retrieval run at a given `k`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalSummary {
    /// The requested number of results.
    pub k: usize,
    /// The number of results actually returned.
    pub count: usize,
    /// Mean distance over the returned results.
    pub mean_distance: f32,
    /// Distance of the first (closest) result.
    pub best_distance: f32,
    /// Distance of the last result.
    pub worst_distance: f32,
}

/// Summarize `results` retrieved with `k`. Returns `None` when nothing was retrieved.
pub fn summarize(k: usize, results: &[ScoredResult]) -> Option<RetrievalSummary> {
    let first = results.first()?;
    let last = results.last()?;
    let total: f32 = results.iter().map(|r| r.distance).sum();
    Some(RetrievalSummary {
        k,
        count: results.len(),
        mean_distance: total / results.len() as f32,
        best_distance: first.distance,
        worst_distance: last.distance,
    })
}
