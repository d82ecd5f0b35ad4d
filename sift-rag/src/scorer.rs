//! Ranking of candidate chunks against a query embedding.
//!
//! Every function here is pure and synchronous: no I/O, no shared state, and
//! the same input always produces the same output. Candidate pools come from a
//! [`VectorStore`](crate::vectorstore::VectorStore) or any other source of
//! pre-embedded [`Chunk`]s.
//!
//! # Example
//!
//! ```rust,ignore
//! use sift_rag::scorer;
//!
//! let scored = scorer::score(&query_embedding, candidates)?;
//! let top = scorer::top_k(scored.clone(), 3)?;
//! let diverse = scorer::diversify(scored, 3, 10, 0.5)?;
//! ```

use tracing::debug;

use crate::config::{RetrievalConfig, SearchType};
use crate::document::{Chunk, MetadataFilter, Query, ScoredResult, assign_ranks};
use crate::error::{RagError, Result};
use crate::similarity::{cosine_distance, cosine_similarity};

/// Score every candidate by cosine distance to `query`.
///
/// Results are sorted ascending by distance. Equal distances keep the
/// candidates' input order.
///
/// # Errors
///
/// Returns [`RagError::DimensionMismatch`] if any candidate's embedding length
/// differs from the query's, and [`RagError::InvalidArgument`] if the query or
/// a candidate holds a NaN or infinite component.
pub fn score(query: &[f32], candidates: Vec<Chunk>) -> Result<Vec<ScoredResult>> {
    let mut scored = candidates
        .into_iter()
        .map(|chunk| -> Result<ScoredResult> {
            let distance = cosine_distance(query, &chunk.embedding)?;
            Ok(ScoredResult { chunk, distance, rank: 0 })
        })
        .collect::<Result<Vec<_>>>()?;

    // `sort_by` is stable, which keeps ties in insertion order.
    scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    assign_ranks(&mut scored);
    Ok(scored)
}

/// Keep candidates whose metadata holds an equal value for every filter key.
///
/// An empty filter returns the input unchanged.
pub fn filter(candidates: Vec<Chunk>, filter_map: &MetadataFilter) -> Vec<Chunk> {
    if filter_map.is_empty() {
        return candidates;
    }
    candidates.into_iter().filter(|chunk| matches_filter(chunk, filter_map)).collect()
}

/// Whether `chunk` satisfies every entry of `filter_map`.
pub fn matches_filter(chunk: &Chunk, filter_map: &MetadataFilter) -> bool {
    filter_map.iter().all(|(key, expected)| chunk.metadata.get(key) == Some(expected))
}

/// Take the first `min(k, len)` results, preserving their order.
///
/// # Errors
///
/// Returns [`RagError::InvalidArgument`] if `k == 0`.
pub fn top_k(mut scored: Vec<ScoredResult>, k: usize) -> Result<Vec<ScoredResult>> {
    if k == 0 {
        return Err(RagError::InvalidArgument("k must be greater than zero".to_string()));
    }
    scored.truncate(k);
    Ok(scored)
}

/// Re-rank with Maximal Marginal Relevance.
///
/// Only the first `fetch_k` entries of `scored` are considered, so `scored`
/// should already be ordered by ascending distance (as [`score`] returns it).
/// The closest entry is selected first; after that each step picks the entry
/// maximizing `lambda * relevance - (1 - lambda) * max_similarity_to_selected`.
/// Ties go to the earlier entry. Later entries repeating a chunk id are
/// ignored.
///
/// # Errors
///
/// Returns [`RagError::InvalidArgument`] if `k == 0`, `fetch_k < k`, or
/// `lambda` is outside `[0, 1]` or a pooled embedding is not finite, and
/// [`RagError::DimensionMismatch`] if two pooled chunks have embeddings of
/// different lengths.
pub fn diversify(
    scored: Vec<ScoredResult>,
    k: usize,
    fetch_k: usize,
    lambda: f32,
) -> Result<Vec<ScoredResult>> {
    if k == 0 {
        return Err(RagError::InvalidArgument("k must be greater than zero".to_string()));
    }
    if fetch_k < k {
        return Err(RagError::InvalidArgument(format!(
            "fetch_k ({fetch_k}) must be at least k ({k})"
        )));
    }
    if !(0.0..=1.0).contains(&lambda) {
        return Err(RagError::InvalidArgument(format!("lambda ({lambda}) must be within [0, 1]")));
    }

    let mut pool: Vec<ScoredResult> = Vec::with_capacity(fetch_k.min(scored.len()));
    for result in scored.into_iter().take(fetch_k) {
        if !pool.iter().any(|p| p.chunk.id == result.chunk.id) {
            pool.push(result);
        }
    }
    let target = k.min(pool.len());

    // max_sim[i]: highest similarity of pool[i] to any selected entry.
    let mut max_sim = vec![f32::NEG_INFINITY; pool.len()];
    let mut taken = vec![false; pool.len()];
    let mut order = Vec::with_capacity(target);

    while order.len() < target {
        let next = if order.is_empty() {
            closest(&pool)
        } else {
            let mut best: Option<(usize, f32)> = None;
            for (i, candidate) in pool.iter().enumerate() {
                if taken[i] {
                    continue;
                }
                let mmr = lambda * candidate.relevance() - (1.0 - lambda) * max_sim[i];
                if best.is_none_or(|(_, best_mmr)| mmr > best_mmr) {
                    best = Some((i, mmr));
                }
            }
            best.map(|(i, _)| i)
        };
        let Some(selected) = next else { break };

        taken[selected] = true;
        order.push(selected);
        for i in 0..pool.len() {
            if taken[i] {
                continue;
            }
            let sim = cosine_similarity(&pool[selected].chunk.embedding, &pool[i].chunk.embedding)?;
            if sim > max_sim[i] {
                max_sim[i] = sim;
            }
        }
    }

    debug!(pool = pool.len(), selected = order.len(), lambda, "mmr selection complete");

    let mut slots: Vec<Option<ScoredResult>> = pool.into_iter().map(Some).collect();
    let mut selected: Vec<ScoredResult> =
        order.into_iter().filter_map(|i| slots[i].take()).collect();
    assign_ranks(&mut selected);
    Ok(selected)
}

/// Index of the lowest-distance entry, first on ties.
fn closest(pool: &[ScoredResult]) -> Option<usize> {
    pool.iter()
        .enumerate()
        .min_by(|(ia, a), (ib, b)| a.distance.total_cmp(&b.distance).then(ia.cmp(ib)))
        .map(|(i, _)| i)
}

/// Drop results farther than `max_distance` and renumber the rest.
pub fn within_distance(scored: Vec<ScoredResult>, max_distance: f32) -> Vec<ScoredResult> {
    let mut kept: Vec<ScoredResult> =
        scored.into_iter().filter(|r| r.distance <= max_distance).collect();
    assign_ranks(&mut kept);
    kept
}

/// Apply the full ranking flow for `query` over `candidates`.
///
/// Filters by `query.filter`, scores, then selects with top-k or MMR as the
/// config says, and finally applies the distance threshold if one is set.
///
/// # Errors
///
/// Propagates errors from [`score`], [`top_k`], and [`diversify`].
pub fn rank(
    query: &Query,
    candidates: Vec<Chunk>,
    config: &RetrievalConfig,
) -> Result<Vec<ScoredResult>> {
    let total = candidates.len();
    let candidates = filter(candidates, &query.filter);
    let kept = candidates.len();
    let scored = score(&query.embedding, candidates)?;

    let selected = match config.search_type {
        SearchType::Similarity => top_k(scored, config.top_k)?,
        SearchType::Mmr => diversify(scored, config.top_k, config.fetch_k, config.lambda_mult)?,
    };
    let results = match config.max_distance {
        Some(max) => within_distance(selected, max),
        None => selected,
    };

    debug!(
        candidates = total,
        after_filter = kept,
        returned = results.len(),
        search_type = ?config.search_type,
        "ranked candidates"
    );
    Ok(results)
}
