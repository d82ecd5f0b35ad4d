//! Cosine similarity and distance between embedding vectors.

use crate::error::{RagError, Result};

/// Compute cosine similarity between two vectors.
///
/// Accumulates in `f64` and clamps the result to `[-1, 1]`. Two zero-magnitude
/// vectors are identical (similarity 1.0); a zero vector against a non-zero
/// one has similarity 0.0.
///
/// # Errors
///
/// Returns [`RagError::DimensionMismatch`] if the vectors differ in length
/// (`a` is treated as the reference vector) and [`RagError::InvalidArgument`]
/// if either vector holds a NaN or infinite component.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RagError::DimensionMismatch { expected: a.len(), actual: b.len() });
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        if !x.is_finite() || !y.is_finite() {
            return Err(RagError::InvalidArgument(
                "embedding components must be finite".to_string(),
            ));
        }
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    match (norm_a == 0.0, norm_b == 0.0) {
        (true, true) => return Ok(1.0),
        (true, false) | (false, true) => return Ok(0.0),
        (false, false) => {}
    }
    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    Ok(similarity.clamp(-1.0, 1.0) as f32)
}

/// Compute cosine distance, `1 - cosine_similarity`, in `[0, 2]`.
///
/// # Errors
///
/// See [`cosine_similarity`].
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    cosine_similarity(a, b).map(|similarity| 1.0 - similarity)
}
