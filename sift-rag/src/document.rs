//! Data types for documents, chunks, queries, and scored results.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar metadata value attached to a chunk.
///
/// Metadata is restricted to strings, numbers, and booleans. Nested values
/// and `null` are rejected when a chunk is deserialized, so filters never
/// meet them at query time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetadataValue {
    /// A boolean flag.
    Bool(bool),
    /// A numeric value such as a page number.
    Number(f64),
    /// A string value such as a source path.
    String(String),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Key-value metadata carried by documents and chunks.
pub type Metadata = HashMap<String, MetadataValue>;

/// Required metadata values; a chunk matches when every entry is present and equal.
pub type MetadataFilter = HashMap<String, MetadataValue>;

/// A source document handed to the retriever for ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier, reused as the chunk id.
    pub id: String,
    /// The text content to embed.
    pub text: String,
    /// Key-value metadata copied onto the stored chunk.
    #[serde(default)]
    pub metadata: Metadata,
}

/// A unit of text with its vector embedding and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    #[serde(alias = "vector")]
    pub embedding: Vec<f32>,
    /// Key-value metadata such as `source` or `page`.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Chunk {
    /// Create a chunk with no metadata.
    pub fn new(id: impl Into<String>, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self { id: id.into(), text: text.into(), embedding, metadata: Metadata::new() }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A query embedding with an optional metadata filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Query {
    /// The query vector; must match the dimensionality of the candidates.
    #[serde(alias = "vector")]
    pub embedding: Vec<f32>,
    /// Metadata constraints. Empty means no filtering.
    #[serde(default)]
    pub filter: MetadataFilter,
}

impl Query {
    /// Create an unfiltered query.
    pub fn new(embedding: Vec<f32>) -> Self {
        Self { embedding, filter: MetadataFilter::new() }
    }

    /// Require `key` to equal `value` on every returned chunk.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }
}

/// Coarse relevance label derived from a cosine distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelevanceTier {
    /// Distance at most 0.6.
    High,
    /// Distance in (0.6, 0.8].
    Medium,
    /// Distance above 0.8.
    Low,
}

impl RelevanceTier {
    /// Classify a cosine distance.
    pub fn from_distance(distance: f32) -> Self {
        if distance > 0.8 {
            Self::Low
        } else if distance > 0.6 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

impl fmt::Display for RelevanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(label)
    }
}

/// A retrieved [`Chunk`] paired with its distance to the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine distance to the query in `[0, 2]` (lower is more similar).
    pub distance: f32,
    /// Zero-based position in the returned ordering.
    pub rank: usize,
}

impl ScoredResult {
    /// Cosine similarity to the query, `1 - distance`.
    pub fn relevance(&self) -> f32 {
        1.0 - self.distance
    }

    /// Relevance label for display.
    pub fn tier(&self) -> RelevanceTier {
        RelevanceTier::from_distance(self.distance)
    }

    /// The first `max_chars` characters of the chunk text on a single line.
    pub fn preview(&self, max_chars: usize) -> String {
        self.chunk
            .text
            .chars()
            .take(max_chars)
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect()
    }
}

/// Reassign `rank` to match the current order of `results`.
pub(crate) fn assign_ranks(results: &mut [ScoredResult]) {
    for (rank, result) in results.iter_mut().enumerate() {
        result.rank = rank;
    }
}
