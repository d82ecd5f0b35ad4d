//! Configuration for retrieval.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// How the final result set is chosen from the candidate pool.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    /// Plain top-k by ascending distance.
    #[default]
    Similarity,
    /// Maximal Marginal Relevance re-ranking over `fetch_k` candidates.
    Mmr,
}

/// Configuration parameters for retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Selection strategy.
    pub search_type: SearchType,
    /// Number of results to return.
    pub top_k: usize,
    /// Number of candidates fetched before MMR re-ranking.
    pub fetch_k: usize,
    /// MMR trade-off: 1.0 is pure relevance, 0.0 is pure diversity.
    pub lambda_mult: f32,
    /// Maximum cosine distance for results (results farther are dropped).
    pub max_distance: Option<f32>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            search_type: SearchType::Similarity,
            top_k: 4,
            fetch_k: 20,
            lambda_mult: 0.5,
            max_distance: None,
        }
    }
}

impl RetrievalConfig {
    /// Create a new builder for constructing a [`RetrievalConfig`].
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }

    /// Load a configuration from a JSON file and validate it.
    ///
    /// Fields missing from the file take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of candidates to request from a vector store.
    pub fn candidate_limit(&self) -> usize {
        match self.search_type {
            SearchType::Similarity => self.top_k,
            SearchType::Mmr => self.fetch_k,
        }
    }

    /// Check that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `top_k == 0`
    /// - `fetch_k < top_k`
    /// - `lambda_mult` is outside `[0, 1]`
    /// - `max_distance` is set and outside `[0, 2]`
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if self.fetch_k < self.top_k {
            return Err(RagError::ConfigError(format!(
                "fetch_k ({}) must be at least top_k ({})",
                self.fetch_k, self.top_k
            )));
        }
        if !(0.0..=1.0).contains(&self.lambda_mult) {
            return Err(RagError::ConfigError(format!(
                "lambda_mult ({}) must be within [0, 1]",
                self.lambda_mult
            )));
        }
        if let Some(max) = self.max_distance {
            if !(0.0..=2.0).contains(&max) {
                return Err(RagError::ConfigError(format!(
                    "max_distance ({max}) must be within [0, 2]"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Set the selection strategy.
    pub fn search_type(mut self, search_type: SearchType) -> Self {
        self.config.search_type = search_type;
        self
    }

    /// Set the number of results to return.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the number of candidates fetched before MMR re-ranking.
    pub fn fetch_k(mut self, fetch_k: usize) -> Self {
        self.config.fetch_k = fetch_k;
        self
    }

    /// Set the MMR relevance/diversity trade-off.
    pub fn lambda_mult(mut self, lambda: f32) -> Self {
        self.config.lambda_mult = lambda;
        self
    }

    /// Set the maximum cosine distance for returned results.
    pub fn max_distance(mut self, max_distance: f32) -> Self {
        self.config.max_distance = Some(max_distance);
        self
    }

    /// Build the [`RetrievalConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// See [`RetrievalConfig::validate`].
    pub fn build(self) -> Result<RetrievalConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
