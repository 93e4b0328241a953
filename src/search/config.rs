//! Search configuration

use crate::search::query::SearchOptions;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Retrieval and scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchConfig {
    /// Result limit used when the caller does not pick one
    #[serde(default = "default_limit")]
    #[validate(range(min = 1))]
    pub default_limit: usize,

    /// Candidates scoring below this are dropped
    #[serde(default = "default_min_score")]
    #[validate(range(min = 0.0))]
    pub min_score: f64,

    /// Similarity a vocabulary token must exceed to count as a fuzzy hit
    #[serde(default = "default_fuzzy_threshold")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub fuzzy_threshold: f64,

    /// Multiplier applied to field weights for synonym hits
    #[serde(default = "default_semantic_factor")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub semantic_factor: f64,

    /// Multiplier applied to field weights for fuzzy hits
    #[serde(default = "default_fuzzy_factor")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub fuzzy_factor: f64,

    /// HTML tag wrapped around highlighted tokens
    #[serde(default = "default_highlight_tag")]
    #[validate(length(min = 1))]
    pub highlight_tag: String,
}

impl SearchConfig {
    /// Search options for `query` seeded from this configuration
    pub fn options(&self, query: impl Into<String>) -> SearchOptions {
        SearchOptions::new(query)
            .with_limit(self.default_limit)
            .with_min_score(self.min_score)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            min_score: default_min_score(),
            fuzzy_threshold: default_fuzzy_threshold(),
            semantic_factor: default_semantic_factor(),
            fuzzy_factor: default_fuzzy_factor(),
            highlight_tag: default_highlight_tag(),
        }
    }
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn default_limit(mut self, limit: usize) -> Self {
        self.config.default_limit = limit;
        self
    }

    pub fn min_score(mut self, score: f64) -> Self {
        self.config.min_score = score;
        self
    }

    pub fn fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.config.fuzzy_threshold = threshold;
        self
    }

    pub fn semantic_factor(mut self, factor: f64) -> Self {
        self.config.semantic_factor = factor;
        self
    }

    pub fn fuzzy_factor(mut self, factor: f64) -> Self {
        self.config.fuzzy_factor = factor;
        self
    }

    pub fn highlight_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.highlight_tag = tag.into();
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_limit() -> usize {
    50
}

fn default_min_score() -> f64 {
    0.1
}

fn default_fuzzy_threshold() -> f64 {
    0.7
}

fn default_semantic_factor() -> f64 {
    0.7
}

fn default_fuzzy_factor() -> f64 {
    0.5
}

fn default_highlight_tag() -> String {
    "mark".to_string()
}
