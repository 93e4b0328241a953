//! Search request options

use crate::models::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Options for a keyword search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Free-text query; empty lists the (filtered) corpus
    pub query: String,

    /// Accept only these categories (empty = all)
    #[serde(default)]
    pub categories: BTreeSet<String>,

    /// Accept documents sharing at least one of these tags (empty = all)
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Enable edit-distance matching
    pub fuzzy: bool,

    /// Enable synonym expansion
    pub semantic: bool,

    /// Maximum number of results
    pub limit: usize,

    /// Minimum merged score
    pub min_score: f64,
}

impl SearchOptions {
    /// Create search options with the default strategy set
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            categories: BTreeSet::new(),
            tags: BTreeSet::new(),
            fuzzy: true,
            semantic: true,
            limit: 50,
            min_score: 0.1,
        }
    }

    /// Filter by categories
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Filter by tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fuzzy(mut self, enabled: bool) -> Self {
        self.fuzzy = enabled;
        self
    }

    pub fn with_semantic(mut self, enabled: bool) -> Self {
        self.semantic = enabled;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Whether `document` passes the category and tag filters
    pub fn accepts(&self, document: &Document) -> bool {
        let category_ok = self.categories.is_empty()
            || self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&document.category));

        let tags_ok = self.tags.is_empty()
            || document
                .tags
                .iter()
                .any(|tag| self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)));

        category_ok && tags_ok
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new("")
    }
}

/// Options for an AI-assisted search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticSearchOptions {
    pub query: String,

    /// Search these documents instead of the engine's corpus
    #[serde(default)]
    pub items: Option<Vec<Document>>,

    /// Call the completion provider
    pub use_ai: bool,

    /// Include recent queries in the prompt
    pub contextual: bool,

    /// Re-sort by the model's judgment
    pub rerank: bool,

    pub limit: usize,

    /// Drop AI-judged results below this confidence
    pub min_confidence: f64,
}

impl SemanticSearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            items: None,
            use_ai: true,
            contextual: true,
            rerank: true,
            limit: 10,
            min_confidence: 0.3,
        }
    }

    pub fn with_items(mut self, items: Vec<Document>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_ai(mut self, enabled: bool) -> Self {
        self.use_ai = enabled;
        self
    }

    pub fn with_contextual(mut self, enabled: bool) -> Self {
        self.contextual = enabled;
        self
    }

    pub fn with_rerank(mut self, enabled: bool) -> Self {
        self.rerank = enabled;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SearchOptions::new("pagi");
        assert!(options.fuzzy && options.semantic);
        assert_eq!(options.limit, 50);
        assert_eq!(options.min_score, 0.1);

        let semantic = SemanticSearchOptions::new("makan");
        assert!(semantic.use_ai && semantic.contextual && semantic.rerank);
        assert_eq!(semantic.limit, 10);
        assert_eq!(semantic.min_confidence, 0.3);
    }

    #[test]
    fn test_empty_filters_accept_everything() {
        let doc = Document::new("1", "Doa Pagi", "Harian");
        assert!(SearchOptions::new("").accepts(&doc));
    }

    #[test]
    fn test_category_filter() {
        let doc = Document::new("1", "Doa Pagi", "Harian");
        assert!(SearchOptions::new("").with_categories(["harian"]).accepts(&doc));
        assert!(!SearchOptions::new("").with_categories(["Safar"]).accepts(&doc));
    }

    #[test]
    fn test_tag_filter_requires_overlap() {
        let doc = Document::new("1", "Doa Pagi", "Harian").with_tags(["pagi", "dzikir"]);
        assert!(SearchOptions::new("").with_tags(["dzikir", "malam"]).accepts(&doc));
        assert!(!SearchOptions::new("").with_tags(["malam"]).accepts(&doc));
    }
}
