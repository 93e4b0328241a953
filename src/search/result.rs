//! Result types returned by the engine

use crate::models::Document;
use crate::search::document::MatchedField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A highlighted field excerpt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightSnippet {
    /// Field the snippet was taken from
    pub field: MatchedField,

    /// Field text with matched tokens wrapped in the highlight tag
    pub text: String,
}

/// A single ranked search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub document: Document,

    /// Merged relevance score, never negative
    pub score: f64,

    /// Fields and strategies that contributed to the score
    pub matched_fields: BTreeSet<MatchedField>,

    pub highlight_snippets: Vec<HighlightSnippet>,
}

/// A search hit annotated with the language model's judgment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSearchResult {
    #[serde(flatten)]
    pub result: SearchResult,

    /// Model relevance (0-10), or the original score when the model was silent
    pub ai_score: f64,

    pub ai_reason: String,

    pub semantic_matches: Vec<String>,

    /// Certainty in [0, 1]
    pub confidence: f64,
}

impl AiSearchResult {
    /// Wrap a keyword result without a model judgment
    pub fn unjudged(result: SearchResult, confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            ai_score: result.score,
            ai_reason: reason.into(),
            semantic_matches: Vec::new(),
            confidence,
            result,
        }
    }

    /// Ranking key in AI mode
    pub fn weighted_score(&self) -> f64 {
        self.ai_score * self.confidence
    }

    pub fn document(&self) -> &Document {
        &self.result.document
    }
}
