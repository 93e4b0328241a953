//! Autocomplete over titles, categories, tags and keyword tables

use crate::search::fuzzy;
use crate::search::index::SearchIndex;
use crate::search::synonyms::SynonymTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::Display;

/// Shortest partial query that produces suggestions
pub const MIN_PARTIAL_LEN: usize = 2;

const PREFIX_SCORE: f64 = 1.0;
const CONTAINS_SCORE: f64 = 0.8;
const FUZZY_THRESHOLD: f64 = 0.7;

/// Where a suggestion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SuggestionKind {
    Query,
    Category,
    Tag,
    Prayer,
}

/// A single autocomplete entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,

    #[serde(rename = "type")]
    pub kind: SuggestionKind,

    pub score: f64,
}

/// 1.0 for a prefix match, 0.8 for a substring match, otherwise the best
/// word-level fuzzy similarity if it clears the threshold
fn score_candidate(candidate: &str, partial: &str, allow_fuzzy: bool) -> Option<f64> {
    let lowered = candidate.to_lowercase();
    if lowered.starts_with(partial) {
        return Some(PREFIX_SCORE);
    }
    if lowered.contains(partial) {
        return Some(CONTAINS_SCORE);
    }
    if !allow_fuzzy {
        return None;
    }
    lowered
        .split_whitespace()
        .filter_map(|word| fuzzy::similarity_above(word, partial, FUZZY_THRESHOLD))
        .reduce(f64::max)
}

/// Suggestions for `partial`, best first.
///
/// `popular` holds previously issued queries (most frequent first) and is
/// offered as `query` suggestions alongside the static keyword table.
pub fn suggest(index: &SearchIndex, partial: &str, limit: usize, popular: &[String]) -> Vec<Suggestion> {
    let partial = partial.trim().to_lowercase();
    if partial.chars().count() < MIN_PARTIAL_LEN || limit == 0 {
        return Vec::new();
    }

    // lowercase text → best suggestion for it
    let mut best: HashMap<String, Suggestion> = HashMap::new();
    let mut offer = |text: &str, kind: SuggestionKind, allow_fuzzy: bool| {
        let Some(score) = score_candidate(text, &partial, allow_fuzzy) else {
            return;
        };
        let key = text.to_lowercase();
        let replace = best.get(&key).map_or(true, |current| score > current.score);
        if replace {
            best.insert(
                key,
                Suggestion {
                    text: text.to_string(),
                    kind,
                    score,
                },
            );
        }
    };

    for document in index.documents() {
        offer(&document.title, SuggestionKind::Prayer, false);
        if !document.category.is_empty() {
            offer(&document.category, SuggestionKind::Category, false);
        }
        for tag in &document.tags {
            offer(tag, SuggestionKind::Tag, false);
        }
    }

    for keyword in SynonymTable::global().keywords() {
        offer(keyword, SuggestionKind::Query, true);
    }
    for query in popular {
        offer(query, SuggestionKind::Query, false);
    }

    let mut suggestions: Vec<Suggestion> = best.into_values().collect();
    suggestions.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(b.kind.cmp(&a.kind))
            .then_with(|| a.text.cmp(&b.text))
    });
    suggestions.truncate(limit);
    suggestions
}
