//! Candidate filtering, ranking and highlighting

use crate::search::document::{Field, MatchedField};
use crate::search::index::SearchIndex;
use crate::search::query::SearchOptions;
use crate::search::result::{HighlightSnippet, SearchResult};
use crate::search::retriever::CandidateMap;
use crate::search::tokenizer::is_token_char;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Fields that receive highlight snippets
const HIGHLIGHT_FIELDS: [Field; 2] = [Field::Title, Field::Translation];

/// Descending by score. Used with stable sorts, so equal scores keep
/// corpus order.
pub fn by_score_desc(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score.total_cmp(&a.score)
}

/// Filter, threshold, sort, truncate and highlight merged candidates
pub fn assemble(
    index: &SearchIndex,
    candidates: CandidateMap,
    options: &SearchOptions,
    highlighter: &Highlighter,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = candidates
        .into_iter()
        .filter(|(_, candidate)| candidate.score >= options.min_score)
        .filter_map(|(doc_index, candidate)| {
            let document = index.document(doc_index)?;
            options.accepts(document).then(|| SearchResult {
                document: document.clone(),
                score: candidate.score.max(0.0),
                matched_fields: candidate.matched_fields,
                highlight_snippets: Vec::new(),
            })
        })
        .collect();

    results.sort_by(by_score_desc);
    results.truncate(options.limit);

    for result in &mut results {
        result.highlight_snippets = highlighter.snippets(result);
    }

    results
}

/// Result set for an empty query: the first `limit` accepted documents,
/// each scored 1
pub fn list_all(index: &SearchIndex, options: &SearchOptions) -> Vec<SearchResult> {
    index
        .documents()
        .iter()
        .filter(|doc| options.accepts(doc))
        .take(options.limit)
        .map(|doc| SearchResult {
            document: doc.clone(),
            score: 1.0,
            matched_fields: BTreeSet::new(),
            highlight_snippets: Vec::new(),
        })
        .collect()
}

/// Wraps whole-word, case-insensitive occurrences of query tokens in a tag
pub struct Highlighter {
    pattern: Option<Regex>,
    open: String,
    close: String,
}

impl Highlighter {
    pub fn new(query_tokens: &[String], tag: &str) -> Self {
        let mut tokens: Vec<&str> = query_tokens.iter().map(String::as_str).collect();
        // Prefer the longest alternative at each position
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        tokens.dedup();

        let pattern = if tokens.is_empty() {
            None
        } else {
            let alternation = tokens
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            match Regex::new(&format!(r"(?i)(?:{})", alternation)) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to build highlight pattern");
                    None
                }
            }
        };

        Self {
            pattern,
            open: format!("<{}>", tag),
            close: format!("</{}>", tag),
        }
    }

    /// Highlighted copy of `text`, or `None` when nothing matched.
    ///
    /// A match counts only when it is not flanked by token characters, so
    /// tokens ending in Arabic-block punctuation still highlight.
    pub fn highlight(&self, text: &str) -> Option<String> {
        let pattern = self.pattern.as_ref()?;

        let mut highlighted = String::with_capacity(text.len());
        let mut copied = 0;
        let mut matched = false;
        for found in pattern.find_iter(text) {
            let before = text[..found.start()].chars().next_back();
            let after = text[found.end()..].chars().next();
            if before.is_some_and(is_token_char) || after.is_some_and(is_token_char) {
                continue;
            }

            highlighted.push_str(&text[copied..found.start()]);
            highlighted.push_str(&self.open);
            highlighted.push_str(found.as_str());
            highlighted.push_str(&self.close);
            copied = found.end();
            matched = true;
        }

        if !matched {
            return None;
        }
        highlighted.push_str(&text[copied..]);
        Some(highlighted)
    }

    fn snippets(&self, result: &SearchResult) -> Vec<HighlightSnippet> {
        HIGHLIGHT_FIELDS
            .iter()
            .filter_map(|field| {
                self.highlight(&field.text(&result.document))
                    .map(|text| HighlightSnippet {
                        field: MatchedField::from(*field),
                        text,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use crate::search::retriever::Candidate;

    fn index() -> SearchIndex {
        SearchIndex::build(vec![
            Document::new("1", "Doa Pagi", "Harian"),
            Document::new("2", "Doa Tidur", "Harian").with_tags(["malam"]),
            Document::new("3", "Doa Safar", "Perjalanan"),
        ])
    }

    fn candidate(score: f64) -> Candidate {
        Candidate {
            score,
            matched_fields: BTreeSet::from([MatchedField::Title]),
        }
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let candidates = CandidateMap::from([(0, candidate(1.0)), (1, candidate(2.0)), (2, candidate(1.0))]);
        let results = assemble(&index(), candidates, &SearchOptions::new("x"), &Highlighter::new(&[], "mark"));

        let ids: Vec<&str> = results.iter().map(|r| r.document.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_min_score_and_limit() {
        let candidates = CandidateMap::from([(0, candidate(0.05)), (1, candidate(2.0)), (2, candidate(1.0))]);
        let options = SearchOptions::new("x").with_limit(1);
        let results = assemble(&index(), candidates, &options, &Highlighter::new(&[], "mark"));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.id, "2");
    }

    #[test]
    fn test_filters_applied_before_truncation() {
        let candidates = CandidateMap::from([(0, candidate(3.0)), (2, candidate(1.0))]);
        let options = SearchOptions::new("x").with_categories(["Perjalanan"]).with_limit(1);
        let results = assemble(&index(), candidates, &options, &Highlighter::new(&[], "mark"));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.id, "3");
    }

    #[test]
    fn test_list_all_scores_one() {
        let options = SearchOptions::new("").with_tags(["malam"]);
        let results = list_all(&index(), &options);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 1.0);
    }

    #[test]
    fn test_highlight_whole_words_case_insensitive() {
        let highlighter = Highlighter::new(&["pagi".to_string()], "mark");

        assert_eq!(
            highlighter.highlight("Doa Pagi dan pagi hari").as_deref(),
            Some("Doa <mark>Pagi</mark> dan <mark>pagi</mark> hari")
        );
        assert_eq!(highlighter.highlight("pagipagi"), None);
    }

    #[test]
    fn test_highlight_token_ending_in_arabic_comma() {
        let highlighter = Highlighter::new(&["رَبِّ،".to_string()], "mark");

        assert_eq!(
            highlighter.highlight("يا رَبِّ، اغْفِرْ لِي").as_deref(),
            Some("يا <mark>رَبِّ،</mark> اغْفِرْ لِي")
        );
        assert_eq!(highlighter.highlight("رَبِّ،ي"), None);
    }

    #[test]
    fn test_highlight_escapes_regex_metacharacters() {
        let highlighter = Highlighter::new(&["a.c".to_string()], "em");
        assert_eq!(highlighter.highlight("abc"), None);
    }

    #[test]
    fn test_snippets_only_for_matching_fields() {
        let candidates = CandidateMap::from([(0, candidate(2.0))]);
        let highlighter = Highlighter::new(&["pagi".to_string()], "mark");
        let results = assemble(&index(), candidates, &SearchOptions::new("pagi"), &highlighter);

        let snippets = &results[0].highlight_snippets;
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].field, MatchedField::Title);
        assert_eq!(snippets[0].text, "Doa <mark>Pagi</mark>");
    }
}
