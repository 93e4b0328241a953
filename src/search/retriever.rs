//! Candidate retrieval: direct, semantic and fuzzy strategies
//!
//! Each strategy produces a partial `doc index → Candidate` map; the maps
//! are merged additively so a document hit by several tokens, fields or
//! strategies accumulates all of their contributions.

use crate::search::config::SearchConfig;
use crate::search::document::MatchedField;
use crate::search::fuzzy;
use crate::search::index::SearchIndex;
use crate::search::synonyms::SynonymTable;
use std::collections::{BTreeMap, BTreeSet};

/// Partial score for one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub score: f64,
    pub matched_fields: BTreeSet<MatchedField>,
}

/// Candidates keyed by document index; iteration follows corpus order
pub type CandidateMap = BTreeMap<usize, Candidate>;

/// Which optional strategies to run alongside direct matching
#[derive(Debug, Clone, Copy)]
pub struct Strategies {
    pub semantic: bool,
    pub fuzzy: bool,
}

/// Runs the retrieval strategies against one index snapshot
pub struct Retriever<'a> {
    index: &'a SearchIndex,
    config: &'a SearchConfig,
}

impl<'a> Retriever<'a> {
    pub fn new(index: &'a SearchIndex, config: &'a SearchConfig) -> Self {
        Self { index, config }
    }

    /// Run every enabled strategy for `query` and merge the results
    pub fn retrieve(&self, query: &str, query_tokens: &[String], strategies: Strategies) -> CandidateMap {
        let mut merged = self.direct(query_tokens);

        if strategies.semantic {
            merge_into(&mut merged, self.semantic(query));
        }
        if strategies.fuzzy {
            merge_into(&mut merged, self.fuzzy(query_tokens));
        }

        merged
    }

    /// Exact token lookup, weighted by the field each hit lands in
    pub fn direct(&self, query_tokens: &[String]) -> CandidateMap {
        let mut candidates = CandidateMap::new();

        for token in query_tokens {
            let Some(docs) = self.index.lookup(token) else {
                continue;
            };
            for &doc in docs {
                for field in self.index.fields_containing(doc, token) {
                    let entry = candidates.entry(doc).or_default();
                    entry.score += field.weight();
                    entry.matched_fields.insert(field.into());
                }
            }
        }

        candidates
    }

    /// Lookup of synonym expansions at a reduced weight
    pub fn semantic(&self, query: &str) -> CandidateMap {
        let mut candidates = CandidateMap::new();

        for term in SynonymTable::global().expand(query) {
            self.accumulate(&mut candidates, &term, self.config.semantic_factor, MatchedField::Semantic);
        }

        candidates
    }

    /// Approximate matches against the whole vocabulary.
    ///
    /// Cost grows with vocabulary size; see [`crate::search::fuzzy`].
    pub fn fuzzy(&self, query_tokens: &[String]) -> CandidateMap {
        let mut candidates = CandidateMap::new();

        for token in query_tokens.iter().filter(|t| t.chars().count() >= 3) {
            for term in self.index.vocabulary() {
                if term == token {
                    continue;
                }
                if fuzzy::similarity_above(token, term, self.config.fuzzy_threshold).is_some() {
                    self.accumulate(&mut candidates, term, self.config.fuzzy_factor, MatchedField::Fuzzy);
                }
            }
        }

        candidates
    }

    fn accumulate(&self, candidates: &mut CandidateMap, term: &str, factor: f64, tag: MatchedField) {
        let Some(docs) = self.index.lookup(term) else {
            return;
        };
        for &doc in docs {
            for field in self.index.fields_containing(doc, term) {
                let entry = candidates.entry(doc).or_default();
                entry.score += factor * field.weight();
                entry.matched_fields.insert(tag);
            }
        }
    }
}

/// Add every candidate of `other` into `target`
pub fn merge_into(target: &mut CandidateMap, other: CandidateMap) {
    for (doc, candidate) in other {
        let entry = target.entry(doc).or_default();
        entry.score += candidate.score;
        entry.matched_fields.extend(candidate.matched_fields);
    }
}
