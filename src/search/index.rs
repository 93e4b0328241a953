//! Inverted index over a corpus snapshot
//!
//! The index is built once per corpus version and never mutated afterwards.
//! Replacing the corpus means building a new `SearchIndex` and swapping the
//! engine's pointer to it; searches already running keep the snapshot they
//! captured.

use crate::models::{Corpus, Document};
use crate::search::document::{Field, FIELD_COUNT};
use crate::search::tokenizer::tokenize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use strum::IntoEnumIterator;

/// Index statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of documents in the snapshot
    pub documents: usize,

    /// Distinct tokens
    pub vocabulary: usize,

    /// Total (token, document) pairs
    pub postings: usize,

    /// Snapshot generation, bumped on every reindex
    pub generation: u64,

    /// When this snapshot was built
    pub built_at: DateTime<Utc>,
}

/// Per-document token sets, one per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FieldTokens {
    fields: [HashSet<String>; FIELD_COUNT],
}

impl FieldTokens {
    fn contains(&self, field: Field, token: &str) -> bool {
        self.fields[field.slot()].contains(token)
    }
}

/// Immutable inverted index plus the corpus it was built from
#[derive(Debug, Clone)]
pub struct SearchIndex {
    corpus: Corpus,
    /// token → indices of documents containing it; never an empty set
    postings: BTreeMap<String, BTreeSet<usize>>,
    field_tokens: Vec<FieldTokens>,
    generation: u64,
    built_at: DateTime<Utc>,
}

impl SearchIndex {
    /// Build an index over every field of every document. O(total tokens).
    pub fn build(corpus: impl Into<Corpus>) -> Self {
        Self::build_generation(corpus.into(), 0)
    }

    pub(crate) fn build_generation(corpus: Corpus, generation: u64) -> Self {
        let mut postings: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        let mut field_tokens = Vec::with_capacity(corpus.len());

        for (doc_index, document) in corpus.documents().iter().enumerate() {
            let tokens = Self::tokenize_document(document);

            for token in tokens.fields.iter().flatten() {
                postings.entry(token.clone()).or_default().insert(doc_index);
            }
            field_tokens.push(tokens);
        }

        tracing::debug!(
            documents = corpus.len(),
            vocabulary = postings.len(),
            generation,
            "Built inverted index"
        );

        Self {
            corpus,
            postings,
            field_tokens,
            generation,
            built_at: Utc::now(),
        }
    }

    fn tokenize_document(document: &Document) -> FieldTokens {
        let mut tokens = FieldTokens::default();
        for field in Field::iter() {
            tokens.fields[field.slot()] = tokenize(&field.text(document)).into_iter().collect();
        }
        tokens
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn documents(&self) -> &[Document] {
        self.corpus.documents()
    }

    pub fn document(&self, doc_index: usize) -> Option<&Document> {
        self.corpus.get(doc_index)
    }

    /// Documents containing `token` in any field
    pub fn lookup(&self, token: &str) -> Option<&BTreeSet<usize>> {
        self.postings.get(token)
    }

    /// Fields of `doc_index` containing `token`, in weight order
    pub fn fields_containing<'a>(
        &'a self,
        doc_index: usize,
        token: &'a str,
    ) -> impl Iterator<Item = Field> + 'a {
        let tokens = self.field_tokens.get(doc_index);
        Field::iter().filter(move |field| tokens.is_some_and(|t| t.contains(*field, token)))
    }

    /// All distinct tokens in lexical order
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    /// The full token → documents mapping
    pub fn postings(&self) -> &BTreeMap<String, BTreeSet<usize>> {
        &self.postings
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.corpus.len(),
            vocabulary: self.postings.len(),
            postings: self.postings.values().map(BTreeSet::len).sum(),
            generation: self.generation,
            built_at: self.built_at,
        }
    }
}
