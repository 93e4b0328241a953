//! Hybrid keyword search over a prayer corpus
//!
//! Retrieval combines three strategies over one inverted index:
//!
//! - **Direct**: exact token lookup, weighted by the field the token occurs in
//! - **Semantic**: lookup of synonym and situation expansions from a static
//!   bilingual table, at a reduced weight
//! - **Fuzzy**: Levenshtein similarity against the whole vocabulary, at a
//!   further reduced weight
//!
//! ```text
//!   corpus ──▶ SearchIndex ──▶ Retriever ──▶ scorer ──▶ Vec<SearchResult>
//!                                                   └──▶ AiReranker ──▶ Vec<AiSearchResult>
//! ```
//!
//! # Example
//!
//! ```
//! use prayer_search::models::Document;
//! use prayer_search::search::{SearchConfig, SearchEngine, SearchOptions};
//!
//! let engine = SearchEngine::new(
//!     vec![
//!         Document::new("1", "Doa Pagi", "Harian"),
//!         Document::new("2", "Doa Tidur", "Harian"),
//!     ],
//!     SearchConfig::default(),
//! );
//!
//! let results = engine.search(&SearchOptions::new("pagi"));
//! assert_eq!(results[0].document.id, "1");
//! ```

pub mod config;
pub mod document;
pub mod engine;
pub mod fuzzy;
pub mod index;
pub mod query;
pub mod result;
pub mod retriever;
pub mod scorer;
pub mod suggest;
pub mod synonyms;
pub mod tokenizer;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use document::{Field, MatchedField};
pub use engine::SearchEngine;
pub use index::{IndexStats, SearchIndex};
pub use query::{SearchOptions, SemanticSearchOptions};
pub use result::{AiSearchResult, HighlightSnippet, SearchResult};
pub use suggest::{Suggestion, SuggestionKind};
