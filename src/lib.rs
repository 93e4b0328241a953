//! Hybrid search and AI-assisted relevance ranking for a corpus of prayers.
//!
//! - [`search`]: inverted index, direct / semantic / fuzzy retrieval, scoring,
//!   highlighting, autocomplete and the [`SearchEngine`](search::SearchEngine) facade
//! - [`ai`]: completion provider boundary, prompt construction, response
//!   parsing, judgment cache and the reranker
//! - [`analytics`]: search and click log with snapshot persistence
//! - [`models`]: documents and corpus loading
//! - [`config`]: layered configuration

pub mod ai;
pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod search;

pub use error::{AppError, Result};
