//! AI-assisted relevance ranking
//!
//! Keyword candidates are handed to a language model through the
//! [`CompletionProvider`] boundary. The model's judgments are cached per
//! (query, candidate set), merged into the candidates and used to re-sort
//! them.

pub mod cache;
pub mod config;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod reranker;
pub mod response;

pub use cache::{AiJudgment, CacheKey, RerankCache};
pub use config::AiConfig;
pub use error::{AiError, AiResult};
pub use provider::{ChatMessage, ChatRole, CompletionProvider, HttpCompletionProvider};
pub use reranker::{AiReranker, EnhanceOptions};
