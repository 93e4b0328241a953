//! Engine facade
//!
//! [`SearchEngine`] owns the current index snapshot and the optional AI and
//! analytics stages. Searches capture an `Arc` of the snapshot and run
//! against it without holding any lock; [`SearchEngine::reindex`] builds a
//! fresh index and swaps it in, so in-flight searches finish on the index
//! they started with.

use crate::ai::{AiReranker, CompletionProvider, EnhanceOptions};
use crate::analytics::{AnalyticsRecorder, AnalyticsSummary, SearchTicket};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::Corpus;
use crate::search::config::SearchConfig;
use crate::search::index::{IndexStats, SearchIndex};
use crate::search::query::{SearchOptions, SemanticSearchOptions};
use crate::search::result::{AiSearchResult, SearchResult};
use crate::search::retriever::{Retriever, Strategies};
use crate::search::scorer::{self, Highlighter};
use crate::search::suggest::{self, Suggestion};
use crate::search::tokenizer::tokenize_unique;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use validator::Validate;

/// Confidence of keyword results returned without consulting the model
pub const STANDARD_CONFIDENCE: f64 = 0.7;

/// Reason attached to keyword results returned without consulting the model
pub const STANDARD_REASON: &str = "Standard search match";

/// Popular queries offered to autocomplete
const POPULAR_QUERY_POOL: usize = 20;

/// Hybrid keyword search with optional AI reranking and query analytics
pub struct SearchEngine {
    index: RwLock<Arc<SearchIndex>>,
    generation: AtomicU64,
    config: SearchConfig,
    reranker: Option<AiReranker>,
    analytics: Option<AnalyticsRecorder>,
}

impl SearchEngine {
    /// Engine over `corpus` without AI or analytics
    pub fn new(corpus: impl Into<Corpus>, config: SearchConfig) -> Self {
        let index = SearchIndex::build(corpus);

        info!(
            documents = index.documents().len(),
            vocabulary = index.postings().len(),
            "Search engine initialized"
        );

        Self {
            index: RwLock::new(Arc::new(index)),
            generation: AtomicU64::new(0),
            config,
            reranker: None,
            analytics: None,
        }
    }

    /// Engine assembled from configuration. AI reranking is enabled when
    /// `ai.enabled` is set and a provider is given.
    pub fn from_config(
        corpus: impl Into<Corpus>,
        config: &EngineConfig,
        provider: Option<Arc<dyn CompletionProvider>>,
    ) -> Result<Self> {
        config.validate()?;

        let mut engine = Self::new(corpus, config.search.clone());

        match provider {
            Some(provider) if config.ai.enabled => {
                info!(provider = %provider.name(), "AI reranking enabled");
                engine = engine.with_reranker(AiReranker::new(provider, config.ai.clone()));
            }
            _ => info!("AI reranking disabled"),
        }

        if config.analytics.enabled {
            engine = engine.with_analytics(AnalyticsRecorder::from_config(&config.analytics));
        }

        Ok(engine)
    }

    pub fn with_reranker(mut self, reranker: AiReranker) -> Self {
        self.reranker = Some(reranker);
        self
    }

    pub fn with_analytics(mut self, analytics: AnalyticsRecorder) -> Self {
        self.analytics = Some(analytics);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Current index; stays valid across later reindexes
    pub fn snapshot(&self) -> Arc<SearchIndex> {
        self.index.read().clone()
    }

    /// Replace the corpus. The new index is built before the swap and
    /// carries the next generation number.
    pub fn reindex(&self, corpus: impl Into<Corpus>) -> Arc<SearchIndex> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let index = Arc::new(SearchIndex::build_generation(corpus.into(), generation));

        {
            let mut current = self.index.write();
            // a slower concurrent reindex must not replace a newer index
            if current.generation() < generation {
                *current = index.clone();
            }
        }

        if let Some(ref reranker) = self.reranker {
            reranker.clear_cache();
        }

        info!(
            generation,
            documents = index.documents().len(),
            vocabulary = index.postings().len(),
            "Corpus reindexed"
        );

        index
    }

    pub fn stats(&self) -> IndexStats {
        self.snapshot().stats()
    }

    /// Keyword search. Never fails; unknown terms yield an empty list.
    pub fn search(&self, options: &SearchOptions) -> Vec<SearchResult> {
        let started = Instant::now();
        let index = self.snapshot();

        let ticket = self.begin_analytics(&options.query);
        let results = self.search_index(&index, options);
        self.finish_analytics(ticket, results.len());

        debug!(
            query = %options.query,
            results = results.len(),
            generation = index.generation(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Search completed"
        );

        results
    }

    /// Keyword search refined by the language model.
    ///
    /// Falls back to keyword results with confidence 0.7 when AI is off for
    /// this call, no reranker is configured, or there is nothing to rerank.
    /// Provider failures produce degraded results, never errors.
    pub async fn semantic_search(&self, options: &SemanticSearchOptions) -> Vec<AiSearchResult> {
        let started = Instant::now();
        let index = match options.items {
            Some(ref items) => Arc::new(SearchIndex::build(items.clone())),
            None => self.snapshot(),
        };

        let ticket = self.begin_analytics(&options.query);
        let query = options.query.trim();

        let reranker = self
            .reranker
            .as_ref()
            .filter(|_| options.use_ai && !query.is_empty());

        let results = match reranker {
            Some(reranker) => {
                let pool = options.limit.max(reranker.candidate_pool());
                let candidates = self.search_index(&index, &self.keyword_options(query, pool));
                reranker
                    .enhance(query, candidates, &EnhanceOptions::from(options))
                    .await
            }
            None => {
                let candidates = self.search_index(&index, &self.keyword_options(query, options.limit));
                standard_results(candidates, options.min_confidence)
            }
        };

        self.finish_analytics(ticket, results.len());

        debug!(
            query = %options.query,
            results = results.len(),
            ai = reranker.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Semantic search completed"
        );

        results
    }

    /// Autocomplete over titles, categories, tags, the keyword table and
    /// popular past queries
    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<Suggestion> {
        let popular: Vec<String> = self
            .analytics
            .as_ref()
            .map(|analytics| {
                analytics
                    .popular_queries(POPULAR_QUERY_POOL)
                    .into_iter()
                    .map(|q| q.query)
                    .collect()
            })
            .unwrap_or_default();

        suggest::suggest(&self.snapshot(), partial, limit, &popular)
    }

    /// Query completions from the language model; empty without a reranker
    pub async fn ai_suggestions(&self, partial: &str, limit: usize) -> Vec<String> {
        match self.reranker {
            Some(ref reranker) => reranker.suggest_queries(partial, limit).await,
            None => Vec::new(),
        }
    }

    /// Attribute a click to a recent search for `query`
    pub fn record_click(&self, query: &str, document_id: &str) -> bool {
        self.analytics
            .as_ref()
            .is_some_and(|analytics| analytics.record_click(query, document_id))
    }

    pub fn analytics(&self) -> Option<&AnalyticsRecorder> {
        self.analytics.as_ref()
    }

    pub fn analytics_summary(&self, top_n: usize) -> Option<AnalyticsSummary> {
        self.analytics.as_ref().map(|analytics| analytics.summary(top_n))
    }

    /// Wait for recorded analytics to reach the store
    pub async fn flush_analytics(&self) {
        if let Some(ref analytics) = self.analytics {
            analytics.flush().await;
        }
    }

    pub fn clear_cache(&self) {
        if let Some(ref reranker) = self.reranker {
            reranker.clear_cache();
        }
    }

    pub fn clear_context(&self) {
        if let Some(ref reranker) = self.reranker {
            reranker.clear_context();
        }
    }

    pub fn recent_queries(&self) -> Vec<String> {
        self.reranker
            .as_ref()
            .map(AiReranker::recent_queries)
            .unwrap_or_default()
    }

    pub async fn cache_entry_count(&self) -> u64 {
        match self.reranker {
            Some(ref reranker) => reranker.cache_entry_count().await,
            None => 0,
        }
    }

    fn keyword_options(&self, query: &str, limit: usize) -> SearchOptions {
        SearchOptions::new(query)
            .with_limit(limit)
            .with_min_score(self.config.min_score)
    }

    fn search_index(&self, index: &SearchIndex, options: &SearchOptions) -> Vec<SearchResult> {
        let query = options.query.trim();
        if query.is_empty() {
            return scorer::list_all(index, options);
        }

        let tokens = tokenize_unique(query);
        let strategies = Strategies {
            semantic: options.semantic,
            fuzzy: options.fuzzy,
        };
        let candidates = Retriever::new(index, &self.config).retrieve(query, &tokens, strategies);
        let highlighter = Highlighter::new(&tokens, &self.config.highlight_tag);

        scorer::assemble(index, candidates, options, &highlighter)
    }

    fn begin_analytics(&self, query: &str) -> Option<SearchTicket> {
        if query.trim().is_empty() {
            return None;
        }
        self.analytics
            .as_ref()
            .map(|analytics| analytics.record_search(query))
    }

    fn finish_analytics(&self, ticket: Option<SearchTicket>, result_count: usize) {
        if let (Some(analytics), Some(ticket)) = (self.analytics.as_ref(), ticket) {
            analytics.complete_search(ticket, result_count);
        }
    }
}

fn standard_results(candidates: Vec<SearchResult>, min_confidence: f64) -> Vec<AiSearchResult> {
    if STANDARD_CONFIDENCE < min_confidence {
        return Vec::new();
    }
    candidates
        .into_iter()
        .map(|candidate| AiSearchResult::unjudged(candidate, STANDARD_CONFIDENCE, STANDARD_REASON))
        .collect()
}
