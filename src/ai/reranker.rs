//! AI reranking stage
//!
//! [`AiReranker::enhance`] never fails: provider, transport and schema
//! errors are logged and turned into a degraded result set built from the
//! keyword candidates.

use crate::ai::cache::{AiJudgment, CacheKey, Judgments, RerankCache};
use crate::ai::config::AiConfig;
use crate::ai::error::{AiError, AiResult};
use crate::ai::prompt::{suggestion_messages, RerankPrompt};
use crate::ai::provider::CompletionProvider;
use crate::ai::response::{parse_analyses, parse_suggestions};
use crate::search::query::SemanticSearchOptions;
use crate::search::result::{AiSearchResult, SearchResult};
use crate::search::tokenizer::canonical_query;
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Confidence of candidates the model did not judge
pub const UNJUDGED_CONFIDENCE: f64 = 0.6;

/// Confidence of every result when the provider could not be used
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Reason attached to candidates without a model judgment
pub const STANDARD_REASON: &str = "Standard search match";

/// Per-call reranking options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhanceOptions {
    /// Include recent queries in the prompt
    pub contextual: bool,
    /// Re-sort by weighted AI score
    pub rerank: bool,
    pub limit: usize,
    pub min_confidence: f64,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            contextual: true,
            rerank: true,
            limit: 10,
            min_confidence: 0.3,
        }
    }
}

impl From<&SemanticSearchOptions> for EnhanceOptions {
    fn from(options: &SemanticSearchOptions) -> Self {
        Self {
            contextual: options.contextual,
            rerank: options.rerank,
            limit: options.limit,
            min_confidence: options.min_confidence,
        }
    }
}

/// Descending by `ai_score * confidence`, then confidence, then original score
pub fn by_weighted_score(a: &AiSearchResult, b: &AiSearchResult) -> Ordering {
    b.weighted_score()
        .total_cmp(&a.weighted_score())
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| b.result.score.total_cmp(&a.result.score))
}

/// Language-model reranker with a judgment cache and a recent-query buffer
pub struct AiReranker {
    provider: Arc<dyn CompletionProvider>,
    cache: RerankCache,
    context: Mutex<VecDeque<String>>,
    config: AiConfig,
}

impl AiReranker {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: AiConfig) -> Self {
        let cache = RerankCache::new(
            config.cache_capacity,
            Duration::from_secs(config.cache_ttl_secs),
        );

        Self {
            provider,
            cache,
            context: Mutex::new(VecDeque::with_capacity(config.context_window)),
            config,
        }
    }

    /// Keyword candidates to gather before calling [`enhance`](Self::enhance)
    pub fn candidate_pool(&self) -> usize {
        self.config.candidate_pool
    }

    /// Annotate and optionally re-sort `candidates` using the model's judgment
    pub async fn enhance(
        &self,
        query: &str,
        candidates: Vec<SearchResult>,
        options: &EnhanceOptions,
    ) -> Vec<AiSearchResult> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let candidates = distinct_documents(candidates);

        let key = CacheKey::new(query, &candidates);

        if let Some(judgments) = self.cache.get(&key).await {
            debug!(query = %key.query(), "Rerank cache hit");
            return merge(candidates, &judgments, options);
        }

        let context = if options.contextual {
            self.prompt_context()
        } else {
            Vec::new()
        };

        let outcome = self
            .cache
            .get_or_try_insert_with(key, self.judge(query, &candidates, &context))
            .await;

        match outcome {
            Ok(judgments) => {
                let results = merge(candidates, &judgments, options);
                self.remember(query);
                results
            }
            Err(err) => {
                warn!(
                    provider = %self.provider.name(),
                    query = %query,
                    error = %err,
                    "AI reranking failed, returning keyword results"
                );
                fallback(candidates, &err, options.limit)
            }
        }
    }

    /// Ask the model for query completions. Failures yield an empty list.
    pub async fn suggest_queries(&self, partial: &str, limit: usize) -> Vec<String> {
        let partial = partial.trim();
        if partial.chars().count() < 2 || limit == 0 {
            return Vec::new();
        }

        let result = async {
            let completion = self
                .provider
                .complete(&suggestion_messages(partial, limit))
                .await?;
            parse_suggestions(&completion)
        }
        .await;

        match result {
            Ok(mut suggestions) => {
                suggestions.truncate(limit);
                suggestions
            }
            Err(err) => {
                warn!(partial = %partial, error = %err, "AI suggestions unavailable");
                Vec::new()
            }
        }
    }

    /// Prior queries, oldest first
    pub fn recent_queries(&self) -> Vec<String> {
        self.context.lock().iter().cloned().collect()
    }

    pub fn clear_context(&self) {
        self.context.lock().clear();
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }

    pub async fn cache_entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    async fn judge(
        &self,
        query: &str,
        candidates: &[SearchResult],
        context: &[String],
    ) -> AiResult<Judgments> {
        let shown = candidates.len().min(self.config.max_prompt_candidates);
        let prompt = RerankPrompt {
            query,
            candidates: &candidates[..shown],
            context,
            max_candidates: shown,
            preview_chars: self.config.translation_preview_chars,
        };

        let completion = self.provider.complete(&prompt.messages()).await?;
        let response = parse_analyses(&completion)?;

        let mut judgments = BTreeMap::new();
        for analysis in response.analyses {
            let position = usize::try_from(analysis.index)
                .ok()
                .filter(|&position| position < shown);
            let Some(position) = position else {
                debug!(index = analysis.index, shown, "Discarding out-of-range analysis");
                continue;
            };
            let candidate = &candidates[position];

            judgments
                .entry(candidate.document.id.clone())
                .or_insert(AiJudgment {
                    ai_score: analysis.relevance_score,
                    reason: analysis.reason,
                    semantic_matches: analysis.semantic_matches,
                    confidence: analysis.confidence,
                });
        }

        debug!(
            query = %query,
            candidates = shown,
            judged = judgments.len(),
            "AI judgments received"
        );

        Ok(Arc::new(judgments))
    }

    /// Last `context_in_prompt` queries of the ring buffer
    fn prompt_context(&self) -> Vec<String> {
        let context = self.context.lock();
        let skip = context.len().saturating_sub(self.config.context_in_prompt);
        context.iter().skip(skip).cloned().collect()
    }

    fn remember(&self, query: &str) {
        if self.config.context_window == 0 {
            return;
        }

        let query = query.trim();
        let mut context = self.context.lock();

        let repeated = context
            .back()
            .is_some_and(|last| canonical_query(last) == canonical_query(query));
        if repeated {
            return;
        }

        context.push_back(query.to_string());
        while context.len() > self.config.context_window {
            context.pop_front();
        }
    }
}

/// First candidate per document id, in order. Judgments are keyed by id,
/// so each id may appear in the prompt only once.
fn distinct_documents(mut candidates: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    candidates.retain(|candidate| seen.insert(candidate.document.id.clone()));
    candidates
}

fn merge(
    candidates: Vec<SearchResult>,
    judgments: &BTreeMap<String, AiJudgment>,
    options: &EnhanceOptions,
) -> Vec<AiSearchResult> {
    let mut results: Vec<AiSearchResult> = candidates
        .into_iter()
        .map(|candidate| match judgments.get(&candidate.document.id) {
            Some(judgment) => AiSearchResult {
                ai_score: judgment.ai_score,
                ai_reason: judgment.reason.clone(),
                semantic_matches: judgment.semantic_matches.clone(),
                confidence: judgment.confidence,
                result: candidate,
            },
            None => AiSearchResult::unjudged(candidate, UNJUDGED_CONFIDENCE, STANDARD_REASON),
        })
        .collect();

    if options.rerank {
        results.sort_by(by_weighted_score);
    }

    results.retain(|r| r.confidence >= options.min_confidence);
    results.truncate(options.limit);
    results
}

/// Keyword candidates marked as unjudged because the provider failed.
/// Not subject to the confidence filter.
fn fallback(candidates: Vec<SearchResult>, err: &AiError, limit: usize) -> Vec<AiSearchResult> {
    let reason = format!("AI analysis unavailable: {}", err);

    let mut results: Vec<AiSearchResult> = candidates
        .into_iter()
        .map(|candidate| AiSearchResult::unjudged(candidate, FALLBACK_CONFIDENCE, reason.clone()))
        .collect();

    results.sort_by(|a, b| b.result.score.total_cmp(&a.result.score));
    results.truncate(limit);
    results
}
