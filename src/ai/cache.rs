use crate::ai::error::AiError;
use crate::search::tokenizer::canonical_query;
use crate::search::SearchResult;
use moka::future::Cache;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Model verdict for one document
#[derive(Debug, Clone, PartialEq)]
pub struct AiJudgment {
    pub ai_score: f64,
    pub reason: String,
    pub semantic_matches: Vec<String>,
    pub confidence: f64,
}

/// Judgments for one candidate set, keyed by document id
pub type Judgments = Arc<BTreeMap<String, AiJudgment>>;

/// Identity of a rerank request: canonical query plus the sorted candidate ids
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    ids: Vec<String>,
}

impl CacheKey {
    pub fn new(query: &str, candidates: &[SearchResult]) -> Self {
        let mut ids: Vec<String> = candidates.iter().map(|c| c.document.id.clone()).collect();
        ids.sort();

        Self {
            query: canonical_query(query),
            ids,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Bounded, TTL-evicting store of rerank judgments.
///
/// Concurrent lookups of a missing key share one in-flight computation;
/// failed computations are not stored.
#[derive(Clone)]
pub struct RerankCache {
    cache: Cache<CacheKey, Judgments>,
}

impl RerankCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Judgments> {
        self.cache.get(key).await
    }

    /// Return the cached judgments or run `init` once for all concurrent callers
    pub async fn get_or_try_insert_with<F>(
        &self,
        key: CacheKey,
        init: F,
    ) -> Result<Judgments, Arc<AiError>>
    where
        F: Future<Output = Result<Judgments, AiError>>,
    {
        self.cache.try_get_with(key, init).await
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Approximate until pending maintenance has run
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}
