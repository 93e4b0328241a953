//! Integration tests for AI-assisted search: reranking, caching, fallback

mod common;

use common::{fixture_corpus, judgment, ScriptedProvider};
use prayer_search::ai::{AiConfig, AiError, CompletionProvider, HttpCompletionProvider};
use prayer_search::config::EngineConfig;
use prayer_search::models::Document;
use prayer_search::search::*;
use std::sync::Arc;
use std::time::Duration;

fn engine_with(provider: Arc<dyn CompletionProvider>) -> SearchEngine {
    SearchEngine::from_config(fixture_corpus(), &EngineConfig::default(), Some(provider)).unwrap()
}

/// Keyword candidates the reranker sees for `query`
fn candidate_ids(engine: &SearchEngine, query: &str) -> Vec<String> {
    engine
        .search(&SearchOptions::new(query).with_limit(20))
        .into_iter()
        .map(|r| r.document.id)
        .collect()
}

fn result_ids(results: &[AiSearchResult]) -> Vec<String> {
    results.iter().map(|r| r.document().id.clone()).collect()
}

#[tokio::test]
async fn test_without_ai_returns_standard_confidence() {
    let provider = ScriptedProvider::replying(judgment(0, 9.0, 0.9));
    let engine = engine_with(provider.clone());

    let results = engine
        .semantic_search(&SemanticSearchOptions::new("makan").with_ai(false))
        .await;

    let mut found = result_ids(&results);
    found.sort();
    assert_eq!(found, vec!["sebelum-makan", "sesudah-makan"]);
    for result in &results {
        assert_eq!(result.confidence, 0.7);
        assert_eq!(result.ai_reason, "Standard search match");
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_ai_judgment_reranks_candidates() {
    let provider = ScriptedProvider::replying(judgment(1, 9.0, 0.9));
    let engine = engine_with(provider.clone());
    let candidates = candidate_ids(&engine, "makan");

    let results = engine
        .semantic_search(&SemanticSearchOptions::new("makan"))
        .await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(results[0].document().id, candidates[1]);
    assert_eq!(results[0].ai_score, 9.0);
    assert_eq!(results[0].confidence, 0.9);
    assert_eq!(results[0].semantic_matches, vec!["meal"]);

    let unjudged = &results[1];
    assert_eq!(unjudged.confidence, 0.6);
    assert_eq!(unjudged.ai_score, unjudged.result.score);
    assert_eq!(unjudged.ai_reason, "Standard search match");

    for pair in results.windows(2) {
        assert!(pair[0].weighted_score() >= pair[1].weighted_score());
    }

    let prompt = provider.last_user_prompt().unwrap();
    assert!(prompt.contains("Query: \"makan\""));
    assert!(prompt.contains("Doa Sesudah Makan"));
}

#[tokio::test]
async fn test_rerank_disabled_keeps_keyword_order() {
    let provider = ScriptedProvider::replying(judgment(1, 9.0, 0.9));
    let engine = engine_with(provider);
    let candidates = candidate_ids(&engine, "makan");

    let results = engine
        .semantic_search(&SemanticSearchOptions::new("makan").with_rerank(false))
        .await;

    assert_eq!(result_ids(&results), candidates);
}

#[tokio::test]
async fn test_min_confidence_filters_unjudged() {
    let provider = ScriptedProvider::replying(judgment(1, 9.0, 0.9));
    let engine = engine_with(provider);

    let results = engine
        .semantic_search(&SemanticSearchOptions::new("makan").with_min_confidence(0.65))
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].confidence, 0.9);
}

#[tokio::test]
async fn test_provider_failure_falls_back() {
    let provider = ScriptedProvider::failing(AiError::Status {
        status: 503,
        body: "unavailable".to_string(),
    });
    let engine = engine_with(provider.clone());
    let keyword = candidate_ids(&engine, "makan");

    let results = engine
        .semantic_search(&SemanticSearchOptions::new("makan").with_min_confidence(0.9))
        .await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(result_ids(&results), keyword);
    for result in &results {
        assert_eq!(result.confidence, 0.5);
        assert!(result.ai_reason.starts_with("AI analysis unavailable"));
        assert!(result.ai_reason.contains("503"));
    }

    // failures are not cached
    engine
        .semantic_search(&SemanticSearchOptions::new("makan"))
        .await;
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_malformed_completion_falls_back() {
    let provider = ScriptedProvider::replying("I think the first one is best.");
    let engine = engine_with(provider);

    let results = engine
        .semantic_search(&SemanticSearchOptions::new("tidur"))
        .await;

    assert_eq!(results[0].document().id, "tidur");
    assert!(results.iter().all(|r| r.confidence == 0.5));
}

#[tokio::test]
async fn test_identical_requests_call_provider_once() {
    let provider = ScriptedProvider::replying(judgment(0, 8.0, 0.8));
    let engine = engine_with(provider.clone());
    let options = SemanticSearchOptions::new("makan");

    let first = engine.semantic_search(&options).await;
    let second = engine
        .semantic_search(&SemanticSearchOptions::new("  MAKAN "))
        .await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(result_ids(&first), result_ids(&second));
    assert_eq!(engine.cache_entry_count().await, 1);

    engine.clear_cache();
    engine.semantic_search(&options).await;
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_concurrent_identical_requests_share_one_call() {
    let provider = ScriptedProvider::slow(judgment(0, 8.0, 0.8), Duration::from_millis(50));
    let engine = engine_with(provider.clone());
    let options = SemanticSearchOptions::new("makan");

    let (a, b) = tokio::join!(engine.semantic_search(&options), engine.semantic_search(&options));

    assert_eq!(provider.calls(), 1);
    assert_eq!(result_ids(&a), result_ids(&b));
    assert_eq!(a[0].ai_score, 8.0);
}

#[tokio::test]
async fn test_different_candidate_sets_are_cached_separately() {
    let provider = ScriptedProvider::replying(judgment(0, 8.0, 0.8));
    let engine = engine_with(provider.clone());

    engine.semantic_search(&SemanticSearchOptions::new("makan")).await;
    engine
        .semantic_search(&SemanticSearchOptions::new("makan").with_items(fixture_corpus()[2..3].to_vec()))
        .await;

    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_context_is_sent_with_later_queries() {
    let provider = ScriptedProvider::replying(r#"{"analyses":[]}"#);
    let engine = engine_with(provider.clone());

    engine.semantic_search(&SemanticSearchOptions::new("tidur")).await;
    engine.semantic_search(&SemanticSearchOptions::new("makan")).await;

    assert_eq!(engine.recent_queries(), vec!["tidur", "makan"]);
    let prompt = provider.last_user_prompt().unwrap();
    assert!(prompt.contains("Recent searches"));
    assert!(prompt.contains("- tidur"));

    engine
        .semantic_search(&SemanticSearchOptions::new("masjid").with_contextual(false))
        .await;
    assert!(!provider.last_user_prompt().unwrap().contains("Recent searches"));

    engine.clear_context();
    assert!(engine.recent_queries().is_empty());
}

#[tokio::test]
async fn test_no_call_for_empty_inputs() {
    let provider = ScriptedProvider::replying(judgment(0, 8.0, 0.8));
    let engine = engine_with(provider.clone());

    let listed = engine.semantic_search(&SemanticSearchOptions::new("")).await;
    assert_eq!(listed.len(), 6);
    assert!(listed.iter().all(|r| r.confidence == 0.7));

    let none = engine
        .semantic_search(&SemanticSearchOptions::new("xyz-nonexistent"))
        .await;
    assert!(none.is_empty());

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_ai_disabled_by_configuration() {
    let provider = ScriptedProvider::replying(judgment(0, 8.0, 0.8));
    let mut config = EngineConfig::default();
    config.ai.enabled = false;
    let engine = SearchEngine::from_config(fixture_corpus(), &config, Some(provider.clone())).unwrap();

    let results = engine
        .semantic_search(&SemanticSearchOptions::new("pagi"))
        .await;

    assert_eq!(results[0].document().id, "pagi");
    assert_eq!(results[0].confidence, 0.7);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_items_replace_the_corpus() {
    let engine = engine_with(ScriptedProvider::replying(r#"{"analyses":[]}"#));
    let items = vec![
        Document::new("hujan", "Doa Ketika Hujan", "Alam").with_tags(["hujan"]),
        Document::new("petir", "Doa Mendengar Petir", "Alam"),
    ];

    let results = engine
        .semantic_search(&SemanticSearchOptions::new("hujan").with_items(items).with_ai(false))
        .await;

    let found = result_ids(&results);
    assert_eq!(found[0], "hujan");
    assert!(found.iter().all(|id| id == "hujan" || id == "petir"));
}

#[tokio::test]
async fn test_reindex_invalidates_judgments() {
    let provider = ScriptedProvider::replying(judgment(0, 8.0, 0.8));
    let engine = engine_with(provider.clone());

    engine.semantic_search(&SemanticSearchOptions::new("pagi")).await;
    engine.reindex(fixture_corpus());
    engine.semantic_search(&SemanticSearchOptions::new("pagi")).await;

    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_ai_query_suggestions() {
    let engine = engine_with(ScriptedProvider::replying(r#"["doa pagi", "dzikir pagi"]"#));
    assert_eq!(engine.ai_suggestions("pag", 5).await, vec!["doa pagi", "dzikir pagi"]);

    let engine = engine_with(ScriptedProvider::failing(AiError::Network("offline".to_string())));
    assert!(engine.ai_suggestions("pag", 5).await.is_empty());
}

#[tokio::test]
async fn test_http_provider_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let completion = serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": judgment(1, 10.0, 1.0)}}]
    });
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion.to_string())
        .expect(1)
        .create_async()
        .await;

    let config = EngineConfig {
        ai: AiConfig {
            base_url: server.url(),
            ..Default::default()
        },
        ..Default::default()
    };
    let provider = HttpCompletionProvider::new(&config.ai).unwrap().with_api_key("key");
    let engine = SearchEngine::from_config(fixture_corpus(), &config, Some(Arc::new(provider))).unwrap();
    let candidates = candidate_ids(&engine, "makan");

    let options = SemanticSearchOptions::new("makan");
    let results = engine.semantic_search(&options).await;
    engine.semantic_search(&options).await;

    assert_eq!(results[0].document().id, candidates[1]);
    assert_eq!(results[0].ai_score, 10.0);
    mock.assert_async().await;
}
