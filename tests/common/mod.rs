//! Shared fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use prayer_search::ai::{AiError, AiResult, ChatMessage, CompletionProvider};
use prayer_search::models::Document;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Small bilingual corpus used across tests
pub fn fixture_corpus() -> Vec<Document> {
    vec![
        Document::new("pagi", "Doa Pagi", "Harian")
            .with_latin("Allahumma bika ashbahna")
            .with_translation("O Allah, by Your leave we have reached the morning")
            .with_tags(["pagi", "dzikir"]),
        Document::new("tidur", "Doa Tidur", "Harian")
            .with_latin("Bismika allahumma amutu wa ahya")
            .with_translation("In Your name O Allah, I die and I live")
            .with_tags(["tidur", "malam"]),
        Document::new("sebelum-makan", "Doa Sebelum Makan", "Makan")
            .with_arabic("اللَّهُمَّ بَارِكْ لَنَا")
            .with_translation("O Allah, bless the food You have provided us")
            .with_tags(["makan"]),
        Document::new("sesudah-makan", "Doa Sesudah Makan", "Makan")
            .with_translation("Praise be to Allah who gave us food and drink")
            .with_tags(["makan", "syukur"]),
        Document::new("kendaraan", "Doa Naik Kendaraan", "Perjalanan")
            .with_translation("Glory to Him who has subjected this to us")
            .with_tags(["perjalanan", "safar"])
            .with_source("HR. Muslim"),
        Document::new("masjid", "Doa Masuk Masjid", "Ibadah")
            .with_translation("O Allah, open for me the doors of Your mercy")
            .with_tags(["masjid"]),
    ]
}

/// Completion provider with a fixed reply that counts its invocations
pub struct ScriptedProvider {
    reply: AiResult<String>,
    delay: Duration,
    calls: AtomicUsize,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub fn replying(reply: impl Into<String>) -> Arc<Self> {
        Self::build(Ok(reply.into()), Duration::ZERO)
    }

    pub fn failing(err: AiError) -> Arc<Self> {
        Self::build(Err(err), Duration::ZERO)
    }

    pub fn slow(reply: impl Into<String>, delay: Duration) -> Arc<Self> {
        Self::build(Ok(reply.into()), delay)
    }

    fn build(reply: AiResult<String>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply,
            delay,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// User message of the most recent request
    pub fn last_user_prompt(&self) -> Option<String> {
        self.prompts
            .lock()
            .last()
            .and_then(|messages| messages.last())
            .map(|message| message.content.clone())
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> AiResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(messages.to_vec());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone()
    }
}

/// Rerank reply judging a single candidate
pub fn judgment(index: usize, score: f64, confidence: f64) -> String {
    format!(
        r#"{{"analyses":[{{"index":{},"relevanceScore":{},"reason":"Strong situational match","semanticMatches":["meal"],"confidence":{}}}]}}"#,
        index, score, confidence
    )
}

pub fn ids<'a, I>(documents: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Document>,
{
    documents.into_iter().map(|d| d.id.clone()).collect()
}
