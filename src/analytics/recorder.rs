//! Append-only query and click log

use crate::analytics::config::AnalyticsConfig;
use crate::analytics::store::{AnalyticsStore, InMemoryAnalyticsStore, SledAnalyticsStore};
use crate::analytics::writer::SnapshotWriter;
use crate::search::tokenizer::canonical_query;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// One recorded search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEntry {
    pub query: String,
    pub timestamp: DateTime<Utc>,

    /// Zero until the search completes
    pub result_count: usize,

    pub session_id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicked_document_id: Option<String>,
}

/// Handle to a pending entry, redeemed by [`AnalyticsRecorder::complete_search`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket {
    sequence: u64,
}

/// How often a query was searched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCount {
    pub query: String,
    pub count: usize,
}

/// Aggregate view over the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub session_id: Uuid,
    pub total_searches: usize,
    pub clicks: usize,
    pub click_through_rate: f64,
    pub zero_result_searches: usize,
    pub top_queries: Vec<QueryCount>,
}

struct Log {
    entries: VecDeque<AnalyticsEntry>,
    /// Sequence number of `entries[0]`
    first_sequence: u64,
}

impl Log {
    fn position(&self, ticket: SearchTicket) -> Option<usize> {
        let offset = ticket.sequence.checked_sub(self.first_sequence)?;
        usize::try_from(offset).ok().filter(|&i| i < self.entries.len())
    }
}

/// Records searches and clicks, persisting the full log on every change.
///
/// Saving happens on a writer thread; dropping the recorder waits for
/// queued snapshots to be written.
pub struct AnalyticsRecorder {
    session_id: Uuid,
    log: Mutex<Log>,
    writer: SnapshotWriter,
    config: AnalyticsConfig,
}

impl AnalyticsRecorder {
    /// Create a recorder, loading any previously saved log from `store`
    pub fn new(store: Arc<dyn AnalyticsStore>, config: AnalyticsConfig) -> Self {
        let mut entries: VecDeque<AnalyticsEntry> = match store.load() {
            Ok(entries) => entries.into(),
            Err(e) => {
                warn!(error = %e, "Failed to load analytics, starting with an empty log");
                VecDeque::new()
            }
        };

        while entries.len() > config.max_entries {
            entries.pop_front();
        }

        Self {
            session_id: Uuid::new_v4(),
            log: Mutex::new(Log {
                entries,
                first_sequence: 0,
            }),
            writer: SnapshotWriter::spawn(store),
            config,
        }
    }

    /// Build a recorder from configuration. A sled store that cannot be
    /// opened degrades to an in-memory one.
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        let store: Arc<dyn AnalyticsStore> = match config.path {
            Some(ref path) => match SledAnalyticsStore::open(path) {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    warn!(path = ?path, error = %e, "Analytics store unavailable, keeping analytics in memory");
                    Arc::new(InMemoryAnalyticsStore::new())
                }
            },
            None => Arc::new(InMemoryAnalyticsStore::new()),
        };

        Self::new(store, config.clone())
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Append a pending entry for `query`
    pub fn record_search(&self, query: &str) -> SearchTicket {
        let mut log = self.log.lock();

        log.entries.push_back(AnalyticsEntry {
            query: query.trim().to_string(),
            timestamp: Utc::now(),
            result_count: 0,
            session_id: self.session_id,
            clicked_document_id: None,
        });
        let sequence = log.first_sequence + log.entries.len() as u64 - 1;

        while log.entries.len() > self.config.max_entries {
            log.entries.pop_front();
            log.first_sequence += 1;
        }

        self.persist(&log);
        SearchTicket { sequence }
    }

    /// Back-fill the result count of a pending entry. Returns false when the
    /// entry has already been evicted.
    pub fn complete_search(&self, ticket: SearchTicket, result_count: usize) -> bool {
        let mut log = self.log.lock();

        let Some(position) = log.position(ticket) else {
            return false;
        };
        log.entries[position].result_count = result_count;

        self.persist(&log);
        true
    }

    /// Attach `document_id` to the most recent entry for `query` among the
    /// last `click_window` entries
    pub fn record_click(&self, query: &str, document_id: &str) -> bool {
        let wanted = canonical_query(query);
        let mut log = self.log.lock();

        let window = self.config.click_window;
        let Some(entry) = log
            .entries
            .iter_mut()
            .rev()
            .take(window)
            .find(|entry| canonical_query(&entry.query) == wanted)
        else {
            return false;
        };
        entry.clicked_document_id = Some(document_id.to_string());

        self.persist(&log);
        true
    }

    /// Copy of the log, oldest first
    pub fn entries(&self) -> Vec<AnalyticsEntry> {
        self.log.lock().entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.log.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.lock().entries.is_empty()
    }

    /// Most frequent queries (canonical form), ties broken alphabetically
    pub fn popular_queries(&self, limit: usize) -> Vec<QueryCount> {
        let log = self.log.lock();

        let mut counts: HashMap<String, usize> = HashMap::new();
        for entry in &log.entries {
            let query = canonical_query(&entry.query);
            if !query.is_empty() {
                *counts.entry(query).or_insert(0) += 1;
            }
        }

        let mut popular: Vec<QueryCount> = counts
            .into_iter()
            .map(|(query, count)| QueryCount { query, count })
            .collect();
        popular.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.query.cmp(&b.query)));
        popular.truncate(limit);
        popular
    }

    pub fn summary(&self, top_n: usize) -> AnalyticsSummary {
        let (total_searches, clicks, zero_result_searches) = {
            let log = self.log.lock();
            (
                log.entries.len(),
                log.entries
                    .iter()
                    .filter(|e| e.clicked_document_id.is_some())
                    .count(),
                log.entries.iter().filter(|e| e.result_count == 0).count(),
            )
        };

        let click_through_rate = if total_searches == 0 {
            0.0
        } else {
            clicks as f64 / total_searches as f64
        };

        AnalyticsSummary {
            session_id: self.session_id,
            total_searches,
            clicks,
            click_through_rate,
            zero_result_searches,
            top_queries: self.popular_queries(top_n),
        }
    }

    /// Wait until every change so far is saved and flushed to the store
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Queue a snapshot while the log lock is held, so snapshots reach the
    /// writer in mutation order
    fn persist(&self, log: &Log) {
        self.writer.save(log.entries.iter().cloned().collect());
    }
}
