//! Analytics persistence boundary
//!
//! The whole log is one JSON array stored under a single key. It is read
//! once when a recorder starts and overwritten by the recorder's writer
//! thread after every mutation.

use crate::analytics::error::AnalyticsResult;
use crate::analytics::recorder::AnalyticsEntry;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Durable home of the analytics snapshot
pub trait AnalyticsStore: Send + Sync {
    /// Read the stored snapshot; empty when nothing was saved yet
    fn load(&self) -> AnalyticsResult<Vec<AnalyticsEntry>>;

    /// Replace the stored snapshot
    fn save(&self, entries: &[AnalyticsEntry]) -> AnalyticsResult<()>;

    /// Make saved snapshots durable
    fn flush(&self) -> AnalyticsResult<()> {
        Ok(())
    }
}

/// Process-local store, used when no path is configured and in tests
#[derive(Default)]
pub struct InMemoryAnalyticsStore {
    snapshot: Mutex<Vec<AnalyticsEntry>>,
    saves: AtomicUsize,
}

impl InMemoryAnalyticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously saved snapshot
    pub fn with_entries(entries: Vec<AnalyticsEntry>) -> Self {
        Self {
            snapshot: Mutex::new(entries),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of `save` calls so far
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<AnalyticsEntry> {
        self.snapshot.lock().clone()
    }
}

impl AnalyticsStore for InMemoryAnalyticsStore {
    fn load(&self) -> AnalyticsResult<Vec<AnalyticsEntry>> {
        Ok(self.snapshot.lock().clone())
    }

    fn save(&self, entries: &[AnalyticsEntry]) -> AnalyticsResult<()> {
        *self.snapshot.lock() = entries.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Sled-backed store
#[derive(Clone)]
pub struct SledAnalyticsStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledAnalyticsStore {
    const TREE: &'static str = "analytics";
    const KEY: &'static [u8] = b"search_analytics";

    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> AnalyticsResult<Self> {
        let db = sled::open(path.as_ref())?;
        let tree = db.open_tree(Self::TREE)?;

        info!("Initialized analytics store at {:?}", path.as_ref());

        Ok(Self { db, tree })
    }
}

impl AnalyticsStore for SledAnalyticsStore {
    fn load(&self) -> AnalyticsResult<Vec<AnalyticsEntry>> {
        match self.tree.get(Self::KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, entries: &[AnalyticsEntry]) -> AnalyticsResult<()> {
        let value = serde_json::to_vec(entries)?;
        self.tree.insert(Self::KEY, value)?;

        debug!(entries = entries.len(), "Analytics snapshot saved");
        Ok(())
    }

    fn flush(&self) -> AnalyticsResult<()> {
        let bytes = self.db.flush()?;
        debug!(bytes, "Analytics store flushed");
        Ok(())
    }
}
