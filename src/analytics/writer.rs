//! Background persistence of analytics snapshots
//!
//! Recorders hand each new snapshot to a dedicated writer thread and return
//! immediately. The writer saves the newest queued snapshot and skips the
//! ones it superseded, so a slow store never holds up a search.

use crate::analytics::recorder::AnalyticsEntry;
use crate::analytics::store::AnalyticsStore;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum WriterCommand {
    Save(Vec<AnalyticsEntry>),
    Flush(oneshot::Sender<()>),
}

pub(crate) struct SnapshotWriter {
    sender: Option<mpsc::UnboundedSender<WriterCommand>>,
    handle: Option<JoinHandle<()>>,
    store: Arc<dyn AnalyticsStore>,
}

impl SnapshotWriter {
    /// Start the writer thread. When the thread cannot be started, snapshots
    /// are saved on the caller's thread instead.
    pub(crate) fn spawn(store: Arc<dyn AnalyticsStore>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker_store = store.clone();

        let spawned = std::thread::Builder::new()
            .name("analytics-writer".to_string())
            .spawn(move || run(worker_store, receiver));

        match spawned {
            Ok(handle) => Self {
                sender: Some(sender),
                handle: Some(handle),
                store,
            },
            Err(e) => {
                warn!(error = %e, "Failed to start analytics writer, saving inline");
                Self {
                    sender: None,
                    handle: None,
                    store,
                }
            }
        }
    }

    /// Queue `snapshot` for saving
    pub(crate) fn save(&self, snapshot: Vec<AnalyticsEntry>) {
        let queued = match self.sender {
            Some(ref sender) => sender.send(WriterCommand::Save(snapshot)),
            None => {
                save(self.store.as_ref(), &snapshot);
                return;
            }
        };

        if let Err(mpsc::error::SendError(WriterCommand::Save(snapshot))) = queued {
            save(self.store.as_ref(), &snapshot);
        }
    }

    /// Wait until every snapshot queued so far is saved and flushed
    pub(crate) async fn flush(&self) {
        let (done, waiter) = oneshot::channel();
        let queued = self
            .sender
            .as_ref()
            .is_some_and(|sender| sender.send(WriterCommand::Flush(done)).is_ok());

        if !queued || waiter.await.is_err() {
            flush(self.store.as_ref());
        }
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        // Closing the channel lets the thread drain what is queued and exit
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Analytics writer panicked");
            }
        }
    }
}

fn run(store: Arc<dyn AnalyticsStore>, mut receiver: mpsc::UnboundedReceiver<WriterCommand>) {
    while let Some(command) = receiver.blocking_recv() {
        let mut latest = None;
        let mut waiters = Vec::new();

        let mut next = Some(command);
        while let Some(command) = next.take() {
            match command {
                WriterCommand::Save(snapshot) => latest = Some(snapshot),
                WriterCommand::Flush(done) => waiters.push(done),
            }
            next = receiver.try_recv().ok();
        }

        if let Some(snapshot) = latest {
            save(store.as_ref(), &snapshot);
        }

        if !waiters.is_empty() {
            flush(store.as_ref());
            for done in waiters {
                let _ = done.send(());
            }
        }
    }

    debug!("Analytics writer stopped");
}

fn save(store: &dyn AnalyticsStore, snapshot: &[AnalyticsEntry]) {
    if let Err(e) = store.save(snapshot) {
        warn!(error = %e, "Failed to persist analytics");
    }
}

fn flush(store: &dyn AnalyticsStore) {
    if let Err(e) = store.flush() {
        warn!(error = %e, "Failed to flush analytics");
    }
}
