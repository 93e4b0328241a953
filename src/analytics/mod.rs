//! Search analytics
//!
//! An append-only, capacity-bounded log of searches and clicks. Each
//! search appends a pending entry that is back-filled with its result
//! count; clicks are attributed to the most recent matching search. The
//! full log is persisted as one snapshot after every change on a
//! background writer thread, and persistence failures are logged rather
//! than returned.

pub mod config;
pub mod error;
pub mod recorder;
pub mod store;
mod writer;

pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, AnalyticsResult};
pub use recorder::{AnalyticsEntry, AnalyticsRecorder, AnalyticsSummary, QueryCount, SearchTicket};
pub use store::{AnalyticsStore, InMemoryAnalyticsStore, SledAnalyticsStore};
