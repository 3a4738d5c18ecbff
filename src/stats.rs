//! Run statistics for the capture pipeline.
//!
//! Counters only; no key content is kept here. The counters are atomic so the
//! shutdown handler can print a summary while the pipeline is blocked on a
//! read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters updated by the pipeline as it processes events.
#[derive(Debug)]
pub struct CaptureStats {
    /// Raw events read from the device
    events_read: AtomicU64,
    /// Recognized keys written to the log
    keys_logged: AtomicU64,
    /// Session headers written
    sessions_started: AtomicU64,
    /// Key presses with no text mapping
    unrecognized_keys: AtomicU64,
    /// Header fields that fell back to a placeholder
    context_failures: AtomicU64,
    /// When the run started
    run_start: DateTime<Utc>,
}

impl CaptureStats {
    pub fn new() -> Self {
        Self {
            events_read: AtomicU64::new(0),
            keys_logged: AtomicU64::new(0),
            sessions_started: AtomicU64::new(0),
            unrecognized_keys: AtomicU64::new(0),
            context_failures: AtomicU64::new(0),
            run_start: Utc::now(),
        }
    }

    pub fn record_event_read(&self) {
        self.events_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_key_logged(&self) {
        self.keys_logged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unrecognized_key(&self) {
        self.unrecognized_keys.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_context_failures(&self, count: u64) {
        self.context_failures.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            events_read: self.events_read.load(Ordering::Relaxed),
            keys_logged: self.keys_logged.load(Ordering::Relaxed),
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            unrecognized_keys: self.unrecognized_keys.load(Ordering::Relaxed),
            context_failures: self.context_failures.load(Ordering::Relaxed),
            run_start: self.run_start,
            run_duration_secs: (Utc::now() - self.run_start).num_seconds().max(0) as u64,
        }
    }

    /// Human readable summary for the end of a run.
    pub fn summary(&self) -> String {
        let stats = self.snapshot();
        format!(
            "Capture Statistics:\n\
             - Events read: {}\n\
             - Keys logged: {}\n\
             - Sessions started: {}\n\
             - Unrecognized keys skipped: {}\n\
             - Context placeholders used: {}\n\
             - Run duration: {} seconds",
            stats.events_read,
            stats.keys_logged,
            stats.sessions_started,
            stats.unrecognized_keys,
            stats.context_failures,
            stats.run_duration_secs
        )
    }
}

impl Default for CaptureStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub events_read: u64,
    pub keys_logged: u64,
    pub sessions_started: u64,
    pub unrecognized_keys: u64,
    pub context_failures: u64,
    pub run_start: DateTime<Utc>,
    pub run_duration_secs: u64,
}

/// Stats shared between the pipeline and the shutdown handler.
pub type SharedStats = Arc<CaptureStats>;

pub fn create_shared_stats() -> SharedStats {
    Arc::new(CaptureStats::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting() {
        let stats = CaptureStats::new();
        stats.record_event_read();
        stats.record_event_read();
        stats.record_key_logged();
        stats.record_session_started();
        stats.record_context_failures(2);

        let snap = stats.snapshot();
        assert_eq!(snap.events_read, 2);
        assert_eq!(snap.keys_logged, 1);
        assert_eq!(snap.sessions_started, 1);
        assert_eq!(snap.unrecognized_keys, 0);
        assert_eq!(snap.context_failures, 2);
    }

    #[test]
    fn test_summary_format() {
        let stats = CaptureStats::new();
        stats.record_unrecognized_key();
        let summary = stats.summary();

        assert!(summary.contains("Keys logged: 0"));
        assert!(summary.contains("Unrecognized keys skipped: 1"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = CaptureStats::new().snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: StatsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
