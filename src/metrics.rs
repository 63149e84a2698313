// Metrics module
//
// Two concerns live here: the StatsSink contract the monitor increments
// once per completed file, and the monitor's own operational counters.
// Both use atomic operations for thread-safe tracking without locks.

use crate::models::Domain;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

/// Receiver of per-domain completion counts.
///
/// The monitor calls [`increment`](Self::increment) exactly once per
/// completed file, independent of how notifications are batched. Failed
/// files are never counted. Implementors own the counter representation;
/// [`DomainTally`] is the default in-process one.
pub trait StatsSink: Send + Sync {
    /// Record one completed file in `domain`.
    fn increment(&self, domain: Domain);
}

/// Default [`StatsSink`]: lock-free per-domain counters.
#[derive(Debug, Default)]
pub struct DomainTally {
    mind: AtomicUsize,
    body: AtomicUsize,
    heart: AtomicUsize,
    soul: AtomicUsize,
}

impl DomainTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count for one domain.
    pub fn get(&self, domain: Domain) -> usize {
        self.cell(domain).load(Ordering::Relaxed)
    }

    /// Total completed files across all domains.
    pub fn total(&self) -> usize {
        Domain::ALL.iter().map(|d| self.get(*d)).sum()
    }

    fn cell(&self, domain: Domain) -> &AtomicUsize {
        match domain {
            Domain::Mind => &self.mind,
            Domain::Body => &self.body,
            Domain::Heart => &self.heart,
            Domain::Soul => &self.soul,
        }
    }
}

impl StatsSink for DomainTally {
    fn increment(&self, domain: Domain) {
        self.cell(domain).fetch_add(1, Ordering::Relaxed);
    }
}

/// Operational counters for the monitor itself.
///
/// Collected throughout the monitor's lifetime and dumped on shutdown via
/// [`log_summary`](Self::log_summary). Distinct from [`DomainTally`], which
/// belongs to the exposed stats contract.
#[derive(Debug)]
pub struct MonitorMetrics {
    /// Successful status fetches
    pub polls_succeeded: AtomicU64,

    /// Failed or timed-out status fetches
    pub polls_failed: AtomicU64,

    /// Files observed starting
    pub files_started: AtomicUsize,

    /// Files observed completing
    pub files_completed: AtomicUsize,

    /// Files observed failing
    pub files_failed: AtomicUsize,

    /// Notifications emitted after batching
    pub notifications_emitted: AtomicU64,

    /// Events dropped because no subscriber was listening
    pub event_send_errors: AtomicU64,

    /// Monitor start time
    start_time: Instant,
}

impl MonitorMetrics {
    pub fn new() -> Self {
        Self {
            polls_succeeded: AtomicU64::new(0),
            polls_failed: AtomicU64::new(0),
            files_started: AtomicUsize::new(0),
            files_completed: AtomicUsize::new(0),
            files_failed: AtomicUsize::new(0),
            notifications_emitted: AtomicU64::new(0),
            event_send_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_poll_success(&self) {
        self.polls_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_poll_failure(&self) {
        self.polls_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_started(&self) {
        self.files_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_completed(&self) {
        self.files_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notification(&self) {
        self.notifications_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event_send_error(&self) {
        self.event_send_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total uptime
    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Monitor Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Polls: {} succeeded, {} failed",
            self.polls_succeeded.load(Ordering::Relaxed),
            self.polls_failed.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Files: {} started, {} completed, {} failed",
            self.files_started.load(Ordering::Relaxed),
            self.files_completed.load(Ordering::Relaxed),
            self.files_failed.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Notifications: {} emitted, {} event send errors",
            self.notifications_emitted.load(Ordering::Relaxed),
            self.event_send_errors.load(Ordering::Relaxed)
        );
    }
}

impl Default for MonitorMetrics {
    fn default() -> Self {
        Self::new()
    }
}
