// Notification batching
//
// Completions often arrive in bursts (the pipeline drains a whole drop
// folder at once). Instead of one toast per file, completions are queued
// behind a sliding debounce window: each arrival re-arms the timer, and
// only when the feed goes quiet does the queue flush - individually for a
// few files, as a single per-domain summary for many.

use crate::metrics::MonitorMetrics;
use crate::models::Domain;
use crate::monitor::MonitorEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

/// One completed file waiting to be announced.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingNotification {
    pub file_name: String,
    pub domain: Domain,
    pub confidence: f64,
}

/// Outcome of one flush, as delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A single file finished; full detail
    Detailed {
        file_name: String,
        domain: Domain,
        confidence: f64,
    },

    /// One of a small burst of files; abbreviated detail
    Brief { file_name: String, domain: Domain },

    /// A large burst, collapsed into per-domain counts
    Summary {
        total: usize,
        mind: usize,
        body: usize,
        heart: usize,
        soul: usize,
    },
}

impl Notification {
    /// Human-readable one-liner for logs and toasts.
    pub fn headline(&self) -> String {
        match self {
            Notification::Detailed {
                file_name,
                domain,
                confidence,
            } => format!(
                "{file_name} ingested into {domain} ({:.0}% confidence)",
                confidence * 100.0
            ),
            Notification::Brief { file_name, domain } => format!("{file_name} → {domain}"),
            Notification::Summary {
                total,
                mind,
                body,
                heart,
                soul,
            } => {
                let mut parts = Vec::new();
                for (label, count) in [
                    ("Mind", *mind),
                    ("Body", *body),
                    ("Heart", *heart),
                    ("Soul", *soul),
                ] {
                    if count > 0 {
                        parts.push(format!("{label}: {count}"));
                    }
                }
                format!("{total} files ingested: {}", parts.join(", "))
            }
        }
    }
}

/// Turn one drained batch into the notifications to emit.
///
/// - empty: nothing (defensive; the timer is only armed on push)
/// - one entry: a single detailed notification
/// - up to `summary_threshold` entries: one brief notification each
/// - more: exactly one summary with per-domain counts
pub fn flush_policy(
    batch: Vec<PendingNotification>,
    summary_threshold: usize,
) -> Vec<Notification> {
    match batch.len() {
        0 => Vec::new(),
        1 => batch
            .into_iter()
            .map(|pending| Notification::Detailed {
                file_name: pending.file_name,
                domain: pending.domain,
                confidence: pending.confidence,
            })
            .collect(),
        n if n <= summary_threshold => batch
            .into_iter()
            .map(|pending| Notification::Brief {
                file_name: pending.file_name,
                domain: pending.domain,
            })
            .collect(),
        n => {
            let mut mind = 0;
            let mut body = 0;
            let mut heart = 0;
            let mut soul = 0;
            for pending in &batch {
                match pending.domain {
                    Domain::Mind => mind += 1,
                    Domain::Body => body += 1,
                    Domain::Heart => heart += 1,
                    Domain::Soul => soul += 1,
                }
            }
            vec![Notification::Summary {
                total: n,
                mind,
                body,
                heart,
                soul,
            }]
        }
    }
}

/// Handle feeding completions into the batcher task.
#[derive(Clone)]
pub struct NotificationBatcher {
    tx: mpsc::UnboundedSender<PendingNotification>,
}

impl NotificationBatcher {
    /// Spawn the batcher task.
    ///
    /// Flush outcomes are emitted as [`MonitorEvent::Notification`] on
    /// `events`. The task exits when `shutdown` flips or every handle is
    /// dropped; anything still queued at shutdown is discarded.
    pub fn spawn(
        window: Duration,
        summary_threshold: usize,
        events: broadcast::Sender<MonitorEvent>,
        metrics: Arc<MonitorMetrics>,
        mut shutdown: watch::Receiver<bool>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<PendingNotification>();

        let task = tokio::spawn(async move {
            let mut pending: Vec<PendingNotification> = Vec::new();
            // Absolute deadline; re-armed on every push so the window
            // keeps sliding while completions keep arriving.
            let mut flush_at = Instant::now();
            let mut armed = false;

            loop {
                tokio::select! {
                    _ = shutdown.changed() => break,
                    item = rx.recv() => match item {
                        Some(notification) => {
                            pending.push(notification);
                            flush_at = Instant::now() + window;
                            armed = true;
                        }
                        None => break,
                    },
                    _ = sleep_until(flush_at), if armed => {
                        armed = false;
                        let batch = std::mem::take(&mut pending);
                        let count = batch.len();
                        for notification in flush_policy(batch, summary_threshold) {
                            tracing::info!(notice = %notification.headline(), "notification");
                            metrics.record_notification();
                            if events.send(MonitorEvent::Notification(notification)).is_err() {
                                metrics.record_event_send_error();
                            }
                        }
                        tracing::debug!(count, "flushed completion batch");
                    }
                }
            }
        });

        (Self { tx }, task)
    }

    /// Queue a completed file for announcement.
    pub fn push(&self, notification: PendingNotification) {
        // Send only fails when the task is gone, i.e. during teardown.
        let _ = self.tx.send(notification);
    }
}
