//! Monitor wiring - the poll loop, progress simulation, and event surface.
//!
//! This module ties the pieces together:
//! - [`IngestionMonitor`]: owns the settings, registry, metrics, and the
//!   broadcast channel; [`start`](IngestionMonitor::start) spawns the tasks
//! - poll task: fetches snapshots on a fixed interval, feeds the
//!   [`TransitionDetector`], applies events to the registry, the stats
//!   sink, and the [`NotificationBatcher`]
//! - progress task: advances simulated progress on its own tick
//! - [`MonitorHandle`]: read access plus coordinated shutdown through a
//!   watch channel, the same cancellation shape used for every task
//!
//! All mutation funnels through the poll and progress tasks; subscribers
//! and UI code only ever see clones.

pub mod batcher;

pub use batcher::{Notification, NotificationBatcher, PendingNotification, flush_policy};

use crate::metrics::{MonitorMetrics, StatsSink};
use crate::models::{Domain, MonitorSettings, StatusSnapshot};
use crate::services::status_source::{StatusFetchError, StatusSource};
use crate::state::{ActiveFileRegistry, LifecycleEvent, TransitionDetector};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, timeout};

/// Events emitted on the monitor's broadcast channel.
///
/// Subscribers get lifecycle transitions, link health changes, and batched
/// notifications without polling any monitor state.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// The pipeline picked up a file
    FileStarted {
        file_name: String,
        domain: Domain,
        confidence: f64,
    },

    /// A file finished successfully; emitted once per completion,
    /// independent of notification batching
    FileCompleted {
        file_name: String,
        domain: Domain,
        confidence: f64,
    },

    /// A file failed to ingest
    FileFailed { file_name: String },

    /// Status fetches started failing; stale data is being displayed
    LinkDegraded { error: String },

    /// Status fetches succeed again after an outage
    LinkRestored,

    /// A batched notification, per the flush policy
    Notification(Notification),
}

/// The ingestion activity monitor.
///
/// Construct with [`new`](Self::new), subscribe as needed, then hand it a
/// [`StatusSource`] and a [`StatsSink`] via [`start`](Self::start). Starting
/// consumes the monitor; the returned [`MonitorHandle`] carries the same
/// read surface.
///
/// # Example
/// ```ignore
/// let monitor = IngestionMonitor::new(settings);
/// let mut events = monitor.subscribe();
/// let handle = monitor.start(HttpStatusSource::new(url), tally);
/// while let Ok(event) = events.recv().await { /* render */ }
/// ```
pub struct IngestionMonitor {
    settings: MonitorSettings,
    registry: ActiveFileRegistry,
    metrics: Arc<MonitorMetrics>,
    events: broadcast::Sender<MonitorEvent>,
    latest: Arc<RwLock<Option<StatusSnapshot>>>,
}

impl IngestionMonitor {
    /// Create a monitor with the given settings. No tasks run yet.
    pub fn new(settings: MonitorSettings) -> Self {
        let (events, _) = broadcast::channel(100);
        Self {
            registry: ActiveFileRegistry::new(settings.eviction_grace()),
            settings,
            metrics: Arc::new(MonitorMetrics::new()),
            events,
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Subscribe to monitor events. Valid before and after `start`.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.events.subscribe()
    }

    /// Handle to the shared file registry.
    pub fn registry(&self) -> ActiveFileRegistry {
        self.registry.clone()
    }

    /// Operational counters.
    pub fn metrics(&self) -> Arc<MonitorMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Spawn the poll, progress, and batcher tasks.
    pub fn start<S: StatusSource>(self, source: S, sink: Arc<dyn StatsSink>) -> MonitorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let (notifier, batcher_task) = NotificationBatcher::spawn(
            self.settings.batch_window(),
            self.settings.batch_summary_threshold,
            self.events.clone(),
            Arc::clone(&self.metrics),
            shutdown_rx.clone(),
        );

        let context = PollContext {
            sink,
            registry: self.registry.clone(),
            notifier,
            events: self.events.clone(),
            metrics: Arc::clone(&self.metrics),
            latest: Arc::clone(&self.latest),
        };

        let poll_task = tokio::spawn(run_poll_loop(
            source,
            context,
            self.settings.poll_interval(),
            shutdown_rx.clone(),
        ));

        let progress_task = tokio::spawn(run_progress_loop(
            self.registry.clone(),
            self.settings.progress_tick(),
            self.settings.simulated_duration(),
            shutdown_rx,
        ));

        tracing::info!(
            poll_ms = self.settings.poll_interval_ms,
            tick_ms = self.settings.progress_tick_ms,
            "ingestion monitor started"
        );

        MonitorHandle {
            registry: self.registry,
            metrics: self.metrics,
            events: self.events,
            latest: self.latest,
            shutdown: shutdown_tx,
            tasks: vec![poll_task, progress_task, batcher_task],
        }
    }
}

/// Running monitor: read access plus teardown.
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown) also
/// stops the tasks (the watch sender closes), but `shutdown` waits for
/// them to wind down.
pub struct MonitorHandle {
    registry: ActiveFileRegistry,
    metrics: Arc<MonitorMetrics>,
    events: broadcast::Sender<MonitorEvent>,
    latest: Arc<RwLock<Option<StatusSnapshot>>>,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Subscribe to monitor events.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.events.subscribe()
    }

    /// Handle to the shared file registry.
    pub fn registry(&self) -> ActiveFileRegistry {
        self.registry.clone()
    }

    /// The last successfully fetched snapshot, if any.
    pub fn latest_status(&self) -> Option<StatusSnapshot> {
        self.latest.read().unwrap().clone()
    }

    /// Operational counters.
    pub fn metrics(&self) -> Arc<MonitorMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Stop all monitor tasks. An in-flight status fetch is abandoned, not
    /// awaited; its result is discarded.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for mut task in self.tasks {
            if timeout(Duration::from_secs(5), &mut task).await.is_err() {
                task.abort();
            }
        }
        tracing::info!("ingestion monitor stopped");
    }
}

/// Everything the poll loop mutates or notifies, bundled so the loop and
/// the snapshot handler stay readable.
struct PollContext {
    sink: Arc<dyn StatsSink>,
    registry: ActiveFileRegistry,
    notifier: NotificationBatcher,
    events: broadcast::Sender<MonitorEvent>,
    metrics: Arc<MonitorMetrics>,
    latest: Arc<RwLock<Option<StatusSnapshot>>>,
}

impl PollContext {
    /// Diff a snapshot against the previous one and fan the resulting
    /// events out to the registry, sink, batcher, and subscribers.
    fn apply_snapshot(&self, detector: &mut TransitionDetector, snapshot: StatusSnapshot) {
        for event in detector.observe(snapshot.clone()) {
            match event {
                LifecycleEvent::Started {
                    file_name,
                    domain,
                    confidence,
                } => {
                    self.registry.on_started(&file_name, domain, confidence);
                    self.metrics.record_file_started();
                    tracing::info!(file = %file_name, %domain, "file started");
                    self.send_event(MonitorEvent::FileStarted {
                        file_name,
                        domain,
                        confidence,
                    });
                }
                LifecycleEvent::Completed {
                    file_name,
                    domain,
                    confidence,
                } => {
                    // Registry may not know the file (started before the
                    // monitor attached); sink and batcher still must.
                    self.registry.on_completed(&file_name);
                    self.sink.increment(domain);
                    self.notifier.push(PendingNotification {
                        file_name: file_name.clone(),
                        domain,
                        confidence,
                    });
                    self.metrics.record_file_completed();
                    tracing::info!(file = %file_name, %domain, "file completed");
                    self.send_event(MonitorEvent::FileCompleted {
                        file_name,
                        domain,
                        confidence,
                    });
                }
                LifecycleEvent::Failed { file_name } => {
                    self.registry.on_failed(&file_name);
                    self.metrics.record_file_failed();
                    tracing::warn!(file = %file_name, "file failed");
                    self.send_event(MonitorEvent::FileFailed { file_name });
                }
            }
        }
        *self.latest.write().unwrap() = Some(snapshot);
    }

    fn send_event(&self, event: MonitorEvent) {
        // Ignore send errors - it's OK if no one is listening.
        if self.events.send(event).is_err() {
            self.metrics.record_event_send_error();
        }
    }
}

async fn run_poll_loop<S: StatusSource>(
    source: S,
    context: PollContext,
    poll_interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut detector = TransitionDetector::new();
    let mut ticker = interval(poll_interval);
    // The fetch is awaited inline, so a slow endpoint skips ticks instead
    // of piling up overlapping requests.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut degraded = false;

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            _ = shutdown.changed() => break,
            result = timeout(poll_interval, source.fetch_status()) => match result {
                Ok(inner) => inner,
                Err(_) => Err(StatusFetchError::TimedOut(poll_interval)),
            },
        };

        match outcome {
            Ok(snapshot) => {
                context.metrics.record_poll_success();
                if degraded {
                    degraded = false;
                    tracing::info!("status link restored");
                    context.send_event(MonitorEvent::LinkRestored);
                }
                context.apply_snapshot(&mut detector, snapshot);
            }
            Err(error) => {
                context.metrics.record_poll_failure();
                tracing::warn!(%error, "status fetch failed; keeping last snapshot");
                if !degraded {
                    degraded = true;
                    context.send_event(MonitorEvent::LinkDegraded {
                        error: error.to_string(),
                    });
                }
                // Re-feed the last good snapshot. A self-diff emits no
                // events, so downstream state just stays put.
                let last = context.latest.read().unwrap().clone();
                if let Some(snapshot) = last {
                    context.apply_snapshot(&mut detector, snapshot);
                }
            }
        }
    }
}

async fn run_progress_loop(
    registry: ActiveFileRegistry,
    tick: Duration,
    simulated_duration: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => registry.advance_progress(simulated_duration),
        }
    }
}
