// State management module
//
// This module provides the ActiveFileRegistry, the shared table of
// in-flight and recently-finished file records, plus the transition
// detector that feeds it. The registry is wrapped in Arc<RwLock<T>> so the
// poll task, the progress task, and UI readers can share it; mutations are
// short synchronous critical sections never held across awaits.

pub mod detector;

pub use detector::{LifecycleEvent, TransitionDetector, reduce};

use crate::models::{Domain, FileLifecycleRecord, FileStatus};
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

struct RegistryEntry {
    record: FileLifecycleRecord,
    // Bumped on every insert; a scheduled eviction only fires if its
    // generation still matches, so a file restarted during the grace
    // window is not swept away by the stale timer.
    generation: u64,
}

struct RegistryInner {
    entries: IndexMap<String, RegistryEntry>,
    next_generation: u64,
}

/// Keyed table of file lifecycle records, in insertion order.
///
/// The registry is the single writer of [`FileLifecycleRecord`]s: the
/// detector's events create and terminate records, the progress simulator
/// advances them, and everyone else reads clones via [`snapshot`].
///
/// Terminal records linger for a configurable grace delay so the UI can
/// show the finished state, then evict themselves.
///
/// [`snapshot`]: ActiveFileRegistry::snapshot
#[derive(Clone)]
pub struct ActiveFileRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    eviction_grace: Duration,
}

impl ActiveFileRegistry {
    /// Create an empty registry with the given eviction grace delay.
    pub fn new(eviction_grace: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                entries: IndexMap::new(),
                next_generation: 0,
            })),
            eviction_grace,
        }
    }

    /// Insert a fresh `Processing` record, replacing any stale entry for
    /// the same filename.
    pub fn on_started(&self, file_name: &str, domain: Domain, confidence: f64) {
        let mut inner = self.inner.write().unwrap();
        let generation = inner.next_generation;
        inner.next_generation += 1;
        inner.entries.insert(
            file_name.to_string(),
            RegistryEntry {
                record: FileLifecycleRecord::started(file_name.to_string(), domain, confidence),
                generation,
            },
        );
        tracing::debug!(file = %file_name, %domain, "tracking file");
    }

    /// Mark a record `Complete` with authoritative 100% progress and
    /// schedule its eviction.
    ///
    /// # Returns
    /// `false` if no record matched (the file started before the monitor
    /// attached); callers still notify and count such completions.
    pub fn on_completed(&self, file_name: &str) -> bool {
        let matched = {
            let mut inner = self.inner.write().unwrap();
            match inner.entries.get_mut(file_name) {
                Some(entry) => {
                    entry.record.status = FileStatus::Complete;
                    entry.record.progress = 100.0;
                    Some(entry.generation)
                }
                None => None,
            }
        };

        match matched {
            Some(generation) => {
                self.schedule_eviction(file_name.to_string(), generation);
                true
            }
            None => {
                tracing::debug!(file = %file_name, "completion for untracked file");
                false
            }
        }
    }

    /// Mark a record `Failed`, leaving progress at its last simulated
    /// value, and schedule its eviction.
    pub fn on_failed(&self, file_name: &str) -> bool {
        let matched = {
            let mut inner = self.inner.write().unwrap();
            match inner.entries.get_mut(file_name) {
                Some(entry) => {
                    entry.record.status = FileStatus::Failed;
                    Some(entry.generation)
                }
                None => None,
            }
        };

        match matched {
            Some(generation) => {
                self.schedule_eviction(file_name.to_string(), generation);
                true
            }
            None => {
                tracing::debug!(file = %file_name, "failure for untracked file");
                false
            }
        }
    }

    /// Remove a record unconditionally. No-op on an absent key.
    pub fn evict(&self, file_name: &str) {
        let mut inner = self.inner.write().unwrap();
        inner.entries.shift_remove(file_name);
    }

    /// Advance simulated progress for every `Processing` record.
    ///
    /// Called by the progress tick; terminal records are left alone since
    /// their progress is authoritative.
    pub fn advance_progress(&self, simulated_duration: Duration) {
        let mut inner = self.inner.write().unwrap();
        for entry in inner.entries.values_mut() {
            if entry.record.status == FileStatus::Processing {
                entry.record.progress = entry.record.simulated_progress(simulated_duration);
            }
        }
    }

    /// Clone out all records in insertion order, for rendering.
    pub fn snapshot(&self) -> Vec<FileLifecycleRecord> {
        let inner = self.inner.read().unwrap();
        inner.entries.values().map(|e| e.record.clone()).collect()
    }

    /// Clone out one record by filename.
    pub fn get(&self, file_name: &str) -> Option<FileLifecycleRecord> {
        let inner = self.inner.read().unwrap();
        inner.entries.get(file_name).map(|e| e.record.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn schedule_eviction(&self, file_name: String, generation: u64) {
        let inner = Arc::clone(&self.inner);
        let grace = self.eviction_grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let mut inner = inner.write().unwrap();
            let still_same = inner
                .entries
                .get(&file_name)
                .is_some_and(|e| e.generation == generation);
            if still_same {
                inner.entries.shift_remove(&file_name);
                tracing::debug!(file = %file_name, "evicted finished record");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, advance};

    const GRACE: Duration = Duration::from_millis(3000);

    fn registry() -> ActiveFileRegistry {
        ActiveFileRegistry::new(GRACE)
    }

    #[tokio::test(start_paused = true)]
    async fn test_started_inserts_processing_record() {
        let reg = registry();
        reg.on_started("a.log", Domain::Body, 0.92);

        let record = reg.get("a.log").unwrap();
        assert_eq!(record.status, FileStatus::Processing);
        assert_eq!(record.progress, 0.0);
        assert_eq!(record.domain, Domain::Body);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resets_record() {
        let reg = registry();
        reg.on_started("a.log", Domain::Body, 0.92);
        reg.advance_progress(Duration::from_millis(1));
        advance(Duration::from_millis(500)).await;
        reg.advance_progress(Duration::from_millis(1));
        assert!(reg.get("a.log").unwrap().progress > 0.0);

        reg.on_started("a.log", Domain::Body, 0.92);
        assert_eq!(reg.get("a.log").unwrap().progress, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_forces_full_progress() {
        let reg = registry();
        reg.on_started("a.log", Domain::Body, 0.92);
        assert!(reg.on_completed("a.log"));

        let record = reg.get("a.log").unwrap();
        assert_eq!(record.status, FileStatus::Complete);
        assert_eq!(record.progress, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_keeps_last_progress() {
        let reg = registry();
        reg.on_started("a.log", Domain::Body, 0.92);
        advance(Duration::from_millis(5000)).await;
        reg.advance_progress(Duration::from_millis(10_000));
        let before = reg.get("a.log").unwrap().progress;
        assert!(before > 0.0);

        assert!(reg.on_failed("a.log"));
        let record = reg.get("a.log").unwrap();
        assert_eq!(record.status, FileStatus::Failed);
        assert_eq!(record.progress, before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_event_for_unknown_file() {
        let reg = registry();
        assert!(!reg.on_completed("ghost.md"));
        assert!(!reg.on_failed("ghost.md"));
        assert!(reg.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_is_idempotent() {
        let reg = registry();
        reg.on_started("a.log", Domain::Body, 0.92);
        reg.evict("a.log");
        reg.evict("a.log");
        assert!(reg.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_eviction_after_grace() {
        let reg = registry();
        reg.on_started("a.log", Domain::Body, 0.92);
        reg.on_completed("a.log");
        tokio::task::yield_now().await;

        // Still visible just before the grace elapses.
        advance(GRACE - Duration::from_millis(1)).await;
        assert!(reg.get("a.log").is_some());

        advance(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert!(reg.get("a.log").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_survives_stale_eviction() {
        let reg = registry();
        reg.on_started("a.log", Domain::Body, 0.92);
        reg.on_completed("a.log");
        tokio::task::yield_now().await;

        // The same file is picked up again inside the grace window.
        advance(Duration::from_millis(1000)).await;
        reg.on_started("a.log", Domain::Body, 0.92);

        // The original eviction timer fires, but the generation moved on.
        advance(GRACE).await;
        tokio::task::yield_now().await;
        let record = reg.get("a.log").unwrap();
        assert_eq!(record.status, FileStatus::Processing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_progress_is_capped() {
        let reg = registry();
        reg.on_started("a.log", Domain::Body, 0.92);

        advance(Duration::from_secs(60)).await;
        reg.advance_progress(Duration::from_millis(10_000));
        let record = reg.get("a.log").unwrap();
        assert_eq!(record.progress, crate::models::SIMULATED_PROGRESS_CEILING);
        assert!(record.progress < 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_preserves_insertion_order() {
        let reg = registry();
        reg.on_started("one.md", Domain::Mind, 0.93);
        reg.on_started("two_log.txt", Domain::Body, 0.92);
        reg.on_started("three_audit.md", Domain::Soul, 0.95);

        let names: Vec<_> = reg.snapshot().into_iter().map(|r| r.file_name).collect();
        assert_eq!(names, vec!["one.md", "two_log.txt", "three_audit.md"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_skips_terminal_records() {
        let reg = registry();
        reg.on_started("done.md", Domain::Mind, 0.93);
        reg.on_completed("done.md");
        reg.on_started("failed_log.txt", Domain::Body, 0.92);
        advance(Duration::from_millis(2000)).await;
        reg.advance_progress(Duration::from_millis(10_000));
        reg.on_failed("failed_log.txt");
        let failed_progress = reg.get("failed_log.txt").unwrap().progress;

        advance(Duration::from_millis(500)).await;
        reg.advance_progress(Duration::from_millis(10_000));

        assert_eq!(reg.get("done.md").unwrap().progress, 100.0);
        assert_eq!(reg.get("failed_log.txt").unwrap().progress, failed_progress);
    }
}
