use crate::models::Domain;
use std::time::Duration;
use tokio::time::Instant;

/// Ceiling for simulated progress. The last 10% is reserved for the
/// authoritative completion transition so the UI never shows a file as
/// done before the pipeline confirms it.
pub const SIMULATED_PROGRESS_CEILING: f32 = 90.0;

/// Lifecycle state of a tracked file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Processing,
    Complete,
    Failed,
}

/// Local tracking entry for one in-flight or recently-finished file.
///
/// Created when the detector sees a file start, mutated by the progress
/// simulator (while `Processing`) and by terminal transitions, and evicted
/// from [`ActiveFileRegistry`](crate::state::ActiveFileRegistry) a grace
/// delay after reaching a terminal status. External readers only ever see
/// clones; the registry is the single writer.
#[derive(Debug, Clone, PartialEq)]
pub struct FileLifecycleRecord {
    /// Basename of the file, as shown to the user
    pub file_name: String,

    /// Classified knowledge domain
    pub domain: Domain,

    /// Classifier confidence in [0, 1]
    pub confidence: f64,

    /// Visual progress in [0, 100]
    pub progress: f32,

    /// Current lifecycle state
    pub status: FileStatus,

    /// When processing of this file was first observed
    pub started_at: Instant,
}

impl FileLifecycleRecord {
    /// Create a fresh `Processing` record starting now.
    pub fn started(file_name: String, domain: Domain, confidence: f64) -> Self {
        Self {
            file_name,
            domain,
            confidence,
            progress: 0.0,
            status: FileStatus::Processing,
            started_at: Instant::now(),
        }
    }

    /// Simulated progress at this moment, ramping linearly from 0 to
    /// [`SIMULATED_PROGRESS_CEILING`] over `simulated_duration`.
    pub fn simulated_progress(&self, simulated_duration: Duration) -> f32 {
        let elapsed_ms = self.started_at.elapsed().as_millis() as f32;
        let total_ms = simulated_duration.as_millis() as f32;
        if total_ms <= 0.0 {
            return SIMULATED_PROGRESS_CEILING;
        }
        (elapsed_ms / total_ms * SIMULATED_PROGRESS_CEILING).min(SIMULATED_PROGRESS_CEILING)
    }

    /// Whether the record has reached `Complete` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        self.status != FileStatus::Processing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FileLifecycleRecord {
        FileLifecycleRecord::started("report.md".to_string(), Domain::Mind, 0.75)
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_record_starts_at_zero() {
        let rec = record();
        assert_eq!(rec.progress, 0.0);
        assert_eq!(rec.status, FileStatus::Processing);
        assert!(!rec.is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_progress_ramp() {
        let rec = record();
        let total = Duration::from_millis(10_000);

        tokio::time::advance(Duration::from_millis(5_000)).await;
        let halfway = rec.simulated_progress(total);
        assert!((halfway - 45.0).abs() < 0.5, "got {halfway}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_progress_never_reaches_100() {
        let rec = record();
        let total = Duration::from_millis(10_000);

        // Run far past the nominal duration; the ramp stays capped.
        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(rec.simulated_progress(total), SIMULATED_PROGRESS_CEILING);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_clamps_to_ceiling() {
        let rec = record();
        assert_eq!(
            rec.simulated_progress(Duration::ZERO),
            SIMULATED_PROGRESS_CEILING
        );
    }
}
