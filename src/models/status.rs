use serde::{Deserialize, Serialize};

/// Point-in-time read of the ingestion pipeline's aggregate status.
///
/// This is the exact shape the pipeline's `GET` status endpoint returns.
/// The feed exposes only aggregate counters and a single "current file"
/// pointer, not an event stream; discrete lifecycle events are inferred by
/// [`TransitionDetector`](crate::state::TransitionDetector) from consecutive
/// snapshots.
///
/// `files_processed` and `files_failed` are monotonically non-decreasing
/// within one polling session. A reset to zero signals a new session and is
/// not a regression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Whether the pipeline is currently working on a file
    #[serde(default)]
    pub is_active: bool,

    /// Path of the file currently being ingested, if any
    #[serde(default)]
    pub current_file: Option<String>,

    /// Cumulative count of successfully ingested files this session
    #[serde(default)]
    pub files_processed: u64,

    /// Cumulative count of failed files this session
    #[serde(default)]
    pub files_failed: u64,

    /// Most recent pipeline error message, if any
    #[serde(default)]
    pub last_error: Option<String>,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            is_active: false,
            current_file: None,
            files_processed: 0,
            files_failed: 0,
            last_error: None,
        }
    }
}
