// Transition detection
//
// The status feed exposes only aggregate counters and a single "current
// file" pointer. This module reconstructs discrete per-file lifecycle
// events by diffing consecutive snapshots: a pure reducer plus a thin
// stateful wrapper that remembers the previous snapshot.

use crate::models::{Domain, StatusSnapshot};
use crate::services::classification::classify_file;
use camino::Utf8Path;

/// Discrete lifecycle event inferred from two consecutive snapshots.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// The pipeline picked up a new file
    Started {
        file_name: String,
        domain: Domain,
        confidence: f64,
    },

    /// The current file finished and the processed counter advanced
    Completed {
        file_name: String,
        domain: Domain,
        confidence: f64,
    },

    /// The current file ended and the failed counter advanced
    Failed { file_name: String },
}

impl LifecycleEvent {
    /// Filename the event refers to.
    pub fn file_name(&self) -> &str {
        match self {
            LifecycleEvent::Started { file_name, .. }
            | LifecycleEvent::Completed { file_name, .. }
            | LifecycleEvent::Failed { file_name } => file_name,
        }
    }
}

/// Diff two consecutive snapshots into lifecycle events.
///
/// Rules, evaluated in order:
/// 1. A file started if the pipeline is active on a file that was not the
///    previously active one.
/// 2. A file ended if the pipeline went from active to fully idle; the
///    counters decide whether it completed or failed. If neither counter
///    moved the transition is ambiguous and yields nothing.
///
/// Only one current-file pointer exists, so at most one terminal event can
/// be attributed per diff: if the backend finishes several files between
/// two polls, the counter delta beyond one is lost. Counter resets (new
/// session) never look like completions because only strict increases
/// count.
pub fn reduce(previous: &StatusSnapshot, current: &StatusSnapshot) -> Vec<LifecycleEvent> {
    let mut events = Vec::new();

    if current.is_active {
        if let Some(path) = &current.current_file {
            let pointer_moved = previous.current_file.as_deref() != Some(path.as_str());
            if !previous.is_active || pointer_moved {
                let file_name = basename(path);
                let classification = classify_file(&file_name);
                events.push(LifecycleEvent::Started {
                    file_name,
                    domain: classification.domain,
                    confidence: classification.confidence,
                });
            }
        }
    }

    if previous.is_active && !current.is_active && current.current_file.is_none() {
        if let Some(path) = &previous.current_file {
            let file_name = basename(path);
            if current.files_processed > previous.files_processed {
                let classification = classify_file(&file_name);
                events.push(LifecycleEvent::Completed {
                    file_name,
                    domain: classification.domain,
                    confidence: classification.confidence,
                });
            } else if current.files_failed > previous.files_failed {
                events.push(LifecycleEvent::Failed { file_name });
            } else {
                // Neither counter moved, e.g. a backend session reset raced
                // the poll. No event can be attributed.
                tracing::debug!(file = %file_name, "ambiguous end-of-file transition dropped");
            }
        }
    }

    events
}

/// Stateful wrapper around [`reduce`].
///
/// Feed it every received snapshot; the first one is stored without
/// emitting anything.
#[derive(Debug, Default)]
pub struct TransitionDetector {
    previous: Option<StatusSnapshot>,
}

impl TransitionDetector {
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Record a snapshot and return the events inferred since the last one.
    pub fn observe(&mut self, snapshot: StatusSnapshot) -> Vec<LifecycleEvent> {
        let events = match &self.previous {
            Some(previous) => reduce(previous, &snapshot),
            None => Vec::new(),
        };
        self.previous = Some(snapshot);
        events
    }

    /// The most recently observed snapshot, if any.
    pub fn last_snapshot(&self) -> Option<&StatusSnapshot> {
        self.previous.as_ref()
    }
}

fn basename(path: &str) -> String {
    Utf8Path::new(path)
        .file_name()
        .unwrap_or(path)
        .to_string()
}
