//! Data models for the ingestion monitor.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`StatusSnapshot`]: the wire shape of the pipeline's status endpoint
//! - [`FileLifecycleRecord`]: per-file tracking entry owned by the registry
//! - [`Domain`]: the four knowledge domains files are classified into
//! - [`MonitorConfig`] / [`MonitorSettings`]: YAML-backed configuration
//!
//! # Architecture Note
//!
//! Snapshots and records are plain cloneable values. All shared mutable
//! state lives behind [`ActiveFileRegistry`](crate::state::ActiveFileRegistry);
//! everything handed to subscribers or the UI is a clone.

pub mod config;
pub mod domain;
pub mod record;
pub mod status;

pub use config::{MonitorConfig, MonitorSettings};
pub use domain::Domain;
pub use record::{FileLifecycleRecord, FileStatus, SIMULATED_PROGRESS_CEILING};
pub use status::StatusSnapshot;
