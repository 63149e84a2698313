// IngestWatch - Ingestion Activity Monitor for the Knowledge Pipeline
//
// This is the library crate containing the monitor core and data structures.
// The binary crate (main.rs) wires the monitor to the live status endpoint.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod monitor;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use metrics::{DomainTally, MonitorMetrics, StatsSink};
pub use models::{
    Domain, FileLifecycleRecord, FileStatus, MonitorConfig, MonitorSettings, StatusSnapshot,
};
pub use monitor::{IngestionMonitor, MonitorEvent, MonitorHandle, Notification};
pub use state::{ActiveFileRegistry, LifecycleEvent, TransitionDetector};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
