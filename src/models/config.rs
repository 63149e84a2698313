use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Monitor configuration from IngestWatch Config.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(rename = "Monitor_Settings")]
    pub monitor_settings: MonitorSettings,
}

/// Tunable settings for the ingestion monitor.
///
/// Every field has a serde default so partially written config files parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Status endpoint of the ingestion pipeline
    #[serde(rename = "Status URL", default = "default_status_url")]
    pub status_url: String,

    /// How often the status endpoint is polled
    #[serde(rename = "Poll Interval Ms", default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How often simulated progress is advanced
    #[serde(rename = "Progress Tick Ms", default = "default_progress_tick_ms")]
    pub progress_tick_ms: u64,

    /// Nominal time a file takes to ingest; denominator of the progress ramp
    #[serde(rename = "Simulated Duration Ms", default = "default_simulated_duration_ms")]
    pub simulated_duration_ms: u64,

    /// How long a finished record stays visible before eviction
    #[serde(rename = "Eviction Grace Ms", default = "default_eviction_grace_ms")]
    pub eviction_grace_ms: u64,

    /// Debounce window for completion notifications
    #[serde(rename = "Batch Window Ms", default = "default_batch_window_ms")]
    pub batch_window_ms: u64,

    /// Queue size above which a single summary replaces individual notices
    #[serde(rename = "Batch Summary Threshold", default = "default_batch_summary_threshold")]
    pub batch_summary_threshold: usize,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,
}

impl MonitorSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }

    pub fn simulated_duration(&self) -> Duration {
        Duration::from_millis(self.simulated_duration_ms)
    }

    pub fn eviction_grace(&self) -> Duration {
        Duration::from_millis(self.eviction_grace_ms)
    }

    pub fn batch_window(&self) -> Duration {
        Duration::from_millis(self.batch_window_ms)
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            status_url: default_status_url(),
            poll_interval_ms: default_poll_interval_ms(),
            progress_tick_ms: default_progress_tick_ms(),
            simulated_duration_ms: default_simulated_duration_ms(),
            eviction_grace_ms: default_eviction_grace_ms(),
            batch_window_ms: default_batch_window_ms(),
            batch_summary_threshold: default_batch_summary_threshold(),
            debug_mode: false,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            monitor_settings: MonitorSettings::default(),
        }
    }
}

fn default_status_url() -> String {
    "http://127.0.0.1:8181/api/ingestion/status".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_progress_tick_ms() -> u64 {
    500
}

fn default_simulated_duration_ms() -> u64 {
    10_000
}

fn default_eviction_grace_ms() -> u64 {
    3000
}

fn default_batch_window_ms() -> u64 {
    500
}

fn default_batch_summary_threshold() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = MonitorSettings::default();
        assert_eq!(settings.poll_interval_ms, 2000);
        assert_eq!(settings.progress_tick_ms, 500);
        assert_eq!(settings.simulated_duration_ms, 10_000);
        assert_eq!(settings.eviction_grace_ms, 3000);
        assert_eq!(settings.batch_window_ms, 500);
        assert_eq!(settings.batch_summary_threshold, 5);
        assert!(!settings.debug_mode);
    }

    #[test]
    fn test_duration_accessors() {
        let settings = MonitorSettings::default();
        assert_eq!(settings.poll_interval(), Duration::from_secs(2));
        assert_eq!(settings.batch_window(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "Monitor_Settings:\n  Poll Interval Ms: 5000\n";
        let config: MonitorConfig = serde_yaml_ng::from_str(yaml).unwrap();

        assert_eq!(config.monitor_settings.poll_interval_ms, 5000);
        assert_eq!(config.monitor_settings.batch_summary_threshold, 5);
        assert!(!config.monitor_settings.status_url.is_empty());
    }
}
