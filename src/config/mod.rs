use crate::models::MonitorConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Configuration manager for loading and saving the monitor's YAML config.
///
/// Manages a single file, `IngestWatch Config.yaml`, inside the data
/// directory. A missing file is not an error: defaults apply and a warning
/// is logged, so a fresh checkout runs without any setup.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing configuration files
    ///   (e.g., "IngestWatch Data")
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {config_dir}"))?;
        }

        Ok(Self {
            config_path: config_dir.join("IngestWatch Config.yaml"),
            config_dir,
        })
    }

    /// Load the monitor configuration.
    ///
    /// # Returns
    /// The loaded MonitorConfig, or defaults if the file doesn't exist
    pub fn load_config(&self) -> Result<MonitorConfig> {
        if !self.config_path.exists() {
            tracing::warn!(
                "Config file not found at {}, using defaults",
                self.config_path
            );
            return Ok(MonitorConfig::default());
        }

        let file_contents = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config: {}", self.config_path))?;

        let config: MonitorConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse config: {}", self.config_path))?;

        tracing::info!("Loaded config from {}", self.config_path);
        Ok(config)
    }

    /// Save the monitor configuration.
    pub fn save_config(&self, config: &MonitorConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write config: {}", self.config_path))?;

        tracing::info!("Saved config to {}", self.config_path);
        Ok(())
    }

    /// The directory this manager reads from.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Full path of the config file.
    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(temp: &TempDir) -> ConfigManager {
        let dir = Utf8PathBuf::from_path_buf(temp.path().join("IngestWatch Data")).unwrap();
        ConfigManager::new(dir).unwrap()
    }

    #[test]
    fn test_creates_config_directory() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        assert!(mgr.config_dir().exists());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);

        let config = mgr.load_config().unwrap();
        assert_eq!(config.monitor_settings.poll_interval_ms, 2000);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);

        let mut config = MonitorConfig::default();
        config.monitor_settings.poll_interval_ms = 750;
        config.monitor_settings.batch_summary_threshold = 9;
        mgr.save_config(&config).unwrap();

        let reloaded = mgr.load_config().unwrap();
        assert_eq!(reloaded.monitor_settings.poll_interval_ms, 750);
        assert_eq!(reloaded.monitor_settings.batch_summary_threshold, 9);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        fs::write(mgr.config_path(), "Monitor_Settings: [not, a, map]").unwrap();

        assert!(mgr.load_config().is_err());
    }
}
