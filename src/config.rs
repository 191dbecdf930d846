use crate::cells::StreamSettings;
use crate::constants::{
    DEFAULT_EVENT_CAPACITY, DEFAULT_ITEM_COUNT, DEFAULT_ITEM_DELAY_MS, DEFAULT_LOG_FILE,
    DEFAULT_NOTIFICATION_MS,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.yaml";

/// Tunable timings and log location, read from `~/.observable-compare/config.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub item_count: usize,
    pub item_delay_ms: u64,
    pub notification_ms: u64,
    pub event_capacity: usize,
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            item_count: DEFAULT_ITEM_COUNT,
            item_delay_ms: DEFAULT_ITEM_DELAY_MS,
            notification_ms: DEFAULT_NOTIFICATION_MS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            log_file: String::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Load from the default config directory.
    ///
    /// A missing file yields defaults; an unreadable or malformed one is an
    /// error, which the caller logs once tracing is up before using defaults.
    pub fn load() -> Result<Self> {
        Config::load_in(&config_dir())
    }

    /// Load `config.yaml` from `dir`, defaults if it does not exist
    pub fn load_in(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        Config::load_from(&path)
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_yaml::from_str::<Config>(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn stream_settings(&self) -> StreamSettings {
        StreamSettings {
            item_count: self.item_count,
            item_delay: Duration::from_millis(self.item_delay_ms),
            // broadcast channels reject a zero capacity
            event_capacity: self.event_capacity.max(1),
        }
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".observable-compare")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "item_count: 3\nitem_delay_ms: 10").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.item_count, 3);
        assert_eq!(config.item_delay_ms, 10);
        assert_eq!(config.notification_ms, DEFAULT_NOTIFICATION_MS);
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_in(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_file_in_dir_is_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "notification_ms: 500\n").unwrap();
        let config = Config::load_in(dir.path()).unwrap();
        assert_eq!(config.notification_duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_malformed_file_in_dir_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "item_delay_ms: soon\n").unwrap();
        let err = Config::load_in(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "item_count: [not, a, number]").unwrap();

        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let config = Config {
            event_capacity: 0,
            ..Config::default()
        };
        assert_eq!(config.stream_settings().event_capacity, 1);
    }
}
