use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::helpers::paths::{get_config_path, get_data_dir};
use crate::stats::DashboardLimits;

const DEFAULT_CONFIG: &str = r#"
[snapshot]
# Static { "jobs": [...] } document loaded when the local collection is empty
# path = "/path/to/data.json"
timeout_secs = 10

[storage]
# Directory for the wishlist and local job blobs
# data_dir = "/path/to/data"

[dashboard]
recent_limit = 5
high_priority_limit = 3
"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TrackerConfig {
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SnapshotConfig {
    pub path: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub recent_limit: usize,
    pub high_priority_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let limits = DashboardLimits::default();
        Self {
            recent_limit: limits.recent,
            high_priority_limit: limits.high_priority,
        }
    }
}

impl TrackerConfig {
    /// Load the config from the platform config directory, writing a
    /// commented default file on first run
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        builder.try_deserialize()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(get_data_dir)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.snapshot.timeout_secs)
    }

    pub fn dashboard_limits(&self) -> DashboardLimits {
        DashboardLimits {
            recent: self.dashboard.recent_limit,
            high_priority: self.dashboard.high_priority_limit,
        }
    }
}
