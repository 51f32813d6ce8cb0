use crate::constants::{DEFAULT_FRAMEWORK, PUBLISH_TIMEOUT, RESTORE_TIMEOUT};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Target framework used by publish when none is given
    #[serde(default = "default_framework")]
    pub default_framework: String,

    /// Seconds to wait for `dotnet restore`
    #[serde(default = "default_restore_timeout_secs")]
    pub restore_timeout_secs: u64,

    /// Seconds to wait for `dotnet publish`
    #[serde(default = "default_publish_timeout_secs")]
    pub publish_timeout_secs: u64,
}

fn default_framework() -> String {
    DEFAULT_FRAMEWORK.to_string()
}

fn default_restore_timeout_secs() -> u64 {
    RESTORE_TIMEOUT.as_secs()
}

fn default_publish_timeout_secs() -> u64 {
    PUBLISH_TIMEOUT.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_framework: default_framework(),
            restore_timeout_secs: default_restore_timeout_secs(),
            publish_timeout_secs: default_publish_timeout_secs(),
        }
    }
}

impl Config {
    /// Load `dotnet-helper/config.toml` from the user config directory,
    /// falling back to defaults when it does not exist
    pub fn load() -> anyhow::Result<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("dotnet-helper").join("config.toml");
            if config_path.exists() {
                return Self::from_file(&config_path);
            }
        }
        Ok(Config::default())
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Default target framework; an empty setting means the built-in default
    pub fn framework(&self) -> &str {
        if self.default_framework.is_empty() {
            DEFAULT_FRAMEWORK
        } else {
            &self.default_framework
        }
    }

    pub fn restore_timeout(&self) -> Duration {
        Duration::from_secs(self.restore_timeout_secs)
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs)
    }
}
