//! Controller configuration
//!
//! Loaded from the YAML file named by `MESH_CONTROLLER_CONFIG`. `MESH_ROUTERS`
//! and `MESH_BROKERS` (comma separated) replace the endpoint lists from the file.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

pub const CONFIG_PATH_ENV: &str = "MESH_CONTROLLER_CONFIG";
pub const ROUTERS_ENV: &str = "MESH_ROUTERS";
pub const BROKERS_ENV: &str = "MESH_BROKERS";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerConfig {
    /// Router hostnames to keep in the mesh
    #[serde(default)]
    pub routers: Vec<String>,

    /// Broker hostnames every router connects to
    #[serde(default)]
    pub brokers: Vec<String>,

    /// Seconds between synchronization cycles
    #[serde(default = "default_sync_interval")]
    pub sync_interval_seconds: u64,

    /// Timeout for a single reachability probe (seconds)
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u64,
}

fn default_sync_interval() -> u64 {
    30
}

fn default_probe_timeout() -> u64 {
    5
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            routers: Vec::new(),
            brokers: Vec::new(),
            sync_interval_seconds: default_sync_interval(),
            probe_timeout_seconds: default_probe_timeout(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from the file and environment
    pub fn load() -> Result<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV).ok() {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path))?;
                info!("Configuration loaded from {}", path);
                Self::from_yaml(&raw)?
            }
            None => Self::default(),
        };

        let config = config.with_overrides(
            std::env::var(ROUTERS_ENV).ok(),
            std::env::var(BROKERS_ENV).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| anyhow!("Invalid controller configuration: {}", e))
    }

    /// Replace the endpoint lists with comma separated overrides, when given
    pub fn with_overrides(mut self, routers: Option<String>, brokers: Option<String>) -> Self {
        if let Some(routers) = routers {
            self.routers = split_hosts(&routers);
        }
        if let Some(brokers) = brokers {
            self.brokers = split_hosts(&brokers);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sync_interval_seconds == 0 {
            return Err(anyhow!("syncIntervalSeconds must be greater than zero"));
        }
        if self.probe_timeout_seconds == 0 {
            return Err(anyhow!("probeTimeoutSeconds must be greater than zero"));
        }
        Ok(())
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_seconds)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_seconds)
    }
}

fn split_hosts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .collect()
}
