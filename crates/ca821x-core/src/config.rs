//! Device configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::device::{Ca821x, HardwareFlags};
use crate::protocol::constants::DEFAULT_DEVICE_PATH;
use crate::transport::DeviceFileTransport;

/// Configuration for one attached transceiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Kernel character device exposed by the driver.
    pub device_path: String,
    /// Apply register fix-ups after MAC operations.
    pub workarounds: bool,
    /// Early (MPW) silicon.
    pub mpw: bool,
    /// Write the register defaults right after opening.
    pub chip_init: bool,
    /// Reader sleep when the channel is idle.
    pub poll_interval_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_path: DEFAULT_DEVICE_PATH.to_string(),
            workarounds: false,
            mpw: false,
            chip_init: false,
            poll_interval_ms: 10,
        }
    }
}

impl DeviceConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: DeviceConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn flags(&self) -> HardwareFlags {
        HardwareFlags {
            workarounds: self.workarounds,
            mpw: self.mpw,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Ca821x<DeviceFileTransport> {
    /// Open the configured device node and apply the configured flags.
    #[instrument(skip(config), fields(path = %config.device_path))]
    pub fn open(config: &DeviceConfig) -> Result<Self> {
        let transport = DeviceFileTransport::open(&config.device_path)?;
        let device = Self::with_flags(transport, config.flags());
        if config.chip_init {
            device.chip_init().context("chip init")?;
        }
        info!(mpw = config.mpw, workarounds = config.workarounds, "Device ready");
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.device_path, "/dev/ca8210_test");
        assert_eq!(config.flags(), HardwareFlags::default());
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DeviceConfig = toml::from_str("mpw = true\nchip_init = true\n").unwrap();
        assert!(config.mpw);
        assert!(config.chip_init);
        assert!(!config.workarounds);
        assert_eq!(config.device_path, DEFAULT_DEVICE_PATH);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("ca821x-config-{}.toml", std::process::id()));
        let config = DeviceConfig {
            device_path: "/dev/ca8210_test1".into(),
            workarounds: true,
            poll_interval_ms: 2,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(DeviceConfig::load_from_file(&path).unwrap(), config);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_open_missing_device() {
        let config = DeviceConfig {
            device_path: "/nonexistent/ca8210_test".into(),
            ..Default::default()
        };
        assert!(Ca821x::open(&config).is_err());
    }
}
