//! Configuration for the Wind+ bridge.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use windsight_bridge_framework::{
    BridgeConfig, BridgeError, Format, LoggingConfig, Result, ZenohConfig,
};

use crate::bridge::BridgeSettings;
use crate::service::{ServiceInfo, service_name_for_port};

/// Complete bridge configuration.
///
/// Every field has a default, so the bridge runs without a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindplusBridgeConfig {
    /// Zenoh connection settings.
    #[serde(default)]
    pub zenoh: ZenohConfig,

    /// Wire format of attribute updates.
    #[serde(default)]
    pub serialization: Format,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Controller settings.
    #[serde(default)]
    pub windplus: WindplusConfig,
}

/// Controller and service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindplusConfig {
    /// Key expression prefix (default: "windsight").
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Serial device path (default: "/dev/ttyUSB0").
    #[serde(default = "default_serial_port")]
    pub serial_port: String,

    /// Service name override. Derived from the serial port when unset.
    #[serde(default)]
    pub service_name: Option<String>,

    /// Device instance announced with the service.
    #[serde(default)]
    pub device_instance: u32,

    /// Response timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Wait between ticks in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_key_prefix() -> String {
    windsight_common::KEY_PREFIX.to_string()
}

fn default_serial_port() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for WindplusConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            serial_port: default_serial_port(),
            service_name: None,
            device_instance: 0,
            timeout_ms: default_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl WindplusConfig {
    /// Effective service name.
    pub fn service_name(&self) -> String {
        self.service_name
            .clone()
            .unwrap_or_else(|| service_name_for_port(&self.serial_port))
    }

    pub fn service_info(&self) -> ServiceInfo {
        ServiceInfo::new(self.service_name(), self.device_instance)
    }

    pub fn bridge_settings(&self) -> BridgeSettings {
        BridgeSettings {
            port: self.serial_port.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

impl WindplusBridgeConfig {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(
        &mut self,
        serial_port: Option<String>,
        service_name: Option<String>,
        device_instance: Option<u32>,
    ) {
        if let Some(port) = serial_port {
            self.windplus.serial_port = port;
        }
        if let Some(name) = service_name {
            self.windplus.service_name = Some(name);
        }
        if let Some(instance) = device_instance {
            self.windplus.device_instance = instance;
        }
    }
}

impl BridgeConfig for WindplusBridgeConfig {
    fn zenoh(&self) -> &ZenohConfig {
        &self.zenoh
    }

    fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    fn key_prefix(&self) -> &str {
        &self.windplus.key_prefix
    }

    fn format(&self) -> Format {
        self.serialization
    }

    fn validate(&self) -> Result<()> {
        let windplus = &self.windplus;

        if windplus.key_prefix.trim_matches('/').is_empty() {
            return Err(BridgeError::validation("key_prefix cannot be empty"));
        }
        if windplus.serial_port.is_empty() {
            return Err(BridgeError::validation("serial_port cannot be empty"));
        }
        let name = windplus.service_name();
        if name.is_empty() || name.contains(['/', '*', '?', '#', '$']) {
            return Err(BridgeError::validation(format!(
                "service_name '{}' is not a valid key expression chunk",
                name
            )));
        }
        if windplus.timeout_ms == 0 {
            return Err(BridgeError::validation("timeout_ms must be > 0"));
        }
        if windplus.poll_interval_ms == 0 {
            return Err(BridgeError::validation("poll_interval_ms must be > 0"));
        }

        Ok(())
    }
}
