//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! All configuration sections are defined here with appropriate defaults.

use super::error::{ConfigError, ConfigResult};
use crate::port::{PortConfiguration, PortEnumerator};
use crate::protocol::navigator::DEFAULT_MAX_CYCLES;
use crate::protocol::vocabulary::{DeviceVocabulary, CISCO_IOS};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial line and framing configuration
    pub serial: SerialConfig,
    /// Device family and credentials
    pub device: DeviceConfig,
    /// Prompt navigation configuration
    pub navigator: NavigatorConfig,
    /// Static bring-up recipe parameters
    pub bringup: BringupConfig,
    /// Interactive pass-through configuration
    pub interactive: InteractiveConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Check values that serde cannot.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.serial.baud_rate == 0 {
            return Err(ConfigError::validation("serial.baud_rate", "must be positive"));
        }
        if self.serial.quiet_window_ms == 0 {
            return Err(ConfigError::validation(
                "serial.quiet_window_ms",
                "must be positive; a zero read timeout cannot detect quiescence",
            ));
        }
        if self.serial.max_response_ms < self.serial.quiet_window_ms {
            return Err(ConfigError::validation(
                "serial.max_response_ms",
                "must not be shorter than serial.quiet_window_ms",
            ));
        }
        if self.navigator.max_cycles == 0 {
            return Err(ConfigError::validation("navigator.max_cycles", "must be at least 1"));
        }
        if self.interactive.quit_token.is_empty() {
            return Err(ConfigError::validation("interactive.quit_token", "must not be empty"));
        }
        self.serial.enumerator()?;
        self.device.vocabulary()?;
        Ok(())
    }
}

/// Serial line and response framing section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Console baud rate; 8N1 without flow control is fixed
    pub baud_rate: u32,
    /// Read silence that ends a response, in milliseconds
    pub quiet_window_ms: u64,
    /// Delay before reading a response, in milliseconds
    pub settle_ms: u64,
    /// Cap on a single response read, in milliseconds
    pub max_response_ms: u64,
    /// Regex a port name must match to be probed
    pub port_filter: Option<String>,
    /// Ports never probed
    #[serde(default)]
    pub exclude_ports: Vec<String>,
    /// Probe exactly these ports instead of enumerating the host
    pub ports: Option<Vec<String>>,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            quiet_window_ms: 1000,
            settle_ms: 1000,
            max_response_ms: 30_000,
            port_filter: None,
            exclude_ports: Vec::new(),
            ports: None,
        }
    }
}

impl SerialConfig {
    pub fn quiet_window(&self) -> Duration {
        Duration::from_millis(self.quiet_window_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn max_response(&self) -> Duration {
        Duration::from_millis(self.max_response_ms)
    }

    /// Line parameters used to open every candidate.
    pub fn port_configuration(&self) -> PortConfiguration {
        PortConfiguration::console(self.baud_rate, self.quiet_window())
    }

    /// Enumerator honoring the filter, exclusions and explicit port list.
    pub fn enumerator(&self) -> ConfigResult<PortEnumerator> {
        let mut enumerator = PortEnumerator::new().with_exclusions(self.exclude_ports.clone());
        if let Some(pattern) = &self.port_filter {
            let filter = Regex::new(pattern)
                .map_err(|e| ConfigError::validation("serial.port_filter", e.to_string()))?;
            enumerator = enumerator.with_filter(filter);
        }
        if let Some(ports) = &self.ports {
            enumerator = enumerator.with_explicit_ports(ports.clone());
        }
        Ok(enumerator)
    }
}

/// Device section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Vocabulary to use: a key of `families` or a built-in name
    pub family: String,
    /// Password sent when privileged mode asks for one
    pub password: String,
    /// Additional or overriding vocabularies keyed by family name
    #[serde(default)]
    pub families: HashMap<String, DeviceVocabulary>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            family: CISCO_IOS.to_string(),
            password: "mysecretpassword".to_string(),
            families: HashMap::new(),
        }
    }
}

impl DeviceConfig {
    /// Resolve the configured family, preferring entries from the file.
    pub fn vocabulary(&self) -> ConfigResult<DeviceVocabulary> {
        self.families
            .get(&self.family)
            .cloned()
            .or_else(|| DeviceVocabulary::builtin(&self.family))
            .ok_or_else(|| {
                ConfigError::validation(
                    "device.family",
                    format!("unknown device family '{}'", self.family),
                )
            })
    }
}

/// Navigator section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Wake cycles before giving up on reaching the user-exec prompt
    pub max_cycles: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }
}

/// Static bring-up recipe section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BringupConfig {
    /// Interface to address, as typed after `int`
    pub interface: String,
    pub address: String,
    pub netmask: String,
}

impl Default for BringupConfig {
    fn default() -> Self {
        Self {
            interface: "gig 0/0".to_string(),
            address: "192.168.8.104".to_string(),
            netmask: "255.255.255.0".to_string(),
        }
    }
}

/// Interactive pass-through section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractiveConfig {
    /// Input line that ends the session
    pub quit_token: String,
    /// Prompt shown before each operator line
    pub prompt: String,
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self {
            quit_token: "exitnow".to_string(),
            prompt: "switch>> ".to_string(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is unset: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    #[default]
    Pretty,
    /// Compact format
    Compact,
}
