//! Configuration module for serial-switch.
//!
//! This module provides TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `--config <path>` on the command line
//! 2. `SERIAL_SWITCH_CONFIG` environment variable (explicit path)
//! 3. `./serial-switch.toml` (current directory)
//! 4. `config.toml` in the platform config directory
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! Selected values can be overridden via environment variables.
//! The pattern is: `SERIAL_SWITCH_<SECTION>_<KEY>`
//!
//! Examples:
//! - `SERIAL_SWITCH_SERIAL_QUIET_WINDOW_MS=500`
//! - `SERIAL_SWITCH_SERIAL_PORTS=/dev/ttyUSB0`
//! - `SERIAL_SWITCH_DEVICE_PASSWORD=...`
//!
//! # Example
//!
//! ```rust,ignore
//! use serial_switch_agent::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load()?;
//! let config = loader.config();
//!
//! println!("Quiet window: {:?}", config.serial.quiet_window());
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{get_default_config_path, resolve_config_path, ConfigLoader};
pub use schema::{
    BringupConfig, Config, DeviceConfig, InteractiveConfig, LogFormat, LoggingConfig,
    NavigatorConfig, SerialConfig,
};
