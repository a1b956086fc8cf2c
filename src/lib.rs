//! Serial Switch Agent Library
//!
//! Automates a network switch reachable only through its serial console:
//! finds the port the switch is attached to, walks it past the first-boot
//! dialog to a stable prompt, and then replays a provisioning script, runs a
//! built-in recipe, or relays an operator's commands.
//!
//! # Modules
//!
//! - `config`: Configuration management with TOML support
//! - `error`: Unified error handling and exit codes
//! - `port`: Endpoint abstraction, enumeration and the scripted mock
//! - `protocol`: Response framing, prompt detection and the command drivers
//! - `session`: The single active device connection
//! - `app`: Orchestration of one invocation
//! - `logging`: Tracing subscriber setup

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod port;
pub mod protocol;
pub mod session;

// Re-export commonly used types for convenience
pub use app::{Operation, Outcome, Provisioner};
pub use error::{AppError, AppResult, ExitCodes};
pub use port::{
    MockPortOpener, MockSerialPort, PortConfiguration, PortEnumerator, PortError, PortOpener,
    SerialPortAdapter, SyncSerialPort, SystemPortOpener,
};
pub use protocol::{
    CommandScript, DeviceMode, DeviceVocabulary, ProtocolError, ReadPolicy, Response,
};
pub use session::Session;

// Re-export config types
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
