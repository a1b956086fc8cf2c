//! Unified application error type and process exit codes.

use crate::config::ConfigError;
use crate::port::PortError;
use crate::protocol::{ProtocolError, ScriptError};
use thiserror::Error;

/// Exit codes reported by the binary.
pub struct ExitCodes;

impl ExitCodes {
    /// Success, including an operator quit
    pub const SUCCESS: u8 = 0;

    /// Transport or I/O failure
    pub const ERROR: u8 = 1;

    /// Invalid arguments (reported by clap)
    pub const INVALID_ARGS: u8 = 2;

    /// Configuration error
    pub const CONFIG_ERROR: u8 = 3;

    /// No switch answered on any port
    pub const DEVICE_NOT_FOUND: u8 = 4;

    /// The switch never reached a stable prompt
    pub const PROMPT_UNREACHABLE: u8 = 5;

    /// The switch rejected a script command
    pub const SCRIPT_REJECTED: u8 = 6;

    /// The script file could not be read
    pub const SCRIPT_UNREADABLE: u8 = 7;

    /// Device output never went quiet within the read cap
    pub const OUTPUT_UNSETTLED: u8 = 8;
}

/// Unified application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl AppError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Logging(_) => ExitCodes::CONFIG_ERROR,
            Self::Script(_) => ExitCodes::SCRIPT_UNREADABLE,
            Self::Protocol(ProtocolError::NoDeviceFound { .. }) => ExitCodes::DEVICE_NOT_FOUND,
            Self::Protocol(ProtocolError::StablePromptUnreachable { .. }) => {
                ExitCodes::PROMPT_UNREACHABLE
            }
            Self::Protocol(ProtocolError::Rejected { .. }) => ExitCodes::SCRIPT_REJECTED,
            Self::Protocol(ProtocolError::Unsettled { .. }) => ExitCodes::OUTPUT_UNSETTLED,
            Self::Protocol(_) | Self::Port(_) => ExitCodes::ERROR,
        }
    }
}

/// A specialized `Result` type for application-level operations.
pub type AppResult<T> = Result<T, AppError>;
