//! Protocol driver error types.

use super::vocabulary::DeviceMode;
use crate::port::PortError;
use std::time::Duration;
use thiserror::Error;

/// Failures of discovery, navigation and playback.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Transport failure on the active session.
    #[error("Transport error: {0}")]
    Transport(#[from] PortError),

    /// Every candidate was tried and none answered like a switch.
    #[error("No switch found on any of {candidates} serial port(s); make sure it is connected")]
    NoDeviceFound { candidates: usize },

    /// The navigator gave up before seeing a user-exec prompt.
    #[error("Could not reach a stable prompt after {cycles} navigation cycle(s); last mode was {last_mode}")]
    StablePromptUnreachable { cycles: usize, last_mode: DeviceMode },

    /// The device reported invalid input during playback.
    #[error("Device rejected script line {line_number} ({command:?}); playback halted after {executed} command(s)")]
    Rejected {
        line_number: usize,
        command: String,
        executed: usize,
    },

    /// The device was still sending when the read cap expired.
    #[error("Device output after {command:?} did not settle within {cap:?}; nothing further was sent")]
    Unsettled { command: String, cap: Duration },

    /// Writing to the operator console or reading operator input failed.
    #[error("Operator console error: {0}")]
    Console(#[from] std::io::Error),
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
