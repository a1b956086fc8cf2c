//! Port-specific error types.
//!
//! Defines error types for serial endpoint operations, separate from protocol-level
//! errors so the console driver can tell "this candidate is unusable" apart from
//! "the device said no".

use thiserror::Error;

/// Errors that can occur during serial endpoint operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Port configuration failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A write call completed without accepting any bytes.
    #[error("Write to {0} accepted no bytes")]
    WriteZero(String),

    /// Host enumeration of serial devices failed.
    #[error("Port enumeration failed: {0}")]
    Enumeration(String),

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error is a read that simply produced no byte in time.
    ///
    /// `serialport` reports an expired per-read timeout as `TimedOut`; some
    /// platforms and the mock report `WouldBlock` instead. Both mean "quiet".
    pub fn is_quiet(&self) -> bool {
        matches!(
            self,
            Self::Io(e) if matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            )
        )
    }
}
