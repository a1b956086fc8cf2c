//! Core traits for serial endpoint abstraction.
//!
//! Defines the `SerialPortAdapter` trait that allows both real serial ports
//! and the scripted mock to be driven by the console protocol, and the
//! `PortOpener` seam through which probing obtains endpoints by name.

use super::error::PortError;
use std::time::Duration;

/// Line parameters for a console endpoint.
///
/// Framing is always 8 data bits, no parity, one stop bit and no flow
/// control; switch consoles do not negotiate, so only the speed and the
/// read timeout vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Per-read timeout. The response reader treats one expiry as the end
    /// of a response, so this is the quiescence window.
    pub timeout: Duration,
}

impl PortConfiguration {
    pub fn console(baud_rate: u32, quiet_window: Duration) -> Self {
        Self {
            baud_rate,
            timeout: quiet_window,
        }
    }
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self::console(9600, Duration::from_secs(1))
    }
}

/// Trait for serial endpoint I/O operations.
///
/// Blocking-read-with-timeout semantics: `read_bytes` either returns at least
/// one byte or fails once the configured timeout expires.
pub trait SerialPortAdapter: Send + std::fmt::Debug {
    /// Write bytes to the serial port.
    ///
    /// Returns the number of bytes actually written.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Read bytes from the serial port into the provided buffer.
    ///
    /// Returns the number of bytes actually read.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;

    /// Set the read/write timeout for this port.
    fn set_timeout(&mut self, timeout: Duration) -> Result<(), PortError>;

    /// Clear both input and output buffers.
    fn clear_buffers(&mut self) -> Result<(), PortError>;
}

/// Opens named endpoints.
///
/// Probing and enumeration go through this trait so tests can hand out
/// scripted mock ports instead of touching host devices.
pub trait PortOpener {
    /// Open the endpoint called `name` with the given line parameters.
    fn open(
        &mut self,
        name: &str,
        config: &PortConfiguration,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError>;
}
