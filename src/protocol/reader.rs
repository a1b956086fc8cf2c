//! Read-until-quiescence response framing.
//!
//! The console has no message framing. A response is considered complete
//! once a read produces no byte within the port's per-read timeout (the
//! quiescence window). A fixed settle delay precedes the first read so the
//! device has time to start answering, and an overall cap turns runaway
//! output into a partial response instead of a hang.

use crate::config::SerialConfig;
use crate::port::{PortError, SerialPortAdapter};
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// Timing parameters of one read cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPolicy {
    /// Delay before the first read.
    pub settle: Duration,
    /// Read silence that ends a response; applied as the port timeout.
    pub quiet_window: Duration,
    /// Upper bound on one read cycle, settle excluded.
    pub max_duration: Duration,
}

impl ReadPolicy {
    pub fn from_config(config: &SerialConfig) -> Self {
        Self {
            settle: config.settle(),
            quiet_window: config.quiet_window(),
            max_duration: config.max_response(),
        }
    }

    /// No settle delay and a short cap, for stub devices.
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            quiet_window: Duration::from_millis(10),
            max_duration: Duration::from_secs(5),
        }
    }
}

impl Default for ReadPolicy {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(1),
            quiet_window: Duration::from_secs(1),
            max_duration: Duration::from_secs(30),
        }
    }
}

/// Text accumulated by one read cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Everything read, lossily decoded as UTF-8.
    pub text: String,
    /// False when the cycle hit `max_duration` before the line went quiet.
    pub complete: bool,
    /// Time spent reading, settle excluded.
    pub elapsed: Duration,
}

impl Response {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Read single bytes until the line goes quiet or the cap is reached.
///
/// A quiet read is the normal end of a response and never an error; only
/// genuine transport failures are returned as `Err`.
pub fn read_until_quiet(
    port: &mut dyn SerialPortAdapter,
    policy: &ReadPolicy,
) -> Result<Response, PortError> {
    if !policy.settle.is_zero() {
        std::thread::sleep(policy.settle);
    }

    let started = Instant::now();
    let mut raw = Vec::new();
    let mut byte = [0u8; 1];
    let mut complete = true;

    loop {
        if started.elapsed() >= policy.max_duration {
            warn!(
                port = %port.name(),
                bytes = raw.len(),
                cap = ?policy.max_duration,
                "device output did not quiesce; returning partial response"
            );
            complete = false;
            break;
        }
        match port.read_bytes(&mut byte) {
            Ok(0) => break,
            Ok(n) => raw.extend_from_slice(&byte[..n]),
            Err(e) if e.is_quiet() => break,
            Err(e) => return Err(e),
        }
    }

    let elapsed = started.elapsed();
    trace!(port = %port.name(), bytes = raw.len(), ?elapsed, "read cycle finished");

    Ok(Response {
        text: String::from_utf8_lossy(&raw).into_owned(),
        complete,
        elapsed,
    })
}
