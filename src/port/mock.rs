//! Mock serial port implementation for testing.
//!
//! Provides a `MockSerialPort` that behaves like a console device without
//! requiring actual hardware: every written line pops the next scripted reply
//! into the read queue, and an empty read queue reports a read timeout exactly
//! like a quiet serial line does. `MockPortOpener` hands such ports out by name.

use super::error::PortError;
use super::traits::{PortConfiguration, PortOpener, SerialPortAdapter};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Inner state of the mock port, shared between clones.
#[derive(Debug, Default)]
struct MockPortState {
    /// Bytes waiting to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// One reply per write, consumed in order.
    replies: VecDeque<Vec<u8>>,
    /// Reply used once `replies` is exhausted.
    default_reply: Option<Vec<u8>>,
    /// Log of all bytes written to the port.
    write_log: Vec<Vec<u8>>,
    /// When set, every read returns this byte forever.
    flood: Option<u8>,
    /// When set, every write fails with a broken pipe.
    fail_writes: bool,
    /// Configured timeout duration.
    timeout: Duration,
    /// Whether buffers have been cleared.
    buffers_cleared: bool,
}

/// Mock serial port implementation for testing.
///
/// This implementation allows you to:
/// - Queue the device's reply to each command
/// - Set a default reply for every command after the scripted ones
/// - Inspect what lines were written
/// - Simulate runaway output and write failures
///
/// # Example
/// ```
/// use serial_switch_agent::port::{MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.push_reply(b"\r\nSwitch>");
///
/// port.write_bytes(b"\r").unwrap();
///
/// let mut buffer = [0u8; 16];
/// let n = port.read_bytes(&mut buffer).unwrap();
/// assert_eq!(&buffer[..n], b"\r\nSwitch>");
/// assert_eq!(port.written_lines(), vec![String::new()]);
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    /// The port name/identifier.
    name: String,
    /// The internal state, shared so tests keep a handle after boxing.
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState {
                timeout: Duration::from_secs(1),
                ..Default::default()
            })),
        }
    }

    /// Create a mock whose replies to successive writes are `replies`.
    pub fn with_replies<I, B>(name: impl Into<String>, replies: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut port = Self::new(name);
        for reply in replies {
            port.push_reply(reply.as_ref());
        }
        port
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.state.lock().read_queue.extend(data);
    }

    /// Queue the reply to the next write that has no reply yet.
    pub fn push_reply(&mut self, data: &[u8]) {
        self.state.lock().replies.push_back(data.to_vec());
    }

    /// Reply with `data` to every write once the scripted replies run out.
    pub fn set_default_reply(&mut self, data: &[u8]) {
        self.state.lock().default_reply = Some(data.to_vec());
    }

    /// Make every read return `byte`, simulating a device that never quiesces.
    pub fn set_flood(&mut self, byte: Option<u8>) {
        self.state.lock().flood = byte;
    }

    /// Make every subsequent write fail.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    /// Get a copy of all data written to the port.
    pub fn get_write_log(&self) -> Vec<Vec<u8>> {
        self.state.lock().write_log.clone()
    }

    /// Written data as text lines with the line terminator removed.
    ///
    /// Only trailing CR/LF is stripped, so a single-space wake marker
    /// stays distinguishable from an empty command.
    pub fn written_lines(&self) -> Vec<String> {
        self.state
            .lock()
            .write_log
            .iter()
            .map(|w| {
                String::from_utf8_lossy(w)
                    .trim_end_matches(['\r', '\n'])
                    .to_string()
            })
            .collect()
    }

    /// Number of scripted replies not yet consumed.
    pub fn pending_replies(&self) -> usize {
        self.state.lock().replies.len()
    }

    /// Get whether buffers have been cleared.
    pub fn was_cleared(&self) -> bool {
        self.state.lock().buffers_cleared
    }

    /// Get the number of bytes available to read.
    pub fn available_bytes(&self) -> usize {
        self.state.lock().read_queue.len()
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock();

        if state.fail_writes {
            return Err(PortError::Io(std::io::ErrorKind::BrokenPipe.into()));
        }

        state.write_log.push(data.to_vec());

        let reply = state
            .replies
            .pop_front()
            .or_else(|| state.default_reply.clone());
        if let Some(reply) = reply {
            state.read_queue.extend(reply);
        }

        Ok(data.len())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock();

        if let Some(byte) = state.flood {
            buffer.fill(byte);
            return Ok(buffer.len());
        }

        let mut bytes_read = 0;
        for slot in buffer.iter_mut() {
            match state.read_queue.pop_front() {
                Some(queued) => {
                    *slot = queued;
                    bytes_read += 1;
                }
                None => break,
            }
        }

        if bytes_read == 0 {
            Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Operation timed out",
            )))
        } else {
            Ok(bytes_read)
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), PortError> {
        self.state.lock().timeout = timeout;
        Ok(())
    }

    fn clear_buffers(&mut self) -> Result<(), PortError> {
        let mut state = self.state.lock();
        state.read_queue.clear();
        state.buffers_cleared = true;
        Ok(())
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}

/// Hands out registered mock ports by name and records every open attempt.
///
/// Names that were never registered fail to open with `PortError::NotFound`.
#[derive(Debug, Clone, Default)]
pub struct MockPortOpener {
    ports: HashMap<String, MockSerialPort>,
    attempts: Arc<Mutex<Vec<String>>>,
}

impl MockPortOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a port under its own name.
    pub fn with_port(mut self, port: MockSerialPort) -> Self {
        self.ports.insert(port.name().to_string(), port);
        self
    }

    /// Every name passed to `open`, in call order.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().clone()
    }
}

impl PortOpener for MockPortOpener {
    fn open(
        &mut self,
        name: &str,
        _config: &PortConfiguration,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError> {
        self.attempts.lock().push(name.to_string());
        self.ports
            .get(name)
            .cloned()
            .map(|port| Box::new(port) as Box<dyn SerialPortAdapter>)
            .ok_or_else(|| PortError::not_found(name))
    }
}
