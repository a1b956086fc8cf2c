//! Shared test utilities for the serial switch agent tests.
//!
//! This module provides common test infrastructure including:
//! - Mock switches with pre-programmed console replies
//! - Session construction with fast read timing
//! - A capture sink for echoed device output

#![allow(dead_code)]

use parking_lot::Mutex;
use serial_switch_agent::config::Config;
use serial_switch_agent::port::MockSerialPort;
use serial_switch_agent::protocol::{DeviceVocabulary, ReadPolicy};
use serial_switch_agent::Session;
use std::io::Write;
use std::sync::Arc;

pub const USER_PROMPT: &str = "\r\nSwitch>";
pub const PRIV_PROMPT: &str = "\r\nSwitch#";
pub const CONFIG_PROMPT: &str = "\r\nSwitch(config)#";
pub const WIZARD: &str = "\r\n--- System Configuration Dialog ---\r\n\r\n\
                          Would you like to enter the initial configuration dialog? [yes/no]: ";
pub const REJECTED: &str =
    "\r\n          ^\r\n% Invalid input detected at '^' marker.\r\n\r\nSwitch(config)#";

/// A switch that answers every command with `reply`.
pub fn switch_replying(port_name: &str, reply: &str) -> MockSerialPort {
    let mut mock = MockSerialPort::new(port_name);
    mock.set_default_reply(reply.as_bytes());
    mock
}

/// A switch sitting at the user-exec prompt.
pub fn idle_switch(port_name: &str) -> MockSerialPort {
    switch_replying(port_name, USER_PROMPT)
}

/// A switch that shows the setup dialog `detours` times before settling.
///
/// Each detour consumes one wake marker plus the three decline answers.
pub fn wizard_switch(port_name: &str, detours: usize) -> MockSerialPort {
    let mut mock = MockSerialPort::new(port_name);
    for _ in 0..detours {
        mock.push_reply(WIZARD.as_bytes());
        mock.push_reply(b"\r\nWould you like to terminate autoinstall? [yes]: ");
        mock.push_reply(b"\r\n");
        mock.push_reply(b"\r\nPress RETURN to get started!\r\n");
    }
    mock.set_default_reply(USER_PROMPT.as_bytes());
    mock
}

/// Build a session on `port` with fast read timing and output captured in `sink`.
pub fn session_on(port: &MockSerialPort, sink: &CaptureSink) -> Session {
    Session::new(
        Box::new(port.clone()),
        DeviceVocabulary::cisco_ios(),
        ReadPolicy::immediate(),
    )
    .with_console(Box::new(sink.clone()))
}

/// Default configuration with read timing fit for mock ports.
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.serial.settle_ms = 0;
    config.serial.quiet_window_ms = 10;
    config.serial.max_response_ms = 2_000;
    config
}

/// In-memory `Write` sink whose contents stay readable after boxing.
#[derive(Clone, Default)]
pub struct CaptureSink(Arc<Mutex<Vec<u8>>>);

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for CaptureSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
