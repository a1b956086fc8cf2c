//! The active device session.
//!
//! A `Session` owns the one open endpoint that probing selected, together
//! with the vocabulary and read timing used to talk to it. Every protocol
//! component takes the session explicitly; there is no process-wide
//! connection. Dropping the session closes the endpoint.

use crate::port::SerialPortAdapter;
use crate::protocol::reader::{self, ReadPolicy, Response};
use crate::protocol::transmit;
use crate::protocol::{DeviceVocabulary, ProtocolError, ProtocolResult};
use std::io::Write;
use tracing::info;

pub struct Session {
    port: Box<dyn SerialPortAdapter>,
    vocabulary: DeviceVocabulary,
    policy: ReadPolicy,
    /// Where echoed device output and operator notices go.
    console: Box<dyn Write + Send>,
    commands_sent: usize,
}

impl Session {
    /// Wrap an open endpoint. Echoed output goes to stdout.
    pub fn new(
        port: Box<dyn SerialPortAdapter>,
        vocabulary: DeviceVocabulary,
        policy: ReadPolicy,
    ) -> Self {
        Self {
            port,
            vocabulary,
            policy,
            console: Box::new(std::io::stdout()),
            commands_sent: 0,
        }
    }

    /// Send echoed output somewhere other than stdout.
    pub fn with_console(mut self, console: Box<dyn Write + Send>) -> Self {
        self.console = console;
        self
    }

    pub fn port_name(&self) -> &str {
        self.port.name()
    }

    pub fn vocabulary(&self) -> &DeviceVocabulary {
        &self.vocabulary
    }

    /// Commands transmitted over the lifetime of this session.
    pub fn commands_sent(&self) -> usize {
        self.commands_sent
    }

    /// Transmit one command line.
    pub fn send(&mut self, command: &str) -> ProtocolResult<()> {
        transmit::send_command(&mut *self.port, command, &self.vocabulary.line_terminator)?;
        self.commands_sent += 1;
        Ok(())
    }

    /// Run one read cycle, echoing non-empty output when `echo` is set.
    pub fn read_response(&mut self, echo: bool) -> ProtocolResult<Response> {
        let response = reader::read_until_quiet(&mut *self.port, &self.policy)?;
        if echo && !response.is_empty() {
            writeln!(self.console, "{}", response.text)?;
            self.console.flush()?;
        }
        Ok(response)
    }

    /// Send `command` and read its response.
    ///
    /// A response cut off by the read cap fails with `Unsettled`, so the
    /// next command is never transmitted while the device is still talking.
    pub fn exchange(&mut self, command: &str, echo: bool) -> ProtocolResult<Response> {
        self.send(command)?;
        let response = self.read_response(echo)?;
        if !response.complete {
            return Err(ProtocolError::Unsettled {
                command: command.to_string(),
                cap: self.policy.max_duration,
            });
        }
        Ok(response)
    }

    /// Print an operator-facing line on the session console.
    pub fn announce(&mut self, line: &str) -> ProtocolResult<()> {
        writeln!(self.console, "{line}")?;
        self.console.flush()?;
        Ok(())
    }

    /// Close the endpoint.
    pub fn close(self) {
        info!(
            port = %self.port.name(),
            commands = self.commands_sent,
            "closing session"
        );
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("port", &self.port)
            .field("policy", &self.policy)
            .field("commands_sent", &self.commands_sent)
            .finish()
    }
}
