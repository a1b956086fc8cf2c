//! Pass-through relay between the operator and the switch.

use super::error::ProtocolResult;
use crate::session::Session;
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// Source of operator input lines.
pub trait OperatorConsole {
    /// Show `prompt` and read one line without its line ending.
    ///
    /// `Ok(None)` means the input stream has ended.
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>>;
}

/// Reads operator lines from stdin, prompting on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConsole;

impl OperatorConsole for StdinConsole {
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Why the relay stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractiveExit {
    /// The operator typed the quit token.
    Quit,
    /// Operator input ended.
    EndOfInput,
}

pub struct PassThrough<'a> {
    quit_token: &'a str,
    prompt: &'a str,
}

impl<'a> PassThrough<'a> {
    pub fn new(quit_token: &'a str, prompt: &'a str) -> Self {
        Self { quit_token, prompt }
    }

    /// Relay operator lines until the quit token or end of input.
    ///
    /// The caller owns shutdown: quitting only returns, it never exits the process.
    pub fn run(
        &self,
        session: &mut Session,
        console: &mut dyn OperatorConsole,
    ) -> ProtocolResult<(InteractiveExit, usize)> {
        relay(session, "")?;
        session.announce(&format!(
            "Enter your commands below - use '{}' to quit the application",
            self.quit_token
        ))?;

        let mut relayed = 0;
        loop {
            let Some(line) = console.read_line(self.prompt)? else {
                info!(relayed, "operator input ended");
                return Ok((InteractiveExit::EndOfInput, relayed));
            };
            if line == self.quit_token {
                info!(relayed, "operator quit");
                return Ok((InteractiveExit::Quit, relayed));
            }
            relay(session, &line)?;
            relayed += 1;
        }
    }
}

/// Send one operator line and echo the reply.
///
/// The operator sees the output and decides what to send next, so a capped
/// read only warns here instead of failing like scripted exchanges do.
fn relay(session: &mut Session, line: &str) -> ProtocolResult<()> {
    session.send(line)?;
    if !session.read_response(true)?.complete {
        warn!(command = %line, "device output was still arriving when the read cap expired");
    }
    Ok(())
}
