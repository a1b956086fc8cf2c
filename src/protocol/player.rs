//! Script playback with halt-on-rejection.
//!
//! Lines are replayed one exchange at a time with device output echoed. The
//! first reply carrying the invalid-input token stops playback: nothing after
//! the rejected line is sent and nothing already applied is rolled back.

use super::error::{ProtocolError, ProtocolResult};
use super::script::{CommandScript, ScriptStep};
use crate::session::Session;
use tracing::{info, warn};

/// Counts from a completed playback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Script commands sent, blank-enters excluded.
    pub commands_sent: usize,
    /// Blank-enter markers sent.
    pub blank_enters: usize,
}

impl PlaybackReport {
    pub fn total(&self) -> usize {
        self.commands_sent + self.blank_enters
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptPlayer;

impl ScriptPlayer {
    pub fn new() -> Self {
        Self
    }

    /// Replay `script` on `session`.
    pub fn play(&self, session: &mut Session, script: &CommandScript) -> ProtocolResult<PlaybackReport> {
        let mut report = PlaybackReport::default();
        info!(lines = script.len(), "playing provisioning script");

        for line in script.lines() {
            match &line.step {
                ScriptStep::BlankEnter => {
                    session.exchange("", true)?;
                    report.blank_enters += 1;
                }
                ScriptStep::Command(command) => {
                    let reply = session.exchange(command, true)?;
                    report.commands_sent += 1;
                    if session.vocabulary().has_invalid_input(&reply.text) {
                        warn!(
                            line = line.line_number,
                            command = %command,
                            "last command failed; ending session"
                        );
                        return Err(ProtocolError::Rejected {
                            line_number: line.line_number,
                            command: command.clone(),
                            executed: report.total(),
                        });
                    }
                }
            }
        }

        info!(
            commands = report.commands_sent,
            blank_enters = report.blank_enters,
            "configuration completed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MockSerialPort;
    use crate::protocol::{DeviceVocabulary, ReadPolicy};
    use std::time::Duration;

    const REJECTED: &str = "\r\n          ^\r\n% Invalid input detected at '^' marker.\r\n\r\nSwitch(config)#";

    fn session(port: &MockSerialPort) -> Session {
        Session::new(
            Box::new(port.clone()),
            DeviceVocabulary::cisco_ios(),
            ReadPolicy::immediate(),
        )
        .with_console(Box::new(std::io::sink()))
    }

    #[test]
    fn test_comment_blank_enter_and_command() {
        let mut port = MockSerialPort::new("MOCK0");
        port.set_default_reply(b"\nSwitch#");
        let script = CommandScript::parse("#comment\n!\nshow version\n");

        let report = ScriptPlayer::new().play(&mut session(&port), &script).unwrap();
        assert_eq!(report.commands_sent, 1);
        assert_eq!(report.blank_enters, 1);
        assert_eq!(port.written_lines(), vec!["", "show version"]);
    }

    #[test]
    fn test_halts_on_rejection() {
        let port = MockSerialPort::with_replies(
            "MOCK0",
            ["\r\nSwitch(config)#", REJECTED, "\r\nSwitch(config)#"],
        );
        let script = CommandScript::parse("hostname sw1\nip adress 10.0.0.1\nend\n");

        let err = ScriptPlayer::new()
            .play(&mut session(&port), &script)
            .unwrap_err();
        match err {
            ProtocolError::Rejected {
                line_number,
                command,
                executed,
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(command, "ip adress 10.0.0.1");
                assert_eq!(executed, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(port.written_lines(), vec!["hostname sw1", "ip adress 10.0.0.1"]);
    }

    #[test]
    fn test_blank_enter_reply_is_not_checked() {
        let port = MockSerialPort::with_replies("MOCK0", [REJECTED, "\r\nSwitch#"]);
        let script = CommandScript::parse("!\nshow clock\n");

        let report = ScriptPlayer::new().play(&mut session(&port), &script).unwrap();
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn test_runaway_output_stops_playback() {
        let mut port = MockSerialPort::new("MOCK0");
        port.set_flood(Some(b'#'));
        let policy = ReadPolicy {
            max_duration: Duration::from_millis(20),
            ..ReadPolicy::immediate()
        };
        let mut session = Session::new(Box::new(port.clone()), DeviceVocabulary::cisco_ios(), policy)
            .with_console(Box::new(std::io::sink()));
        let script = CommandScript::parse("show running-config\nconfigure terminal\nhostname sw1\n");

        let err = ScriptPlayer::new().play(&mut session, &script).unwrap_err();
        assert!(matches!(err, ProtocolError::Unsettled { ref command, .. } if command == "show running-config"));
        assert_eq!(port.written_lines(), vec!["show running-config"]);
    }

    #[test]
    fn test_empty_script_sends_nothing() {
        let port = MockSerialPort::new("MOCK0");
        let report = ScriptPlayer::new()
            .play(&mut session(&port), &CommandScript::parse("# only comments\n"))
            .unwrap();
        assert_eq!(report, PlaybackReport::default());
        assert!(port.get_write_log().is_empty());
    }
}
