//! Normalizing a freshly discovered switch to the user-exec prompt.
//!
//! The setup dialog and nested admin modes can only be told apart by their
//! output, so navigation is reactive: each cycle sends the wake marker,
//! classifies the reply and applies one corrective action until the reply
//! ends in the user-exec terminator. The number of cycles is bounded.

use super::error::{ProtocolError, ProtocolResult};
use super::vocabulary::{DeviceMode, DeviceVocabulary};
use crate::session::Session;
use std::fmt;
use tracing::{debug, info};

/// Default bound on navigation cycles.
pub const DEFAULT_MAX_CYCLES: usize = 16;

/// Navigator states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// Entry state; holds whatever probing returned.
    ProbingResult,
    /// The first-boot setup dialog is on screen.
    WizardDialog,
    /// Some mode other than user exec.
    NonExecMode,
    /// Terminal: the reply ended in the user-exec terminator.
    UserExecReady,
}

impl NavState {
    /// State implied by one reply.
    pub fn from_response(vocabulary: &DeviceVocabulary, text: &str) -> Self {
        if vocabulary.has_wizard_banner(text) {
            Self::WizardDialog
        } else if vocabulary.is_user_exec(text) {
            Self::UserExecReady
        } else {
            Self::NonExecMode
        }
    }
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ProbingResult => "probing-result",
            Self::WizardDialog => "wizard-dialog",
            Self::NonExecMode => "non-exec-mode",
            Self::UserExecReady => "user-exec-ready",
        };
        f.write_str(name)
    }
}

/// Summary of a successful navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationReport {
    /// Wake cycles performed, including the final one.
    pub cycles: usize,
    /// Times the setup dialog was declined.
    pub wizards_declined: usize,
    /// Times the unwind command was sent.
    pub unwinds: usize,
    /// Last line of the reply that ended navigation.
    pub prompt: String,
}

#[derive(Debug, Clone, Copy)]
pub struct WizardNavigator {
    max_cycles: usize,
}

impl WizardNavigator {
    pub fn new(max_cycles: usize) -> Self {
        Self {
            max_cycles: max_cycles.max(1),
        }
    }

    pub fn max_cycles(&self) -> usize {
        self.max_cycles
    }

    /// Drive the session to the user-exec prompt.
    pub fn navigate(&self, session: &mut Session) -> ProtocolResult<NavigationReport> {
        let vocabulary = session.vocabulary().clone();
        let mut state = NavState::ProbingResult;
        let mut last_mode = DeviceMode::Unknown;
        let mut wizards_declined = 0;
        let mut unwinds = 0;

        for cycle in 1..=self.max_cycles {
            let reply = session.exchange(&vocabulary.marker_command, false)?;
            let next = NavState::from_response(&vocabulary, &reply.text);
            last_mode = vocabulary.classify(&reply.text);
            debug!(cycle, from = %state, to = %next, mode = %last_mode, "navigation step");
            state = next;

            match state {
                NavState::UserExecReady => {
                    let prompt = reply
                        .text
                        .rsplit(['\r', '\n'])
                        .next()
                        .unwrap_or_default()
                        .to_string();
                    info!(cycles = cycle, %prompt, "switch is at the user-exec prompt");
                    return Ok(NavigationReport {
                        cycles: cycle,
                        wizards_declined,
                        unwinds,
                        prompt,
                    });
                }
                NavState::WizardDialog => {
                    info!("declining initial configuration dialog");
                    session.exchange(&vocabulary.wizard_decline, false)?;
                    session.exchange(&vocabulary.wizard_confirm, false)?;
                    session.exchange("", false)?;
                    wizards_declined += 1;
                }
                NavState::NonExecMode | NavState::ProbingResult => {
                    session.exchange(&vocabulary.unwind_command, false)?;
                    unwinds += 1;
                }
            }
        }

        Err(ProtocolError::StablePromptUnreachable {
            cycles: self.max_cycles,
            last_mode,
        })
    }
}

impl Default for WizardNavigator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CYCLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MockSerialPort;
    use crate::protocol::ReadPolicy;
    use std::time::Duration;

    const WIZARD: &str = "\r\n         --- System Configuration Dialog ---\r\n\r\n\
        Would you like to enter the initial configuration dialog? [yes/no]: ";

    fn session(port: &MockSerialPort) -> Session {
        Session::new(
            Box::new(port.clone()),
            DeviceVocabulary::cisco_ios(),
            ReadPolicy::immediate(),
        )
        .with_console(Box::new(std::io::sink()))
    }

    #[test]
    fn test_already_at_prompt() {
        let port = MockSerialPort::with_replies("MOCK0", ["\r\nSwitch>"]);
        let report = WizardNavigator::default().navigate(&mut session(&port)).unwrap();

        assert_eq!(report.cycles, 1);
        assert_eq!(report.wizards_declined, 0);
        assert_eq!(report.unwinds, 0);
        assert_eq!(report.prompt, "Switch>");
        assert_eq!(port.written_lines(), vec![" "]);
    }

    #[test]
    fn test_declines_wizard() {
        let port = MockSerialPort::with_replies(
            "MOCK0",
            [
                WIZARD,
                "\r\nWould you like to terminate autoinstall? [yes]: ",
                "\r\nPress RETURN to get started!\r\n",
                "\r\nSwitch>",
                "\r\nSwitch>",
            ],
        );
        let report = WizardNavigator::default().navigate(&mut session(&port)).unwrap();

        assert_eq!(report.cycles, 2);
        assert_eq!(report.wizards_declined, 1);
        assert_eq!(port.written_lines(), vec![" ", "no", "yes", "", " "]);
    }

    #[test]
    fn test_unwinds_nested_modes() {
        let port = MockSerialPort::with_replies(
            "MOCK0",
            [
                "\r\nSwitch(config-if)#",
                "\r\nSwitch(config)#",
                "\r\nSwitch(config)#",
                "\r\nSwitch#",
                "\r\nSwitch#",
                "\r\nSwitch>",
                "\r\nSwitch>",
            ],
        );
        let report = WizardNavigator::default().navigate(&mut session(&port)).unwrap();

        assert_eq!(report.cycles, 4);
        assert_eq!(report.unwinds, 3);
        assert_eq!(
            port.written_lines(),
            vec![" ", "exit", " ", "exit", " ", "exit", " "]
        );
    }

    #[test]
    fn test_privileged_prompt_is_not_ready() {
        let vocabulary = DeviceVocabulary::cisco_ios();
        assert_eq!(
            NavState::from_response(&vocabulary, "\r\nSwitch#"),
            NavState::NonExecMode
        );
        assert_eq!(
            NavState::from_response(&vocabulary, "\r\nSwitch> "),
            NavState::NonExecMode
        );
        assert_eq!(
            NavState::from_response(&vocabulary, "\r\nSwitch>"),
            NavState::UserExecReady
        );
    }

    #[test]
    fn test_gives_up_after_bound() {
        let mut port = MockSerialPort::new("MOCK0");
        port.set_default_reply(b"\r\nrommon 1 > boot");
        let err = WizardNavigator::new(3)
            .navigate(&mut session(&port))
            .unwrap_err();

        match err {
            ProtocolError::StablePromptUnreachable { cycles, last_mode } => {
                assert_eq!(cycles, 3);
                assert_eq!(last_mode, DeviceMode::Unknown);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(port.written_lines().len(), 6);
    }

    #[test]
    fn test_truncated_reply_is_never_a_prompt() {
        let mut port = MockSerialPort::new("MOCK0");
        port.set_flood(Some(b'>'));
        let policy = ReadPolicy {
            max_duration: Duration::from_millis(20),
            ..ReadPolicy::immediate()
        };
        let mut session = Session::new(Box::new(port.clone()), DeviceVocabulary::cisco_ios(), policy)
            .with_console(Box::new(std::io::sink()));

        let err = WizardNavigator::default().navigate(&mut session).unwrap_err();
        assert!(matches!(err, ProtocolError::Unsettled { .. }));
        assert_eq!(port.written_lines(), vec![" "]);
    }

    #[test]
    fn test_zero_bound_still_tries_once() {
        assert_eq!(WizardNavigator::new(0).max_cycles(), 1);
    }
}
