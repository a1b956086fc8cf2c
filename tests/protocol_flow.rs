//! End-to-end protocol flows against scripted mock switches.
//!
//! Covers discovery, prompt navigation, the built-in recipes, script
//! playback and the interactive relay through the public API only.

mod common;

use common::*;
use serial_switch_agent::port::{MockPortOpener, MockSerialPort, PortConfiguration};
use serial_switch_agent::protocol::{
    CommandScript, DeviceMode, DeviceVocabulary, InteractiveExit, OperatorConsole, PromptProbe,
    ReadPolicy, Recipe, RecipeRunner, WizardNavigator,
};
use serial_switch_agent::{AppError, ExitCodes, Operation, Outcome, ProtocolError, Provisioner};
use std::collections::VecDeque;

struct ScriptedConsole(VecDeque<String>);

impl ScriptedConsole {
    fn new(lines: &[&str]) -> Self {
        Self(lines.iter().map(|s| s.to_string()).collect())
    }
}

impl OperatorConsole for ScriptedConsole {
    fn read_line(&mut self, _prompt: &str) -> std::io::Result<Option<String>> {
        Ok(self.0.pop_front())
    }
}

fn probe(opener: &mut MockPortOpener) -> PromptProbe<'_> {
    PromptProbe::new(
        opener,
        PortConfiguration::default(),
        ReadPolicy::immediate(),
        DeviceVocabulary::cisco_ios(),
    )
}

// ============================================================================
// Discovery
// ============================================================================

mod discovery {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_skips_silent_unknown_and_missing_ports() {
        let mut opener = MockPortOpener::new()
            .with_port(MockSerialPort::new("COM1"))
            .with_port(switch_replying("COM2", "booting..."))
            .with_port(idle_switch("COM4"));

        let (session, outcome) = probe(&mut opener)
            .discover(&names(&["COM1", "COM2", "COM3", "COM4"]))
            .unwrap();

        assert_eq!(session.port_name(), "COM4");
        assert_eq!(outcome.attempts, 4);
        assert_eq!(outcome.response.text, USER_PROMPT);
        assert_eq!(opener.attempts(), names(&["COM1", "COM2", "COM3", "COM4"]));
    }

    #[test]
    fn test_prompt_must_be_the_last_character() {
        let mut opener = MockPortOpener::new().with_port(switch_replying("COM1", "Switch> "));
        let result = probe(&mut opener).discover(&names(&["COM1"]));
        assert!(matches!(
            result,
            Err(ProtocolError::NoDeviceFound { candidates: 1 })
        ));

        let mut opener = MockPortOpener::new().with_port(switch_replying("COM1", "Switch>"));
        assert!(probe(&mut opener).discover(&names(&["COM1"])).is_ok());
    }

    #[test]
    fn test_stops_at_first_match() {
        let mut opener = MockPortOpener::new()
            .with_port(idle_switch("COM1"))
            .with_port(idle_switch("COM2"));

        let (_, outcome) = probe(&mut opener)
            .discover(&names(&["COM1", "COM2"]))
            .unwrap();
        assert_eq!(outcome.port_name, "COM1");
        assert_eq!(opener.attempts(), names(&["COM1"]));
    }

    #[test]
    fn test_no_candidates() {
        let mut opener = MockPortOpener::new();
        let err = probe(&mut opener).discover(&[]).unwrap_err();
        assert!(matches!(err, ProtocolError::NoDeviceFound { candidates: 0 }));
    }
}

// ============================================================================
// Navigation
// ============================================================================

mod navigation {
    use super::*;
    use pretty_assertions::assert_eq;

    fn navigate_detours(detours: usize) {
        let port = wizard_switch("MOCK0", detours);
        let sink = CaptureSink::new();
        let mut session = session_on(&port, &sink);

        let report = WizardNavigator::default().navigate(&mut session).unwrap();
        assert_eq!(report.cycles, detours + 1);
        assert_eq!(report.wizards_declined, detours);
        assert_eq!(report.unwinds, 0);
        assert_eq!(report.prompt, "Switch>");

        let mut expected = Vec::new();
        for _ in 0..detours {
            expected.extend([" ", "no", "yes", ""]);
        }
        expected.push(" ");
        assert_eq!(port.written_lines(), expected);
    }

    #[test]
    fn test_already_at_prompt() {
        navigate_detours(0);
    }

    #[test]
    fn test_one_wizard_detour() {
        navigate_detours(1);
    }

    #[test]
    fn test_repeated_wizard_detours() {
        navigate_detours(3);
    }

    #[test]
    fn test_unwinds_privileged_mode() {
        let mut port = MockSerialPort::with_replies("MOCK0", [CONFIG_PROMPT, PRIV_PROMPT]);
        port.set_default_reply(USER_PROMPT.as_bytes());
        let sink = CaptureSink::new();
        let mut session = session_on(&port, &sink);

        let report = WizardNavigator::default().navigate(&mut session).unwrap();
        assert_eq!(report.cycles, 2);
        assert_eq!(report.unwinds, 1);
        assert_eq!(port.written_lines(), vec![" ", "exit", " "]);
    }

    #[test]
    fn test_gives_up_after_bounded_cycles() {
        let port = switch_replying("MOCK0", CONFIG_PROMPT);
        let sink = CaptureSink::new();
        let mut session = session_on(&port, &sink);

        let err = WizardNavigator::new(4).navigate(&mut session).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::StablePromptUnreachable {
                cycles: 4,
                last_mode: DeviceMode::ConfigTerminal
            }
        ));
        assert_eq!(port.written_lines().len(), 8);
    }
}

// ============================================================================
// Recipes
// ============================================================================

mod recipes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_password_sent_when_asked() {
        let mut port = MockSerialPort::with_replies("MOCK0", ["\r\nPassword: "]);
        port.set_default_reply(PRIV_PROMPT.as_bytes());
        let sink = CaptureSink::new();
        let mut session = session_on(&port, &sink);

        let report = RecipeRunner::new("s3cret")
            .run(&mut session, &Recipe::factory_reset())
            .unwrap();
        assert!(report.password_sent);
        assert_eq!(report.commands_sent, 7);
        assert_eq!(
            port.written_lines(),
            vec!["enable", "s3cret", "write erase", "", "reload", "no", ""]
        );
    }

    #[test]
    fn test_password_not_sent_without_prompt() {
        let port = switch_replying("MOCK0", PRIV_PROMPT);
        let sink = CaptureSink::new();
        let mut session = session_on(&port, &sink);

        let report = RecipeRunner::new("s3cret")
            .run(&mut session, &Recipe::factory_reset())
            .unwrap();
        assert!(!report.password_sent);
        assert!(!port.written_lines().iter().any(|l| l == "s3cret"));
    }

    #[test]
    fn test_bringup_uses_configured_interface() {
        let mut config = fast_config();
        config.bringup.interface = "gig 1/0/1".into();
        config.bringup.address = "10.0.0.2".into();
        config.device.password = "pw".into();

        let mut port = MockSerialPort::with_replies("COM1", [USER_PROMPT, USER_PROMPT]);
        port.set_default_reply(PRIV_PROMPT.as_bytes());
        let mut opener = MockPortOpener::new().with_port(port.clone());

        let outcome = Provisioner::new(&config, &mut opener)
            .with_echo_sink(Box::new(CaptureSink::new()))
            .run(
                &names(&["COM1"]),
                &Operation::StaticBringup,
                &mut ScriptedConsole::new(&[]),
            )
            .unwrap();

        assert!(matches!(outcome, Outcome::Recipe(report) if report.commands_sent == 10));
        let written = port.written_lines();
        assert!(written.contains(&"enable secret pw".to_string()));
        assert!(written.contains(&"int gig 1/0/1".to_string()));
        assert!(written.contains(&"ip add 10.0.0.2 255.255.255.0".to_string()));
    }
}

// ============================================================================
// Whole invocations
// ============================================================================

mod invocation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_script_round_trip() {
        let config = fast_config();
        let mut port = MockSerialPort::with_replies("COM1", [USER_PROMPT, USER_PROMPT]);
        port.set_default_reply(b"\r\nCisco IOS Software, Version 15.2\r\nSwitch>");
        let mut opener = MockPortOpener::new().with_port(port.clone());
        let sink = CaptureSink::new();

        let script = CommandScript::parse("#comment\n!\nshow version\n");
        let outcome = Provisioner::new(&config, &mut opener)
            .with_echo_sink(Box::new(sink.clone()))
            .run(
                &names(&["COM1"]),
                &Operation::Script(script),
                &mut ScriptedConsole::new(&[]),
            )
            .unwrap();

        match outcome {
            Outcome::Playback(report) => {
                assert_eq!(report.commands_sent, 1);
                assert_eq!(report.blank_enters, 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(port.written_lines(), vec!["", " ", "", "show version"]);
        assert!(sink.contents().contains("Version 15.2"));
    }

    #[test]
    fn test_rejected_script_maps_to_exit_code() {
        let config = fast_config();
        let mut port =
            MockSerialPort::with_replies("COM1", [USER_PROMPT, USER_PROMPT, PRIV_PROMPT, REJECTED]);
        port.set_default_reply(CONFIG_PROMPT.as_bytes());
        let mut opener = MockPortOpener::new().with_port(port.clone());

        let script = CommandScript::parse("enable\nint gig 9/9\nno shut\n");
        let err = Provisioner::new(&config, &mut opener)
            .with_echo_sink(Box::new(CaptureSink::new()))
            .run(
                &names(&["COM1"]),
                &Operation::Script(script),
                &mut ScriptedConsole::new(&[]),
            )
            .unwrap_err();

        assert_eq!(err.exit_code(), ExitCodes::SCRIPT_REJECTED);
        assert!(matches!(
            err,
            AppError::Protocol(ProtocolError::Rejected { line_number: 2, executed: 2, .. })
        ));
        assert_eq!(port.written_lines(), vec!["", " ", "enable", "int gig 9/9"]);
    }

    #[test]
    fn test_no_switch_maps_to_exit_code() {
        let config = fast_config();
        let mut opener = MockPortOpener::new().with_port(MockSerialPort::new("COM1"));

        let err = Provisioner::new(&config, &mut opener)
            .run(
                &names(&["COM1", "COM2"]),
                &Operation::FactoryReset,
                &mut ScriptedConsole::new(&[]),
            )
            .unwrap_err();
        assert_eq!(err.exit_code(), ExitCodes::DEVICE_NOT_FOUND);
    }

    #[test]
    fn test_interactive_quit_is_not_an_error() {
        let config = fast_config();
        let port = idle_switch("COM1");
        let mut opener = MockPortOpener::new().with_port(port.clone());
        let sink = CaptureSink::new();

        let outcome = Provisioner::new(&config, &mut opener)
            .with_echo_sink(Box::new(sink.clone()))
            .run(
                &names(&["COM1"]),
                &Operation::Interactive,
                &mut ScriptedConsole::new(&["show clock", "exitnow", "reload"]),
            )
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Interactive {
                exit: InteractiveExit::Quit,
                relayed: 1
            }
        );
        assert_eq!(port.written_lines(), vec!["", " ", "", "show clock"]);
        assert!(sink.contents().contains("exitnow"));
    }

    #[test]
    fn test_runaway_output_maps_to_exit_code() {
        let mut config = fast_config();
        config.serial.max_response_ms = 20;
        let mut port = MockSerialPort::new("COM1");
        port.set_flood(Some(b'#'));
        let mut opener = MockPortOpener::new().with_port(port.clone());

        let err = Provisioner::new(&config, &mut opener)
            .with_echo_sink(Box::new(CaptureSink::new()))
            .run(
                &names(&["COM1"]),
                &Operation::Script(CommandScript::parse("show version\n")),
                &mut ScriptedConsole::new(&[]),
            )
            .unwrap_err();

        assert_eq!(err.exit_code(), ExitCodes::OUTPUT_UNSETTLED);
        assert_eq!(port.written_lines(), vec!["", " "]);
    }
}
