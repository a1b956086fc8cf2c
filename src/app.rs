//! End-to-end orchestration of one invocation.
//!
//! Enumerate → probe → navigate → run exactly one operation → close. Every
//! failure comes back as an `AppError`; only the binary decides how the
//! process exits.

use crate::config::Config;
use crate::error::AppResult;
use crate::port::PortOpener;
use crate::protocol::{
    CommandScript, InteractiveExit, NavigationReport, OperatorConsole, PassThrough,
    PlaybackReport, ProbeOutcome, PromptProbe, ReadPolicy, Recipe, RecipeReport, RecipeRunner,
    ScriptPlayer, WizardNavigator,
};
use crate::session::Session;
use std::io::Write;
use tracing::info;

/// What to do once the switch is at a stable prompt.
#[derive(Debug, Clone)]
pub enum Operation {
    Interactive,
    FactoryReset,
    StaticBringup,
    Script(CommandScript),
}

/// Result of the chosen operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Interactive { exit: InteractiveExit, relayed: usize },
    Recipe(RecipeReport),
    Playback(PlaybackReport),
}

pub struct Provisioner<'a> {
    config: &'a Config,
    opener: &'a mut dyn PortOpener,
    echo: Option<Box<dyn Write + Send>>,
}

impl<'a> Provisioner<'a> {
    pub fn new(config: &'a Config, opener: &'a mut dyn PortOpener) -> Self {
        Self {
            config,
            opener,
            echo: None,
        }
    }

    /// Echo device output to `sink` instead of stdout.
    pub fn with_echo_sink(mut self, sink: Box<dyn Write + Send>) -> Self {
        self.echo = Some(sink);
        self
    }

    /// Endpoints to probe: just `port_override` if given, else every openable candidate.
    pub fn candidates(&mut self, port_override: Option<&str>) -> AppResult<Vec<String>> {
        if let Some(port) = port_override {
            return Ok(vec![port.to_string()]);
        }
        let enumerator = self.config.serial.enumerator()?;
        let port_config = self.config.serial.port_configuration();
        Ok(enumerator.openable(&mut *self.opener, &port_config)?)
    }

    /// Find the switch and bring it to the user-exec prompt.
    pub fn connect(
        &mut self,
        candidates: &[String],
    ) -> AppResult<(Session, ProbeOutcome, NavigationReport)> {
        let vocabulary = self.config.device.vocabulary()?;
        let policy = ReadPolicy::from_config(&self.config.serial);
        let probe = PromptProbe::new(
            &mut *self.opener,
            self.config.serial.port_configuration(),
            policy,
            vocabulary,
        );

        let (mut session, outcome) = probe.discover(candidates)?;
        if let Some(sink) = self.echo.take() {
            session = session.with_console(sink);
        }

        info!(port = %outcome.port_name, "preparing switch prompt");
        let report = WizardNavigator::new(self.config.navigator.max_cycles).navigate(&mut session)?;
        info!("ready to begin");
        Ok((session, outcome, report))
    }

    /// Run `operation` on a prepared session.
    pub fn execute(
        &self,
        session: &mut Session,
        operation: &Operation,
        console: &mut dyn OperatorConsole,
    ) -> AppResult<Outcome> {
        let password = self.config.device.password.as_str();
        let outcome = match operation {
            Operation::Interactive => {
                let interactive = &self.config.interactive;
                let (exit, relayed) = PassThrough::new(&interactive.quit_token, &interactive.prompt)
                    .run(session, console)?;
                Outcome::Interactive { exit, relayed }
            }
            Operation::FactoryReset => {
                Outcome::Recipe(RecipeRunner::new(password).run(session, &Recipe::factory_reset())?)
            }
            Operation::StaticBringup => {
                let recipe = Recipe::static_bringup(&self.config.bringup, password);
                Outcome::Recipe(RecipeRunner::new(password).run(session, &recipe)?)
            }
            Operation::Script(script) => Outcome::Playback(ScriptPlayer::new().play(session, script)?),
        };
        Ok(outcome)
    }

    /// Connect, execute and close.
    pub fn run(
        &mut self,
        candidates: &[String],
        operation: &Operation,
        console: &mut dyn OperatorConsole,
    ) -> AppResult<Outcome> {
        let (mut session, _, _) = self.connect(candidates)?;
        let result = self.execute(&mut session, operation, console);
        session.close();
        result
    }
}
