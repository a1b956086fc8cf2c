//! Built-in command recipes.
//!
//! Fixed sequences that assume the switch sits at the user-exec prompt. The
//! only branch is privileged-mode entry: the configured password is sent if
//! and only if the reply to the enable command asks for one.

use super::error::ProtocolResult;
use crate::config::BringupConfig;
use crate::session::Session;
use tracing::{debug, info};

/// One recipe step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeStep {
    /// Send the command and read its reply.
    Send(String),
    /// Send the enable command, answering a password prompt if one appears.
    EnterPrivileged,
}

impl RecipeStep {
    fn send(command: impl Into<String>) -> Self {
        Self::Send(command.into())
    }
}

/// A named, ordered command sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: &'static str,
    pub steps: Vec<RecipeStep>,
}

impl Recipe {
    /// Erase the startup configuration and reload without saving.
    pub fn factory_reset() -> Self {
        Self {
            name: "factory-reset",
            steps: vec![
                RecipeStep::EnterPrivileged,
                RecipeStep::send("write erase"),
                RecipeStep::send(""),
                RecipeStep::send("reload"),
                RecipeStep::send("no"),
                RecipeStep::send(""),
            ],
        }
    }

    /// Set the enable secret and bring up one interface with a static address.
    pub fn static_bringup(bringup: &BringupConfig, password: &str) -> Self {
        Self {
            name: "static-bringup",
            steps: vec![
                RecipeStep::send(""),
                RecipeStep::EnterPrivileged,
                RecipeStep::send("configure terminal"),
                RecipeStep::send(format!("enable secret {password}")),
                RecipeStep::send(format!("int {}", bringup.interface)),
                RecipeStep::send(format!("ip add {} {}", bringup.address, bringup.netmask)),
                RecipeStep::send("no shut"),
                RecipeStep::send("exit"),
                RecipeStep::send("exit"),
                RecipeStep::send("exit"),
            ],
        }
    }
}

/// Counts from a recipe run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeReport {
    pub commands_sent: usize,
    pub password_sent: bool,
}

pub struct RecipeRunner<'a> {
    password: &'a str,
}

impl<'a> RecipeRunner<'a> {
    pub fn new(password: &'a str) -> Self {
        Self { password }
    }

    /// Execute every step in order. Replies are echoed but not validated.
    pub fn run(&self, session: &mut Session, recipe: &Recipe) -> ProtocolResult<RecipeReport> {
        info!(recipe = recipe.name, steps = recipe.steps.len(), "running recipe");
        let mut report = RecipeReport::default();

        for step in &recipe.steps {
            match step {
                RecipeStep::Send(command) => {
                    session.exchange(command, true)?;
                    report.commands_sent += 1;
                }
                RecipeStep::EnterPrivileged => {
                    let enable = session.vocabulary().enable_command.clone();
                    let reply = session.exchange(&enable, true)?;
                    report.commands_sent += 1;
                    if session.vocabulary().has_password_prompt(&reply.text) {
                        debug!("enable asked for a password");
                        session.exchange(self.password, true)?;
                        report.commands_sent += 1;
                        report.password_sent = true;
                    }
                }
            }
        }

        info!(recipe = recipe.name, commands = report.commands_sent, "recipe finished");
        Ok(report)
    }
}
