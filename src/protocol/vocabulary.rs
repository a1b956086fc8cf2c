//! Device vocabulary and mode classification.
//!
//! Console output has no framing, so the current device mode is inferred
//! from text alone: suffix matches against prompt terminators and substring
//! matches against banners and error tokens. The tokens live in a
//! `DeviceVocabulary` so other line-oriented consoles can be targeted from
//! configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the built-in vocabulary.
pub const CISCO_IOS: &str = "cisco_ios";

/// Recognized tokens and canned replies for one device family.
///
/// All matches are exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceVocabulary {
    /// Suffix of the user-exec prompt.
    pub user_exec_terminator: String,
    /// Suffix of the privileged-exec prompt.
    pub privileged_exec_terminator: String,
    /// Appears in the last line of a privileged prompt while in configuration mode.
    pub config_mode_marker: String,
    /// First-boot setup dialog banner.
    pub wizard_banner: String,
    /// Shown while output is paused for paging.
    pub pagination_banner: String,
    /// Password request after `enable_command`.
    pub password_prompt: String,
    /// Emitted when the device rejects a command.
    pub invalid_input: String,
    /// Appended to every transmitted command.
    pub line_terminator: String,
    /// Sent each navigation cycle to elicit a fresh prompt.
    pub marker_command: String,
    /// Answer to the setup dialog question.
    pub wizard_decline: String,
    /// Confirms that the setup dialog is skipped.
    pub wizard_confirm: String,
    /// Leaves whatever nested mode the device is in.
    pub unwind_command: String,
    /// Enters privileged mode.
    pub enable_command: String,
}

impl DeviceVocabulary {
    /// Tokens of a Cisco IOS switch console.
    pub fn cisco_ios() -> Self {
        Self {
            user_exec_terminator: ">".to_string(),
            privileged_exec_terminator: "#".to_string(),
            config_mode_marker: "(config".to_string(),
            wizard_banner: "Would you like to enter the initial configuration dialog?".to_string(),
            pagination_banner: "--More--".to_string(),
            password_prompt: "Password".to_string(),
            invalid_input: "Invalid input detected".to_string(),
            line_terminator: "\r".to_string(),
            marker_command: " ".to_string(),
            wizard_decline: "no".to_string(),
            wizard_confirm: "yes".to_string(),
            unwind_command: "exit".to_string(),
            enable_command: "enable".to_string(),
        }
    }

    /// Built-in vocabulary by family name.
    pub fn builtin(family: &str) -> Option<Self> {
        match family {
            CISCO_IOS => Some(Self::cisco_ios()),
            _ => None,
        }
    }

    /// Output ends with the user-exec prompt.
    pub fn is_user_exec(&self, text: &str) -> bool {
        ends_with_token(text, &self.user_exec_terminator)
    }

    /// Output ends with the privileged-exec prompt.
    pub fn is_privileged_exec(&self, text: &str) -> bool {
        ends_with_token(text, &self.privileged_exec_terminator)
    }

    /// Output ends with either exec prompt.
    pub fn is_exec_prompt(&self, text: &str) -> bool {
        self.is_user_exec(text) || self.is_privileged_exec(text)
    }

    pub fn has_wizard_banner(&self, text: &str) -> bool {
        contains_token(text, &self.wizard_banner)
    }

    pub fn has_pagination(&self, text: &str) -> bool {
        contains_token(text, &self.pagination_banner)
    }

    pub fn has_password_prompt(&self, text: &str) -> bool {
        contains_token(text, &self.password_prompt)
    }

    pub fn has_invalid_input(&self, text: &str) -> bool {
        contains_token(text, &self.invalid_input)
    }

    /// Whether a probe response identifies the device on this endpoint.
    pub fn accepts_probe(&self, text: &str) -> bool {
        self.is_exec_prompt(text) || self.has_wizard_banner(text) || self.has_pagination(text)
    }

    /// Infer the device mode from one response.
    pub fn classify(&self, text: &str) -> DeviceMode {
        if self.has_invalid_input(text) {
            DeviceMode::ErrorSignal
        } else if self.has_wizard_banner(text) {
            DeviceMode::InitialWizard
        } else if self.is_user_exec(text) {
            DeviceMode::UserExec
        } else if self.is_privileged_exec(text) {
            if contains_token(last_line(text), &self.config_mode_marker) {
                DeviceMode::ConfigTerminal
            } else {
                DeviceMode::PrivilegedExec
            }
        } else if self.has_pagination(text) {
            DeviceMode::Paginated
        } else {
            DeviceMode::Unknown
        }
    }
}

impl Default for DeviceVocabulary {
    fn default() -> Self {
        Self::cisco_ios()
    }
}

/// Empty tokens never match; an unset field must not accept everything.
fn ends_with_token(text: &str, token: &str) -> bool {
    !token.is_empty() && text.ends_with(token)
}

fn contains_token(text: &str, token: &str) -> bool {
    !token.is_empty() && text.contains(token)
}

fn last_line(text: &str) -> &str {
    text.rsplit(['\r', '\n']).next().unwrap_or(text)
}

/// Device mode inferred from a single response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceMode {
    InitialWizard,
    UserExec,
    PrivilegedExec,
    ConfigTerminal,
    Paginated,
    ErrorSignal,
    Unknown,
}

impl fmt::Display for DeviceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InitialWizard => "initial-wizard",
            Self::UserExec => "user-exec",
            Self::PrivilegedExec => "privileged-exec",
            Self::ConfigTerminal => "config-terminal",
            Self::Paginated => "paginated",
            Self::ErrorSignal => "error",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
