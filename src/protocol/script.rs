//! Provisioning script parsing.
//!
//! One command per line. A line whose first character is `#` is a comment,
//! a line that is exactly `!` means "press enter", whitespace-only lines are
//! skipped, and every other line is sent verbatim in file order.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// First character of a comment line.
pub const COMMENT_MARKER: char = '#';

/// A line consisting of only this token sends an empty command.
pub const BLANK_ENTER: &str = "!";

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What to do for one executable line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Send an empty command to step through a confirmation.
    BlankEnter,
    /// Send the line as-is.
    Command(String),
}

/// An executable line and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number in the source.
    pub line_number: usize,
    pub step: ScriptStep,
}

/// Ordered executable lines of a provisioning script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandScript {
    lines: Vec<ScriptLine>,
}

impl CommandScript {
    /// Parse script text. Comments and blank lines are dropped here, not at playback.
    pub fn parse(source: &str) -> Self {
        let lines = source
            .lines()
            .enumerate()
            .filter_map(|(index, line)| {
                if line.trim().is_empty() || line.starts_with(COMMENT_MARKER) {
                    return None;
                }
                let step = if line == BLANK_ENTER {
                    ScriptStep::BlankEnter
                } else {
                    ScriptStep::Command(line.to_string())
                };
                Some(ScriptLine {
                    line_number: index + 1,
                    step,
                })
            })
            .collect();
        Self { lines }
    }

    /// Read and parse a script file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&source))
    }

    pub fn lines(&self) -> &[ScriptLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
