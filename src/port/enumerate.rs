//! Candidate endpoint discovery.
//!
//! Lists host serial devices (or an explicit list from configuration),
//! applies the name filter and exclusions, and keeps only those that can
//! actually be opened. It knows nothing about what is attached to them.

use super::error::PortError;
use super::traits::{PortConfiguration, PortOpener};
use regex::Regex;
use tracing::{debug, info};

/// Produces the ordered list of endpoints worth probing.
#[derive(Debug, Clone, Default)]
pub struct PortEnumerator {
    /// Candidate names must match this pattern when set.
    filter: Option<Regex>,
    /// Names that are never offered.
    exclude: Vec<String>,
    /// Replaces host enumeration when set.
    explicit: Option<Vec<String>>,
}

impl PortEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only offer names matching `filter`.
    pub fn with_filter(mut self, filter: Regex) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Never offer the given names.
    pub fn with_exclusions(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Use `names` instead of asking the host.
    pub fn with_explicit_ports(mut self, names: Vec<String>) -> Self {
        self.explicit = Some(names);
        self
    }

    /// Names of all candidate endpoints, before the openability check.
    pub fn candidates(&self) -> Result<Vec<String>, PortError> {
        let names = match &self.explicit {
            Some(names) => names.clone(),
            None => serialport::available_ports()
                .map_err(|e| PortError::Enumeration(e.to_string()))?
                .into_iter()
                .map(|p| p.port_name)
                .collect(),
        };
        Ok(self.filter_names(names))
    }

    /// Apply the name filter and exclusions, preserving order.
    pub fn filter_names(&self, names: Vec<String>) -> Vec<String> {
        names
            .into_iter()
            .filter(|name| !self.exclude.iter().any(|ex| ex == name))
            .filter(|name| self.filter.as_ref().map_or(true, |re| re.is_match(name)))
            .collect()
    }

    /// Candidates that open successfully with `config`.
    ///
    /// Each endpoint is opened and immediately closed again; failures are
    /// logged and skipped, never reported as errors.
    pub fn openable(
        &self,
        opener: &mut dyn PortOpener,
        config: &PortConfiguration,
    ) -> Result<Vec<String>, PortError> {
        let mut usable = Vec::new();
        for name in self.candidates()? {
            match opener.open(&name, config) {
                Ok(port) => {
                    drop(port);
                    usable.push(name);
                }
                Err(e) => debug!(port = %name, error = %e, "skipping port that cannot be opened"),
            }
        }
        info!(ports = ?usable, "found serial ports");
        Ok(usable)
    }
}
