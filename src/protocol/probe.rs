//! Serial port probing for an attached switch.
//!
//! Each candidate is opened with the console line parameters, woken with an
//! empty command, and accepted if the reply looks like a switch: an exec
//! prompt at the end, the setup dialog banner, or a pagination banner. The
//! first accepted candidate becomes the session and probing stops there.

use super::error::{ProtocolError, ProtocolResult};
use super::reader::{self, ReadPolicy, Response};
use super::transmit;
use super::vocabulary::DeviceVocabulary;
use crate::port::{PortConfiguration, PortError, PortOpener, SerialPortAdapter};
use crate::session::Session;
use tracing::{debug, info, warn};

/// What discovery found.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// Endpoint that answered.
    pub port_name: String,
    /// The accepted probe response; the navigator's starting point.
    pub response: Response,
    /// Candidates opened, including the accepted one.
    pub attempts: usize,
}

pub struct PromptProbe<'a> {
    opener: &'a mut dyn PortOpener,
    port_config: PortConfiguration,
    policy: ReadPolicy,
    vocabulary: DeviceVocabulary,
}

impl<'a> PromptProbe<'a> {
    pub fn new(
        opener: &'a mut dyn PortOpener,
        port_config: PortConfiguration,
        policy: ReadPolicy,
        vocabulary: DeviceVocabulary,
    ) -> Self {
        Self {
            opener,
            port_config,
            policy,
            vocabulary,
        }
    }

    /// Probe `candidates` in order and open a session on the first match.
    ///
    /// Open failures and transport errors only skip the candidate. Running
    /// out of candidates is the one terminal outcome.
    pub fn discover(mut self, candidates: &[String]) -> ProtocolResult<(Session, ProbeOutcome)> {
        info!(candidates = candidates.len(), "searching for switch console");

        for (index, name) in candidates.iter().enumerate() {
            info!(port = %name, "testing port");
            let (port, response) = match self.probe_one(name) {
                Ok(Some(found)) => found,
                Ok(None) => continue,
                Err(e) => {
                    debug!(port = %name, error = %e, "probe failed; skipping");
                    continue;
                }
            };

            info!(port = %name, "found switch console");
            let outcome = ProbeOutcome {
                port_name: name.clone(),
                response,
                attempts: index + 1,
            };
            let session = Session::new(port, self.vocabulary, self.policy);
            return Ok((session, outcome));
        }

        warn!("no switch was found on any serial port");
        Err(ProtocolError::NoDeviceFound {
            candidates: candidates.len(),
        })
    }

    /// Open one endpoint and wake it. `None` means it answered, but not like a switch.
    fn probe_one(
        &mut self,
        name: &str,
    ) -> Result<Option<(Box<dyn SerialPortAdapter>, Response)>, PortError> {
        let mut port = self.opener.open(name, &self.port_config)?;
        // Stale boot output would be mistaken for the probe reply.
        port.set_timeout(self.policy.quiet_window)?;
        port.clear_buffers()?;
        transmit::send_command(&mut *port, "", &self.vocabulary.line_terminator)?;
        let response = reader::read_until_quiet(&mut *port, &self.policy)?;

        if self.vocabulary.accepts_probe(&response.text) {
            Ok(Some((port, response)))
        } else {
            debug!(
                port = %name,
                response = %response.text.escape_debug(),
                "no recognized prompt"
            );
            Ok(None)
        }
    }
}
