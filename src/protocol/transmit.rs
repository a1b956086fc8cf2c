//! Command transmission.

use crate::port::{PortError, SerialPortAdapter};
use tracing::debug;

/// Write `command` followed by `terminator` to the port.
///
/// Completion of the write is the only guarantee; nothing waits for the
/// device to acknowledge. An empty command is valid and just wakes the prompt.
pub fn send_command(
    port: &mut dyn SerialPortAdapter,
    command: &str,
    terminator: &str,
) -> Result<(), PortError> {
    let mut line = Vec::with_capacity(command.len() + terminator.len());
    line.extend_from_slice(command.as_bytes());
    line.extend_from_slice(terminator.as_bytes());

    debug!(port = %port.name(), command, "send");

    let mut remaining = line.as_slice();
    while !remaining.is_empty() {
        let written = port.write_bytes(remaining)?;
        if written == 0 {
            return Err(PortError::WriteZero(port.name().to_string()));
        }
        remaining = &remaining[written..];
    }
    Ok(())
}
