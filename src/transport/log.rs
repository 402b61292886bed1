use std::sync::{Arc, Mutex};

use crate::command::OutboundCommand;

use super::{TransportError, Transporter};

/// A transporter that writes deliveries to stdout or a buffer.
///
/// Every command is considered delivered. Useful for demos and for tests
/// that only care about *which* commands reached the transport seam.
pub struct LogTransporter {
    buffer: Option<Arc<Mutex<Vec<String>>>>,
}

impl Default for LogTransporter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogTransporter {
    pub fn new() -> Self {
        LogTransporter { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<String>>>) -> Self {
        LogTransporter {
            buffer: Some(buffer),
        }
    }
}

impl Transporter for LogTransporter {
    fn deliver(&self, command: &OutboundCommand) -> Result<bool, TransportError> {
        let payload = String::from_utf8_lossy(command.payload());
        let line = format!("[OUTBOUND] {} {} {}", command.id(), command.subject(), payload);
        if let Some(buffer) = &self.buffer {
            let mut buffer = buffer
                .lock()
                .map_err(|_| TransportError::Other(Box::from("log transporter buffer poisoned")))?;
            buffer.push(line);
        } else {
            println!("{}", line);
        }
        Ok(true)
    }
}
