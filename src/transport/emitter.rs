use std::sync::Mutex;

use crate::command::OutboundCommand;
use crate::EventEmitter;

use super::{TransportError, Transporter};

/// A transporter that delivers commands to in-process subscribers via an
/// EventEmitter.
///
/// The command's subject is the emitted event name and the payload is
/// forwarded as a string (assumes UTF-8).
pub struct LocalEmitterTransporter {
    emitter: Mutex<EventEmitter>,
}

impl LocalEmitterTransporter {
    pub fn new(emitter: EventEmitter) -> Self {
        LocalEmitterTransporter {
            emitter: Mutex::new(emitter),
        }
    }
}

impl Transporter for LocalEmitterTransporter {
    fn deliver(&self, command: &OutboundCommand) -> Result<bool, TransportError> {
        let payload = String::from_utf8_lossy(command.payload()).into_owned();
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| TransportError::Other(Box::from("emitter lock poisoned")))?;
        emitter.emit(command.subject(), payload);
        Ok(true)
    }
}
