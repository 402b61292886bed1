//! Transporter double: scripted outcomes, recorded calls.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use outboxed::{OutboundCommand, TransportError, Transporter};

/// Records every delivery attempt and plays back scripted outcomes.
///
/// With no outcome scripted, every attempt succeeds. Cloning shares the
/// script and the call log, so a test can keep a handle while the
/// executor owns another.
#[derive(Clone, Default)]
pub struct ScriptedTransporter {
    outcomes: Arc<Mutex<VecDeque<Result<bool, String>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTransporter {
    pub fn new() -> Self {
        ScriptedTransporter::default()
    }

    /// Script the next attempt to be refused (`Ok(false)`).
    pub fn refuse_next(&self) {
        self.outcomes.lock().unwrap().push_back(Ok(false));
    }

    /// Script the next attempt to raise a contract error.
    pub fn raise_next(&self, message: impl Into<String>) {
        self.outcomes.lock().unwrap().push_back(Err(message.into()));
    }

    /// Command ids of every delivery attempt, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Transporter for ScriptedTransporter {
    fn deliver(&self, command: &OutboundCommand) -> Result<bool, TransportError> {
        self.calls.lock().unwrap().push(command.id().to_string());
        match self.outcomes.lock().unwrap().pop_front() {
            Some(Ok(delivered)) => Ok(delivered),
            Some(Err(message)) => Err(TransportError::Contract(message)),
            None => Ok(true),
        }
    }
}
