use std::fmt;

use serde::{Deserialize, Serialize};

use crate::command::OutboundCommand;

/// Notification that a command's producing transaction has committed and
/// the command is ready for a delivery attempt.
///
/// `command_id` is the store lookup key; the dispatch executor re-reads the
/// command rather than trusting the event's own copy of any state. Delivery
/// of these notifications is at-least-once: duplicates are tolerated because
/// dispatch is idempotent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTriggered {
    pub command_id: String,
    pub subject: String,
    pub trace_id: String,
}

impl DeliveryTriggered {
    pub fn new(
        command_id: impl Into<String>,
        subject: impl Into<String>,
        trace_id: impl Into<String>,
    ) -> Self {
        DeliveryTriggered {
            command_id: command_id.into(),
            subject: subject.into(),
            trace_id: trace_id.into(),
        }
    }

    pub fn for_command(command: &OutboundCommand) -> Self {
        Self::new(command.id(), command.subject(), command.trace_id())
    }
}

/// Error type for trigger publish/poll operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
    LockPoisoned(&'static str),
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerError::LockPoisoned(operation) => {
                write!(f, "trigger queue lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for TriggerError {}

/// Publishes trigger notifications after a business transaction commits.
pub trait TriggerPublisher: Send + Sync {
    fn publish(&self, event: DeliveryTriggered) -> Result<(), TriggerError>;
}

/// Source of trigger notifications for dispatch workers.
///
/// Pull-based; implementations deliver at-least-once.
pub trait TriggerSource: Send + Sync {
    /// Poll for the next notification, blocking until one is available or
    /// the timeout elapses.
    fn poll(&self, timeout_ms: u64) -> Result<Option<DeliveryTriggered>, TriggerError>;
}
