use serde::{Deserialize, Serialize};

/// Delivery status of an outbound command.
///
/// `Delivered` is terminal. `Failed` is retryable: a later attempt may move
/// the command to `Delivered` or leave it `Failed` again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandStatus {
    /// Recorded inside the producing transaction, not yet attempted.
    #[default]
    Started,
    /// The transporter confirmed delivery.
    Delivered,
    /// The last attempt did not deliver; eligible for retry.
    Failed,
}

impl CommandStatus {
    /// Whether a delivery attempt may run from this status.
    pub fn is_deliverable(self) -> bool {
        matches!(self, CommandStatus::Started | CommandStatus::Failed)
    }

    /// Whether this status can never change again.
    pub fn is_terminal(self) -> bool {
        self == CommandStatus::Delivered
    }

    /// The status after a transport attempt.
    ///
    /// Pure: no I/O, the caller persists the result. `Delivered` refuses to
    /// transition and returns itself; callers are expected to have checked
    /// [`is_deliverable`](Self::is_deliverable) before attempting.
    pub fn after_attempt(self, delivered: bool) -> CommandStatus {
        if self.is_terminal() {
            return self;
        }
        if delivered {
            CommandStatus::Delivered
        } else {
            CommandStatus::Failed
        }
    }
}
