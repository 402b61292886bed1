//! Structured audit rendering of dispatch activity.
//!
//! Purely observational: nothing here may influence a transition decision.

use std::fmt;

use crate::command::OutboundCommand;

/// A greppable JSON snapshot of the command for audit lines.
///
/// Binary payloads render as base64. Falls back to the Debug rendering if
/// serialization fails.
pub fn snapshot(command: &OutboundCommand) -> String {
    serde_json::to_string(command).unwrap_or_else(|_| format!("{:?}", command))
}

/// How the dispatch transaction finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxOutcome {
    Committed,
    RolledBack,
}

impl fmt::Display for TxOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxOutcome::Committed => write!(f, "committed"),
            TxOutcome::RolledBack => write!(f, "rolled back"),
        }
    }
}
