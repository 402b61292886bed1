mod log;

#[cfg(feature = "emitter")]
mod emitter;

pub use self::log::LogTransporter;

#[cfg(feature = "emitter")]
pub use emitter::LocalEmitterTransporter;

use std::error::Error;
use std::fmt;

use crate::command::OutboundCommand;

/// Error type for transport contract violations.
///
/// Ordinary delivery failures (refusal, timeout, unreachable receiver) are
/// the `Ok(false)` return of [`Transporter::deliver`], not an error. An
/// `Err` means the transporter was handed something it cannot process at
/// all; the dispatcher still records it as a failed attempt.
#[derive(Debug)]
pub enum TransportError {
    /// The command violated the transporter's contract (malformed payload,
    /// missing routing data, oversized message).
    Contract(String),
    /// Other error
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Contract(msg) => write!(f, "transport contract violation: {}", msg),
            TransportError::Other(e) => write!(f, "transport error: {}", e),
        }
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TransportError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// The physical-send capability behind dispatch.
///
/// Implementations own their protocol, retries, batching, and timeouts;
/// a timeout surfaces as `Ok(false)` like any other ordinary failure.
///
/// Implementations might include:
/// - `LogTransporter` - For testing and single-process scenarios
/// - `LocalEmitterTransporter` - In-process delivery via an EventEmitter
/// - an HTTP, queue, or broker client in the host application
pub trait Transporter: Send + Sync {
    /// Attempt to deliver the command.
    ///
    /// `Ok(true)` means the receiver confirmed delivery; `Ok(false)` means
    /// the command was not delivered and may be retried later.
    fn deliver(&self, command: &OutboundCommand) -> Result<bool, TransportError>;
}
