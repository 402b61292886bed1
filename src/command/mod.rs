mod outbound;
mod status;

pub use outbound::{OutboundCommand, PayloadError};
pub use status::CommandStatus;
