mod event;
mod gate;
mod queue;

pub use event::{DeliveryTriggered, TriggerError, TriggerPublisher, TriggerSource};
pub use gate::{CommitGate, OutboxTransaction};
pub use queue::TriggerQueue;
