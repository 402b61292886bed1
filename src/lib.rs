pub mod audit;
mod command;
mod config;
mod dispatch;
mod store;
mod trace;
mod transport;
mod trigger;

pub use command::{CommandStatus, OutboundCommand, PayloadError};
pub use config::{
    ConfigProvider, EnvConfig, MapConfig, APPLICATION_NAME_KEY, SERVICE_NAME_KEY,
};
pub use dispatch::{DispatchExecutor, DispatchOutcome, DispatchWorkerThread, WorkerStats};
pub use store::{CommandStore, InMemoryStore, InMemoryTransaction, StoreError, StoreTransaction};
pub use trace::{LogTracer, NoopTracer, SpanId, Tracer};
pub use transport::{LogTransporter, TransportError, Transporter};
pub use trigger::{
    CommitGate, DeliveryTriggered, OutboxTransaction, TriggerError, TriggerPublisher,
    TriggerQueue, TriggerSource,
};

#[cfg(feature = "emitter")]
pub use transport::LocalEmitterTransporter;

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
