mod executor;
mod worker;

pub use executor::{DispatchExecutor, DispatchOutcome};
pub use worker::{DispatchWorkerThread, WorkerStats};
