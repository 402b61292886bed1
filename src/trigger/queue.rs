use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use super::event::{DeliveryTriggered, TriggerError, TriggerPublisher, TriggerSource};

/// In-memory trigger queue for testing and single-process scenarios.
///
/// Events are stored in an append-only log with a shared read position.
/// Cloning creates another handle to the same queue, so a worker thread and
/// the committing thread can share it. [`reset_position`](Self::reset_position)
/// rewinds the reader, simulating the redelivery an at-least-once event
/// infrastructure performs after a crash.
#[derive(Clone, Default)]
pub struct TriggerQueue {
    log: Arc<RwLock<Vec<DeliveryTriggered>>>,
    position: Arc<Mutex<usize>>,
}

impl TriggerQueue {
    pub fn new() -> Self {
        TriggerQueue {
            log: Arc::new(RwLock::new(Vec::new())),
            position: Arc::new(Mutex::new(0)),
        }
    }

    /// All events published so far, consumed or not.
    pub fn events(&self) -> Vec<DeliveryTriggered> {
        self.log.read().map(|log| log.clone()).unwrap_or_default()
    }

    /// Total number of events in the log.
    pub fn len(&self) -> usize {
        self.log.read().map(|log| log.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rewind the read position to the beginning, redelivering every event.
    pub fn reset_position(&self) -> Result<(), TriggerError> {
        let mut position = self
            .position
            .lock()
            .map_err(|_| TriggerError::LockPoisoned("position"))?;
        *position = 0;
        Ok(())
    }
}

impl TriggerPublisher for TriggerQueue {
    fn publish(&self, event: DeliveryTriggered) -> Result<(), TriggerError> {
        let mut log = self
            .log
            .write()
            .map_err(|_| TriggerError::LockPoisoned("publish"))?;
        log.push(event);
        Ok(())
    }
}

impl TriggerSource for TriggerQueue {
    fn poll(&self, timeout_ms: u64) -> Result<Option<DeliveryTriggered>, TriggerError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            {
                let log = self
                    .log
                    .read()
                    .map_err(|_| TriggerError::LockPoisoned("poll"))?;
                let mut position = self
                    .position
                    .lock()
                    .map_err(|_| TriggerError::LockPoisoned("position"))?;

                if *position < log.len() {
                    let event = log[*position].clone();
                    *position += 1;
                    return Ok(Some(event));
                }
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            std::thread::sleep(Duration::from_millis(1));
        }
    }
}
