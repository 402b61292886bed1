//! Threaded dispatch worker for background command delivery.

use std::sync::mpsc::{channel, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::warn;

use crate::config::ConfigProvider;
use crate::store::CommandStore;
use crate::trace::Tracer;
use crate::transport::Transporter;
use crate::trigger::{TriggerPublisher, TriggerSource};

use super::executor::{DispatchExecutor, DispatchOutcome};

/// Statistics from a dispatch worker.
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    pub dispatched: usize,
    pub delivered: usize,
    pub failed: usize,
    pub skipped: usize,
    pub not_found: usize,
    pub requeued: usize,
    pub polls: usize,
}

/// A background thread that consumes `DeliveryTriggered` events and runs
/// a dispatch attempt per event, each in its own store transaction.
///
/// Store failures abort the attempt without consuming the trigger: the
/// event is re-published for a later retry, preserving at-least-once
/// delivery. Transport failures are already absorbed by the executor.
///
/// ## Example
///
/// ```ignore
/// let executor = DispatchExecutor::new(store.clone(), transporter, config, tracer);
/// let worker = DispatchWorkerThread::spawn(executor, queue.clone(), Duration::from_millis(50));
///
/// // ... commit business transactions through the CommitGate ...
///
/// let stats = worker.stop();
/// println!("delivered {} commands", stats.delivered);
/// ```
pub struct DispatchWorkerThread {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<WorkerStats>>,
}

impl DispatchWorkerThread {
    /// Spawn a worker polling the trigger source at the given interval.
    ///
    /// The poll interval doubles as the blocking poll timeout, so the
    /// worker reacts to new events promptly and still checks its stop
    /// signal regularly.
    pub fn spawn<S, T, C, R, Q>(
        executor: DispatchExecutor<S, T, C, R>,
        triggers: Q,
        poll_interval: Duration,
    ) -> Self
    where
        S: CommandStore + Send + 'static,
        T: Transporter + 'static,
        C: ConfigProvider + 'static,
        R: Tracer + 'static,
        Q: TriggerSource + TriggerPublisher + 'static,
    {
        let (stop_tx, stop_rx) = channel();
        let timeout_ms = poll_interval.as_millis() as u64;

        let handle = thread::spawn(move || {
            let mut stats = WorkerStats::default();

            loop {
                match stop_rx.try_recv() {
                    Ok(()) | Err(TryRecvError::Disconnected) => break,
                    Err(TryRecvError::Empty) => {}
                }

                stats.polls += 1;

                let event = match triggers.poll(timeout_ms) {
                    Ok(Some(event)) => event,
                    Ok(None) => continue,
                    Err(err) => {
                        warn!("trigger poll failed: {}", err);
                        thread::sleep(poll_interval);
                        continue;
                    }
                };

                stats.dispatched += 1;

                match executor.dispatch(&event.command_id) {
                    Ok(DispatchOutcome::Delivered) => stats.delivered += 1,
                    Ok(DispatchOutcome::Failed) => stats.failed += 1,
                    Ok(DispatchOutcome::Skipped) => stats.skipped += 1,
                    Ok(DispatchOutcome::NotFound) => stats.not_found += 1,
                    Err(err) => {
                        // The attempt never happened from the store's point
                        // of view; put the trigger back for a later retry.
                        warn!(
                            "dispatch aborted for command {}: {}",
                            event.command_id, err
                        );
                        if triggers.publish(event).is_ok() {
                            stats.requeued += 1;
                        }
                    }
                }
            }

            stats
        });

        DispatchWorkerThread {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Signal the worker to stop and wait for it to finish.
    /// Returns the worker statistics.
    pub fn stop(mut self) -> WorkerStats {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap_or_default()
        } else {
            WorkerStats::default()
        }
    }

    /// Signal the worker to stop without waiting.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(());
    }
}

impl Drop for DispatchWorkerThread {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        // Don't join on drop - let the thread finish naturally
    }
}
