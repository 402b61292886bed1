use log::{debug, info, warn};

use crate::audit::{self, TxOutcome};
use crate::config::{ConfigProvider, APPLICATION_NAME_KEY, SERVICE_NAME_KEY};
use crate::store::{CommandStore, StoreError, StoreTransaction};
use crate::trace::{SpanId, Tracer};
use crate::transport::Transporter;

/// What a dispatch attempt did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The transporter confirmed delivery; the command is now `Delivered`.
    Delivered,
    /// The attempt ran and failed; the command is now `Failed` (retryable).
    Failed,
    /// No command with that id exists. Benign no-op.
    NotFound,
    /// The command was not in a deliverable status. Benign no-op guarding
    /// against duplicate delivery.
    Skipped,
}

/// Runs delivery attempts for triggered commands.
///
/// Each attempt opens its own store transaction, re-reads the command,
/// checks eligibility, invokes the transporter, applies the resulting
/// status transition, and persists it, all within that one transaction.
/// Transport failures never escape to the caller: they become the `Failed`
/// transition. Store failures abort the transaction and propagate, leaving
/// the command at its prior persisted status, safe for a future retry.
pub struct DispatchExecutor<S, T, C, R> {
    store: S,
    transporter: T,
    config: C,
    tracer: R,
}

impl<S, T, C, R> DispatchExecutor<S, T, C, R>
where
    S: CommandStore,
    T: Transporter,
    C: ConfigProvider,
    R: Tracer,
{
    pub fn new(store: S, transporter: T, config: C, tracer: R) -> Self {
        DispatchExecutor {
            store,
            transporter,
            config,
            tracer,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transporter(&self) -> &T {
        &self.transporter
    }

    /// Run one delivery attempt for the command with the given id.
    pub fn dispatch(&self, command_id: &str) -> Result<DispatchOutcome, StoreError> {
        let mut tx = self.store.begin()?;

        let mut command = match tx.find_by_id(command_id)? {
            Some(command) => command,
            None => {
                debug!("dispatch no-op, command {} not found", command_id);
                return Ok(DispatchOutcome::NotFound);
            }
        };

        if !command.is_deliverable() {
            debug!(
                "dispatch no-op, command {} already {:?}",
                command_id,
                command.status()
            );
            return Ok(DispatchOutcome::Skipped);
        }

        // Resolved at delivery time so configuration changes made after
        // creation are honored.
        if let Some(source) = self.config.get_or(SERVICE_NAME_KEY, APPLICATION_NAME_KEY) {
            command.set_source(source);
        }

        let label = format!("delivering {}", command.subject());
        let _span = SpanScope::open(&self.tracer, &label, command.id(), command.trace_id());

        let mut transport_error: Option<String> = None;
        let delivered = match self.transporter.deliver(&command) {
            Ok(delivered) => delivered,
            Err(err) => {
                warn!("transporter raised for command {}: {}", command.id(), err);
                transport_error = Some(err.to_string());
                false
            }
        };

        if delivered {
            command.mark_delivered();
            info!(
                "delivered command {}: {}",
                command.id(),
                audit::snapshot(&command)
            );
        } else {
            command.mark_failed(transport_error.as_deref());
            info!(
                "delivery failed for command {}: {}",
                command.id(),
                audit::snapshot(&command)
            );
        }

        // Persisted on both branches, in the same transaction as the guard.
        if let Err(err) = tx.save(&command) {
            info!(
                "transaction {} for command {}: {}",
                TxOutcome::RolledBack,
                command.id(),
                audit::snapshot(&command)
            );
            return Err(err);
        }

        match tx.commit() {
            Ok(()) => {
                info!(
                    "transaction {} for command {}: {}",
                    TxOutcome::Committed,
                    command.id(),
                    audit::snapshot(&command)
                );
                Ok(if delivered {
                    DispatchOutcome::Delivered
                } else {
                    DispatchOutcome::Failed
                })
            }
            Err(err) => {
                info!(
                    "transaction {} for command {}: {}",
                    TxOutcome::RolledBack,
                    command.id(),
                    audit::snapshot(&command)
                );
                Err(err)
            }
        }
    }
}

/// Closes the span on every exit path of a dispatch attempt.
struct SpanScope<'a, R: Tracer> {
    tracer: &'a R,
    span: SpanId,
}

impl<'a, R: Tracer> SpanScope<'a, R> {
    fn open(tracer: &'a R, label: &str, command_id: &str, trace_id: &str) -> Self {
        let parent = tracer.current_span();
        let span = tracer.start_span(label, command_id, trace_id, parent);
        SpanScope { tracer, span }
    }
}

impl<R: Tracer> Drop for SpanScope<'_, R> {
    fn drop(&mut self) {
        self.tracer.close_span(self.span);
    }
}
