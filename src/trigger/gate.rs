use log::warn;

use crate::command::OutboundCommand;
use crate::store::{CommandStore, StoreError, StoreTransaction};

use super::event::{DeliveryTriggered, TriggerPublisher};

/// Commit-gated dispatch trigger.
///
/// Wraps a store and a trigger publisher so that trigger events for newly
/// created commands are published if and only if the business transaction
/// that created them commits. The events are staged in memory during the
/// transaction and published strictly after the store commit returns, so
/// no delivery machinery ever runs while the transaction's locks are held,
/// and a rolled-back transaction publishes nothing.
pub struct CommitGate<S, P> {
    store: S,
    publisher: P,
}

impl<S, P> CommitGate<S, P>
where
    S: CommandStore,
    P: TriggerPublisher,
{
    pub fn new(store: S, publisher: P) -> Self {
        CommitGate { store, publisher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Begin a business transaction with commit-gated triggering.
    pub fn begin(&self) -> Result<OutboxTransaction<'_, S::Tx, P>, StoreError> {
        Ok(OutboxTransaction {
            tx: self.store.begin()?,
            publisher: &self.publisher,
            staged: Vec::new(),
        })
    }
}

/// A business transaction that records outbound commands and stages their
/// dispatch triggers.
///
/// Dropping the transaction without committing discards both the staged
/// store writes and the staged trigger events.
pub struct OutboxTransaction<'a, Tx, P> {
    tx: Tx,
    publisher: &'a P,
    staged: Vec<DeliveryTriggered>,
}

impl<Tx, P> OutboxTransaction<'_, Tx, P>
where
    Tx: StoreTransaction,
    P: TriggerPublisher,
{
    /// Save a command and stage its dispatch trigger.
    ///
    /// The command is persisted `Started` when the transaction commits; the
    /// trigger fires only after that commit succeeds.
    pub fn create_command(&mut self, command: &OutboundCommand) -> Result<(), StoreError> {
        self.tx.save(command)?;
        self.staged.push(DeliveryTriggered::for_command(command));
        Ok(())
    }

    /// The underlying store transaction, for business writes that share the
    /// commit with the command.
    pub fn store_tx(&mut self) -> &mut Tx {
        &mut self.tx
    }

    /// Trigger events staged so far.
    pub fn staged(&self) -> &[DeliveryTriggered] {
        &self.staged
    }

    /// Commit the store transaction, then publish the staged triggers.
    ///
    /// A commit failure publishes nothing. A publish failure after a
    /// successful commit is logged and swallowed: the command is durably
    /// `Started`, so any later trigger (the event infrastructure is
    /// at-least-once) can still pick it up.
    pub fn commit(self) -> Result<(), StoreError> {
        let OutboxTransaction {
            tx,
            publisher,
            staged,
        } = self;

        tx.commit()?;

        for event in staged {
            let command_id = event.command_id.clone();
            if let Err(err) = publisher.publish(event) {
                warn!(
                    "trigger publish failed after commit for command {}: {}",
                    command_id, err
                );
            }
        }

        Ok(())
    }

    /// Roll back the store transaction and discard the staged triggers.
    pub fn rollback(self) {
        self.tx.rollback();
    }
}
