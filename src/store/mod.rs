mod error;
mod in_memory;

pub use error::StoreError;
pub use in_memory::{InMemoryStore, InMemoryTransaction};

use crate::command::OutboundCommand;

/// Durable, transactional store of outbound commands, keyed by command id.
///
/// Every dispatch attempt runs in its own transaction obtained from
/// [`begin`](CommandStore::begin); the transaction never extends or inherits
/// the one that produced the command.
pub trait CommandStore {
    type Tx: StoreTransaction;

    /// Open a new, independent transaction.
    fn begin(&self) -> Result<Self::Tx, StoreError>;
}

/// A single store transaction.
///
/// Reads see committed state plus this transaction's own staged writes;
/// writes become visible to other transactions only on [`commit`]. A failed
/// commit applies nothing.
///
/// [`commit`]: StoreTransaction::commit
pub trait StoreTransaction {
    /// Look up a command by id.
    fn find_by_id(&mut self, id: &str) -> Result<Option<OutboundCommand>, StoreError>;

    /// Stage a save of the command.
    fn save(&mut self, command: &OutboundCommand) -> Result<(), StoreError>;

    /// Atomically apply all staged writes.
    fn commit(self) -> Result<(), StoreError>;

    /// Discard all staged writes. Dropping the transaction without
    /// committing has the same effect.
    fn rollback(self)
    where
        Self: Sized,
    {
    }
}
