use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::command::OutboundCommand;

use super::{CommandStore, StoreError, StoreTransaction};

/// In-memory command store for testing and single-process scenarios.
///
/// Thread-safe: cloning creates another handle to the same storage.
/// Transactions stage writes locally and apply them on commit under a
/// per-record version check (compare-and-save), so of two concurrent
/// transactions updating the same command, exactly one commits and the
/// other observes [`StoreError::ConcurrentWrite`].
#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<HashMap<String, OutboundCommand>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Read a command's committed state directly, outside any transaction.
    ///
    /// Useful for assertions and for monitoring that polls the persisted
    /// status.
    pub fn get(&self, id: &str) -> Result<Option<OutboundCommand>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(records.get(id).cloned())
    }

    /// Number of committed commands.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CommandStore for InMemoryStore {
    type Tx = InMemoryTransaction;

    fn begin(&self) -> Result<InMemoryTransaction, StoreError> {
        Ok(InMemoryTransaction {
            records: Arc::clone(&self.records),
            staged: HashMap::new(),
            read_versions: HashMap::new(),
        })
    }
}

/// Transaction over an [`InMemoryStore`].
///
/// Records the committed version of every id it reads or writes; commit
/// validates all of them before applying anything, so a conflict leaves
/// the store untouched.
pub struct InMemoryTransaction {
    records: Arc<RwLock<HashMap<String, OutboundCommand>>>,
    staged: HashMap<String, OutboundCommand>,
    read_versions: HashMap<String, u64>,
}

impl StoreTransaction for InMemoryTransaction {
    fn find_by_id(&mut self, id: &str) -> Result<Option<OutboundCommand>, StoreError> {
        if let Some(command) = self.staged.get(id) {
            return Ok(Some(command.clone()));
        }

        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;

        match records.get(id) {
            Some(command) => {
                self.read_versions
                    .entry(id.to_string())
                    .or_insert(command.version());
                Ok(Some(command.clone()))
            }
            None => {
                self.read_versions.entry(id.to_string()).or_insert(0);
                Ok(None)
            }
        }
    }

    fn save(&mut self, command: &OutboundCommand) -> Result<(), StoreError> {
        self.read_versions
            .entry(command.id().to_string())
            .or_insert(command.version());
        self.staged
            .insert(command.id().to_string(), command.clone());
        Ok(())
    }

    fn commit(mut self) -> Result<(), StoreError> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;

        // Validate every staged write before applying any of them.
        for id in self.staged.keys() {
            let expected = self.read_versions.get(id).copied().unwrap_or(0);
            let actual = records.get(id).map(|c| c.version()).unwrap_or(0);
            if expected != actual {
                return Err(StoreError::ConcurrentWrite {
                    id: id.clone(),
                    expected,
                    actual,
                });
            }
        }

        for (id, mut command) in self.staged.drain() {
            let next = self.read_versions.get(&id).copied().unwrap_or(0) + 1;
            command.set_version(next);
            records.insert(id, command);
        }

        Ok(())
    }
}
