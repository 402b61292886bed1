//! Store double that loses one version race, then behaves normally.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use outboxed::{
    CommandStore, InMemoryStore, InMemoryTransaction, OutboundCommand, StoreError,
    StoreTransaction,
};

/// Wraps an [`InMemoryStore`] and injects a competing write just before the
/// first commit, so that commit fails with `ConcurrentWrite` through the
/// store's real conflict detection. Every later transaction is untouched.
#[derive(Clone)]
pub struct ConflictOnceStore {
    inner: InMemoryStore,
    conflicted: Arc<AtomicBool>,
}

impl ConflictOnceStore {
    pub fn new(inner: InMemoryStore) -> Self {
        ConflictOnceStore {
            inner,
            conflicted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }
}

impl CommandStore for ConflictOnceStore {
    type Tx = ConflictOnceTransaction;

    fn begin(&self) -> Result<ConflictOnceTransaction, StoreError> {
        Ok(ConflictOnceTransaction {
            tx: self.inner.begin()?,
            store: self.inner.clone(),
            conflicted: Arc::clone(&self.conflicted),
            touched: Vec::new(),
        })
    }
}

pub struct ConflictOnceTransaction {
    tx: InMemoryTransaction,
    store: InMemoryStore,
    conflicted: Arc<AtomicBool>,
    touched: Vec<String>,
}

impl StoreTransaction for ConflictOnceTransaction {
    fn find_by_id(&mut self, id: &str) -> Result<Option<OutboundCommand>, StoreError> {
        self.touched.push(id.to_string());
        self.tx.find_by_id(id)
    }

    fn save(&mut self, command: &OutboundCommand) -> Result<(), StoreError> {
        self.tx.save(command)
    }

    fn commit(self) -> Result<(), StoreError> {
        if !self.conflicted.swap(true, Ordering::SeqCst) {
            if let Some(id) = self.touched.first() {
                let mut racing = self.store.begin()?;
                if let Some(command) = racing.find_by_id(id)? {
                    racing.save(&command)?;
                    racing.commit()?;
                }
            }
        }
        self.tx.commit()
    }
}
