use std::collections::HashMap;

use crate::error::Result;
use crate::index::operation::HistoryOperation;
use crate::index::{Table, TopIndexTable};
use crate::types::OwnerId;
use crate::valuebox::ValueBox;

/// Drives transactions against one store on behalf of its index tables.
///
/// Single-writer by construction: every method takes `&mut self` (or `&self`
/// for pure reads), so one coordinator serializes all access to its store
/// without any internal locking. Callers own their tables and lend them to
/// the coordinator as trait objects at the transaction boundary.
///
/// A transaction is: zero or more `replay` calls, then exactly one `commit`.
/// Replay only reads the store — all index writes are batched inside the
/// tables and land in `commit`, which runs every table's `before_commit`
/// hook and then commits the store atomically.
pub struct Coordinator<S: ValueBox> {
    store: S,
}

impl<S: ValueBox> Coordinator<S> {
    pub fn new(store: S) -> Self {
        Coordinator { store }
    }

    /// Read access to the store for query paths (e.g. `TopIndexTable::get`).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Feed one transaction's history operation log to a top index.
    pub fn replay(
        &self,
        table: &mut TopIndexTable,
        operations_by_owner: &HashMap<OwnerId, Vec<HistoryOperation>>,
    ) {
        table.replay(&self.store, operations_by_owner);
    }

    /// Flush every table's pending writes, then commit the store.
    pub fn commit(&mut self, tables: &mut [&mut dyn Table]) -> Result<()> {
        for table in tables.iter_mut() {
            table.before_commit(&mut self.store);
        }
        self.store.commit()
    }

    /// Drop all in-memory index state. Tables must have no pending writes —
    /// commit first.
    pub fn clear_memory_caches(&mut self, tables: &mut [&mut dyn Table]) {
        for table in tables.iter_mut() {
            table.clear_memory_cache();
        }
    }

    /// Tear down, handing the store back.
    pub fn into_store(self) -> S {
        self.store
    }
}
