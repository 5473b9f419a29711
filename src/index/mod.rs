pub mod operation;

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::types::{GroupId, GroupKey, NamespaceId, OwnerId, SeqId, SubScopeId};
use crate::valuebox::{TableId, TableSpec, ValueBox};
use operation::HistoryOperation;

/// Hooks every derived-index table exposes to the transaction coordinator.
///
/// The coordinator keeps its tables as trait objects and walks them at the
/// transaction boundary: `before_commit` once per transaction to flush
/// batched writes into the store, `clear_memory_cache` when in-memory state
/// must be dropped (shutdown, tests, memory pressure).
pub trait Table {
    /// Flush all pending writes into the store. Called exactly once per
    /// transaction, immediately before the store's own commit.
    fn before_commit(&mut self, store: &mut dyn ValueBox);

    /// Drop all cached entries. Must not be called with unflushed writes.
    fn clear_memory_cache(&mut self);
}

/// Cache slot for one (group, namespace) pair.
///
/// `Empty` is a real answer ("the store was consulted, there is no top"),
/// distinct from `Unloaded` ("the store was never consulted"). Caching the
/// negative result keeps repeated misses off the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachedTop {
    /// Store not consulted yet for this slot.
    Unloaded,
    /// Store consulted; no top record exists.
    Empty,
    /// The current top sequence id.
    Top(SeqId),
}

// Physical key layouts. Two fixed widths instead of one variable-length
// layout, so binary key comparison never has to parse.
//
// ```text
// Layout A (no sub-scope), 12 bytes:
// ┌────────────┬────────────────┐
// │ Owner (8B) │ Namespace (4B) │
// └────────────┴────────────────┘
// Layout B (with sub-scope), 20 bytes:
// ┌────────────┬────────────────┬────────────────┐
// │ Owner (8B) │ Namespace (4B) │ Sub-scope (8B) │
// └────────────┴────────────────┴────────────────┘
// ```
const KEY_SIZE_A: usize = 8 + 4;
const KEY_SIZE_B: usize = 8 + 4 + 8;

fn physical_key(group: GroupId, namespace: NamespaceId) -> Vec<u8> {
    match group.sub_scope {
        None => {
            let mut key = Vec::with_capacity(KEY_SIZE_A);
            key.extend_from_slice(&group.owner.to_le_bytes());
            key.extend_from_slice(&namespace.to_le_bytes());
            key
        }
        Some(sub_scope) => {
            let mut key = Vec::with_capacity(KEY_SIZE_B);
            key.extend_from_slice(&group.owner.to_le_bytes());
            key.extend_from_slice(&namespace.to_le_bytes());
            key.extend_from_slice(&sub_scope.to_le_bytes());
            key
        }
    }
}

/// Derived index answering "what is the top record for (owner, sub-scope,
/// namespace)?" in O(1) amortized after first access.
///
/// Write-back cached: mutations from [`replay`](TopIndexTable::replay) touch
/// only the in-memory cache and a deduplicated pending set; the store sees
/// one physical write per dirty slot at [`before_commit`](Table::before_commit),
/// however many times the slot changed during the transaction.
///
/// The stored value is the top record's 4-byte sequence id, little-endian,
/// no framing. A slot whose top becomes "none" has its key removed from the
/// store rather than storing an empty marker.
///
/// Exclusively owns its physical table: nothing else reads or writes those
/// keys.
pub struct TopIndexTable {
    table: TableId,
    cache: HashMap<GroupId, HashMap<NamespaceId, CachedTop>>,
    pending: HashSet<GroupKey>,
}

impl TopIndexTable {
    pub fn new(table: TableId) -> Self {
        TopIndexTable {
            table,
            cache: HashMap::new(),
            pending: HashSet::new(),
        }
    }

    /// Creation spec for this table's physical table: binary key ordering
    /// with value compaction.
    pub fn table_spec(id: TableId) -> TableSpec {
        TableSpec::binary(id)
    }

    fn slot(&self, group: GroupId, namespace: NamespaceId) -> CachedTop {
        match self.cache.get(&group).and_then(|slots| slots.get(&namespace)) {
            Some(&slot) => slot,
            None => CachedTop::Unloaded,
        }
    }

    /// Current top record for a slot, reading through the cache.
    ///
    /// First access per slot does one store point lookup and caches the
    /// result — positive or negative. Later accesses never touch the store
    /// until the cache is cleared. Never writes to the store.
    pub fn get(
        &mut self,
        store: &dyn ValueBox,
        owner: OwnerId,
        sub_scope: Option<SubScopeId>,
        namespace: NamespaceId,
    ) -> Option<SeqId> {
        let group = GroupId::new(owner, sub_scope);
        match self.slot(group, namespace) {
            CachedTop::Top(seq) => Some(seq),
            CachedTop::Empty => None,
            CachedTop::Unloaded => {
                let loaded = match store.get(self.table, &physical_key(group, namespace)) {
                    Some(value) if value.len() == 4 => {
                        CachedTop::Top(u32::from_le_bytes(value[0..4].try_into().unwrap()))
                    }
                    // Missing key, or a value that isn't a 4-byte seq id.
                    _ => CachedTop::Empty,
                };
                self.cache.entry(group).or_default().insert(namespace, loaded);
                match loaded {
                    CachedTop::Top(seq) => Some(seq),
                    _ => None,
                }
            }
        }
    }

    /// Overwrite a slot's cached top and mark it dirty. No store write
    /// happens here; the slot is flushed at `before_commit`.
    fn set(&mut self, group: GroupId, namespace: NamespaceId, top: Option<SeqId>) {
        let slot = match top {
            Some(seq) => CachedTop::Top(seq),
            None => CachedTop::Empty,
        };
        self.cache.entry(group).or_default().insert(namespace, slot);
        self.pending.insert(GroupKey { group, namespace });
    }

    /// Apply one transaction's history operations to the index.
    ///
    /// `operations_by_owner` maps each owner to its ordered operation
    /// sequence. Order within one owner is significant — an insert followed
    /// by a remove of the same record nets to "no top". Relative order
    /// across owners is not: their group keys are disjoint, so the map's
    /// hash iteration order is harmless.
    ///
    /// Per operation:
    /// - Insert with the `top_indexable` flag: the slot's top becomes the
    ///   new seq iff it exceeds the current one (keep-maximum, O(1) via the
    ///   cache). Non-indexable inserts are skipped.
    /// - Remove: a removed item clears its slot only when its seq is exactly
    ///   the current top. Removing a non-top item is a no-op — the index
    ///   does not recompute the next-highest survivor, so a top removed
    ///   after older items already left stays cleared even though older
    ///   records may still exist. Known, accepted staleness trade-off.
    /// - Other operation kinds don't affect which record is on top and are
    ///   skipped.
    pub fn replay(
        &mut self,
        store: &dyn ValueBox,
        operations_by_owner: &HashMap<OwnerId, Vec<HistoryOperation>>,
    ) {
        for (&owner, operations) in operations_by_owner {
            for operation in operations {
                match operation {
                    HistoryOperation::Insert(record) if record.top_indexable => {
                        debug_assert_eq!(record.owner, owner);
                        let current = self.get(store, owner, record.sub_scope, record.namespace);
                        if current.map_or(true, |top| top < record.seq) {
                            self.set(
                                GroupId::new(owner, record.sub_scope),
                                record.namespace,
                                Some(record.seq),
                            );
                        }
                    }
                    HistoryOperation::Insert(_) => {}
                    HistoryOperation::Remove(items) => {
                        for item in items {
                            let current = self.get(store, owner, item.sub_scope, item.namespace);
                            if current == Some(item.seq) {
                                self.set(GroupId::new(owner, item.sub_scope), item.namespace, None);
                            }
                        }
                    }
                    HistoryOperation::UpdateTimestamp { .. } => {}
                }
            }
        }
    }
}

impl Table for TopIndexTable {
    fn before_commit(&mut self, store: &mut dyn ValueBox) {
        if self.pending.is_empty() {
            return;
        }

        for &GroupKey { group, namespace } in &self.pending {
            let key = physical_key(group, namespace);
            match self.slot(group, namespace) {
                CachedTop::Top(seq) => store.set(self.table, &key, &seq.to_le_bytes()),
                // Index pointers are not sensitive: plain removal, no
                // overwrite-then-erase.
                CachedTop::Empty => store.remove(self.table, &key, false),
                // set() always stores the value it marks pending.
                CachedTop::Unloaded => debug_assert!(false, "pending slot has no cached value"),
            }
        }

        trace!(slots = self.pending.len(), "top index flushed");
        // Only cleared once every write above has been issued.
        self.pending.clear();
    }

    fn clear_memory_cache(&mut self) {
        // Dropping unflushed slots would silently corrupt the stored index.
        debug_assert!(
            self.pending.is_empty(),
            "cache cleared with unflushed index writes"
        );
        self.cache.clear();
    }
}
