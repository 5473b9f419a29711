//! # Top-Record Index Table
//!
//! A write-back cached secondary index over an embedded ordered key-value
//! store. For each (owner, optional sub-scope, namespace) group it tracks
//! one answer: the highest-sequence-id record currently in that group.
//!
//! ## Core idea
//! Instead of querying the full record set for "most recent matching item"
//! on every read, maintain the answer incrementally: replay each
//! transaction's mutation log through the index, keep the running maximum
//! in an in-memory cache, and write each dirty slot to the store once per
//! transaction — however many times it changed in between.
//!
//! Reads are O(1) amortized: the first access per slot does one store
//! lookup (caching misses as well as hits), every later access is pure
//! memory.
//!
//! One documented trade-off: removing a record that is *not* the current
//! top does nothing, and removing the top clears the slot without
//! recomputing the next-highest survivor. The index favors the common case
//! where removals target the top; see `TopIndexTable::replay`.

pub mod error;
pub mod index;
pub mod transaction;
pub mod types;
pub mod valuebox;

// Public re-exports for the top-level API
pub use error::{Error, Result};
pub use index::operation::{HistoryOperation, IndexRecord, RemovedItem};
pub use index::{CachedTop, Table, TopIndexTable};
pub use transaction::Coordinator;
pub use types::{GroupId, GroupKey, NamespaceId, OwnerId, RecordRef, SeqId, SubScopeId};
pub use valuebox::{JournalValueBox, MemoryValueBox, TableId, TableSpec, ValueBox};
