pub mod disk;
pub mod journal;
pub mod memory;

pub use disk::JournalValueBox;
pub use memory::MemoryValueBox;

/// Identifier of one physical table inside a value box.
///
/// Allocated externally by whoever assembles the store; each index table
/// exclusively owns the physical table it is constructed with.
pub type TableId = u32;

/// How keys in a table are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrdering {
    /// Lexicographic byte-wise ordering. All index tables use this.
    Binary,
}

/// Creation-time description of a physical table.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub id: TableId,
    pub keys: KeyOrdering,
    /// Hint to the store that values in this table are small and rewritten
    /// often, so they should be compacted in place rather than versioned.
    pub compact_values_on_creation: bool,
}

impl TableSpec {
    /// Spec for a binary-keyed table with value compaction, which is what
    /// every index table in this crate requests.
    pub fn binary(id: TableId) -> Self {
        TableSpec {
            id,
            keys: KeyOrdering::Binary,
            compact_values_on_creation: true,
        }
    }
}

/// The ordered binary key-value store the index tables run against.
///
/// `get`/`set`/`remove` address one named table each; `commit` makes every
/// mutation since the previous commit durable atomically. Index tables only
/// read through this trait during a transaction — their writes arrive in a
/// single batch from `Table::before_commit`, just ahead of `commit`.
///
/// Mutations are infallible at this layer: the provided stores buffer them
/// in memory and surface IO errors from `commit` only.
pub trait ValueBox {
    /// Point lookup. Returns the stored value bytes, if any.
    fn get(&self, table: TableId, key: &[u8]) -> Option<Vec<u8>>;

    /// Insert or overwrite a value.
    fn set(&mut self, table: TableId, key: &[u8], value: &[u8]);

    /// Remove a key. `secure` requests overwrite-before-erase for sensitive
    /// payloads; index pointers are not sensitive and always pass `false`.
    /// The provided stores accept and ignore the flag.
    fn remove(&mut self, table: TableId, key: &[u8], secure: bool);

    /// Make all mutations since the last commit durable, atomically.
    fn commit(&mut self) -> crate::error::Result<()>;
}
