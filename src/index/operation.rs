use crate::types::{NamespaceId, OwnerId, RecordRef, SeqId, SubScopeId};

/// A record entering the history, as a derived index sees it.
#[derive(Debug, Clone)]
pub struct IndexRecord {
    pub owner: OwnerId,
    pub sub_scope: Option<SubScopeId>,
    pub namespace: NamespaceId,
    pub seq: SeqId,
    /// Whether this record participates in the top index. Records inserted
    /// with the flag clear are invisible to [`TopIndexTable`].
    ///
    /// [`TopIndexTable`]: crate::index::TopIndexTable
    pub top_indexable: bool,
}

impl IndexRecord {
    /// The totally-ordered reference this record is indexed under.
    pub fn record_ref(&self) -> RecordRef {
        RecordRef {
            owner: self.owner,
            namespace: self.namespace,
            seq: self.seq,
        }
    }
}

/// Identity of one record being deleted.
#[derive(Debug, Clone)]
pub struct RemovedItem {
    pub seq: SeqId,
    pub namespace: NamespaceId,
    /// Tag bitmask consumed by sibling tag indices; carried through the log
    /// but not consulted by the top index.
    pub tags: u32,
    pub sub_scope: Option<SubScopeId>,
}

/// One entry in a transaction's per-owner history operation log.
///
/// The coordinator hands each derived index the full log; every index reacts
/// to the operation kinds it cares about and skips the rest.
#[derive(Debug, Clone)]
pub enum HistoryOperation {
    /// A record was inserted.
    Insert(IndexRecord),
    /// A batch of records was deleted. Each item names its own sub-scope —
    /// one Remove may span several groups of the same owner.
    Remove(Vec<RemovedItem>),
    /// A record's timestamp was adjusted in place. Irrelevant to the top
    /// index: the sequence number, not the timestamp, defines "top".
    UpdateTimestamp {
        namespace: NamespaceId,
        seq: SeqId,
        timestamp: i64,
    },
}
