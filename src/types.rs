//! Identifier vocabulary shared by the index table and its collaborators.
//!
//! All identifiers are fixed-width so physical keys and stored values have a
//! single, comparison-friendly byte layout. Widths match the on-disk formats
//! in `index`: owners and sub-scopes are 8 bytes, namespaces 4, sequence
//! numbers 4.

/// Identifier of the entity an index group is scoped to
/// (e.g. one conversation).
pub type OwnerId = u64;

/// Optional secondary scoping key within an owner
/// (e.g. one thread inside a conversation).
pub type SubScopeId = u64;

/// Category partition of records within an owner (e.g. a record kind).
pub type NamespaceId = u32;

/// Monotonic per-namespace sequence number of a stored record.
pub type SeqId = u32;

/// One independent ordering domain: (owner, optional sub-scope).
///
/// The cache is keyed by `GroupId` at the outer level, with one slot per
/// namespace inside. A group with a sub-scope is entirely disjoint from the
/// same owner's group without one — the two never share a top record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId {
    pub owner: OwnerId,
    pub sub_scope: Option<SubScopeId>,
}

impl GroupId {
    pub fn new(owner: OwnerId, sub_scope: Option<SubScopeId>) -> Self {
        GroupId { owner, sub_scope }
    }
}

/// Fully-qualified index slot: a group plus the namespace within it.
///
/// At most one top record exists per `GroupKey` at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub group: GroupId,
    pub namespace: NamespaceId,
}

/// Reference to a stored record.
///
/// Ordering: (owner ASC, namespace ASC, seq ASC). Within one group the
/// namespace is fixed, so comparing two references reduces to comparing
/// sequence numbers — "top" means maximum `seq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordRef {
    pub owner: OwnerId,
    pub namespace: NamespaceId,
    pub seq: SeqId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ref_orders_by_owner_then_namespace_then_seq() {
        let a = RecordRef { owner: 1, namespace: 0, seq: 9 };
        let b = RecordRef { owner: 1, namespace: 1, seq: 0 };
        let c = RecordRef { owner: 2, namespace: 0, seq: 0 };
        assert!(a < b);
        assert!(b < c);

        // Same group: ordering reduces to seq.
        let low = RecordRef { owner: 1, namespace: 0, seq: 3 };
        assert!(low < a);
    }
}
