// Replay semantics of the top index: keep-maximum on inserts, exact-match
// clearing on removes, isolation between groups.

use std::collections::HashMap;

use top_index::{
    HistoryOperation, IndexRecord, MemoryValueBox, OwnerId, RemovedItem, SeqId, SubScopeId,
    TopIndexTable,
};

const TABLE: u32 = 1;

fn store() -> MemoryValueBox {
    MemoryValueBox::new(&[TopIndexTable::table_spec(TABLE)])
}

fn insert(
    owner: OwnerId,
    sub_scope: Option<SubScopeId>,
    namespace: u32,
    seq: SeqId,
    top_indexable: bool,
) -> HistoryOperation {
    HistoryOperation::Insert(IndexRecord {
        owner,
        sub_scope,
        namespace,
        seq,
        top_indexable,
    })
}

fn remove(namespace: u32, seq: SeqId, sub_scope: Option<SubScopeId>) -> HistoryOperation {
    HistoryOperation::Remove(vec![RemovedItem {
        seq,
        namespace,
        tags: 0,
        sub_scope,
    }])
}

fn ops(owner: OwnerId, operations: Vec<HistoryOperation>) -> HashMap<OwnerId, Vec<HistoryOperation>> {
    let mut map = HashMap::new();
    map.insert(owner, operations);
    map
}

// =============================================================================
// Test 1: Replay keeps the maximum inserted seq
// =============================================================================
#[test]
fn replay_keeps_maximum_seq() {
    let store = store();
    let mut table = TopIndexTable::new(TABLE);

    table.replay(
        &store,
        &ops(
            1,
            vec![
                insert(1, None, 0, 5, true),
                insert(1, None, 0, 9, true),
                insert(1, None, 0, 3, true),
            ],
        ),
    );

    assert_eq!(table.get(&store, 1, None, 0), Some(9));
}

// =============================================================================
// Test 2: Non-indexable inserts are invisible
// =============================================================================
#[test]
fn non_indexable_insert_is_ignored() {
    let store = store();
    let mut table = TopIndexTable::new(TABLE);

    table.replay(&store, &ops(1, vec![insert(1, None, 0, 10, false)]));
    assert_eq!(table.get(&store, 1, None, 0), None);

    // An indexable insert with a lower seq still becomes the top — the
    // non-indexable 10 never entered the index.
    table.replay(&store, &ops(1, vec![insert(1, None, 0, 4, true)]));
    assert_eq!(table.get(&store, 1, None, 0), Some(4));
}

// =============================================================================
// Test 3: Lower insert does not replace the current top
// =============================================================================
#[test]
fn lower_insert_keeps_current_top() {
    let store = store();
    let mut table = TopIndexTable::new(TABLE);

    table.replay(&store, &ops(1, vec![insert(1, None, 0, 8, true)]));
    table.replay(&store, &ops(1, vec![insert(1, None, 0, 2, true)]));

    assert_eq!(table.get(&store, 1, None, 0), Some(8));
}

// =============================================================================
// Test 4: Removing the current top clears the slot
// =============================================================================
#[test]
fn removing_top_clears_slot() {
    let store = store();
    let mut table = TopIndexTable::new(TABLE);

    table.replay(&store, &ops(1, vec![insert(1, None, 0, 6, true)]));
    assert_eq!(table.get(&store, 1, None, 0), Some(6));

    table.replay(&store, &ops(1, vec![remove(0, 6, None)]));
    assert_eq!(table.get(&store, 1, None, 0), None);
}

// =============================================================================
// Test 5: Removing a non-top item leaves the top unchanged
// =============================================================================
#[test]
fn removing_non_top_item_keeps_top() {
    let store = store();
    let mut table = TopIndexTable::new(TABLE);

    table.replay(
        &store,
        &ops(1, vec![insert(1, None, 0, 3, true), insert(1, None, 0, 5, true)]),
    );
    table.replay(&store, &ops(1, vec![remove(0, 3, None)]));

    assert_eq!(table.get(&store, 1, None, 0), Some(5));
}

// =============================================================================
// Test 6: Stale slot after out-of-order removal (documented limitation)
// =============================================================================
// The index never recomputes the next-highest survivor. After the top is
// removed, an older record that is still present does NOT become the top.
#[test]
fn removed_top_is_not_replaced_by_older_survivor() {
    let store = store();
    let mut table = TopIndexTable::new(TABLE);

    table.replay(&store, &ops(1, vec![insert(1, None, 0, 5, true)]));
    assert_eq!(table.get(&store, 1, None, 0), Some(5));

    // 3 < 5, so 3 never becomes the top...
    table.replay(&store, &ops(1, vec![insert(1, None, 0, 3, true)]));
    assert_eq!(table.get(&store, 1, None, 0), Some(5));

    // ...and when 5 is removed, the slot goes empty even though 3 survives.
    table.replay(&store, &ops(1, vec![remove(0, 5, None)]));
    assert_eq!(table.get(&store, 1, None, 0), None);
}

// =============================================================================
// Test 7: Insert then remove of the same record in one transaction nets to none
// =============================================================================
#[test]
fn insert_then_remove_in_one_transaction_nets_to_none() {
    let store = store();
    let mut table = TopIndexTable::new(TABLE);

    table.replay(
        &store,
        &ops(1, vec![insert(1, None, 0, 7, true), remove(0, 7, None)]),
    );

    assert_eq!(table.get(&store, 1, None, 0), None);
}

// =============================================================================
// Test 8: Two owners in one replay batch never cross-contaminate
// =============================================================================
#[test]
fn owners_are_isolated() {
    let store = store();
    let mut table = TopIndexTable::new(TABLE);

    let mut batch = HashMap::new();
    batch.insert(1, vec![insert(1, None, 0, 10, true)]);
    batch.insert(2, vec![insert(2, None, 0, 20, true), remove(0, 20, None)]);
    table.replay(&store, &batch);

    assert_eq!(table.get(&store, 1, None, 0), Some(10));
    assert_eq!(table.get(&store, 2, None, 0), None);
}

// =============================================================================
// Test 9: Sub-scoped slots are independent of the owner-level slot
// =============================================================================
#[test]
fn sub_scope_slots_are_independent() {
    let store = store();
    let mut table = TopIndexTable::new(TABLE);

    table.replay(
        &store,
        &ops(
            1,
            vec![insert(1, None, 0, 5, true), insert(1, Some(9), 0, 8, true)],
        ),
    );

    assert_eq!(table.get(&store, 1, None, 0), Some(5));
    assert_eq!(table.get(&store, 1, Some(9), 0), Some(8));

    // Removing the sub-scoped top leaves the owner-level slot alone.
    table.replay(&store, &ops(1, vec![remove(0, 8, Some(9))]));
    assert_eq!(table.get(&store, 1, Some(9), 0), None);
    assert_eq!(table.get(&store, 1, None, 0), Some(5));
}

// =============================================================================
// Test 10: Namespaces partition the same group
// =============================================================================
#[test]
fn namespaces_are_independent() {
    let store = store();
    let mut table = TopIndexTable::new(TABLE);

    table.replay(
        &store,
        &ops(1, vec![insert(1, None, 0, 5, true), insert(1, None, 1, 2, true)]),
    );

    assert_eq!(table.get(&store, 1, None, 0), Some(5));
    assert_eq!(table.get(&store, 1, None, 1), Some(2));
}

// =============================================================================
// Test 11: Untouched group reads as none
// =============================================================================
#[test]
fn untouched_group_reads_none() {
    let store = store();
    let mut table = TopIndexTable::new(TABLE);
    assert_eq!(table.get(&store, 42, None, 0), None);
}

// =============================================================================
// Test 12: Timestamp updates are skipped by the index
// =============================================================================
#[test]
fn timestamp_update_is_skipped() {
    let store = store();
    let mut table = TopIndexTable::new(TABLE);

    table.replay(
        &store,
        &ops(
            1,
            vec![
                insert(1, None, 0, 5, true),
                HistoryOperation::UpdateTimestamp {
                    namespace: 0,
                    seq: 5,
                    timestamp: 1_700_000_000,
                },
            ],
        ),
    );

    assert_eq!(table.get(&store, 1, None, 0), Some(5));
}
