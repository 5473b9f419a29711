use std::collections::{BTreeMap, HashMap};

use crate::error::Result;
use crate::valuebox::{TableId, TableSpec, ValueBox};

/// Purely in-memory value box. One sorted map per table.
///
/// `BTreeMap` over raw key bytes gives the binary key ordering the table
/// spec asks for. `commit` is a no-op — there is nothing to make durable.
/// Used by tests and by callers that want an ephemeral index.
pub struct MemoryValueBox {
    tables: HashMap<TableId, BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryValueBox {
    /// Create a box with the given tables pre-registered.
    pub fn new(specs: &[TableSpec]) -> Self {
        let mut tables = HashMap::new();
        for spec in specs {
            tables.insert(spec.id, BTreeMap::new());
        }
        MemoryValueBox { tables }
    }

    /// Number of keys currently stored in a table.
    pub fn len(&self, table: TableId) -> usize {
        self.tables.get(&table).map_or(0, |map| map.len())
    }

    /// Whether a table holds no keys.
    pub fn is_empty(&self, table: TableId) -> bool {
        self.len(table) == 0
    }
}

impl ValueBox for MemoryValueBox {
    fn get(&self, table: TableId, key: &[u8]) -> Option<Vec<u8>> {
        self.tables.get(&table)?.get(key).cloned()
    }

    fn set(&mut self, table: TableId, key: &[u8], value: &[u8]) {
        self.tables
            .entry(table)
            .or_default()
            .insert(key.to_vec(), value.to_vec());
    }

    fn remove(&mut self, table: TableId, key: &[u8], _secure: bool) {
        if let Some(map) = self.tables.get_mut(&table) {
            map.remove(key);
        }
    }

    fn commit(&mut self) -> Result<()> {
        Ok(())
    }
}
