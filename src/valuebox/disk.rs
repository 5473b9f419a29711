use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::valuebox::journal::{JournalRecord, JournalRecordType};
use crate::valuebox::{TableId, TableSpec, ValueBox};

/// Durable value box: an in-memory image backed by an append-only journal.
///
/// Mutations apply to the image immediately and queue a journal record.
/// `commit` appends the queued records and fsyncs — before that, nothing has
/// touched disk, so a crash discards the whole in-flight transaction and
/// never a part of it.
///
/// Two layers of buffering on the write path:
///   BufWriter.flush()  → Rust buffer → OS page cache
///   file.sync_all()    → OS page cache → physical disk
///
/// On open, the journal is replayed record by record to rebuild the image.
/// A record that fails its CRC was a partial write from a crash mid-commit;
/// replay stops there and everything before it is valid.
pub struct JournalValueBox {
    tables: HashMap<TableId, BTreeMap<Vec<u8>, Vec<u8>>>,
    writer: BufWriter<File>,
    queued: Vec<JournalRecord>,
}

impl JournalValueBox {
    /// Open (or create) a journal at `path` and replay it into memory.
    pub fn open(path: &Path, specs: &[TableSpec]) -> Result<Self> {
        let mut tables: HashMap<TableId, BTreeMap<Vec<u8>, Vec<u8>>> = HashMap::new();
        for spec in specs {
            tables.insert(spec.id, BTreeMap::new());
        }

        let mut replayed = 0usize;
        if path.exists() {
            let data = fs::read(path)?;
            let mut offset = 0usize;
            while offset < data.len() {
                match JournalRecord::decode(&data[offset..]) {
                    Ok(record) => {
                        offset += record.encoded_size();
                        replayed += 1;
                        Self::apply(&mut tables, &record);
                    }
                    // Partial write at the tail — everything before it stands.
                    Err(_) => break,
                }
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(records = replayed, "journal replayed");

        Ok(JournalValueBox {
            tables,
            writer: BufWriter::new(file),
            queued: Vec::new(),
        })
    }

    fn apply(tables: &mut HashMap<TableId, BTreeMap<Vec<u8>, Vec<u8>>>, record: &JournalRecord) {
        let map = tables.entry(record.table).or_default();
        match record.record_type {
            JournalRecordType::Set => {
                map.insert(record.key.clone(), record.value.clone());
            }
            JournalRecordType::Remove => {
                map.remove(&record.key);
            }
        }
    }

    /// Number of mutations queued for the next commit.
    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }
}

impl ValueBox for JournalValueBox {
    fn get(&self, table: TableId, key: &[u8]) -> Option<Vec<u8>> {
        self.tables.get(&table)?.get(key).cloned()
    }

    fn set(&mut self, table: TableId, key: &[u8], value: &[u8]) {
        let record = JournalRecord::set(table, key.to_vec(), value.to_vec());
        Self::apply(&mut self.tables, &record);
        self.queued.push(record);
    }

    fn remove(&mut self, table: TableId, key: &[u8], _secure: bool) {
        let record = JournalRecord::remove(table, key.to_vec());
        Self::apply(&mut self.tables, &record);
        self.queued.push(record);
    }

    fn commit(&mut self) -> Result<()> {
        if self.queued.is_empty() {
            return Ok(());
        }

        for record in &self.queued {
            self.writer.write_all(&record.encode())?;
        }
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;

        debug!(records = self.queued.len(), "journal committed");
        self.queued.clear();
        Ok(())
    }
}
