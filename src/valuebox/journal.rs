use crate::error::{Error, Result};
use crate::valuebox::TableId;

/// Kind of mutation recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalRecordType {
    Set = 0x01,
    Remove = 0x02,
}

impl JournalRecordType {
    fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0x01 => Ok(JournalRecordType::Set),
            0x02 => Ok(JournalRecordType::Remove),
            _ => Err(Error::Corruption(format!("invalid record type: {}", byte))),
        }
    }
}

/// A single mutation in the journal.
///
/// On-disk format:
/// ```text
/// ┌──────────┬────────┬──────────┬───────────┬────────────┬───────────┬──────────┐
/// │ CRC (4B) │ Len(4B)│ Type(1B) │ Table(4B) │ Key Len(4B)│ Key (var) │Val (var) │
/// └──────────┴────────┴──────────┴───────────┴────────────┴───────────┴──────────┘
/// ```
///
/// CRC covers everything after the CRC field itself.
/// If CRC doesn't match on read, the record was a partial write (crash
/// mid-commit) and replay stops here — all preceding records are valid.
/// Remove records carry no value bytes.
#[derive(Debug, Clone)]
pub struct JournalRecord {
    pub record_type: JournalRecordType,
    pub table: TableId,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

// Header sizes
const CRC_SIZE: usize = 4;
const LEN_SIZE: usize = 4;
const TYPE_SIZE: usize = 1;
const TABLE_SIZE: usize = 4;
const KEY_LEN_SIZE: usize = 4;
const HEADER_SIZE: usize = CRC_SIZE + LEN_SIZE + TYPE_SIZE + TABLE_SIZE + KEY_LEN_SIZE;

impl JournalRecord {
    /// Create a Set record.
    pub fn set(table: TableId, key: Vec<u8>, value: Vec<u8>) -> Self {
        JournalRecord {
            record_type: JournalRecordType::Set,
            table,
            key,
            value,
        }
    }

    /// Create a Remove record.
    pub fn remove(table: TableId, key: Vec<u8>) -> Self {
        JournalRecord {
            record_type: JournalRecordType::Remove,
            table,
            key,
            value: Vec::new(),
        }
    }

    /// Serialize this record to bytes (including CRC header).
    pub fn encode(&self) -> Vec<u8> {
        let payload_len = TYPE_SIZE + TABLE_SIZE + KEY_LEN_SIZE + self.key.len() + self.value.len();
        let total_len = CRC_SIZE + LEN_SIZE + payload_len;

        let mut buf = Vec::with_capacity(total_len);

        // Reserve space for CRC (filled at the end)
        buf.extend_from_slice(&[0u8; CRC_SIZE]);

        // Length (of everything after CRC and Length fields)
        buf.extend_from_slice(&(payload_len as u32).to_le_bytes());

        // Type
        buf.push(self.record_type as u8);

        // Table
        buf.extend_from_slice(&self.table.to_le_bytes());

        // Key length + key
        buf.extend_from_slice(&(self.key.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.key);

        // Value
        buf.extend_from_slice(&self.value);

        // Compute CRC over everything after the CRC field
        let crc = crc32fast::hash(&buf[CRC_SIZE..]);
        buf[0..CRC_SIZE].copy_from_slice(&crc.to_le_bytes());

        buf
    }

    /// Deserialize a record from bytes. Returns error if CRC doesn't match.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::Corruption("record too short".into()));
        }

        let stored_crc = u32::from_le_bytes(data[0..4].try_into().unwrap());
        let payload_len = u32::from_le_bytes(data[4..8].try_into().unwrap()) as usize;

        let total_len = CRC_SIZE + LEN_SIZE + payload_len;
        if data.len() < total_len {
            return Err(Error::Corruption("record truncated".into()));
        }

        // Verify CRC (covers everything after the CRC field)
        let computed_crc = crc32fast::hash(&data[CRC_SIZE..total_len]);
        if stored_crc != computed_crc {
            return Err(Error::Corruption("CRC mismatch".into()));
        }

        let mut offset = CRC_SIZE + LEN_SIZE;

        let record_type = JournalRecordType::from_u8(data[offset])?;
        offset += TYPE_SIZE;

        let table = u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap());
        offset += TABLE_SIZE;

        let key_len = u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap()) as usize;
        offset += KEY_LEN_SIZE;

        if offset + key_len > total_len {
            return Err(Error::Corruption("key length exceeds record".into()));
        }
        let key = data[offset..offset + key_len].to_vec();
        offset += key_len;

        // Value (rest of the record)
        let value = data[offset..total_len].to_vec();

        Ok(JournalRecord {
            record_type,
            table,
            key,
            value,
        })
    }

    /// Size of this record when serialized on disk.
    pub fn encoded_size(&self) -> usize {
        HEADER_SIZE + self.key.len() + self.value.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_record_has_no_value() {
        let record = JournalRecord::remove(7, b"key".to_vec());
        let decoded = JournalRecord::decode(&record.encode()).unwrap();
        assert_eq!(decoded.record_type, JournalRecordType::Remove);
        assert_eq!(decoded.table, 7);
        assert!(decoded.value.is_empty());
    }
}
