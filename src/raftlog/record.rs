//! Replication-log record types and wire framing
//!
//! Every record on disk is framed as:
//! - Record Length (u32 LE, total including this field and the checksum)
//! - Record Kind (u8): METADATA / HARD_STATE / ENTRY
//! - Body (variable)
//! - Checksum (u32 LE, CRC32 over length + kind + body)
//!
//! Bodies are fixed-order little-endian fields with length-prefixed byte
//! strings. A checksum or framing mismatch on read is corruption; the log
//! is never partially trusted.

use super::errors::{LogError, LogResult};

/// Record kinds as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordKind {
    /// Log header: node and cluster identity
    Metadata = 0,
    /// Durable term/vote/commit state
    HardState = 1,
    /// One replication-log entry
    Entry = 2,
}

impl RecordKind {
    /// Convert from u8, returns None for unknown kinds
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RecordKind::Metadata),
            1 => Some(RecordKind::HardState),
            2 => Some(RecordKind::Entry),
            _ => None,
        }
    }
}

/// Entry types carried by a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EntryType {
    /// Ordinary state-machine command
    Normal = 0,
    /// Cluster configuration change
    ConfChange = 1,
}

impl EntryType {
    /// Convert from u8, returns None for unknown types
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(EntryType::Normal),
            1 => Some(EntryType::ConfChange),
            _ => None,
        }
    }
}

/// Configuration-change kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConfChangeType {
    /// Add a member
    AddNode = 0,
    /// Remove a member
    RemoveNode = 1,
    /// Update a member's peer URLs
    UpdateNode = 2,
}

impl ConfChangeType {
    /// Convert from u8, returns None for unknown types
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ConfChangeType::AddNode),
            1 => Some(ConfChangeType::RemoveNode),
            2 => Some(ConfChangeType::UpdateNode),
            _ => None,
        }
    }
}

/// Log header record: who this log belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogMetadata {
    /// Local member ID
    pub node_id: u64,
    /// Cluster ID
    pub cluster_id: u64,
}

impl LogMetadata {
    /// Serialize the record body.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(16);
        buf.extend_from_slice(&self.node_id.to_le_bytes());
        buf.extend_from_slice(&self.cluster_id.to_le_bytes());
        buf
    }

    /// Deserialize the record body.
    pub fn deserialize(data: &[u8]) -> LogResult<Self> {
        if data.len() != 16 {
            return Err(LogError::corrupt(format!(
                "metadata body must be 16 bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            node_id: read_u64(&data[0..8]),
            cluster_id: read_u64(&data[8..16]),
        })
    }
}

/// Durable log metadata read at node startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HardState {
    /// Current term
    pub term: u64,
    /// Voted-for member ID
    pub vote: u64,
    /// Highest committed entry index
    pub commit: u64,
}

impl HardState {
    /// Serialize the record body.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(24);
        buf.extend_from_slice(&self.term.to_le_bytes());
        buf.extend_from_slice(&self.vote.to_le_bytes());
        buf.extend_from_slice(&self.commit.to_le_bytes());
        buf
    }

    /// Deserialize the record body.
    pub fn deserialize(data: &[u8]) -> LogResult<Self> {
        if data.len() != 24 {
            return Err(LogError::corrupt(format!(
                "hard-state body must be 24 bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            term: read_u64(&data[0..8]),
            vote: read_u64(&data[8..16]),
            commit: read_u64(&data[16..24]),
        })
    }
}

/// One replication-log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Term the entry was proposed in
    pub term: u64,
    /// Position in the log, contiguous from 1
    pub index: u64,
    /// Entry type
    pub entry_type: EntryType,
    /// Opaque payload (a serialized `ConfChange` for configuration entries)
    pub data: Vec<u8>,
}

impl LogEntry {
    /// Serialize the record body.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + 8 + 1 + 4 + self.data.len());
        buf.extend_from_slice(&self.term.to_le_bytes());
        buf.extend_from_slice(&self.index.to_le_bytes());
        buf.push(self.entry_type as u8);
        buf.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.data);
        buf
    }

    /// Deserialize the record body.
    pub fn deserialize(data: &[u8]) -> LogResult<Self> {
        if data.len() < 8 + 8 + 1 + 4 {
            return Err(LogError::corrupt("entry body too short"));
        }
        let term = read_u64(&data[0..8]);
        let index = read_u64(&data[8..16]);
        let entry_type = EntryType::from_u8(data[16])
            .ok_or_else(|| LogError::corrupt(format!("invalid entry type: {}", data[16])))?;
        let data_len =
            u32::from_le_bytes([data[17], data[18], data[19], data[20]]) as usize;
        if data.len() != 21 + data_len {
            return Err(LogError::corrupt(format!(
                "entry payload length mismatch: declared {}, have {}",
                data_len,
                data.len() - 21
            )));
        }
        Ok(Self {
            term,
            index,
            entry_type,
            data: data[21..].to_vec(),
        })
    }
}

/// Payload of a configuration-change entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfChange {
    /// What kind of membership change this is
    pub change_type: ConfChangeType,
    /// Member the change applies to
    pub node_id: u64,
    /// Serialized member descriptor
    pub context: Vec<u8>,
}

impl ConfChange {
    /// Serialize to the entry payload layout.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + 8 + 4 + self.context.len());
        buf.push(self.change_type as u8);
        buf.extend_from_slice(&self.node_id.to_le_bytes());
        buf.extend_from_slice(&(self.context.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.context);
        buf
    }

    /// Deserialize from the entry payload layout.
    pub fn deserialize(data: &[u8]) -> LogResult<Self> {
        if data.len() < 1 + 8 + 4 {
            return Err(LogError::corrupt("conf-change payload too short"));
        }
        let change_type = ConfChangeType::from_u8(data[0]).ok_or_else(|| {
            LogError::corrupt(format!("invalid conf-change type: {}", data[0]))
        })?;
        let node_id = read_u64(&data[1..9]);
        let context_len =
            u32::from_le_bytes([data[9], data[10], data[11], data[12]]) as usize;
        if data.len() != 13 + context_len {
            return Err(LogError::corrupt(
                "conf-change context length mismatch",
            ));
        }
        Ok(Self {
            change_type,
            node_id,
            context: data[13..].to_vec(),
        })
    }
}

/// Any record read back from a log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    /// Log header
    Metadata(LogMetadata),
    /// Durable term/vote/commit state
    HardState(HardState),
    /// One log entry
    Entry(LogEntry),
}

/// Frame a record body for the on-disk layout.
pub fn frame_record(kind: RecordKind, body: &[u8]) -> Vec<u8> {
    let record_length = (4 + 1 + body.len() + 4) as u32;

    let mut checksum_data = Vec::with_capacity(5 + body.len());
    checksum_data.extend_from_slice(&record_length.to_le_bytes());
    checksum_data.push(kind as u8);
    checksum_data.extend_from_slice(body);
    let checksum = crc32fast::hash(&checksum_data);

    let mut record = Vec::with_capacity(record_length as usize);
    record.extend_from_slice(&checksum_data);
    record.extend_from_slice(&checksum.to_le_bytes());
    record
}

/// Decode one framed record, verifying the checksum.
///
/// Returns the record and the number of bytes consumed. An incomplete tail
/// maps to `UnexpectedEof` via a corruption error so the caller can
/// distinguish truncation in messages.
pub fn read_record(data: &[u8]) -> LogResult<(LogRecord, usize)> {
    const MIN_RECORD_SIZE: usize = 4 + 1 + 4;

    if data.len() < MIN_RECORD_SIZE {
        return Err(LogError::corrupt("log record too short"));
    }

    let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if record_length < MIN_RECORD_SIZE {
        return Err(LogError::corrupt(format!(
            "invalid log record length: {}",
            record_length
        )));
    }
    if data.len() < record_length {
        return Err(LogError::corrupt(format!(
            "log record truncated: expected {} bytes, got {}",
            record_length,
            data.len()
        )));
    }

    let checksum_offset = record_length - 4;
    let stored_checksum = u32::from_le_bytes([
        data[checksum_offset],
        data[checksum_offset + 1],
        data[checksum_offset + 2],
        data[checksum_offset + 3],
    ]);
    let computed_checksum = crc32fast::hash(&data[..checksum_offset]);
    if computed_checksum != stored_checksum {
        return Err(LogError::corrupt(format!(
            "log checksum mismatch: computed {:08x}, stored {:08x}",
            computed_checksum, stored_checksum
        )));
    }

    let kind = RecordKind::from_u8(data[4])
        .ok_or_else(|| LogError::corrupt(format!("invalid record kind: {}", data[4])))?;
    let body = &data[5..checksum_offset];

    let record = match kind {
        RecordKind::Metadata => LogRecord::Metadata(LogMetadata::deserialize(body)?),
        RecordKind::HardState => LogRecord::HardState(HardState::deserialize(body)?),
        RecordKind::Entry => LogRecord::Entry(LogEntry::deserialize(body)?),
    };

    Ok((record, record_length))
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

/// Whether a read failure describes a short or cut-off record rather than
/// bad content. Callers streaming records use this to report truncation
/// separately from corruption.
pub fn is_truncation(err: &LogError) -> bool {
    err.message().contains("truncated") || err.message().contains("too short")
}
