//! Replication-log reader
//!
//! Replays framed records in file order, verifying every checksum. Used by
//! recovery-side tooling and tests to confirm what a bootstrapped log
//! actually contains.

use std::fs;
use std::path::Path;

use super::errors::{LogError, LogResult};
use super::record::{read_record, LogRecord};

/// Sequential reader over one log file.
pub struct LogReader {
    data: Vec<u8>,
    pos: usize,
}

impl LogReader {
    /// Open a log file and buffer its contents.
    pub fn open(path: &Path) -> LogResult<Self> {
        let data = fs::read(path).map_err(|e| LogError::io_error_at_path(path, e))?;
        Ok(Self { data, pos: 0 })
    }

    /// Read the next record, or `None` at end of file.
    pub fn read_next(&mut self) -> LogResult<Option<LogRecord>> {
        if self.pos == self.data.len() {
            return Ok(None);
        }
        let (record, consumed) = read_record(&self.data[self.pos..])?;
        self.pos += consumed;
        Ok(Some(record))
    }

    /// Read every remaining record.
    pub fn read_all(&mut self) -> LogResult<Vec<LogRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }
}
