//! Replication-log writer
//!
//! A log directory holds a single append-only file, `wal.log`, beginning
//! with a metadata record identifying the member and cluster. Writes go out
//! in whole framed records; `save` serializes the hard state and every
//! entry into one buffer and persists them with a single write and fsync,
//! so a reader never observes the hard state without its entries.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{LogError, LogResult};
use super::record::{frame_record, HardState, LogEntry, LogMetadata, RecordKind};

/// File name of the log inside a log directory.
pub const LOG_FILE_NAME: &str = "wal.log";

/// Append-only writer over a freshly created log directory.
pub struct LogWriter {
    path: PathBuf,
    file: File,
}

impl LogWriter {
    /// Create a log directory and its log file, writing the metadata record.
    ///
    /// The directory must not already contain a log file. The metadata
    /// record is durable before this returns.
    pub fn create(dir: &Path, metadata: LogMetadata) -> LogResult<Self> {
        fs::create_dir_all(dir).map_err(|e| LogError::io_error_at_path(dir, e))?;

        let path = dir.join(LOG_FILE_NAME);
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
            .map_err(|e| LogError::io_error_at_path(&path, e))?;

        let record = frame_record(RecordKind::Metadata, &metadata.serialize());
        file.write_all(&record)
            .map_err(|e| LogError::io_error_at_path(&path, e))?;
        file.sync_all()
            .map_err(|e| LogError::io_error_at_path(&path, e))?;

        Ok(Self { path, file })
    }

    /// Persist a hard state and a batch of entries as one durable write.
    pub fn save(&mut self, hard_state: HardState, entries: &[LogEntry]) -> LogResult<()> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&frame_record(
            RecordKind::HardState,
            &hard_state.serialize(),
        ));
        for entry in entries {
            buf.extend_from_slice(&frame_record(RecordKind::Entry, &entry.serialize()));
        }

        self.file
            .write_all(&buf)
            .map_err(|e| LogError::io_error_at_path(&self.path, e))?;
        self.file
            .sync_all()
            .map_err(|e| LogError::io_error_at_path(&self.path, e))?;
        Ok(())
    }

    /// Flush and close the log, fsyncing the containing directory so the
    /// file's existence is durable too.
    pub fn close(self) -> LogResult<()> {
        self.file
            .sync_all()
            .map_err(|e| LogError::io_error_at_path(&self.path, e))?;

        if let Some(dir) = self.path.parent() {
            let handle = OpenOptions::new()
                .read(true)
                .open(dir)
                .map_err(|e| LogError::io_error_at_path(dir, e))?;
            handle
                .sync_all()
                .map_err(|e| LogError::io_error_at_path(dir, e))?;
        }
        Ok(())
    }
}
