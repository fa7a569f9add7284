//! Replication-log storage
//!
//! Binary encoding and durable storage for the replicated log a consensus
//! node reads at startup: a metadata header, hard state (term/vote/commit),
//! and entries, each framed as a length-prefixed, checksummed record.
//!
//! This crate only ever writes freshly bootstrapped logs (see
//! `crate::restore`); the reader exists so recovered state can be verified
//! without a running server.

mod errors;
mod reader;
mod record;
mod writer;

pub use errors::{LogError, LogErrorCode, LogResult};
pub use reader::LogReader;
pub use record::{
    frame_record, is_truncation, read_record, ConfChange, ConfChangeType, EntryType, HardState,
    LogEntry, LogMetadata, LogRecord, RecordKind,
};
pub use writer::{LogWriter, LOG_FILE_NAME};
