//! Snapshot status subsystem
//!
//! Computes a verifiable integrity digest of a snapshot file: a single
//! CRC32-Castagnoli over every bucket name, key, and value in deterministic
//! order, alongside the entry count, file size, and the latest main
//! revision observed among versioned keys. The record is computed fresh on
//! each request and never persisted; presentation (table, JSON) is the
//! CLI's concern.

mod digest;
mod errors;

pub use digest::{compute_status, DbStatus};
pub use errors::{StatusError, StatusErrorCode, StatusResult};
