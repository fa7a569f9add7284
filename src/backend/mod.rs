//! Embedded store file backend
//!
//! A store file is a single flat file of named buckets, each holding
//! key/value byte-string pairs. Bucket iteration order and within-bucket
//! key order are byte-lexicographic and fully deterministic, which the
//! digest engine depends on for reproducible hashes.
//!
//! Reserved buckets:
//! - `key`: versioned user keys (revision-prefixed, see `crate::revision`)
//! - `meta`: store metadata, including the consistency-index marker
//! - `members`: current cluster membership records
//! - `members_removed`: membership records of removed members
//!
//! Read-only consumers (the digest engine) use [`StoreFile`] directly;
//! read-write consumers (the store surgeon) open a [`Store`] with an
//! injected [`ConsistentIndexProvider`].

mod errors;
mod file;
mod store;

pub use errors::{BackendError, BackendErrorCode, BackendResult};
pub use file::{Bucket, StoreFile, STORE_MAGIC, STORE_VERSION};
pub use store::{ConsistentIndexProvider, Store, Tx};

/// Bucket holding revision-prefixed user keys.
pub const BUCKET_KEY: &[u8] = b"key";

/// Bucket holding store metadata.
pub const BUCKET_META: &[u8] = b"meta";

/// Bucket holding current cluster membership records.
pub const BUCKET_MEMBERS: &[u8] = b"members";

/// Bucket holding records of formerly-removed members.
pub const BUCKET_MEMBERS_REMOVED: &[u8] = b"members_removed";

/// Meta-bucket key under which the consistency index is persisted (u64 BE).
pub const KEY_CONSISTENT_INDEX: &[u8] = b"consistent_index";
