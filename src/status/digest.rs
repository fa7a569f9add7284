//! Snapshot integrity digest
//!
//! Walks every bucket of a store file in ascending name order and folds
//! bucket names, keys, and values into one running CRC32-Castagnoli, while
//! counting entries and tracking the highest `main` revision seen in the
//! `key` bucket. Two byte-identical files produce identical status records
//! on any host: the walk order is the store's deterministic iteration order
//! and nothing from filesystem metadata enters the hash.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::backend::{StoreFile, BUCKET_KEY};
use crate::revision::Revision;

use super::errors::{StatusError, StatusResult};

/// Fingerprint of a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DbStatus {
    /// CRC32-Castagnoli over bucket names, keys, and values in walk order
    pub hash: u32,
    /// Highest `main` revision among versioned keys, 0 if none
    pub revision: i64,
    /// Total number of entries across all buckets
    #[serde(rename = "totalKey")]
    pub total_key: usize,
    /// Logical size of the store file in bytes
    #[serde(rename = "totalSize")]
    pub total_size: i64,
}

/// Compute the status record for a snapshot file.
///
/// Read-only; the file is never modified. Fails with `NotFound` if the path
/// does not exist, `CorruptStore` if it does not validate as a store file or
/// a key in the versioned-key bucket fails to decode, and `BucketMissing` if
/// a listed bucket cannot be resolved.
pub fn compute_status(path: &Path) -> StatusResult<DbStatus> {
    let meta = fs::metadata(path).map_err(|e| StatusError::not_found(path, e))?;
    let total_size = meta.len() as i64;

    let store = StoreFile::read(path).map_err(|e| StatusError::corrupt_store(path, e))?;

    let mut hash = 0u32;
    let mut revision = 0i64;
    let mut total_key = 0usize;

    let names: Vec<Vec<u8>> = store.bucket_names().map(|n| n.to_vec()).collect();
    for name in names {
        let bucket = store
            .bucket(&name)
            .ok_or_else(|| StatusError::bucket_missing(&name))?;

        hash = crc32c::crc32c_append(hash, &name);
        let is_key_bucket = name == BUCKET_KEY;

        for (key, value) in bucket {
            hash = crc32c::crc32c_append(hash, key);
            hash = crc32c::crc32c_append(hash, value);
            total_key += 1;

            if is_key_bucket {
                let rev = Revision::decode(key).map_err(|e| {
                    StatusError::corrupt(format!(
                        "versioned key of {} bytes fails to decode: {}",
                        key.len(),
                        e
                    ))
                })?;
                revision = revision.max(rev.main);
            }
        }
    }

    Ok(DbStatus {
        hash,
        revision,
        total_key,
        total_size,
    })
}
