//! Read-write store handle with injected consistency-index tracking
//!
//! The store persists a consistency-index marker under `meta/consistent_index`
//! recording the highest replication-log index already reflected in store
//! state. The value written is never computed here: it comes from an injected
//! [`ConsistentIndexProvider`], so opening a store for offline surgery does
//! not couple this module to the server's index-tracking logic.
//!
//! Exactly one transaction may be open at a time (enforced by the mutable
//! borrow in [`Store::begin`]). Ending a transaction stamps the current
//! consistency index into the meta bucket and atomically rewrites the file,
//! even if no ordinary key was touched.

use std::path::{Path, PathBuf};

use super::errors::BackendResult;
use super::file::{Bucket, StoreFile};
use super::{BUCKET_META, KEY_CONSISTENT_INDEX};

/// Capability reporting the highest log index applied to store state.
pub trait ConsistentIndexProvider {
    /// Current consistency index to persist on transaction commit.
    fn consistent_index(&self) -> u64;
}

/// An open read-write store backed by a single file.
pub struct Store {
    path: PathBuf,
    file: StoreFile,
    index: Box<dyn ConsistentIndexProvider>,
}

impl Store {
    /// Open an existing store file for read-write use.
    ///
    /// The file is validated on open; an unreadable or invalid file is a
    /// corruption error. `index` supplies the consistency-index value that
    /// every committed transaction persists.
    pub fn open(path: &Path, index: Box<dyn ConsistentIndexProvider>) -> BackendResult<Self> {
        let file = StoreFile::read(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            index,
        })
    }

    /// Begin the store's single read-write transaction.
    pub fn begin(&mut self) -> Tx<'_> {
        Tx { store: self }
    }

    /// Look up a bucket (read-only).
    pub fn bucket(&self, name: &[u8]) -> Option<&Bucket> {
        self.file.bucket(name)
    }

    /// Read the persisted consistency-index marker, if any.
    pub fn consistent_index(&self) -> Option<u64> {
        let value = self.file.bucket(BUCKET_META)?.get(KEY_CONSISTENT_INDEX)?;
        if value.len() != 8 {
            return None;
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(value);
        Some(u64::from_be_bytes(buf))
    }
}

/// A read-write transaction; consumed by `commit`. Changes from a dropped,
/// uncommitted transaction never reach disk.
pub struct Tx<'a> {
    store: &'a mut Store,
}

impl<'a> Tx<'a> {
    /// Insert or replace an entry.
    pub fn put(&mut self, bucket: &[u8], key: &[u8], value: &[u8]) {
        self.store
            .file
            .bucket_mut(bucket)
            .insert(key.to_vec(), value.to_vec());
    }

    /// Delete one entry; absent keys are a no-op.
    pub fn delete(&mut self, bucket: &[u8], key: &[u8]) {
        if let Some(b) = self.store.file.bucket(bucket) {
            if b.contains_key(key) {
                self.store.file.bucket_mut(bucket).remove(key);
            }
        }
    }

    /// Delete every entry in a bucket, keeping the bucket itself.
    ///
    /// A missing bucket is a no-op: purging metadata that was never written
    /// is not an error.
    pub fn delete_all(&mut self, bucket: &[u8]) {
        if self.store.file.bucket(bucket).is_some() {
            self.store.file.bucket_mut(bucket).clear();
        }
    }

    /// End the transaction: stamp the injected consistency index into
    /// `meta/consistent_index` and durably rewrite the store file.
    ///
    /// The stamp happens on every commit, so a transaction that touched no
    /// ordinary key still forces the marker out to disk.
    pub fn commit(self) -> BackendResult<()> {
        let index = self.store.index.consistent_index();
        self.store.file.bucket_mut(BUCKET_META).insert(
            KEY_CONSISTENT_INDEX.to_vec(),
            index.to_be_bytes().to_vec(),
        );
        self.store.file.write(&self.store.path)
    }
}
