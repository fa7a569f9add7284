//! On-disk codec for the embedded store file
//!
//! A store file is a single flat file holding named buckets of key/value
//! byte strings:
//!
//! - Magic (8 bytes): `QDBSTOR1`
//! - Format version (u32 LE): currently 1
//! - Bucket count (u32 LE)
//! - Per bucket, in byte-lexicographic name order:
//!   - name length (u32 LE), name bytes
//!   - entry count (u64 LE)
//!   - per entry, in byte-lexicographic key order:
//!     key length (u32 LE), key bytes, value length (u32 LE), value bytes
//! - Checksum (u32 LE): CRC32 over every preceding byte
//!
//! The encoder iterates `BTreeMap`s, so the on-disk order is deterministic
//! by construction. Any mismatch between the declared layout and the bytes
//! present, or a checksum mismatch, decodes as corruption.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{BackendError, BackendResult};

/// File magic, first 8 bytes of every store file.
pub const STORE_MAGIC: &[u8; 8] = b"QDBSTOR1";

/// Current format version.
pub const STORE_VERSION: u32 = 1;

/// One named bucket: keys to values, ordered by raw key bytes.
pub type Bucket = BTreeMap<Vec<u8>, Vec<u8>>;

/// Decoded store file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreFile {
    buckets: BTreeMap<Vec<u8>, Bucket>,
}

impl StoreFile {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket names in ascending byte-lexicographic order.
    pub fn bucket_names(&self) -> impl Iterator<Item = &[u8]> {
        self.buckets.keys().map(|name| name.as_slice())
    }

    /// Look up a bucket by name.
    pub fn bucket(&self, name: &[u8]) -> Option<&Bucket> {
        self.buckets.get(name)
    }

    /// Look up a bucket mutably, creating it if absent.
    pub fn bucket_mut(&mut self, name: &[u8]) -> &mut Bucket {
        self.buckets.entry(name.to_vec()).or_default()
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Read and validate a store file.
    pub fn read(path: &Path) -> BackendResult<Self> {
        let raw = fs::read(path).map_err(|e| BackendError::io_error_at_path(path, e))?;
        Self::decode(&raw)
    }

    /// Persist the store atomically: write to a sibling temp file, fsync it,
    /// rename over the target, then fsync the parent directory.
    pub fn write(&self, path: &Path) -> BackendResult<()> {
        let encoded = self.encode();

        let tmp_path = part_path(path);
        let mut tmp = File::create(&tmp_path)
            .map_err(|e| BackendError::io_error_at_path(&tmp_path, e))?;
        tmp.write_all(&encoded)
            .map_err(|e| BackendError::io_error_at_path(&tmp_path, e))?;
        tmp.sync_all()
            .map_err(|e| BackendError::io_error_at_path(&tmp_path, e))?;
        drop(tmp);

        fs::rename(&tmp_path, path).map_err(|e| {
            BackendError::io_error(
                format!(
                    "failed to rename {} to {}",
                    tmp_path.display(),
                    path.display()
                ),
                e,
            )
        })?;

        if let Some(parent) = path.parent() {
            let dir = OpenOptions::new()
                .read(true)
                .open(parent)
                .map_err(|e| BackendError::io_error_at_path(parent, e))?;
            dir.sync_all()
                .map_err(|e| BackendError::io_error_at_path(parent, e))?;
        }

        Ok(())
    }

    /// Encode to the on-disk byte layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(STORE_MAGIC);
        buf.extend_from_slice(&STORE_VERSION.to_le_bytes());
        buf.extend_from_slice(&(self.buckets.len() as u32).to_le_bytes());

        for (name, bucket) in &self.buckets {
            buf.extend_from_slice(&(name.len() as u32).to_le_bytes());
            buf.extend_from_slice(name);
            buf.extend_from_slice(&(bucket.len() as u64).to_le_bytes());
            for (key, value) in bucket {
                buf.extend_from_slice(&(key.len() as u32).to_le_bytes());
                buf.extend_from_slice(key);
                buf.extend_from_slice(&(value.len() as u32).to_le_bytes());
                buf.extend_from_slice(value);
            }
        }

        let checksum = crc32fast::hash(&buf);
        buf.extend_from_slice(&checksum.to_le_bytes());
        buf
    }

    /// Decode and validate the on-disk byte layout.
    pub fn decode(data: &[u8]) -> BackendResult<Self> {
        // magic + version + bucket count + trailing checksum
        const MIN_FILE_SIZE: usize = 8 + 4 + 4 + 4;

        if data.len() < MIN_FILE_SIZE {
            return Err(BackendError::corrupt(format!(
                "store file too short: {} bytes",
                data.len()
            )));
        }

        let checksum_offset = data.len() - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = crc32fast::hash(&data[..checksum_offset]);
        if computed_checksum != stored_checksum {
            return Err(BackendError::corrupt(format!(
                "store checksum mismatch: computed {:08x}, stored {:08x}",
                computed_checksum, stored_checksum
            )));
        }

        let mut cursor = Cursor::new(&data[..checksum_offset]);
        let magic = cursor.take(8)?;
        if magic != STORE_MAGIC {
            return Err(BackendError::corrupt("bad store magic"));
        }
        let version = cursor.read_u32()?;
        if version != STORE_VERSION {
            return Err(BackendError::corrupt(format!(
                "unsupported store version: {}",
                version
            )));
        }

        let bucket_count = cursor.read_u32()? as usize;
        let mut buckets = BTreeMap::new();
        for _ in 0..bucket_count {
            let name = cursor.read_bytes()?.to_vec();
            let entry_count = cursor.read_u64()? as usize;
            let mut bucket = Bucket::new();
            for _ in 0..entry_count {
                let key = cursor.read_bytes()?.to_vec();
                let value = cursor.read_bytes()?.to_vec();
                bucket.insert(key, value);
            }
            if buckets.insert(name.clone(), bucket).is_some() {
                return Err(BackendError::corrupt(format!(
                    "duplicate bucket name: {}",
                    String::from_utf8_lossy(&name)
                )));
            }
        }

        if !cursor.is_empty() {
            return Err(BackendError::corrupt(format!(
                "{} trailing bytes after last bucket",
                cursor.remaining()
            )));
        }

        Ok(Self { buckets })
    }
}

/// Temp-file path for an in-progress write: `.part` appended to the full
/// file name, so `a.db` and `a.json` in one directory never share a temp
/// file and an unrelated `a.part` is never clobbered.
fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Bounds-checked reader over the decoded region.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> BackendResult<&'a [u8]> {
        if self.data.len() - self.pos < n {
            return Err(BackendError::corrupt(format!(
                "store file truncated: need {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.data.len() - self.pos
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u32(&mut self) -> BackendResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_u64(&mut self) -> BackendResult<u64> {
        let bytes = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }

    fn read_bytes(&mut self) -> BackendResult<&'a [u8]> {
        let len = self.read_u32()? as usize;
        self.take(len)
    }

    fn is_empty(&self) -> bool {
        self.pos == self.data.len()
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> StoreFile {
        let mut store = StoreFile::new();
        store
            .bucket_mut(b"key")
            .insert(b"alpha".to_vec(), b"1".to_vec());
        store
            .bucket_mut(b"key")
            .insert(b"beta".to_vec(), b"2".to_vec());
        store.bucket_mut(b"meta");
        store
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let store = sample_store();
        let decoded = StoreFile::decode(&store.encode()).unwrap();
        assert_eq!(store, decoded);
    }

    #[test]
    fn test_deterministic_encoding() {
        let store = sample_store();
        assert_eq!(store.encode(), store.encode());
    }

    #[test]
    fn test_bucket_names_sorted() {
        let mut store = StoreFile::new();
        store.bucket_mut(b"meta");
        store.bucket_mut(b"key");
        store.bucket_mut(b"members");
        let names: Vec<&[u8]> = store.bucket_names().collect();
        assert_eq!(names, vec![&b"key"[..], b"members", b"meta"]);
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let mut raw = sample_store().encode();
        let mid = raw.len() / 2;
        raw[mid] ^= 0xFF;
        let err = StoreFile::decode(&raw).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut raw = sample_store().encode();
        raw[0] = b'X';
        // re-stamp the checksum so only the magic is wrong
        let body_len = raw.len() - 4;
        let checksum = crc32fast::hash(&raw[..body_len]);
        raw[body_len..].copy_from_slice(&checksum.to_le_bytes());

        let err = StoreFile::decode(&raw).unwrap_err();
        assert!(err.to_string().contains("bad store magic"));
    }

    #[test]
    fn test_truncated_file_rejected() {
        let raw = sample_store().encode();
        assert!(StoreFile::decode(&raw[..10]).is_err());
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("db");

        let store = sample_store();
        store.write(&path).unwrap();

        let loaded = StoreFile::read(&path).unwrap();
        assert_eq!(store, loaded);
        // no temp file left behind
        assert!(!part_path(&path).exists());
    }

    #[test]
    fn test_temp_name_appends_to_full_file_name() {
        let dir = tempfile::TempDir::new().unwrap();

        // a sibling that with_extension-style naming would have clobbered
        let bystander = dir.path().join("a.part");
        fs::write(&bystander, b"unrelated").unwrap();

        let path = dir.path().join("a.db");
        sample_store().write(&path).unwrap();

        assert_eq!(part_path(&path), dir.path().join("a.db.part"));
        assert!(!dir.path().join("a.db.part").exists());
        assert_eq!(fs::read(&bystander).unwrap(), b"unrelated");
    }
}
