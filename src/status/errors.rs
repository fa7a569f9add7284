//! Status/digest error types
//!
//! Error codes:
//! - QUORUM_STATUS_NOT_FOUND (snapshot path does not exist)
//! - QUORUM_STATUS_CORRUPT (file is not a valid store, or a versioned key
//!   fails to decode)
//! - QUORUM_STATUS_BUCKET_MISSING (a listed bucket resolves to nothing;
//!   treated as corruption, never skipped)

use std::fmt;
use std::io;
use std::path::Path;

use crate::backend::BackendError;

/// Status-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusErrorCode {
    /// Snapshot file does not exist
    QuorumStatusNotFound,
    /// Snapshot file is not a valid store
    QuorumStatusCorrupt,
    /// A listed bucket name resolved to no bucket
    QuorumStatusBucketMissing,
}

impl StatusErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StatusErrorCode::QuorumStatusNotFound => "QUORUM_STATUS_NOT_FOUND",
            StatusErrorCode::QuorumStatusCorrupt => "QUORUM_STATUS_CORRUPT",
            StatusErrorCode::QuorumStatusBucketMissing => "QUORUM_STATUS_BUCKET_MISSING",
        }
    }
}

impl fmt::Display for StatusErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Status error with path context
#[derive(Debug)]
pub struct StatusError {
    code: StatusErrorCode,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StatusError {
    /// Snapshot path does not exist or cannot be examined
    pub fn not_found(path: &Path, source: io::Error) -> Self {
        Self {
            code: StatusErrorCode::QuorumStatusNotFound,
            message: format!("snapshot file not found: {}", path.display()),
            source: Some(Box::new(source)),
        }
    }

    /// File failed to open or validate as a store
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self {
            code: StatusErrorCode::QuorumStatusCorrupt,
            message: message.into(),
            source: None,
        }
    }

    /// File failed to open or validate as a store, with the backend cause
    pub fn corrupt_store(path: &Path, source: BackendError) -> Self {
        Self {
            code: StatusErrorCode::QuorumStatusCorrupt,
            message: format!("cannot open {} as a store file", path.display()),
            source: Some(Box::new(source)),
        }
    }

    /// Listed bucket resolves to no bucket
    pub fn bucket_missing(name: &[u8]) -> Self {
        Self {
            code: StatusErrorCode::QuorumStatusBucketMissing,
            message: format!(
                "cannot get hash of bucket {}",
                String::from_utf8_lossy(name)
            ),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StatusErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " ({})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StatusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for status operations
pub type StatusResult<T> = Result<T, StatusError>;
