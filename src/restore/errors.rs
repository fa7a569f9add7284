//! Restore error types
//!
//! Error codes:
//! - QUORUM_RESTORE_INVALID_CONFIG (bad bootstrap descriptor, no mutation)
//! - QUORUM_RESTORE_SELF_NOT_FOUND (named member absent from the cluster map)
//! - QUORUM_RESTORE_ALREADY_EXISTS (target directory present, no mutation)
//! - QUORUM_RESTORE_NOT_FOUND (source snapshot missing)
//! - QUORUM_RESTORE_IO (filesystem failure; target directory is unusable)
//! - QUORUM_RESTORE_CORRUPT (snapshot unreadable as a store)
//! - QUORUM_RESTORE_ENCODE (metadata/entry serialization failure)
//!
//! No restore error is retried internally; each one surfaces immediately
//! with the failing path and underlying cause.

use std::fmt;
use std::io;
use std::path::Path;

use crate::backend::{BackendError, BackendErrorCode};
use crate::members::MemberError;
use crate::raftlog::{LogError, LogErrorCode};

/// Restore-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreErrorCode {
    /// Bootstrap descriptor failed validation
    QuorumRestoreInvalidConfig,
    /// The named self member is not in the derived member set
    QuorumRestoreSelfNotFound,
    /// Target directory already exists
    QuorumRestoreAlreadyExists,
    /// Source snapshot file does not exist
    QuorumRestoreNotFound,
    /// Filesystem read/write failure
    QuorumRestoreIo,
    /// Snapshot is not a valid store file
    QuorumRestoreCorrupt,
    /// Serialization of metadata or log entries failed
    QuorumRestoreEncode,
}

impl RestoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            RestoreErrorCode::QuorumRestoreInvalidConfig => "QUORUM_RESTORE_INVALID_CONFIG",
            RestoreErrorCode::QuorumRestoreSelfNotFound => "QUORUM_RESTORE_SELF_NOT_FOUND",
            RestoreErrorCode::QuorumRestoreAlreadyExists => "QUORUM_RESTORE_ALREADY_EXISTS",
            RestoreErrorCode::QuorumRestoreNotFound => "QUORUM_RESTORE_NOT_FOUND",
            RestoreErrorCode::QuorumRestoreIo => "QUORUM_RESTORE_IO",
            RestoreErrorCode::QuorumRestoreCorrupt => "QUORUM_RESTORE_CORRUPT",
            RestoreErrorCode::QuorumRestoreEncode => "QUORUM_RESTORE_ENCODE",
        }
    }
}

impl fmt::Display for RestoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Restore error with path and cause context
#[derive(Debug)]
pub struct RestoreError {
    code: RestoreErrorCode,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RestoreError {
    /// Bootstrap descriptor failed validation
    pub fn invalid_config(source: MemberError) -> Self {
        Self {
            code: RestoreErrorCode::QuorumRestoreInvalidConfig,
            message: "invalid bootstrap configuration".to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Named self member absent from the derived member set
    pub fn self_not_found(name: &str) -> Self {
        Self {
            code: RestoreErrorCode::QuorumRestoreSelfNotFound,
            message: format!("member {:?} not found in the initial cluster", name),
            source: None,
        }
    }

    /// Target directory already exists
    pub fn already_exists(path: &Path) -> Self {
        Self {
            code: RestoreErrorCode::QuorumRestoreAlreadyExists,
            message: format!("target directory {} already exists", path.display()),
            source: None,
        }
    }

    /// Source snapshot missing
    pub fn not_found(path: &Path, source: io::Error) -> Self {
        Self {
            code: RestoreErrorCode::QuorumRestoreNotFound,
            message: format!("snapshot file not found: {}", path.display()),
            source: Some(Box::new(source)),
        }
    }

    /// Filesystem failure with path context
    pub fn io_error_at_path(path: &Path, source: io::Error) -> Self {
        Self {
            code: RestoreErrorCode::QuorumRestoreIo,
            message: format!("I/O error at path: {}", path.display()),
            source: Some(Box::new(source)),
        }
    }

    /// Snapshot unreadable as a store, or surgery on it failed
    pub fn corrupt_store(path: &Path, source: BackendError) -> Self {
        Self {
            code: RestoreErrorCode::QuorumRestoreCorrupt,
            message: format!("store surgery failed on {}", path.display()),
            source: Some(Box::new(source)),
        }
    }

    /// Serialization failure
    pub fn encode_error(message: impl Into<String>) -> Self {
        Self {
            code: RestoreErrorCode::QuorumRestoreEncode,
            message: message.into(),
            source: None,
        }
    }

    /// Map a log error onto the restore taxonomy: encode failures stay
    /// encode failures, everything else is an I/O failure on the new log.
    pub fn from_log(source: LogError) -> Self {
        let code = match source.code() {
            LogErrorCode::QuorumLogEncode => RestoreErrorCode::QuorumRestoreEncode,
            _ => RestoreErrorCode::QuorumRestoreIo,
        };
        Self {
            code,
            message: "log bootstrap failed".to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Map a backend error during surgery: I/O stays I/O, anything about
    /// the file's content is corruption.
    pub fn from_surgery(path: &Path, source: BackendError) -> Self {
        match source.code() {
            BackendErrorCode::QuorumBackendIo => Self {
                code: RestoreErrorCode::QuorumRestoreIo,
                message: format!("I/O error rewriting {}", path.display()),
                source: Some(Box::new(source)),
            },
            BackendErrorCode::QuorumBackendCorrupt => Self::corrupt_store(path, source),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> RestoreErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " ({})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for RestoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for restore operations
pub type RestoreResult<T> = Result<T, RestoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable_strings() {
        assert_eq!(
            RestoreErrorCode::QuorumRestoreInvalidConfig.code(),
            "QUORUM_RESTORE_INVALID_CONFIG"
        );
        assert_eq!(
            RestoreErrorCode::QuorumRestoreAlreadyExists.code(),
            "QUORUM_RESTORE_ALREADY_EXISTS"
        );
        assert_eq!(
            RestoreErrorCode::QuorumRestoreSelfNotFound.code(),
            "QUORUM_RESTORE_SELF_NOT_FOUND"
        );
    }

    #[test]
    fn test_log_encode_maps_to_encode() {
        let err = RestoreError::from_log(LogError::encode_error("bad"));
        assert_eq!(err.code(), RestoreErrorCode::QuorumRestoreEncode);

        let err = RestoreError::from_log(LogError::io_error(
            "disk",
            io::Error::new(io::ErrorKind::Other, "x"),
        ));
        assert_eq!(err.code(), RestoreErrorCode::QuorumRestoreIo);
    }

    #[test]
    fn test_display_names_the_path() {
        let err = RestoreError::already_exists(Path::new("/data/node1.qdb"));
        assert!(err.to_string().contains("/data/node1.qdb"));
    }
}
