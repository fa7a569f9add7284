//! Backend error types
//!
//! Error codes:
//! - QUORUM_BACKEND_IO (I/O failure reading or writing the store file)
//! - QUORUM_BACKEND_CORRUPT (file does not decode as a valid store)

use std::fmt;
use std::io;
use std::path::Path;

/// Backend-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorCode {
    /// I/O failure on the store file
    QuorumBackendIo,
    /// Store file failed validation (bad magic, version, checksum, or layout)
    QuorumBackendCorrupt,
}

impl BackendErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            BackendErrorCode::QuorumBackendIo => "QUORUM_BACKEND_IO",
            BackendErrorCode::QuorumBackendCorrupt => "QUORUM_BACKEND_CORRUPT",
        }
    }
}

impl fmt::Display for BackendErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Backend error with path and cause context
#[derive(Debug)]
pub struct BackendError {
    code: BackendErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl BackendError {
    /// I/O error with a free-form message
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: BackendErrorCode::QuorumBackendIo,
            message: message.into(),
            source: Some(source),
        }
    }

    /// I/O error annotated with the failing path
    pub fn io_error_at_path(path: &Path, source: io::Error) -> Self {
        Self {
            code: BackendErrorCode::QuorumBackendIo,
            message: format!("I/O error at path: {}", path.display()),
            source: Some(source),
        }
    }

    /// Corruption error (validation failure, no underlying I/O cause)
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self {
            code: BackendErrorCode::QuorumBackendCorrupt,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> BackendErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " ({})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(BackendErrorCode::QuorumBackendIo.code(), "QUORUM_BACKEND_IO");
        assert_eq!(
            BackendErrorCode::QuorumBackendCorrupt.code(),
            "QUORUM_BACKEND_CORRUPT"
        );
    }

    #[test]
    fn test_display_contains_code_and_message() {
        let err = BackendError::corrupt("bad magic");
        let text = format!("{}", err);
        assert!(text.contains("QUORUM_BACKEND_CORRUPT"));
        assert!(text.contains("bad magic"));
    }
}
