//! Replication-log error types
//!
//! Error codes:
//! - QUORUM_LOG_IO (create/write/fsync failure)
//! - QUORUM_LOG_ENCODE (record serialization failure)
//! - QUORUM_LOG_CORRUPT (checksum or framing failure on read)

use std::fmt;
use std::io;
use std::path::Path;

/// Log-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogErrorCode {
    /// I/O failure on the log directory or file
    QuorumLogIo,
    /// Record failed to serialize
    QuorumLogEncode,
    /// Record failed checksum or framing validation
    QuorumLogCorrupt,
}

impl LogErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            LogErrorCode::QuorumLogIo => "QUORUM_LOG_IO",
            LogErrorCode::QuorumLogEncode => "QUORUM_LOG_ENCODE",
            LogErrorCode::QuorumLogCorrupt => "QUORUM_LOG_CORRUPT",
        }
    }
}

impl fmt::Display for LogErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Replication-log error with context
#[derive(Debug)]
pub struct LogError {
    code: LogErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl LogError {
    /// I/O failure with a message
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::QuorumLogIo,
            message: message.into(),
            source: Some(source),
        }
    }

    /// I/O failure annotated with the failing path
    pub fn io_error_at_path(path: &Path, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::QuorumLogIo,
            message: format!("I/O error at path: {}", path.display()),
            source: Some(source),
        }
    }

    /// Serialization failure
    pub fn encode_error(message: impl Into<String>) -> Self {
        Self {
            code: LogErrorCode::QuorumLogEncode,
            message: message.into(),
            source: None,
        }
    }

    /// Checksum or framing failure
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self {
            code: LogErrorCode::QuorumLogCorrupt,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> LogErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " ({})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for log operations
pub type LogResult<T> = Result<T, LogError>;
