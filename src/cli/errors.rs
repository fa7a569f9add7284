//! CLI error type and exit-code mapping
//!
//! Exit codes:
//! - 1: unexpected internal failure
//! - 2: bad arguments (also what clap itself uses for parse failures)
//! - 4: invalid input (bad config, missing/corrupt snapshot, existing dir)
//! - 5: I/O failure

use std::fmt;

use crate::restore::{RestoreError, RestoreErrorCode};
use crate::status::{StatusError, StatusErrorCode};

/// CLI error kinds, one per exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorKind {
    /// Internal failure
    Error,
    /// Bad command-line arguments
    BadArgs,
    /// Invalid input (config, snapshot, target directory)
    InvalidInput,
    /// I/O failure
    Io,
}

impl CliErrorKind {
    /// Process exit code for this kind
    pub fn exit_code(&self) -> i32 {
        match self {
            CliErrorKind::Error => 1,
            CliErrorKind::BadArgs => 2,
            CliErrorKind::InvalidInput => 4,
            CliErrorKind::Io => 5,
        }
    }
}

/// CLI error carrying the message shown to the operator
#[derive(Debug)]
pub struct CliError {
    kind: CliErrorKind,
    message: String,
}

impl CliError {
    /// Internal failure
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Error,
            message: message.into(),
        }
    }

    /// Bad arguments
    pub fn bad_args(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::BadArgs,
            message: message.into(),
        }
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::InvalidInput,
            message: message.into(),
        }
    }

    /// I/O failure
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Io,
            message: message.into(),
        }
    }

    /// The exit code the process should terminate with
    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }

    /// The error kind
    pub fn kind(&self) -> CliErrorKind {
        self.kind
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<RestoreError> for CliError {
    fn from(err: RestoreError) -> Self {
        let kind = match err.code() {
            RestoreErrorCode::QuorumRestoreInvalidConfig
            | RestoreErrorCode::QuorumRestoreSelfNotFound
            | RestoreErrorCode::QuorumRestoreAlreadyExists
            | RestoreErrorCode::QuorumRestoreNotFound
            | RestoreErrorCode::QuorumRestoreCorrupt => CliErrorKind::InvalidInput,
            RestoreErrorCode::QuorumRestoreIo => CliErrorKind::Io,
            RestoreErrorCode::QuorumRestoreEncode => CliErrorKind::Error,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<StatusError> for CliError {
    fn from(err: StatusError) -> Self {
        let kind = match err.code() {
            StatusErrorCode::QuorumStatusNotFound
            | StatusErrorCode::QuorumStatusCorrupt => CliErrorKind::InvalidInput,
            StatusErrorCode::QuorumStatusBucketMissing => CliErrorKind::Error,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
