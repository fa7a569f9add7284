//! Membership error types

use thiserror::Error;

/// Result type for membership operations
pub type MemberResult<T> = Result<T, MemberError>;

/// Errors deriving a member set from a bootstrap descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberError {
    /// Initial-cluster entry is not of the form `name=url`
    #[error("invalid initial-cluster entry: {0:?}")]
    InvalidClusterEntry(String),

    /// Peer URL fails to parse
    #[error("invalid peer URL: {0:?}")]
    InvalidUrl(String),

    /// Initial-cluster map resolves to no members
    #[error("initial cluster is empty")]
    EmptyCluster,

    /// Two members derived the same 64-bit ID
    #[error("duplicate member ID for {0:?}")]
    DuplicateMemberId(String),
}
