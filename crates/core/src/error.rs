//! Error types for verstore
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! Every error is returned to the immediate caller; nothing is retried
//! internally. In particular `VersionConflict` and `BackendUnavailable`
//! are distinct variants so callers can apply conflict retries and
//! backend backoff independently.

use crate::types::{EntityId, Version, WriteOp};
use thiserror::Error;

/// Result type alias for verstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the versioned store
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// Key absent (or already deleted)
    #[error("record not found: {0}")]
    NotFound(EntityId),

    /// Insert attempted on a key that is already present
    #[error("record already exists: {0}")]
    AlreadyExists(EntityId),

    /// Conditional write carried a stale version; nothing was mutated
    #[error("version conflict on {key}: expected {expected}, found {found}")]
    VersionConflict {
        /// The record the write targeted
        key: EntityId,
        /// The version the caller observed
        expected: Version,
        /// The version actually stored
        found: Version,
    },

    /// The underlying engine failed for reasons unrelated to versioning
    ///
    /// Never produced for a version mismatch: callers may retry these with
    /// their own backoff policy without re-reading the record.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A registered write hook vetoed the operation before the write
    #[error("{op} rejected by hook '{hook}': {reason}")]
    HookRejected {
        /// The kind of write the hook rejected
        op: WriteOp,
        /// Name of the rejecting hook
        hook: String,
        /// The hook's reason
        reason: String,
    },
}

impl Error {
    /// Build a hook rejection error
    ///
    /// Convenience for hook implementations vetoing a write.
    pub fn hook_rejected(op: WriteOp, hook: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::HookRejected {
            op,
            hook: hook.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a version conflict
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Error::VersionConflict { .. })
    }

    /// Check if this is a missing-record error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is a backend failure
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Error::BackendUnavailable(_))
    }
}
