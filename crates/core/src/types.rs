//! Core identifier types for verstore
//!
//! This module defines the foundational types:
//! - EntityId: Stable identifier for a stored record
//! - Version: Monotonically increasing row-version counter
//! - WriteOp: Discriminates the kind of write an operation performs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a stored record
///
/// An EntityId is a wrapper around a string key. Callers choose the
/// identifier scheme (e.g. "order-1", "user:42"); the store only requires
/// that identifiers are stable and unique within one store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new EntityId from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonically increasing row-version counter
///
/// A Version starts at 1 when a record is created and increases by exactly
/// 1 on every successful conditional write. It is the conflict-detection
/// token for optimistic concurrency: a write carrying a stale version is
/// rejected without mutating the record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version(u64);

impl Version {
    /// The version assigned to a freshly created record
    pub const FIRST: Version = Version(1);

    /// Create a Version from a raw counter value
    ///
    /// Mostly useful in tests and backend implementations; callers normally
    /// only pass back versions previously returned by the store.
    pub fn new(v: u64) -> Self {
        Self(v)
    }

    /// Get the raw counter value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The version after one successful write
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of write an operation performs
///
/// Used to key hook dispatch and error reporting: hooks receive the
/// operation kind so one hook can behave differently for inserts, updates
/// and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WriteOp {
    /// A record is being created (version will be 1)
    Insert,
    /// An existing record's payload is being replaced (version will bump)
    Update,
    /// A record is being removed
    Delete,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WriteOp::Insert => "insert",
            WriteOp::Update => "update",
            WriteOp::Delete => "delete",
        };
        write!(f, "{}", s)
    }
}
