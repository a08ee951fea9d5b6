//! Versioned record store with optimistic conditional writes
//!
//! This crate implements row-version optimistic concurrency control:
//! - VersionedStore: the four-operation public surface (insert, get,
//!   conditional_update, delete)
//! - MemoryBackend: default in-memory backend with per-key atomicity
//! - WriteHook / AuditHook: injectable pre-commit logic keyed to the
//!   operation kind
//! - RetryPolicy / update_with: caller-driven read-recompute-retry loop
//!
//! Conflict detection happens at write time only. `get` never locks, and
//! the window between a read and the matching conditional write is
//! unbounded and uncoordinated; a writer that loses the race gets
//! `VersionConflict` and decides for itself whether to retry.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod hooks;
pub mod memory;
pub mod retry;
pub mod store;

pub use hooks::{AuditHook, WriteHook};
pub use memory::MemoryBackend;
pub use retry::RetryPolicy;
pub use store::{VersionedStore, VersionedStoreBuilder};

// Re-export the core types the public API is expressed in
pub use verstore_core::{
    ActorId, CommitOutcome, EntityId, Error, Record, Result, Value, Version, VersionBackend,
    WriteContext, WriteOp,
};
