//! verstore - row-version optimistic concurrency control
//!
//! verstore is a small embedded library that prevents lost updates without
//! row locks: every record carries a monotonically increasing version, and
//! writes succeed only if the version the caller observed is still the
//! version stored. The conflict window between a read and its conditional
//! write is intentionally left open; a write that loses the race fails
//! with `VersionConflict` and the caller decides whether to re-read,
//! recompute and retry.
//!
//! # Quick Start
//!
//! ```
//! use verstore::{Value, VersionedStore, WriteContext};
//!
//! let store = VersionedStore::in_memory();
//! let ctx = WriteContext::for_actor("svc-orders");
//!
//! // Create -> version 1
//! let v1 = store.insert(&ctx, "order-1", Value::object([("status", Value::from("created"))]))?;
//!
//! // Read the snapshot this caller will write against
//! let record = store.get("order-1")?;
//!
//! // Conditional write: succeeds only while version 1 is still current
//! let v2 = store.conditional_update(&ctx, "order-1", record.version,
//!     Value::object([("status", Value::from("paid"))]))?;
//! assert_eq!(v2.as_u64(), 2);
//! # Ok::<(), verstore::Error>(())
//! ```
//!
//! # Architecture
//!
//! The public surface is the four operations on [`VersionedStore`]
//! (insert, get, conditional_update, delete) plus pre-commit [`WriteHook`]s
//! and the opt-in [`RetryPolicy`] loop. Storage goes through the
//! [`VersionBackend`] trait; [`MemoryBackend`] is the default, and any
//! engine with an atomic "write if version unchanged" primitive can be
//! slotted in behind the same trait.

// Re-export the public API from verstore-store
pub use verstore_store::*;
