//! Core types and traits for verstore
//!
//! This crate defines the foundational types used throughout the system:
//! - EntityId: Stable identifier for a stored record
//! - Version: Monotonically increasing row-version counter
//! - Value: Unified value enum for record payloads
//! - Record: Payload + version snapshot, timestamped
//! - WriteContext / ActorId: Request-scoped actor attribution
//! - Error: Error type hierarchy
//! - VersionBackend: Conditional-write abstraction over a persistence engine

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod context;
pub mod error;
pub mod record;
pub mod types;
pub mod value;

// Re-export commonly used types and traits
pub use backend::{CommitOutcome, VersionBackend};
pub use context::{ActorId, WriteContext};
pub use error::{Error, Result};
pub use record::Record;
pub use types::{EntityId, Version, WriteOp};
pub use value::Value;
