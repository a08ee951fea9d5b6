//! Request-scoped write attribution
//!
//! A `WriteContext` carries the identity of the actor performing a write.
//! It is passed explicitly through the call chain (no global mutable state)
//! and is read only by registered write hooks, so call sites that do not
//! care about attribution pass `WriteContext::anonymous()` and move on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the actor performing a write
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    /// Create a new ActorId from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ActorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request-scoped context for a single write operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteContext {
    actor: Option<ActorId>,
}

impl WriteContext {
    /// A context with no actor attached
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A context attributing the write to `actor`
    pub fn for_actor(actor: impl Into<ActorId>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }

    /// The actor this write is attributed to, if any
    pub fn actor(&self) -> Option<&ActorId> {
        self.actor.as_ref()
    }
}
