//! Caller-driven retry for conditional updates
//!
//! The store itself never retries: a `VersionConflict` goes straight back
//! to the caller, because only the caller knows whether re-applying its
//! intended change is still correct against the record another writer just
//! produced. This module packages the standard caller-side loop - re-read,
//! recompute, re-attempt - for callers whose closure IS that decision.
//!
//! ## Purity Requirement
//!
//! The closure passed to `update_with` may be called multiple times, once
//! per attempt, each time against a freshly read record. It must be a pure
//! function of its input: no I/O, no external mutation, no irreversible
//! effects.
//!
//! Only `VersionConflict` is retried. `BackendUnavailable` propagates
//! immediately so callers can apply a separate backoff policy; every other
//! error propagates on first occurrence.

use std::thread;
use std::time::Duration;

use tracing::trace;
use verstore_core::{EntityId, Error, Record, Result, Value, Version, WriteContext};

use crate::store::VersionedStore;

/// Retry policy for conflict-driven re-attempts
///
/// Exponential backoff: attempt `n` sleeps `base_delay_ms << n`
/// milliseconds, capped at `max_delay_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (0 = single attempt, no retries)
    pub max_retries: usize,
    /// Base delay between retries in milliseconds (exponential backoff)
    pub base_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 16,
            base_delay_ms: 1,
            max_delay_ms: 50,
        }
    }
}

impl RetryPolicy {
    /// Create a RetryPolicy with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a RetryPolicy with no retries
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Set maximum number of retries
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set base delay for exponential backoff
    pub fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    /// Set maximum delay between retries
    pub fn with_max_delay_ms(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// Backoff delay before retry attempt `attempt` (0-based)
    fn delay_for(&self, attempt: usize) -> Duration {
        let exp = self
            .base_delay_ms
            .saturating_mul(1u64.checked_shl(attempt as u32).unwrap_or(u64::MAX));
        Duration::from_millis(exp.min(self.max_delay_ms))
    }
}

impl VersionedStore {
    /// Read-recompute-write loop with retry on version conflict
    ///
    /// Reads the current record, applies `f` to compute the replacement
    /// payload plus a caller result, and attempts a conditional update
    /// from the version just read. On `VersionConflict` the whole cycle
    /// repeats against the winner's record, up to `policy.max_retries`
    /// times with exponential backoff; the last conflict is returned if
    /// the budget runs out.
    ///
    /// Returns `(caller_result, committed_version)` from the attempt that
    /// won.
    ///
    /// ## Example
    ///
    /// ```
    /// use verstore_store::{RetryPolicy, Value, VersionedStore, WriteContext};
    ///
    /// let store = VersionedStore::in_memory();
    /// let ctx = WriteContext::anonymous();
    /// store.insert(&ctx, "counter", Value::Int(0))?;
    ///
    /// let (new_total, version) = store.update_with(&ctx, "counter", RetryPolicy::default(), |record| {
    ///     let current = record.payload.as_int().unwrap_or(0);
    ///     Ok((Value::Int(current + 1), current + 1))
    /// })?;
    /// assert_eq!(new_total, 1);
    /// assert_eq!(version.as_u64(), 2);
    /// # Ok::<(), verstore_store::Error>(())
    /// ```
    pub fn update_with<F, T>(
        &self,
        ctx: &WriteContext,
        key: impl Into<EntityId>,
        policy: RetryPolicy,
        f: F,
    ) -> Result<(T, Version)>
    where
        F: Fn(&Record) -> Result<(Value, T)>,
    {
        let key = key.into();
        let mut attempt = 0;

        loop {
            let current = self.get(key.clone())?;
            let (payload, result) = f(&current)?;

            match self.conditional_update(ctx, key.clone(), current.version, payload) {
                Ok(version) => return Ok((result, version)),
                Err(conflict @ Error::VersionConflict { .. }) => {
                    if attempt >= policy.max_retries {
                        return Err(conflict);
                    }
                    trace!(%key, attempt, "retrying after version conflict");
                    thread::sleep(policy.delay_for(attempt));
                    attempt += 1;
                }
                Err(other) => return Err(other),
            }
        }
    }
}
