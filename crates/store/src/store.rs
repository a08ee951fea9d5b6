//! VersionedStore: optimistic conditional writes over a keyed backend
//!
//! The store owns record storage exclusively (through its backend) and
//! exposes exactly four operations: insert, get, conditional_update and
//! delete. Reads return detached snapshots; writes are conditioned on the
//! caller's observed version.
//!
//! # What this store deliberately does not do
//!
//! - **No upsert.** An update on a missing row is `NotFound`, never a
//!   silent insert. A save path that falls back to INSERT when zero rows
//!   are affected would bypass the version check entirely.
//! - **No internal retry.** A `VersionConflict` is returned to the caller,
//!   who alone knows whether re-applying the intended change is safe. The
//!   opt-in retry loop lives in [`crate::retry`].
//! - **No row locks across think-time.** The window between `get` and the
//!   matching conditional write is unbounded; conflicts are detected at
//!   write time only.

use std::sync::Arc;

use tracing::{debug, warn};
use verstore_core::{
    CommitOutcome, EntityId, Error, Record, Result, Value, Version, VersionBackend, WriteContext,
    WriteOp,
};

use crate::hooks::WriteHook;
use crate::memory::MemoryBackend;

/// Versioned record store with optimistic concurrency control
///
/// Cloning is cheap; clones share the same backend and hook chain.
///
/// # Example
///
/// ```
/// use verstore_store::{Value, VersionedStore, WriteContext};
///
/// let store = VersionedStore::in_memory();
/// let ctx = WriteContext::anonymous();
///
/// let v1 = store.insert(&ctx, "order-1", Value::object([("status", Value::from("created"))]))?;
/// let record = store.get("order-1")?;
/// let v2 = store.conditional_update(&ctx, "order-1", record.version,
///     Value::object([("status", Value::from("paid"))]))?;
/// assert!(v1 < v2);
/// # Ok::<(), verstore_store::Error>(())
/// ```
#[derive(Clone)]
pub struct VersionedStore {
    backend: Arc<dyn VersionBackend>,
    hooks: Arc<[Box<dyn WriteHook>]>,
}

impl VersionedStore {
    /// Create a store over the default in-memory backend, with no hooks
    pub fn in_memory() -> Self {
        Self::builder().build()
    }

    /// Create a store over a caller-supplied backend, with no hooks
    pub fn with_backend(backend: Arc<dyn VersionBackend>) -> Self {
        Self::builder().backend(backend).build()
    }

    /// Start building a store with hooks and a custom backend
    pub fn builder() -> VersionedStoreBuilder {
        VersionedStoreBuilder::new()
    }

    /// Create a record at version 1
    ///
    /// Fails with `AlreadyExists` if the key is present. Hooks run first
    /// and may transform the payload or veto the insert.
    pub fn insert(
        &self,
        ctx: &WriteContext,
        key: impl Into<EntityId>,
        payload: Value,
    ) -> Result<Version> {
        let key = key.into();
        let mut payload = payload;
        self.run_hooks(WriteOp::Insert, ctx, &mut payload)?;

        match self.backend.create(key.clone(), payload)? {
            CommitOutcome::Applied(version) => {
                debug!(%key, %version, "record created");
                Ok(version)
            }
            CommitOutcome::KeyExists { .. } => Err(Error::AlreadyExists(key)),
            outcome => Err(backend_contract_violation(WriteOp::Insert, &key, &outcome)),
        }
    }

    /// Read the current record as an owned snapshot
    ///
    /// Fails with `NotFound` if the key is absent. The returned record is
    /// never aliased to internal storage: later writes cannot change what
    /// this read observed. Reads take no lock a writer would wait on.
    pub fn get(&self, key: impl Into<EntityId>) -> Result<Record> {
        let key = key.into();
        self.backend
            .fetch(&key)?
            .ok_or(Error::NotFound(key))
    }

    /// Replace the payload, conditioned on the observed version
    ///
    /// `expected` must be the version most recently returned to this
    /// caller by `get` or a prior successful write. On a match the payload
    /// is replaced and the new version (exactly `expected + 1`) returned;
    /// on a mismatch nothing is mutated and `VersionConflict` reports the
    /// version actually stored. The compare-and-replace is atomic per key.
    pub fn conditional_update(
        &self,
        ctx: &WriteContext,
        key: impl Into<EntityId>,
        expected: Version,
        payload: Value,
    ) -> Result<Version> {
        let key = key.into();
        let mut payload = payload;
        self.run_hooks(WriteOp::Update, ctx, &mut payload)?;

        match self.backend.update_if(&key, expected, payload)? {
            CommitOutcome::Applied(version) => {
                debug!(%key, %version, "record updated");
                Ok(version)
            }
            CommitOutcome::Missing => Err(Error::NotFound(key)),
            CommitOutcome::StaleVersion { found } => {
                warn!(%key, %expected, %found, "conditional update lost the race");
                Err(Error::VersionConflict {
                    key,
                    expected,
                    found,
                })
            }
            outcome => Err(backend_contract_violation(WriteOp::Update, &key, &outcome)),
        }
    }

    /// Remove the record, conditioned on the observed version
    ///
    /// Same version discipline and error surface as `conditional_update`.
    /// After success the key is unresolvable: `get` and every later
    /// conditional write fail with `NotFound`, never a silent no-op.
    pub fn delete(
        &self,
        ctx: &WriteContext,
        key: impl Into<EntityId>,
        expected: Version,
    ) -> Result<()> {
        let key = key.into();
        // Delete writes nothing; hooks get a Null candidate and are veto-only.
        let mut candidate = Value::Null;
        self.run_hooks(WriteOp::Delete, ctx, &mut candidate)?;

        match self.backend.remove_if(&key, expected)? {
            CommitOutcome::Applied(version) => {
                debug!(%key, %version, "record deleted");
                Ok(())
            }
            CommitOutcome::Missing => Err(Error::NotFound(key)),
            CommitOutcome::StaleVersion { found } => {
                warn!(%key, %expected, %found, "conditional delete lost the race");
                Err(Error::VersionConflict {
                    key,
                    expected,
                    found,
                })
            }
            outcome => Err(backend_contract_violation(WriteOp::Delete, &key, &outcome)),
        }
    }

    fn run_hooks(&self, op: WriteOp, ctx: &WriteContext, payload: &mut Value) -> Result<()> {
        for hook in self.hooks.iter() {
            hook.before_write(op, ctx, payload).map_err(|err| match err {
                rejected @ Error::HookRejected { .. } => rejected,
                other => Error::hook_rejected(op, hook.name(), other.to_string()),
            })?;
        }
        Ok(())
    }
}

/// A backend outcome that cannot arise from the requested operation
///
/// Seen only with a misbehaving external backend (e.g. `KeyExists` from an
/// update). Reported as a backend failure, never as a version conflict.
fn backend_contract_violation(op: WriteOp, key: &EntityId, outcome: &CommitOutcome) -> Error {
    Error::BackendUnavailable(format!(
        "backend returned {outcome:?} for {op} on {key}"
    ))
}

/// Builder for [`VersionedStore`]
///
/// Hooks run in registration order on every write.
#[derive(Default)]
pub struct VersionedStoreBuilder {
    backend: Option<Arc<dyn VersionBackend>>,
    hooks: Vec<Box<dyn WriteHook>>,
}

impl VersionedStoreBuilder {
    /// Start with no backend (in-memory by default) and no hooks
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a caller-supplied backend instead of the in-memory default
    pub fn backend(mut self, backend: Arc<dyn VersionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Register a pre-commit hook
    pub fn hook(mut self, hook: impl WriteHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Build the store
    pub fn build(self) -> VersionedStore {
        VersionedStore {
            backend: self
                .backend
                .unwrap_or_else(|| Arc::new(MemoryBackend::new())),
            hooks: self.hooks.into(),
        }
    }
}
