//! Backend abstraction for conditional writes
//!
//! The store is layered over a persistence engine through the
//! `VersionBackend` trait. An engine qualifies if it can:
//! - fetch a record and its version atomically,
//! - perform a write conditioned on the version being unchanged, as one
//!   engine-native atomic step,
//! - report "row exists but version is stale" and "row absent" distinctly
//!   from engine failure, so the layer above can tell `VersionConflict`
//!   and `NotFound` apart from `BackendUnavailable`.
//!
//! The in-memory backend lives in `verstore-store`; a SQL engine would
//! satisfy the same contract with `UPDATE ... WHERE version = ?` and a
//! rows-affected check.

use crate::error::Result;
use crate::record::Record;
use crate::types::{EntityId, Version};
use crate::value::Value;

/// Outcome of a conditional write at the backend
///
/// Distinguishes the three non-error results of a conditional statement so
/// callers never have to infer "why were zero rows affected". Engine
/// failures are not outcomes; they surface as `Err(BackendUnavailable)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The write committed; the record is now at this version
    Applied(Version),
    /// Create refused: the key is already present at this version
    KeyExists {
        /// Version of the record occupying the key
        version: Version,
    },
    /// The row exists but its version no longer matches the expectation
    StaleVersion {
        /// The version actually stored
        found: Version,
    },
    /// The row is absent (never created, or deleted since the read)
    Missing,
}

/// Conditional-write abstraction over a persistence engine
///
/// Each method must be atomic with respect to all other operations on the
/// same key: no other write may interleave between the version comparison
/// and the mutation. Operations on different keys must not serialize
/// against each other beyond what the engine itself requires.
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait VersionBackend: Send + Sync {
    /// Fetch the current record for a key as an owned snapshot
    ///
    /// Payload and version are read together atomically. Returns None if
    /// the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the engine call fails.
    fn fetch(&self, key: &EntityId) -> Result<Option<Record>>;

    /// Create a record at `Version::FIRST` if the key is absent
    ///
    /// Returns `KeyExists` if the key is already occupied; the stored
    /// record is not touched in that case.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the engine call fails.
    fn create(&self, key: EntityId, payload: Value) -> Result<CommitOutcome>;

    /// Replace the payload if the stored version equals `expected`
    ///
    /// On success the version advances by exactly 1 and `Applied` carries
    /// the new version. On `StaleVersion` or `Missing` the stored record
    /// is completely unchanged.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the engine call fails.
    fn update_if(&self, key: &EntityId, expected: Version, payload: Value)
        -> Result<CommitOutcome>;

    /// Remove the record if the stored version equals `expected`
    ///
    /// After `Applied`, the key is unresolvable: later fetches return None
    /// and later conditional writes report `Missing`.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the engine call fails.
    fn remove_if(&self, key: &EntityId, expected: Version) -> Result<CommitOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// A minimal single-lock backend for testing the trait contract.
    struct MockBackend {
        records: Mutex<HashMap<EntityId, Record>>,
    }

    impl MockBackend {
        fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
            }
        }
    }

    impl VersionBackend for MockBackend {
        fn fetch(&self, key: &EntityId) -> Result<Option<Record>> {
            Ok(self.records.lock().unwrap().get(key).cloned())
        }

        fn create(&self, key: EntityId, payload: Value) -> Result<CommitOutcome> {
            let mut records = self.records.lock().unwrap();
            if let Some(existing) = records.get(&key) {
                return Ok(CommitOutcome::KeyExists {
                    version: existing.version,
                });
            }
            let record = Record::new(payload);
            let version = record.version;
            records.insert(key, record);
            Ok(CommitOutcome::Applied(version))
        }

        fn update_if(
            &self,
            key: &EntityId,
            expected: Version,
            payload: Value,
        ) -> Result<CommitOutcome> {
            let mut records = self.records.lock().unwrap();
            let Some(current) = records.get(key) else {
                return Ok(CommitOutcome::Missing);
            };
            if current.version != expected {
                return Ok(CommitOutcome::StaleVersion {
                    found: current.version,
                });
            }
            let next = current.updated(payload);
            let version = next.version;
            records.insert(key.clone(), next);
            Ok(CommitOutcome::Applied(version))
        }

        fn remove_if(&self, key: &EntityId, expected: Version) -> Result<CommitOutcome> {
            let mut records = self.records.lock().unwrap();
            let Some(current) = records.get(key) else {
                return Ok(CommitOutcome::Missing);
            };
            if current.version != expected {
                return Ok(CommitOutcome::StaleVersion {
                    found: current.version,
                });
            }
            let version = current.version;
            records.remove(key);
            Ok(CommitOutcome::Applied(version))
        }
    }

    /// A backend that always fails, for error propagation tests.
    struct FailingBackend;

    impl VersionBackend for FailingBackend {
        fn fetch(&self, _: &EntityId) -> Result<Option<Record>> {
            Err(Error::BackendUnavailable("disk read failed".into()))
        }
        fn create(&self, _: EntityId, _: Value) -> Result<CommitOutcome> {
            Err(Error::BackendUnavailable("disk write failed".into()))
        }
        fn update_if(&self, _: &EntityId, _: Version, _: Value) -> Result<CommitOutcome> {
            Err(Error::BackendUnavailable("disk write failed".into()))
        }
        fn remove_if(&self, _: &EntityId, _: Version) -> Result<CommitOutcome> {
            Err(Error::BackendUnavailable("disk write failed".into()))
        }
    }

    #[test]
    fn backend_is_object_safe_and_send_sync() {
        fn accepts_backend(_: &dyn VersionBackend) {}
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        let _ = accepts_backend as fn(&dyn VersionBackend);
        assert_send::<Box<dyn VersionBackend>>();
        assert_sync::<Box<dyn VersionBackend>>();
    }

    #[test]
    fn backend_fetch_nonexistent_returns_none() {
        let backend = MockBackend::new();
        assert!(backend.fetch(&EntityId::from("missing")).unwrap().is_none());
    }

    #[test]
    fn backend_create_then_fetch_returns_version_one() {
        let backend = MockBackend::new();
        let key = EntityId::from("order-1");

        let outcome = backend.create(key.clone(), Value::from("created")).unwrap();
        assert_eq!(outcome, CommitOutcome::Applied(Version::FIRST));

        let record = backend.fetch(&key).unwrap().unwrap();
        assert_eq!(record.version, Version::FIRST);
        assert_eq!(record.payload, Value::from("created"));
    }

    #[test]
    fn backend_create_on_occupied_key_reports_key_exists() {
        let backend = MockBackend::new();
        let key = EntityId::from("order-1");
        backend.create(key.clone(), Value::Int(1)).unwrap();

        let outcome = backend.create(key.clone(), Value::Int(2)).unwrap();
        assert_eq!(
            outcome,
            CommitOutcome::KeyExists {
                version: Version::FIRST
            }
        );

        // first payload survives
        let record = backend.fetch(&key).unwrap().unwrap();
        assert_eq!(record.payload, Value::Int(1));
    }

    #[test]
    fn backend_update_if_applies_on_matching_version() {
        let backend = MockBackend::new();
        let key = EntityId::from("order-1");
        backend.create(key.clone(), Value::from("created")).unwrap();

        let outcome = backend
            .update_if(&key, Version::FIRST, Value::from("paid"))
            .unwrap();
        assert_eq!(outcome, CommitOutcome::Applied(Version::new(2)));
    }

    #[test]
    fn backend_update_if_reports_stale_without_mutation() {
        let backend = MockBackend::new();
        let key = EntityId::from("order-1");
        backend.create(key.clone(), Value::from("created")).unwrap();
        backend
            .update_if(&key, Version::FIRST, Value::from("paid"))
            .unwrap();

        let outcome = backend
            .update_if(&key, Version::FIRST, Value::from("cancelled"))
            .unwrap();
        assert_eq!(
            outcome,
            CommitOutcome::StaleVersion {
                found: Version::new(2)
            }
        );

        let record = backend.fetch(&key).unwrap().unwrap();
        assert_eq!(record.payload, Value::from("paid"));
        assert_eq!(record.version, Version::new(2));
    }

    #[test]
    fn backend_update_if_on_absent_key_reports_missing() {
        let backend = MockBackend::new();
        let outcome = backend
            .update_if(&EntityId::from("ghost"), Version::FIRST, Value::Null)
            .unwrap();
        assert_eq!(outcome, CommitOutcome::Missing);
    }

    #[test]
    fn backend_remove_if_makes_key_unresolvable() {
        let backend = MockBackend::new();
        let key = EntityId::from("order-1");
        backend.create(key.clone(), Value::Int(1)).unwrap();

        let outcome = backend.remove_if(&key, Version::FIRST).unwrap();
        assert_eq!(outcome, CommitOutcome::Applied(Version::FIRST));

        assert!(backend.fetch(&key).unwrap().is_none());
        assert_eq!(
            backend.update_if(&key, Version::FIRST, Value::Null).unwrap(),
            CommitOutcome::Missing
        );
    }

    #[test]
    fn backend_errors_propagate_through_trait_object() {
        let backend: Box<dyn VersionBackend> = Box::new(FailingBackend);
        let key = EntityId::from("k");

        assert!(backend.fetch(&key).is_err());
        assert!(backend.create(key.clone(), Value::Null).is_err());
        assert!(backend.update_if(&key, Version::FIRST, Value::Null).is_err());
        assert!(backend.remove_if(&key, Version::FIRST).is_err());
    }

    #[test]
    fn backend_failures_are_backend_unavailable() {
        let backend = FailingBackend;
        let key = EntityId::from("k");

        let err = backend.fetch(&key).unwrap_err();
        assert!(err.is_backend_unavailable());
        assert!(!err.is_version_conflict());
    }
}
