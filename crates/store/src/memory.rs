//! MemoryBackend: default in-memory backend with per-key atomicity
//!
//! This module implements the VersionBackend trait using:
//! - `DashMap<EntityId, Record>` for sharded, concurrently accessible
//!   record storage
//! - the entry API for the compare-and-bump critical section
//!
//! # Design Notes
//!
//! - **Per-key exclusion only**: the version comparison and the mutation
//!   run while holding the entry's shard lock, so no other write on the
//!   same key can interleave. Keys on different shards never contend.
//! - **Snapshot reads**: `fetch` clones the record before releasing the
//!   shard lock; callers never hold references into the map.
//! - **Full erasure on delete**: no tombstones. A deleted key reports
//!   `Missing` to every later conditional write.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use verstore_core::{CommitOutcome, EntityId, Record, Result, Value, Version, VersionBackend};

/// In-memory record storage with sharded per-key locking
///
/// The default backend for `VersionedStore`. All four trait operations are
/// atomic per key through DashMap's shard locks.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: DashMap<EntityId, Record>,
}

impl MemoryBackend {
    /// Create a new empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the backend holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl VersionBackend for MemoryBackend {
    fn fetch(&self, key: &EntityId) -> Result<Option<Record>> {
        Ok(self.records.get(key).map(|r| r.value().clone()))
    }

    fn create(&self, key: EntityId, payload: Value) -> Result<CommitOutcome> {
        match self.records.entry(key) {
            Entry::Occupied(occupied) => Ok(CommitOutcome::KeyExists {
                version: occupied.get().version,
            }),
            Entry::Vacant(vacant) => {
                let record = Record::new(payload);
                let version = record.version;
                vacant.insert(record);
                Ok(CommitOutcome::Applied(version))
            }
        }
    }

    fn update_if(
        &self,
        key: &EntityId,
        expected: Version,
        payload: Value,
    ) -> Result<CommitOutcome> {
        // Entry holds the shard lock across compare and replace
        match self.records.entry(key.clone()) {
            Entry::Vacant(_) => Ok(CommitOutcome::Missing),
            Entry::Occupied(mut occupied) => {
                let current = occupied.get();
                if current.version != expected {
                    return Ok(CommitOutcome::StaleVersion {
                        found: current.version,
                    });
                }
                let next = current.updated(payload);
                let version = next.version;
                occupied.insert(next);
                Ok(CommitOutcome::Applied(version))
            }
        }
    }

    fn remove_if(&self, key: &EntityId, expected: Version) -> Result<CommitOutcome> {
        match self.records.entry(key.clone()) {
            Entry::Vacant(_) => Ok(CommitOutcome::Missing),
            Entry::Occupied(occupied) => {
                let current = occupied.get();
                if current.version != expected {
                    return Ok(CommitOutcome::StaleVersion {
                        found: current.version,
                    });
                }
                let version = current.version;
                occupied.remove();
                Ok(CommitOutcome::Applied(version))
            }
        }
    }
}
