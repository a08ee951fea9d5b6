//! Versioned record snapshots
//!
//! A `Record` couples a payload with the row version that was current when
//! the payload was written. The two always travel together: any read that
//! observes a version observes exactly the payload written at that version.

use crate::types::Version;
use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A payload snapshot at a specific row version
///
/// Records returned by the store are owned clones. Holding one does not
/// alias internal storage, so later writes never retroactively change what
/// a reader already observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The application payload as of `version`
    pub payload: Value,
    /// The row version this payload was written at
    pub version: Version,
    /// When the record was first created
    pub created_at: DateTime<Utc>,
    /// When the payload was last replaced
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Create a fresh record at `Version::FIRST`
    pub fn new(payload: Value) -> Self {
        let now = Utc::now();
        Self {
            payload,
            version: Version::FIRST,
            created_at: now,
            updated_at: now,
        }
    }

    /// The successor record after one successful conditional write
    ///
    /// Keeps the creation timestamp, bumps the version by exactly 1 and
    /// refreshes `updated_at`. Used by backends to build the committed
    /// state; the predecessor is left untouched.
    pub fn updated(&self, payload: Value) -> Self {
        Self {
            payload,
            version: self.version.next(),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_starts_at_version_one() {
        let r = Record::new(Value::from("created"));
        assert_eq!(r.version, Version::FIRST);
        assert_eq!(r.payload, Value::from("created"));
        assert_eq!(r.created_at, r.updated_at);
    }

    #[test]
    fn test_updated_bumps_version_and_keeps_created_at() {
        let r = Record::new(Value::from("created"));
        let r2 = r.updated(Value::from("paid"));

        assert_eq!(r2.version, Version::new(2));
        assert_eq!(r2.payload, Value::from("paid"));
        assert_eq!(r2.created_at, r.created_at);
        assert!(r2.updated_at >= r.updated_at);

        // predecessor untouched
        assert_eq!(r.version, Version::FIRST);
        assert_eq!(r.payload, Value::from("created"));
    }

    #[test]
    fn test_repeated_updates_increment_by_one() {
        let mut r = Record::new(Value::Int(0));
        for i in 1..=5 {
            r = r.updated(Value::Int(i));
        }
        assert_eq!(r.version.as_u64(), 6);
        assert_eq!(r.payload, Value::Int(5));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn version_after_n_updates_is_one_plus_n(n in 0usize..64, payloads in proptest::collection::vec(any::<i64>(), 64)) {
                let mut r = Record::new(Value::Null);
                for i in 0..n {
                    r = r.updated(Value::Int(payloads[i]));
                }
                prop_assert_eq!(r.version.as_u64(), 1 + n as u64);
                if n > 0 {
                    prop_assert_eq!(&r.payload, &Value::Int(payloads[n - 1]));
                }
            }
        }
    }
}
