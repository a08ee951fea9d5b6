//! End-to-end lifecycle test through the facade crate
//!
//! Follows one order through create, a racing pair of status changes, the
//! caller-driven recovery from the conflict, audit stamping, and deletion.

use verstore::{
    AuditHook, Error, RetryPolicy, Value, Version, VersionedStore, WriteContext,
};

fn status_of(store: &VersionedStore, key: &str) -> String {
    store
        .get(key)
        .unwrap()
        .payload
        .get_field("status")
        .and_then(Value::as_str)
        .unwrap()
        .to_string()
}

#[test]
fn order_lifecycle_end_to_end() {
    let store = VersionedStore::builder().hook(AuditHook::new()).build();

    // -- create -------------------------------------------------------
    let clerk = WriteContext::for_actor("clerk-7");
    let v1 = store
        .insert(
            &clerk,
            "order-1",
            Value::object([
                ("status", Value::from("created")),
                ("amount", Value::Float(99.5)),
            ]),
        )
        .unwrap();
    assert_eq!(v1, Version::FIRST);
    assert_eq!(status_of(&store, "order-1"), "created");

    let record = store.get("order-1").unwrap();
    assert_eq!(
        record.payload.get_field("created_by").and_then(Value::as_str),
        Some("clerk-7")
    );

    // -- two writers act on the same observed version -----------------
    let billing = WriteContext::for_actor("svc-billing");
    let support = WriteContext::for_actor("svc-support");

    let mut paid = record.payload.clone();
    paid.set_field("status", Value::from("paid"));
    let v2 = store
        .conditional_update(&billing, "order-1", v1, paid)
        .unwrap();
    assert_eq!(v2.as_u64(), 2);

    let mut cancelled = record.payload.clone();
    cancelled.set_field("status", Value::from("cancelled"));
    let err = store
        .conditional_update(&support, "order-1", v1, cancelled.clone())
        .unwrap_err();
    assert!(matches!(err, Error::VersionConflict { expected, found, .. }
        if expected == v1 && found == v2));

    // the losing write left no trace
    assert_eq!(status_of(&store, "order-1"), "paid");
    assert_eq!(
        store
            .get("order-1")
            .unwrap()
            .payload
            .get_field("updated_by")
            .and_then(Value::as_str),
        Some("svc-billing")
    );

    // -- the loser recovers by re-reading and retrying ----------------
    let (_, v3) = store
        .update_with(&support, "order-1", RetryPolicy::default(), |current| {
            let mut next = current.payload.clone();
            next.set_field("status", Value::from("cancelled"));
            Ok((next, ()))
        })
        .unwrap();
    assert_eq!(v3.as_u64(), 3);
    assert_eq!(status_of(&store, "order-1"), "cancelled");

    // -- delete needs the current version too -------------------------
    assert!(store.delete(&support, "order-1", v2).unwrap_err().is_version_conflict());
    store.delete(&support, "order-1", v3).unwrap();
    assert!(store.get("order-1").unwrap_err().is_not_found());

    // a write still in flight against the deleted order fails loudly
    let err = store
        .conditional_update(&billing, "order-1", v3, cancelled)
        .unwrap_err();
    assert!(err.is_not_found());
}
