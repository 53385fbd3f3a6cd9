//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check slot semantics of the file store over arbitrary
//! keys and binary payloads.

use proptest::prelude::*;
use tempfile::tempdir;
use tokio::runtime::Runtime;

use crate::cache::FileStore;
use crate::error::StoreError;

// == Strategies ==
/// Generates keys that are valid single path segments
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,64}".prop_map(|s| s)
}

/// Generates arbitrary binary payloads
fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..4096)
}

#[derive(Debug, Clone)]
enum SlotOp {
    Write { key: String, payload: Vec<u8> },
    Delete { key: String },
}

/// Operations over a small key space so writes and deletes collide
fn slot_op_strategy() -> impl Strategy<Value = SlotOp> {
    let key = "[a-c]";
    prop_oneof![
        (key, payload_strategy()).prop_map(|(key, payload)| SlotOp::Write { key, payload }),
        key.prop_map(|key| SlotOp::Delete { key }),
    ]
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Writing a payload and reading it back returns the exact bytes.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), payload in payload_strategy()) {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let read = runtime().block_on(async {
            store.write(&key, &payload).await.unwrap();
            store.read(&key).await.unwrap()
        });
        prop_assert_eq!(&read[..], &payload[..]);
    }

    // A second write replaces the first completely, even when shorter.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        first in payload_strategy(),
        second in payload_strategy()
    ) {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let read = runtime().block_on(async {
            store.write(&key, &first).await.unwrap();
            store.write(&key, &second).await.unwrap();
            store.read(&key).await.unwrap()
        });
        prop_assert_eq!(&read[..], &second[..]);
    }

    // After any sequence of writes and deletes, each key's slot holds the last
    // written payload, or is absent if the last operation was a delete.
    #[test]
    fn prop_last_operation_wins(ops in prop::collection::vec(slot_op_strategy(), 1..30)) {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let mut model: std::collections::HashMap<String, Vec<u8>> = Default::default();

        let rt = runtime();
        for op in ops {
            match op {
                SlotOp::Write { key, payload } => {
                    rt.block_on(store.write(&key, &payload)).unwrap();
                    model.insert(key, payload);
                }
                SlotOp::Delete { key } => {
                    let result = rt.block_on(store.delete(&key));
                    match model.remove(&key) {
                        Some(_) => prop_assert!(result.is_ok()),
                        None => prop_assert!(matches!(result, Err(StoreError::NotFound(_)))),
                    }
                }
            }
        }

        for key in ["a", "b", "c"] {
            let result = rt.block_on(store.read(key));
            match model.get(key) {
                Some(expected) => prop_assert_eq!(&result.unwrap()[..], &expected[..]),
                None => prop_assert!(matches!(result, Err(StoreError::NotFound(_)))),
            }
        }
    }
}
