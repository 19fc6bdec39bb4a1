//! Property-Based Tests for the Command Module
//!
//! Drives the dispatcher with random command sequences and checks it against
//! a plain in-memory model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use tokio_test::block_on;

use crate::cache::Store;
use crate::command::{Dispatcher, OK};
use crate::error::KvError;

// == Strategies ==
/// Small key alphabet so sequences revisit the same keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-c]".prop_map(|s| s)
}

/// Queue-safe tokens: non-empty, no whitespace
fn token_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,12}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum KvOp {
    Set { key: String, value: String },
    Get { key: String },
    QPush { key: String, values: Vec<String> },
    QPop { key: String },
}

impl KvOp {
    fn command(&self) -> String {
        match self {
            KvOp::Set { key, value } => format!("SET {} {}", key, value),
            KvOp::Get { key } => format!("GET {}", key),
            KvOp::QPush { key, values } => format!("QPUSH {} {}", key, values.join(" ")),
            KvOp::QPop { key } => format!("QPOP {}", key),
        }
    }

    /// Expected reply according to a map of key -> queue tokens.
    fn apply(&self, model: &mut HashMap<String, Vec<String>>) -> Result<String, KvError> {
        match self {
            KvOp::Set { key, value } => {
                model.insert(key.clone(), vec![value.clone()]);
                Ok(OK.to_string())
            }
            KvOp::Get { key } => model
                .get(key)
                .map(|tokens| tokens.join(" "))
                .ok_or(KvError::KeyMissing),
            KvOp::QPush { key, values } => {
                model.entry(key.clone()).or_default().extend(values.iter().cloned());
                Ok(OK.to_string())
            }
            KvOp::QPop { key } => {
                let tokens = model.get_mut(key).ok_or(KvError::EmptyQueue)?;
                let popped = tokens.pop().ok_or(KvError::EmptyQueue)?;
                if tokens.is_empty() {
                    model.remove(key);
                }
                Ok(popped)
            }
        }
    }
}

fn kv_op_strategy() -> impl Strategy<Value = KvOp> {
    prop_oneof![
        (key_strategy(), token_strategy()).prop_map(|(key, value)| KvOp::Set { key, value }),
        key_strategy().prop_map(|key| KvOp::Get { key }),
        (key_strategy(), prop::collection::vec(token_strategy(), 1..5))
            .prop_map(|(key, values)| KvOp::QPush { key, values }),
        key_strategy().prop_map(|key| KvOp::QPop { key }),
    ]
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(Store::new()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Every reply matches the model, and no key ever maps to an empty value.
    #[test]
    fn prop_dispatcher_matches_model(ops in prop::collection::vec(kv_op_strategy(), 1..60)) {
        let kv = dispatcher();
        let mut model = HashMap::new();

        for op in ops {
            let expected = op.apply(&mut model);
            let actual = block_on(kv.process(&op.command()));
            prop_assert_eq!(&actual, &expected, "Reply mismatch for {:?}", op);

            let keyspace = block_on(kv.store().read());
            prop_assert_eq!(keyspace.len(), model.len(), "Key count mismatch");
            for key in model.keys() {
                let record = keyspace.get(key);
                prop_assert!(record.is_some_and(|r| !r.value.is_empty()), "Key '{}' empty or missing", key);
            }
        }
    }

    #[test]
    fn prop_set_get_round_trip(key in token_strategy(), value in token_strategy()) {
        let kv = dispatcher();

        prop_assert_eq!(block_on(kv.process(&format!("SET {} {}", key, value))), Ok(OK.to_string()));
        prop_assert_eq!(block_on(kv.process(&format!("GET {}", key))), Ok(value));
    }

    #[test]
    fn prop_queue_drains_in_reverse(key in token_strategy(), values in prop::collection::vec(token_strategy(), 1..20)) {
        let kv = dispatcher();

        block_on(kv.qpush(&key, &values)).unwrap();

        for expected in values.iter().rev() {
            prop_assert_eq!(&block_on(kv.qpop(&key)).unwrap(), expected);
        }
        prop_assert_eq!(block_on(kv.qpop(&key)), Err(KvError::EmptyQueue));
        prop_assert!(block_on(kv.store().is_empty()));
    }

    #[test]
    fn prop_nx_never_overwrites(key in token_strategy(), first in token_strategy(), second in token_strategy()) {
        let kv = dispatcher();

        block_on(kv.process(&format!("SET {} {} NX", key, first))).unwrap();
        prop_assert_eq!(
            block_on(kv.process(&format!("SET {} {} NX", key, second))),
            Err(KvError::KeyExists)
        );
        prop_assert_eq!(block_on(kv.process(&format!("GET {}", key))), Ok(first));
    }

    #[test]
    fn prop_xx_never_creates(key in token_strategy(), value in token_strategy()) {
        let kv = dispatcher();

        prop_assert_eq!(
            block_on(kv.process(&format!("SET {} {} XX", key, value))),
            Err(KvError::KeyMissing)
        );
        prop_assert!(!block_on(kv.store().read()).exists(&key));
    }
}
