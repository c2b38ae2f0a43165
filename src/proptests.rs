use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::ArtTree;

/// Simple model implementation using BTreeMap for comparison
#[derive(Default)]
struct Model {
    map: BTreeMap<Vec<u8>, u64>,
}

impl Model {
    fn insert(&mut self, key: Vec<u8>, value: u64) -> Option<u64> {
        self.map.insert(key, value)
    }

    fn get(&self, key: &[u8]) -> Option<&u64> {
        self.map.get(key)
    }

    fn remove(&mut self, key: &[u8]) -> Option<u64> {
        self.map.remove(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Actions to test against both implementations
#[derive(Arbitrary, Debug, Clone)]
enum Action {
    Insert(KeyValue),
    Get(Key),
    Remove(Key),
}

/// Fixed-width keys: every key is the big-endian encoding of a 64-bit
/// value, so no key is a prefix of another. Narrow domains are
/// over-weighted to force dense nodes, key collisions and shrink
/// transitions.
#[derive(Debug, Clone)]
struct Key(Vec<u8>);

/// Wrapper for key-value pair
#[derive(Debug, Clone)]
struct KeyValue {
    key: Key,
    value: u64,
}

impl Arbitrary for Key {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            any::<u8>().prop_map(|v| Key(u64::from(v).to_be_bytes().to_vec())),
            any::<u16>().prop_map(|v| Key(u64::from(v).to_be_bytes().to_vec())),
            any::<u64>().prop_map(|v| Key(v.to_be_bytes().to_vec())),
        ]
        .boxed()
    }
}

impl Arbitrary for KeyValue {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<Key>(), any::<u64>())
            .prop_map(|(key, value)| KeyValue { key, value })
            .boxed()
    }
}

/// Test harness that executes actions on both ArtTree and Model
#[derive(Default)]
struct Test {
    tree: ArtTree<u64>,
    model: Model,
}

impl Test {
    fn execute(&mut self, action: Action) {
        match action {
            Action::Insert(kv) => {
                let key = kv.key.0.clone();
                let tree_result = self.tree.insert(&key, kv.value);
                let model_result = self.model.insert(key.clone(), kv.value);
                assert_eq!(
                    tree_result, model_result,
                    "Insert mismatch: key={:?}, tree_result={:?}, model_result={:?}",
                    key, tree_result, model_result
                );
            }
            Action::Get(key) => {
                let key_bytes = key.0;
                let tree_result = self.tree.get(&key_bytes);
                let model_result = self.model.get(&key_bytes);
                assert_eq!(
                    tree_result, model_result,
                    "Get mismatch: key={:?}, tree_result={:?}, model_result={:?}",
                    key_bytes, tree_result, model_result
                );
            }
            Action::Remove(key) => {
                let key_bytes = key.0;
                let tree_result = self.tree.remove(&key_bytes);
                let model_result = self.model.remove(&key_bytes);
                assert_eq!(
                    tree_result, model_result,
                    "Remove mismatch: key={:?}, tree_result={:?}, model_result={:?}",
                    key_bytes, tree_result, model_result
                );
            }
        }
        // Structural invariants and length must hold after every action.
        self.tree.check_invariants();
        assert_eq!(
            self.tree.len(),
            self.model.len(),
            "Length mismatch after action: tree={}, model={}",
            self.tree.len(),
            self.model.len()
        );
        assert_eq!(
            self.tree.is_empty(),
            self.model.is_empty(),
            "is_empty mismatch: tree={}, model={}",
            self.tree.is_empty(),
            self.model.is_empty()
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn proptest_vs_btreemap(actions in prop::collection::vec(any::<Action>(), 1..64)) {
        let mut test = Test::default();
        for action in actions {
            test.execute(action);
        }

        // Iteration must visit exactly the model's entries in key order.
        let collected: Vec<(Vec<u8>, u64)> =
            test.tree.iter().map(|(k, v)| (k.to_vec(), *v)).collect();
        let expected: Vec<(Vec<u8>, u64)> =
            test.model.map.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(collected, expected);
    }

    #[test]
    fn proptest_insert_then_drain(values in prop::collection::btree_set(any::<u16>(), 1..200)) {
        let mut tree: ArtTree<u64> = ArtTree::new();
        for (i, &v) in values.iter().enumerate() {
            tree.insert(&u64::from(v).to_be_bytes(), i as u64);
            tree.check_invariants();
        }
        prop_assert_eq!(tree.len(), values.len());

        for &v in values.iter() {
            prop_assert!(tree.remove(&u64::from(v).to_be_bytes()).is_some());
            tree.check_invariants();
        }
        prop_assert!(tree.is_empty());
    }
}
