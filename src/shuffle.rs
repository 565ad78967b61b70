//! src/shuffle.rs
use crate::functions::{Key, Value};
use std::collections::BTreeMap;

/// Values of each key in arrival order; keys come out sorted.
pub fn group_by_key(pairs: impl IntoIterator<Item = (Key, Value)>) -> BTreeMap<Key, Vec<Value>> {
    let mut groups: BTreeMap<Key, Vec<Value>> = BTreeMap::new();
    for (key, value) in pairs {
        groups.entry(key).or_default().push(value);
    }
    groups
}

/// Stable across runs and platforms, unlike `DefaultHasher`.
pub fn partition_for(key: &str, partitions: usize) -> usize {
    let mut hash = 0usize;

    for byte in key.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(byte as usize);
    }

    hash % partitions
}
