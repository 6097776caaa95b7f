//! Shared helpers for the integration tests.

use electrum_store::{Entity, Store};

/// Creates a store and selects each id in order.
pub fn store_with(ids: &[&str]) -> Store {
    let store = Store::create("test");
    for id in ids {
        store.select(id).unwrap();
    }
    store
}

/// Returns the node at `id`, failing the test if it is missing.
pub fn node(store: &Store, id: &str) -> Entity {
    store
        .find(id)
        .unwrap_or_else(|| panic!("expected a state at '{id}'"))
}

/// Returns the generation of each node, in the order given.
pub fn generations(store: &Store, ids: &[&str]) -> Vec<u64> {
    ids.iter().map(|id| node(store, id).generation()).collect()
}

/// Returns the property names of a node, in insertion order.
pub fn value_keys(entity: &Entity) -> Vec<String> {
    entity.values().keys().cloned().collect()
}
