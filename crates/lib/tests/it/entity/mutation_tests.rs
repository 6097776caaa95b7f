use std::sync::Arc;

use electrum_store::{Entity, Mutation, Store, Value};
use serde_json::json;

use crate::helpers::value_keys;

#[test]
fn test_set_produces_new_instance() {
    let state1 = Entity::create_with("a", [("a", 1i64)]).unwrap();
    let state2 = state1.set("b", 2i64).unwrap();
    assert_eq!(state1.get("a").unwrap(), &1i64);
    assert!(state1.get("b").is_none());
    assert_eq!(state2.get("a").unwrap(), &1i64);
    assert_eq!(state2.get("b").unwrap(), &2i64);
}

#[test]
fn test_set_value_replaces_direct_value() {
    let state1 = Entity::create_with("a", [("", "x")]).unwrap();
    let state2 = state1.set_value("y").unwrap();
    assert_eq!(state1.value().unwrap(), "x");
    assert_eq!(state2.value().unwrap(), "y");
}

#[test]
fn test_with_empty_mutation_returns_same() {
    let state = Entity::create("a").unwrap();
    assert_eq!(state.with(Mutation::default()).unwrap(), state);
}

#[test]
fn test_with_same_values_returns_same() {
    let state = Entity::create_with("a", [("x", 1i64)]).unwrap();
    let mutation = Mutation {
        values: Some(Arc::clone(state.values())),
        generation: Some(state.generation()),
        ..Mutation::default()
    };
    assert_eq!(state.with(mutation).unwrap(), state);
}

#[test]
fn test_with_generation_change() {
    let state = Entity::create("a").unwrap();
    let next = state
        .with(Mutation {
            generation: Some(5),
            ..Mutation::default()
        })
        .unwrap();
    assert_ne!(next, state);
    assert_eq!(next.generation(), 5);
    assert_eq!(state.generation(), 0);
}

#[test]
fn test_shared_container_is_not_a_change() {
    let tags = Value::from(json!(["a", "b"]));
    let state = Entity::create("a").unwrap().set("tags", tags.clone()).unwrap();
    assert_eq!(state.set("tags", tags).unwrap(), state);

    // Equal content in a new container is a change
    let next = state.set("tags", json!(["a", "b"])).unwrap();
    assert_ne!(next, state);
}

#[test]
fn test_set_values_is_one_generation() {
    let store = Store::create("test");
    store.select("a").unwrap();
    assert_eq!(store.generation(), 1);

    let state = store
        .find("a")
        .unwrap()
        .set_values([("x", 1i64), ("y", 2i64)])
        .unwrap();
    assert_eq!(store.generation(), 2);
    assert_eq!(state.generation(), 2);
    assert_eq!(value_keys(&state), vec!["x", "y"]);
}

#[test]
fn test_with_values_unsets_keys() {
    let state = Entity::create_with("a", [("x", 1i64), ("y", 2i64)]).unwrap();
    let next = state
        .with_values([("x", None), ("z", Some(Value::from(3i64)))])
        .unwrap();
    assert_eq!(value_keys(&next), vec!["y", "z"]);
}

#[test]
fn test_bound_write_registers_in_store() {
    let store = Store::create("test");
    let state = store.select("a.b").unwrap().set("x", 1i64).unwrap();

    assert!(state.is_bound());
    assert_eq!(store.find("a.b").unwrap(), state);
    assert_eq!(state.generation(), 2);
    assert_eq!(store.find("a").unwrap().generation(), 2);
    assert_eq!(store.root().generation(), 2);
}

#[test]
fn test_old_snapshots_stay_valid() {
    let store = Store::create("test");
    let before = store.select("a").unwrap();
    let after = before.set("x", 1i64).unwrap();

    assert!(before.get("x").is_none());
    assert_eq!(before.generation(), 1);
    assert_eq!(after.get("x").unwrap(), &1i64);
    assert!(before.should_update(Some(after.generation() - 1)));
}

#[test]
fn test_root_is_mutable() {
    let store = Store::create("test");
    let root = store.root().set("y", 3i64).unwrap();
    assert!(root.is_root());
    assert_eq!(store.root(), root);
    assert_eq!(store.root().get("y").unwrap(), &3i64);
    assert_eq!(store.generation(), 1);
    assert_eq!(store.state_count(), 0);
}

#[test]
fn test_should_update_generations() {
    let store = Store::create("test");
    store.select("a").unwrap();
    let state = store.select("a").unwrap().set("x", 1i64).unwrap();
    assert_eq!(state.generation(), 2);

    assert!(state.should_update(None));
    assert!(state.should_update(Some(0)));
    assert!(state.should_update(Some(1)));
    assert!(state.should_update(Some(2)));
    assert!(!state.should_update(Some(3)));
}
