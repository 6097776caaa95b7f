use electrum_store::Store;
use serde_json::json;

use crate::helpers::node;

fn seeded() -> Store {
    let store = Store::create("test");
    store
        .select("a.b")
        .unwrap()
        .set_values([("x", 10i64), ("y", 20i64)])
        .unwrap();
    assert_eq!(store.generation(), 2);
    store
}

#[test]
fn test_apply_values_and_add_nodes() {
    let store = seeded();
    store
        .merge("a.b", &json!({ "x": 15, "name": "foo", "c": { "value": "bar" } }))
        .unwrap();

    assert!(store.generation() > 2);
    let b = node(&store, "a.b");
    assert_eq!(b.get("x").unwrap(), &15i64);
    assert_eq!(b.get("y").unwrap(), &20i64);
    assert_eq!(b.get("name").unwrap(), "foo");
    assert_eq!(node(&store, "a.b.c").get("value").unwrap(), "bar");
}

#[test]
fn test_apply_sets_default_value() {
    let store = seeded();
    store.apply("a.b", &json!({ "c": { "": "default" } })).unwrap();
    assert_eq!(node(&store, "a.b.c").value().unwrap(), "default");
}

#[test]
fn test_apply_array_elements_become_indexed_children() {
    let store = seeded();
    store
        .apply("a.b", &json!({ "x": 15, "items": ["a", { "value": "bar" }] }))
        .unwrap();

    assert_eq!(node(&store, "a.b").get("x").unwrap(), &15i64);
    assert_eq!(node(&store, "a.b.items.0").value().unwrap(), "a");
    assert_eq!(node(&store, "a.b.items.1").get("value").unwrap(), "bar");
    assert_eq!(store.get_index_keys("a.b.items"), vec!["0", "1"]);
}

#[test]
fn test_apply_direct_value() {
    let store = seeded();
    store.apply("a.b.c", &json!("default")).unwrap();
    assert_eq!(node(&store, "a.b.c").value().unwrap(), "default");
}

#[test]
fn test_apply_direct_array() {
    let store = Store::create("test");
    store.apply("a.items", &json!(["x", { "value": "bar" }])).unwrap();
    assert_eq!(node(&store, "a.items.0").value().unwrap(), "x");
    assert_eq!(node(&store, "a.items.1").get("value").unwrap(), "bar");
}

#[test]
fn test_apply_null_values() {
    let store = Store::create("test");
    store.apply("a", &json!({ "x": 1, "y": null })).unwrap();
    let a = node(&store, "a");
    assert_eq!(a.get("x").unwrap(), &1i64);
    assert!(a.get("y").unwrap().is_null());
}

#[test]
fn test_apply_does_not_mutate_when_nothing_changes() {
    let store = seeded();
    store.select("a.b.c").unwrap().set("value", "bar").unwrap();
    assert_eq!(store.generation(), 4);

    store
        .apply("a.b", &json!({ "x": 10, "c": { "value": "bar" } }))
        .unwrap();

    assert_eq!(store.generation(), 4);
    assert_eq!(node(&store, "a.b").get("x").unwrap(), &10i64);
    assert_eq!(node(&store, "a.b").get("y").unwrap(), &20i64);
    assert_eq!(node(&store, "a.b.c").get("value").unwrap(), "bar");
}

#[test]
fn test_apply_object_properties_is_one_write() {
    let store = Store::create("test");
    store.apply("a", &json!({ "x": 1, "y": 2, "z": 3 })).unwrap();
    assert_eq!(store.generation(), 1);
}

#[test]
fn test_apply_at_root() {
    let store = Store::create("test");
    store.apply("", &json!({ "title": "t", "page": { "n": 1 } })).unwrap();
    assert_eq!(store.root().get("title").unwrap(), "t");
    assert_eq!(node(&store, "page").get("n").unwrap(), &1i64);
}
