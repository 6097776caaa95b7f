use electrum_store::{DEFAULT_KEY, Store};
use serde_json::json;

use crate::helpers::node;

#[test]
fn test_collection_creates_expected_nodes() {
    let store = Store::create("test");
    let data = json!([
        { "offset": 0, "id": "x", "value": "X" },
        { "offset": 2, "id": "y", "value": { "date": "01.01.2016", "name": "foo", "item": { "bar": "z" } } }
    ]);
    store.apply_collection("root", Some(&data), DEFAULT_KEY).unwrap();

    let first = node(&store, "root.0");
    assert_eq!(first.get("offset").unwrap(), &0i64);
    assert_eq!(first.get("id").unwrap(), "x");
    assert_eq!(first.get("value").unwrap(), "X");
    assert!(store.find("root.0.offset").is_none());
    assert!(store.find("root.0.id").is_none());
    assert!(store.find("root.0.value").is_none());

    let second = node(&store, "root.2");
    assert_eq!(second.get("offset").unwrap(), &2i64);
    assert_eq!(second.get("id").unwrap(), "y");
    assert!(second.get("value").is_none());
    assert_eq!(
        second.get("pojo").unwrap(),
        &json!({ "date": "01.01.2016", "name": "foo", "item": { "bar": "z" } })
    );
    assert_eq!(node(&store, "root.2.date").value().unwrap(), "01.01.2016");
    assert_eq!(node(&store, "root.2.name").value().unwrap(), "foo");
    assert_eq!(node(&store, "root.2.item.bar").value().unwrap(), "z");
}

#[test]
fn test_collection_uses_default_key() {
    let store = Store::create("test");
    let data = json!([
        { "offset": 0, "id": "x", "value": "X" },
        { "offset": 2, "id": "y", "value": { "date": "01.01.2016", "name": "foo" } }
    ]);
    store.apply_collection("root", Some(&data), "value").unwrap();

    assert_eq!(node(&store, "root.0").get("value").unwrap(), "X");
    assert_eq!(
        node(&store, "root.2").get_pojo(),
        *json!({ "date": "01.01.2016", "name": "foo" }).as_object().unwrap()
    );
    assert_eq!(node(&store, "root.2.date").get("value").unwrap(), "01.01.2016");
    assert_eq!(node(&store, "root.2.name").get("value").unwrap(), "foo");
}

#[test]
fn test_collection_keeps_elements_without_value() {
    let store = Store::create("test");
    let data = json!([
        { "offset": 0, "id": "x", "value": "X" },
        { "offset": 3, "id": "z" }
    ]);
    store.apply_collection("root", Some(&data), "value").unwrap();

    assert_eq!(node(&store, "root.0").get("value").unwrap(), "X");
    let empty = node(&store, "root.3");
    assert!(empty.get("value").is_none());
    assert_eq!(empty.get("id").unwrap(), "z");
}

#[test]
fn test_collection_requires_offsets() {
    let store = Store::create("test");
    let data = json!([{ "id": "x", "value": "X" }]);
    let err = store
        .apply_collection("root", Some(&data), "value")
        .unwrap_err();
    assert!(err.is_collection_error());
    assert!(err.to_string().contains("expects an array"));
}

#[test]
fn test_collection_absent_or_empty_removes() {
    let store = Store::create("test");
    store.select("root.a.b").unwrap();
    store.apply_collection("root.a", None, DEFAULT_KEY).unwrap();
    assert!(store.find("root.a").is_none());

    store.select("root.b.c").unwrap();
    store
        .apply_collection("root.b", Some(&json!([])), DEFAULT_KEY)
        .unwrap();
    assert!(store.find("root.b").is_none());

    store.select("root.c.d").unwrap();
    store
        .apply_collection("root.c", Some(&json!({})), DEFAULT_KEY)
        .unwrap();
    assert!(store.find("root.c").is_none());
    assert!(store.find("root").is_some());
}

#[test]
fn test_collection_object_and_scalar() {
    let store = Store::create("test");
    store
        .apply_collection(
            "form",
            Some(&json!({ "value": "top", "field": "F", "nested": { "value": "N" } })),
            "value",
        )
        .unwrap();

    assert_eq!(node(&store, "form").get("value").unwrap(), "top");
    assert_eq!(node(&store, "form.field").get("value").unwrap(), "F");
    assert_eq!(node(&store, "form.nested").get("value").unwrap(), "N");
    assert!(store.find("form.nested.value").is_none());
}
