use electrum_store::{Entity, Value};

#[test]
fn test_create_empty_template() {
    let state = Entity::create("a").unwrap();
    assert_eq!(state.id(), "a");
    assert_eq!(state.generation(), 0);
    assert!(state.value().is_none());
    assert!(!state.is_bound());
}

#[test]
fn test_create_with_initial_values() {
    let state = Entity::create_with(
        "a",
        [("", Value::from(123i64)), ("foo", Value::from("bar"))],
    )
    .unwrap();
    assert_eq!(state.value().unwrap(), &123i64);
    assert_eq!(state.get("foo").unwrap(), "bar");
    assert!(state.contains("foo"));
    assert!(!state.contains("z"));
    assert!(state.get("z").is_none());
}

#[test]
fn test_numeric_property_names() {
    let state = Entity::create_with("a", [("123", "X"), ("y", "Y")]).unwrap();
    assert_eq!(state.get("123").unwrap(), "X");
    assert!(state.contains("123"));
}

#[test]
fn test_create_requires_valid_id() {
    assert!(Entity::create("").unwrap_err().is_invalid_argument());
    assert!(Entity::create("a.").unwrap_err().is_invalid_argument());
    assert!(Entity::create(".a").unwrap_err().is_invalid_argument());
}

#[test]
fn test_to_data_renders_values() {
    let state = Entity::create_with("a", [("x", 1i64), ("y", 2i64)]).unwrap();
    assert_eq!(state.to_data(), serde_json::json!({ "x": 1, "y": 2 }));
}
