use electrum_store::{Props, Store};

#[test]
fn test_link_to_child_state() {
    let store = Store::create("x");
    let props: Props<&str> = Props::new(store.root());
    let linked = Store::link(&props, "a", None).unwrap();
    assert_eq!(linked.state.id(), "a");
    assert!(linked.theme.is_none());
    assert!(store.find("a").is_some());
}

#[test]
fn test_link_propagates_theme() {
    let store = Store::create("x");
    let props = Props::with_theme(store.select("a").unwrap(), "t1");

    let child = Store::link(&props, "b", None).unwrap();
    assert_eq!(child.state.id(), "a.b");
    assert_eq!(child.theme, Some("t1"));

    let other = Store::link(&child, 1u64, Some("t2")).unwrap();
    assert_eq!(other.state.id(), "a.b.1");
    assert_eq!(other.theme, Some("t2"));
}

#[test]
fn test_read_from_props() {
    let store = Store::create("x");
    store.select("a").unwrap().set("title", "hello").unwrap();
    let props: Props<()> = Props::new(store.find("a").unwrap());
    assert_eq!(Store::read(&props, "title").unwrap(), "hello");
    assert!(Store::read(&props, "other").is_none());
}
