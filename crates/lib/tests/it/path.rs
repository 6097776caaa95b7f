use electrum_store::path::{self, Part};

#[test]
fn test_join_then_split_round_trip() {
    for id in ["a.b", "a.b.c", "list.[3].title", "x._12"] {
        let parent = path::parent_id(id).unwrap();
        let leaf = path::leaf_id(id).unwrap();
        assert_eq!(path::join([parent, leaf]).unwrap(), id);
    }
}

#[test]
fn test_join_mixed_parts() {
    let id = path::join([Part::from("todos"), Part::from(3u64), Part::from("title")]).unwrap();
    assert_eq!(id, "todos.3.title");
}

#[test]
fn test_join_empty_part_is_invalid() {
    let err = path::join(["a", "", "c"]).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("empty"));
}

#[test]
fn test_ancestor_lookup() {
    let id = "app.pages.2.header";
    assert_eq!(path::ancestor_id(id, "pages").unwrap(), Some("app.pages"));
    assert_eq!(path::ancestor_id(id, 2u64).unwrap(), Some("app.pages.2"));
    assert_eq!(path::ancestor_id(id, "").unwrap(), Some(""));
    assert_eq!(path::ancestor_id(id, "footer").unwrap(), None);

    let err = path::ancestor_id(id, "pages.2").unwrap_err();
    assert!(err.to_string().contains("cannot be a path specification"));
}

#[test]
fn test_negative_part_is_rejected() {
    let err = Part::try_from(-3i64).unwrap_err();
    assert!(err.is_invalid_argument());
    let err: electrum_store::Error = err.into();
    assert_eq!(err.module(), "path");
    assert!(err.is_invalid_argument());
}

#[test]
fn test_index_notations_share_ordering() {
    let mut keys = vec!["_10", "2", "[1]", "0"];
    keys.sort_by(|a, b| path::compare_index_keys(a, b));
    assert_eq!(keys, vec!["0", "[1]", "2", "_10"]);
    assert!(keys.iter().all(|key| path::is_index(key)));
}
