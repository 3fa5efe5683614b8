//! Views over one shared document

use doctree::{Error, Tree, Value, ValueType};

#[test]
fn test_child_views_write_through() {
    let tree = Tree::parse(r#"{"user":{"name":"ada"}}"#).unwrap();
    let user = tree.get("user").unwrap();
    user.put("langs[0]", "en").unwrap();
    user.get("name").unwrap().set("Ada").unwrap();
    assert_eq!(
        tree.to_json(false).unwrap(),
        r#"{"user":{"name":"Ada","langs":["en"]}}"#
    );
}

#[test]
fn test_map_views_survive_sibling_removal() {
    let tree = Tree::parse(r#"{"a":1,"b":2,"c":3}"#).unwrap();
    let c = tree.get("c").unwrap();
    tree.remove("a").unwrap();
    assert_eq!(c.as_long().unwrap(), Some(3));
    c.set(30i64).unwrap();
    assert_eq!(tree.to_json(false).unwrap(), r#"{"b":2,"c":30}"#);
}

#[test]
fn test_list_views_follow_position() {
    let tree = Tree::parse("[1,2,3]").unwrap();
    let second = tree.child(1).unwrap();
    tree.remove_first().unwrap();
    assert_eq!(second.as_long().unwrap(), Some(3));
}

#[test]
fn test_stale_view_refuses_writes() {
    let tree = Tree::parse(r#"{"a":{"b":1}}"#).unwrap();
    let b = tree.get("a.b").unwrap();
    tree.get("a").unwrap().set("scalar now").unwrap();
    assert!(b.is_null());
    assert!(matches!(b.put("x", 1i64), Err(Error::Detached { .. })));
    assert!(matches!(b.add(1i64), Err(Error::Detached { .. })));
}

#[test]
fn test_meta_is_a_side_channel() {
    let tree = Tree::parse(r#"{"data":[1],"_meta":{"schema":"v1"}}"#).unwrap();
    assert_eq!(tree.size(), 1);
    assert!(!tree.exists("data._meta.missing"));
    assert!(tree.get("nothing._meta.schema").is_none());
    let schema = tree.get("data[0]._meta.schema").unwrap();
    assert!(schema.is_meta());
    assert_eq!(schema.path(), "_meta.schema");
    assert_eq!(
        tree.to_string_format("json", false, true).unwrap(),
        r#"{"data":[1],"_meta":{"schema":"v1"}}"#
    );
}

#[test]
fn test_set_type_rewrites_in_parent() {
    let tree = Tree::parse(r#"{"ids":["1","2"]}"#).unwrap();
    for child in &tree.get("ids").unwrap() {
        child.set_type(ValueType::Long).unwrap();
    }
    assert_eq!(tree.to_json(false).unwrap(), r#"{"ids":[1,2]}"#);
    assert_eq!(tree.get("ids[0]").unwrap().value_type(), ValueType::Long);
}

#[test]
fn test_rename_then_navigate() {
    let tree = Tree::parse(r#"{"old":{"v":1},"other":2}"#).unwrap();
    let renamed = tree.get("old").unwrap().set_name("new").unwrap();
    assert_eq!(renamed.get("v").unwrap().path(), "new.v");
    assert!(!tree.exists("old"));
    assert_eq!(tree.last_child().unwrap().name().as_deref(), Some("new"));
}

#[test]
fn test_deep_clone_detaches() {
    let tree = Tree::parse(r#"{"a":[1,2]}"#).unwrap();
    let copy = tree.get("a").unwrap().deep_clone();
    copy.add(3i64).unwrap();
    assert_eq!(tree.to_json(false).unwrap(), r#"{"a":[1,2]}"#);
    assert_eq!(copy.as_value().len(), Some(3));
    assert_eq!(Tree::from_value(Value::Null).deep_clone().size(), 0);
}
