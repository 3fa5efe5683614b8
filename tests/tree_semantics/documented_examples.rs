//! Reference scenarios for path resolution and mutation

use doctree::{Tree, Value};

fn compact(tree: &Tree) -> String {
    tree.to_json(false).unwrap()
}

#[test]
fn test_put_vivifies_nested_maps() {
    let tree = Tree::new();
    tree.put("a.b.c", 1i64).unwrap();
    assert_eq!(tree, Tree::parse(r#"{"a":{"b":{"c":1}}}"#).unwrap());
}

#[test]
fn test_put_pads_list_with_nulls() {
    let tree = Tree::parse(r#"{"list":[]}"#).unwrap();
    tree.put("list[3]", "x").unwrap();
    assert_eq!(compact(&tree), r#"{"list":[null,null,null,"x"]}"#);
}

#[test]
fn test_set_upsert_moves_duplicate_to_end() {
    let tree = Tree::new();
    let set = tree.put_set("tags", false).unwrap();
    set.add("a").unwrap().add("b").unwrap();
    assert_eq!(set.size(), 2);
    set.add("a").unwrap();
    assert_eq!(set.size(), 2);
    assert_eq!(compact(&tree), r#"{"tags":["b","a"]}"#);
}

#[test]
fn test_put_map_if_absent_preserves_then_replaces() {
    let tree = Tree::new();
    tree.put_map("h", true).unwrap().put("first", 1i64).unwrap();
    tree.put_map("h", true).unwrap().put("second", 2i64).unwrap();
    assert_eq!(tree.get("h").unwrap().size(), 2);
    tree.put_map("h", false).unwrap().put("third", 3i64).unwrap();
    assert_eq!(compact(&tree), r#"{"h":{"third":3}}"#);
}

#[test]
fn test_natural_sort() {
    let numbers = Tree::parse("[3,1,2]").unwrap();
    numbers.sort().unwrap();
    assert_eq!(compact(&numbers), "[1,2,3]");

    let letters = Tree::parse(r#"["b","a","c"]"#).unwrap();
    letters.sort().unwrap();
    assert_eq!(compact(&letters), r#"["a","b","c"]"#);

    let map = Tree::parse(r#"{"beta":1,"Alpha":2,"gamma":3}"#).unwrap();
    map.sort().unwrap();
    assert_eq!(compact(&map), r#"{"Alpha":2,"beta":1,"gamma":3}"#);
}

#[test]
fn test_resolve_then_remove_and_reserialize() {
    let tree = Tree::parse(r#"{"a":{"b":{"c":{"d":[1,2,3]}}}}"#).unwrap();
    let node = tree.get("a.b.c.d[1]").unwrap();
    assert_eq!(node.as_value(), Value::Long(2));
    tree.remove("a.b.c.d[0]").unwrap();
    assert_eq!(compact(&tree), r#"{"a":{"b":{"c":{"d":[2,3]}}}}"#);
}

#[test]
fn test_read_misses_are_soft() {
    let tree = Tree::parse(r#"{"a":"text","l":[1]}"#).unwrap();
    assert!(tree.get("a.b").is_none());
    assert!(tree.get("a[0]").is_none());
    assert!(tree.get("l[5]").is_none());
    assert!(tree.get("l[").is_none());
    assert_eq!(tree.get_or("missing.path", 9i64).unwrap(), 9);
}

#[test]
fn test_leading_index_addresses_current_node() {
    let tree = Tree::parse(r#"[{"k":"v"},[10,20]]"#).unwrap();
    assert_eq!(
        tree.get("[0].k").unwrap().as_string().unwrap().as_deref(),
        Some("v")
    );
    assert_eq!(tree.get("[1][1]").unwrap().as_long().unwrap(), Some(20));
}

#[test]
fn test_paths_render_with_start_index() {
    let tree = Tree::new();
    let leaf = tree.put_map("rows[2].cells[0]", false).unwrap();
    assert_eq!(leaf.path(), "rows[2].cells[0]");
    assert_eq!(leaf.path_from(1), "rows[3].cells[1]");
}

#[test]
fn test_insert_into_non_empty_map_names_the_kind() {
    let tree = Tree::parse(r#"{"a":1}"#).unwrap();
    let err = tree.insert(0, 2i64).unwrap_err();
    assert_eq!(err.to_string(), "Unsupported operation: cannot insert on a map");
}
