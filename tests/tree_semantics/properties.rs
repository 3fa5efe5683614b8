//! Property tests: serialization round-trip and path idempotence

use doctree::{Map, PathSegment, Tree, TreePath, Value};
use proptest::prelude::*;

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Long),
        (-1.0e9f64..1.0e9f64).prop_map(Value::Double),
        "[a-zA-Z0-9 \"\\\\/:{}\\[\\],]{0,10}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            proptest::collection::vec(("[a-z]{1,6}", inner), 0..6).prop_map(|entries| {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(k, v);
                }
                Value::Map(map)
            }),
        ]
    })
}

fn tree_path() -> impl Strategy<Value = TreePath> {
    proptest::collection::vec(
        prop_oneof![
            "[a-z]{1,4}".prop_map(PathSegment::Key),
            (0usize..5).prop_map(PathSegment::Index),
        ],
        0..6,
    )
    .prop_map(TreePath::from_segments)
}

proptest! {
    #[test]
    fn prop_compact_round_trip(value in json_value()) {
        let tree = Tree::from_value(value);
        let text = tree.to_json(false).unwrap();
        let parsed = Tree::parse(&text).unwrap();
        prop_assert_eq!(&parsed, &tree);
        prop_assert_eq!(parsed.to_json(false).unwrap(), text);
    }

    #[test]
    fn prop_pretty_round_trip(value in json_value()) {
        let tree = Tree::from_value(value);
        let parsed = Tree::parse(&tree.to_json(true).unwrap()).unwrap();
        prop_assert_eq!(parsed, tree);
    }

    #[test]
    fn prop_created_path_resolves_to_same_node(path in tree_path()) {
        let tree = Tree::new();
        let created = tree.put_path(&path, Value::map(), false).unwrap();
        let resolved = tree.get_path(&path).unwrap();
        prop_assert_eq!(resolved.path(), created.path());
        prop_assert_eq!(&resolved, &created);
        prop_assert!(resolved.is_map());
    }

    #[test]
    fn prop_rendered_path_resolves_back(path in tree_path()) {
        let tree = Tree::new();
        let created = tree.put_path(&path, Value::map(), false).unwrap();
        let again = tree.get(&created.path()).unwrap();
        prop_assert_eq!(again.path(), created.path());
    }
}
