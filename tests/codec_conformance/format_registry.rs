//! Custom formats plugged into the process-wide registry

use doctree::{
    formats, register_reader, register_writer, remove_format, Error, Result, Tree, TreeReader,
    TreeWriter, Value,
};
use std::sync::Arc;

/// One string element per non-empty line
struct LinesFormat;

impl TreeReader for LinesFormat {
    fn format(&self) -> &str {
        "Lines"
    }

    fn parse(&self, text: &str) -> Result<Value> {
        Ok(Value::List(
            text.lines()
                .filter(|line| !line.is_empty())
                .map(Value::from)
                .collect(),
        ))
    }
}

impl TreeWriter for LinesFormat {
    fn format(&self) -> &str {
        "Lines"
    }

    fn serialize(
        &self,
        value: &Value,
        _meta: Option<&Value>,
        _pretty: bool,
        _insert_meta: bool,
    ) -> Result<String> {
        let mut out = String::new();
        for item in value.as_slice().unwrap_or(&[]) {
            out.push_str(&doctree::convert_to::<String>(item)?.unwrap_or_default());
            out.push('\n');
        }
        Ok(out)
    }
}

#[test]
fn test_custom_format_round_trip() {
    register_reader(Arc::new(LinesFormat));
    register_writer(Arc::new(LinesFormat));
    assert!(formats().contains(&"lines".to_string()));

    let tree = Tree::parse_format("alpha\nbeta\n\ngamma", "LINES").unwrap();
    assert_eq!(tree.to_json(false).unwrap(), r#"["alpha","beta","gamma"]"#);
    tree.add(4i64).unwrap();
    assert_eq!(
        tree.to_string_format("lines", false, false).unwrap(),
        "alpha\nbeta\ngamma\n4\n"
    );

    assert!(remove_format("lines").unwrap());
    assert!(matches!(
        Tree::parse_format("x", "lines"),
        Err(Error::UnknownFormat(_))
    ));
}

#[test]
fn test_json_cannot_be_removed() {
    assert!(matches!(
        remove_format("JSON"),
        Err(Error::UnsupportedOperation { .. })
    ));
    assert!(formats().contains(&"json".to_string()));
}

#[test]
fn test_debug_format_is_write_only() {
    let tree = Tree::parse(r#"{"n":[1,true,"s",null]}"#).unwrap();
    assert_eq!(
        tree.to_string_format("debug", true, false).unwrap(),
        "Map:\r\n  n -> Collection:\r\n    0 -> Number: 1\r\n    1 -> Boolean: true\r\n    2 -> String: s\r\n    3 -> Null"
    );
    assert!(matches!(
        Tree::parse_format("Map:", "debug"),
        Err(Error::UnknownFormat(_))
    ));
}
