//! JSON reader behaviour through the public API

use doctree::{json, Error, Tree, Value, ValueType};

fn parse_failure(text: &str) -> doctree::ParseError {
    match Tree::parse(text) {
        Err(Error::Parse(e)) => e,
        other => panic!("expected parse error for {:?}, got {:?}", text, other),
    }
}

#[test]
fn test_number_typing() {
    let tree = Tree::parse(r#"[7, 7.0, 1e2, 99999999999999999999, -0.25]"#).unwrap();
    let types: Vec<ValueType> = tree.children().map(|c| c.value_type()).collect();
    assert_eq!(
        types,
        vec![
            ValueType::Long,
            ValueType::Double,
            ValueType::Double,
            ValueType::BigInteger,
            ValueType::Double,
        ]
    );
}

#[test]
fn test_bytes_input() {
    let tree = Tree::parse_bytes(r#"{"k":"é"}"#.as_bytes()).unwrap();
    assert_eq!(tree.get("k").unwrap().as_string().unwrap().as_deref(), Some("é"));
    assert!(matches!(
        Tree::parse_bytes(&[b'"', 0xff, b'"']),
        Err(Error::Parse(_))
    ));
}

#[test]
fn test_positioned_failures() {
    let err = parse_failure(r#"{"a":[1,2 3]}"#);
    assert_eq!(err.position, 10);
    assert_eq!(err.element, Some(1));

    let err = parse_failure(r#"{"a" 1}"#);
    assert_eq!(err.position, 5);

    let err = parse_failure("[\"open");
    assert_eq!(err.position, 1);
}

#[test]
fn test_invalid_leading_token() {
    for text in ["@", "}", "[1,]x", "{\"a\":}"] {
        assert!(Tree::parse(text).is_err(), "{} should not parse", text);
    }
}

#[test]
fn test_nesting_beyond_limit_fails() {
    let deep = format!("{}{}", "[".repeat(2000), "]".repeat(2000));
    assert!(matches!(Tree::parse(&deep), Err(Error::Parse(_))));
    let shallow = format!("{}{}", "[".repeat(50), "]".repeat(50));
    assert!(Tree::parse(&shallow).is_ok());
}

#[test]
fn test_parse_scalar_document() {
    assert_eq!(json::parse("\"x\"").unwrap(), Value::from("x"));
    assert_eq!(Tree::parse("12").unwrap().as_value(), Value::Long(12));
}
