//! JSON writer layout and quoting

use chrono::{TimeZone, Utc};
use doctree::{json, Tree, Value};

#[test]
fn test_compact_is_valid_json() {
    let tree = Tree::new();
    tree.put("s", "quote \" backslash \\").unwrap();
    tree.put("n[1]", 2.5f64).unwrap();
    tree.put("b", true).unwrap();
    tree.put_bytes_as_base64("raw", b"hi").unwrap();
    let text = tree.to_json(false).unwrap();
    let checked: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(checked["s"], "quote \" backslash \\");
    assert_eq!(checked["n"][0], serde_json::Value::Null);
    assert_eq!(checked["n"][1], 2.5);
    assert_eq!(checked["raw"], "aGk=");
}

#[test]
fn test_pretty_layout_uses_crlf_and_two_spaces() {
    let tree = Tree::parse(r#"{"a":[1,{"b":null}],"c":{}}"#).unwrap();
    assert_eq!(
        tree.to_json(true).unwrap(),
        "{\r\n  \"a\":[\r\n    1,\r\n    {\r\n      \"b\":null\r\n    }\r\n  ],\r\n  \"c\":{}\r\n}"
    );
}

#[test]
fn test_format_reindents_compact_text() {
    let compact = r#"{"a":[1,{"b":null}],"c":{}}"#;
    let tree = Tree::parse(compact).unwrap();
    assert_eq!(json::format(compact), tree.to_json(true).unwrap());
}

#[test]
fn test_quoting_by_type() {
    let id = uuid::Uuid::from_u64_pair(7, 9);
    let tree = Tree::new();
    tree.put("id", id).unwrap();
    tree.put("ip", "10.0.0.1".parse::<std::net::IpAddr>().unwrap()).unwrap();
    tree.put("big", num_bigint::BigInt::from(10u8).pow(30)).unwrap();
    let text = tree.to_json(false).unwrap();
    assert_eq!(
        text,
        format!(
            r#"{{"id":"{}","ip":"10.0.0.1","big":1000000000000000000000000000000}}"#,
            id
        )
    );
}

#[test]
fn test_dates_follow_timestamp_setting() {
    let date = Utc.timestamp_millis_opt(1_500_000_000_123).unwrap();
    let tree = Tree::from_value(Value::Date(date));
    let text = tree.to_json(false).unwrap();
    if doctree::config::global().use_timestamps {
        assert!(text.starts_with("\"2017-07-1"), "{}", text);
        assert!(text.ends_with('"'));
    } else {
        assert_eq!(text, "1500000000123");
    }
}

#[test]
fn test_non_finite_doubles_write_null() {
    let tree = Tree::parse("[]").unwrap();
    tree.add(f64::NAN).unwrap().add(f64::NEG_INFINITY).unwrap();
    assert_eq!(tree.to_json(false).unwrap(), "[null,null]");
}

#[test]
fn test_meta_written_only_on_request() {
    let tree = Tree::parse(r#"{"a":1}"#).unwrap();
    tree.meta().put("rev", 3i64).unwrap();
    assert_eq!(tree.to_json(false).unwrap(), r#"{"a":1}"#);
    assert_eq!(
        tree.to_binary("json", true).unwrap(),
        br#"{"a":1,"_meta":{"rev":3}}"#.to_vec()
    );
    assert_eq!(
        Tree::parse_bytes(&tree.to_binary("json", true).unwrap()).unwrap(),
        tree
    );
}
