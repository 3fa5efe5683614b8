//! Conversion registry behaviour seen through trees

use doctree::{
    convert, register, register_fallback, ConversionError, CustomScalar, CustomValue, Error,
    Tree, Value, ValueType,
};
use std::net::IpAddr;

#[derive(Debug)]
struct Money {
    cents: i64,
}

impl CustomScalar for Money {
    fn type_name(&self) -> &'static str {
        "money"
    }

    fn to_text(&self) -> String {
        format!("{}.{:02}", self.cents / 100, self.cents % 100)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[test]
fn test_unregistered_custom_target_fails_hard() {
    let err = convert(ValueType::Custom("no-such-type"), &Value::Long(1)).unwrap_err();
    assert_eq!(
        err,
        ConversionError::NotRegistered {
            from: ValueType::Long,
            to: ValueType::Custom("no-such-type"),
        }
    );
}

#[test]
fn test_custom_scalar_renders_through_text() {
    let tree = Tree::new();
    tree.put("price", CustomValue::new(Money { cents: 1999 })).unwrap();
    assert_eq!(tree.to_json(false).unwrap(), r#"{"price":"19.99"}"#);
    assert_eq!(tree.get_or("price", 0.0f64).unwrap(), 19.99);
}

#[test]
fn test_registered_converter_is_used_by_set_type() {
    register(ValueType::Custom("money"), ValueType::Long, |value| match value {
        Value::Long(cents) => Ok(Value::Custom(CustomValue::new(Money { cents: *cents }))),
        other => Err(ConversionError::invalid(
            other.value_type(),
            ValueType::Custom("money"),
            "expected cents",
        )),
    });
    let tree = Tree::parse(r#"{"total":250}"#).unwrap();
    let total = tree
        .get("total")
        .unwrap()
        .set_type(ValueType::Custom("money"))
        .unwrap();
    assert_eq!(total.value_type(), ValueType::Custom("money"));
    assert_eq!(tree.to_json(false).unwrap(), r#"{"total":"2.50"}"#);
}

#[test]
fn test_fallback_applies_to_every_source() {
    register_fallback(ValueType::Custom("shout"), |value| {
        let text = doctree::convert_to::<String>(value)?.unwrap_or_default();
        Ok(Value::String(text.to_uppercase()))
    });
    assert_eq!(
        convert(ValueType::Custom("shout"), &Value::from("hey")).unwrap(),
        Value::from("HEY")
    );
    assert_eq!(
        convert(ValueType::Custom("shout"), &Value::Bool(true)).unwrap(),
        Value::from("TRUE")
    );
}

#[test]
fn test_lenient_numeric_text() {
    let tree = Tree::parse(r#"{"amount":"$1,234.50","neg":"-7px"}"#).unwrap();
    assert_eq!(tree.get("amount").unwrap().as_double().unwrap(), Some(1.2345));
    assert_eq!(tree.get("amount").unwrap().as_long().unwrap(), Some(1));
    assert_eq!(tree.get("neg").unwrap().as_int().unwrap(), Some(-7));
}

#[test]
fn test_invalid_input_to_registered_converter() {
    let tree = Tree::parse(r#"{"ip":"not an address"}"#).unwrap();
    assert!(matches!(
        tree.get("ip").unwrap().as_inet_address(),
        Err(Error::Conversion(ConversionError::Invalid { .. }))
    ));
    let ok = Tree::parse(r#"{"ip":"::1"}"#).unwrap();
    assert_eq!(
        ok.get("ip").unwrap().as_inet_address().unwrap(),
        Some("::1".parse::<IpAddr>().unwrap())
    );
}

#[test]
fn test_dates_from_numbers_and_text() {
    let tree = Tree::parse(r#"{"ms":86400000,"iso":"1970-01-02T00:00:00Z"}"#).unwrap();
    let from_millis = tree.get("ms").unwrap().as_date().unwrap().unwrap();
    let from_text = tree.get("iso").unwrap().as_date().unwrap().unwrap();
    assert_eq!(from_millis.timestamp_millis(), 86_400_000);
    assert_eq!(from_text, from_millis);
}
