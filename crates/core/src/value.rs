//! Value types for doctree
//!
//! This module defines:
//! - Value: the payload held by every tree node
//! - ValueType: the runtime type tag used to drive conversions
//! - CustomScalar: the extension point for application scalar types
//!
//! ## Kinds
//!
//! A value is exactly one of: null, a scalar, an object map (`Map`), an
//! ordered list (`List`), a unique set (`Set`) or a fixed-size array
//! (`Array`). Lists, sets and arrays are the *enumerations*; maps and
//! enumerations together are the *structures*.
//!
//! Map keys are unique and keep insertion order. Sets keep insertion order
//! and never hold two elements that render to the same canonical text
//! (see [`Value::canonical_eq`]).

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use std::any::Any;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

/// Ordered object map used for `Map` values
pub type Map = IndexMap<String, Value>;

/// A node payload
///
/// Equality on `Value` is structural: maps compare independent of entry
/// order, every other container compares element by element. Node-level
/// equality (which is order sensitive and includes meta) lives on the
/// tree handle.
#[derive(Debug, Clone)]
pub enum Value {
    /// Explicit null
    Null,
    /// Boolean value
    Bool(bool),
    /// 8-bit signed integer
    Byte(i8),
    /// 16-bit signed integer
    Short(i16),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// Arbitrary precision integer
    BigInteger(BigInt),
    /// Arbitrary precision decimal
    BigDecimal(BigDecimal),
    /// UTF-8 text
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Instant in time
    Date(DateTime<Utc>),
    /// 128-bit identifier
    Uuid(Uuid),
    /// Network address
    InetAddress(IpAddr),
    /// Application scalar registered with the conversion registry
    Custom(CustomValue),
    /// Object map with unique, insertion-ordered keys
    Map(Map),
    /// Ordered list
    List(Vec<Value>),
    /// Insertion-ordered collection without duplicates
    Set(Vec<Value>),
    /// Fixed-size array
    Array(Box<[Value]>),
}

/// Runtime type tag of a [`Value`]
///
/// `Any` is only meaningful as a conversion target and always means
/// "leave the value as it is".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Identity target
    Any,
    /// Null
    Null,
    /// Boolean
    Bool,
    /// 8-bit integer
    Byte,
    /// 16-bit integer
    Short,
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Long,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// Arbitrary precision integer
    BigInteger,
    /// Arbitrary precision decimal
    BigDecimal,
    /// Text
    String,
    /// Raw bytes
    Bytes,
    /// Instant in time
    Date,
    /// 128-bit identifier
    Uuid,
    /// Network address
    InetAddress,
    /// Object map
    Map,
    /// Ordered list
    List,
    /// Unique set
    Set,
    /// Fixed-size array
    Array,
    /// Application scalar, identified by its type name
    Custom(&'static str),
}

impl ValueType {
    /// Human readable name of the type
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Any => "Any",
            ValueType::Null => "Null",
            ValueType::Bool => "Boolean",
            ValueType::Byte => "Byte",
            ValueType::Short => "Short",
            ValueType::Int => "Integer",
            ValueType::Long => "Long",
            ValueType::Float => "Float",
            ValueType::Double => "Double",
            ValueType::BigInteger => "BigInteger",
            ValueType::BigDecimal => "BigDecimal",
            ValueType::String => "String",
            ValueType::Bytes => "Bytes",
            ValueType::Date => "Date",
            ValueType::Uuid => "UUID",
            ValueType::InetAddress => "InetAddress",
            ValueType::Map => "Map",
            ValueType::List => "List",
            ValueType::Set => "Set",
            ValueType::Array => "Array",
            ValueType::Custom(name) => *name,
        }
    }

    /// True for the integral and floating point types
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            ValueType::Byte
                | ValueType::Short
                | ValueType::Int
                | ValueType::Long
                | ValueType::Float
                | ValueType::Double
                | ValueType::BigInteger
                | ValueType::BigDecimal
        )
    }

    /// True for lists, sets and arrays
    pub fn is_enumeration(&self) -> bool {
        matches!(self, ValueType::List | ValueType::Set | ValueType::Array)
    }

    /// True for maps and enumerations
    pub fn is_structure(&self) -> bool {
        *self == ValueType::Map || self.is_enumeration()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Custom scalars
// =============================================================================

/// An application-defined scalar type
///
/// Custom scalars are opaque to the engine. They travel through the tree
/// untouched and are rendered through the conversion registry, which falls
/// back to [`CustomScalar::to_text`] when no converter is registered for
/// the target type.
pub trait CustomScalar: fmt::Debug + Send + Sync + 'static {
    /// Name reported as [`ValueType::Custom`]
    fn type_name(&self) -> &'static str;

    /// Textual form used for serialization and comparisons
    fn to_text(&self) -> String;

    /// Access to the concrete type for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle around a [`CustomScalar`]
#[derive(Debug, Clone)]
pub struct CustomValue(Arc<dyn CustomScalar>);

impl CustomValue {
    /// Wrap a custom scalar
    pub fn new<T: CustomScalar>(value: T) -> Self {
        CustomValue(Arc::new(value))
    }

    /// Name of the custom type
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Textual form of the value
    pub fn to_text(&self) -> String {
        self.0.to_text()
    }

    /// Borrow the concrete value when it has type `T`
    pub fn downcast_ref<T: CustomScalar>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name() && self.to_text() == other.to_text()
    }
}

// =============================================================================
// Value
// =============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::BigInteger(a), Value::BigInteger(b)) => a == b,
            (Value::BigDecimal(a), Value::BigDecimal(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::InetAddress(a), Value::InetAddress(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    /// Create an empty map
    pub fn map() -> Self {
        Value::Map(Map::new())
    }

    /// Create an empty list
    pub fn list() -> Self {
        Value::List(Vec::new())
    }

    /// Create an empty set
    pub fn set() -> Self {
        Value::Set(Vec::new())
    }

    /// Build a set from arbitrary items, dropping canonical duplicates
    pub fn set_from<I: IntoIterator<Item = Value>>(items: I) -> Self {
        let mut set = Vec::new();
        for item in items {
            set_upsert(&mut set, item);
        }
        Value::Set(set)
    }

    /// Runtime type of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Byte(_) => ValueType::Byte,
            Value::Short(_) => ValueType::Short,
            Value::Int(_) => ValueType::Int,
            Value::Long(_) => ValueType::Long,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::BigInteger(_) => ValueType::BigInteger,
            Value::BigDecimal(_) => ValueType::BigDecimal,
            Value::String(_) => ValueType::String,
            Value::Bytes(_) => ValueType::Bytes,
            Value::Date(_) => ValueType::Date,
            Value::Uuid(_) => ValueType::Uuid,
            Value::InetAddress(_) => ValueType::InetAddress,
            Value::Custom(c) => ValueType::Custom(c.type_name()),
            Value::Map(_) => ValueType::Map,
            Value::List(_) => ValueType::List,
            Value::Set(_) => ValueType::Set,
            Value::Array(_) => ValueType::Array,
        }
    }

    /// Short name of the container kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Map(_) => "map",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Array(_) => "array",
            _ => "scalar",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is a map
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Check if this is a list
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Check if this is a set
    pub fn is_set(&self) -> bool {
        matches!(self, Value::Set(_))
    }

    /// Check if this is a fixed-size array
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Check if this is a list, set or array
    pub fn is_enumeration(&self) -> bool {
        matches!(self, Value::List(_) | Value::Set(_) | Value::Array(_))
    }

    /// Check if this is a map or an enumeration
    pub fn is_structure(&self) -> bool {
        self.is_map() || self.is_enumeration()
    }

    /// Check if this is any numeric scalar
    pub fn is_number(&self) -> bool {
        self.value_type().is_number()
    }

    /// Check if this is a scalar (not null, not a structure)
    pub fn is_scalar(&self) -> bool {
        !self.is_null() && !self.is_structure()
    }

    /// Number of children of a structure, or `None` for scalars and null
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Map(m) => Some(m.len()),
            Value::List(v) | Value::Set(v) => Some(v.len()),
            Value::Array(a) => Some(a.len()),
            _ => None,
        }
    }

    /// True for null and for structures without children
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            other => other.len() == Some(0),
        }
    }

    /// Borrow the text of a `String` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the map of a `Map` value
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the elements of a list, set or array
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) | Value::Set(v) => Some(v),
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Child at position `index` in iteration order
    ///
    /// For maps this is the value of the `index`-th entry.
    pub fn child_at(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get_index(index).map(|(_, v)| v),
            Value::List(v) | Value::Set(v) => v.get(index),
            Value::Array(a) => a.get(index),
            _ => None,
        }
    }

    /// Decimal text of a numeric value, `None` for anything else
    ///
    /// Floating point values always carry a fractional part (`1.0`, never
    /// `1`) so that the text parses back to a floating point value.
    pub fn number_text(&self) -> Option<String> {
        match self {
            Value::Byte(v) => Some(v.to_string()),
            Value::Short(v) => Some(v.to_string()),
            Value::Int(v) => Some(v.to_string()),
            Value::Long(v) => Some(v.to_string()),
            Value::Float(v) => Some(float_text(v.to_string(), v.is_finite())),
            Value::Double(v) => Some(float_text(v.to_string(), v.is_finite())),
            Value::BigInteger(v) => Some(v.to_string()),
            Value::BigDecimal(v) => Some(v.to_string()),
            _ => None,
        }
    }

    /// Equality of canonical serialized form
    ///
    /// Two values are canonically equal when they would serialize to the
    /// same compact text: numbers compare by their decimal text regardless
    /// of width, lists, sets and arrays are interchangeable, and maps
    /// compare entry by entry in order. This is the identity used for set
    /// membership.
    pub fn canonical_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va.canonical_eq(vb))
            }
            (a, b) if a.is_enumeration() && b.is_enumeration() => {
                match (a.as_slice(), b.as_slice()) {
                    (Some(xs), Some(ys)) => {
                        xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| x.canonical_eq(y))
                    }
                    _ => false,
                }
            }
            (a, b) if a.is_number() && b.is_number() => a.number_text() == b.number_text(),
            (a, b) => a == b,
        }
    }
}

fn float_text(mut text: String, finite: bool) -> String {
    if finite && !text.contains('.') && !text.contains('e') {
        text.push_str(".0");
    }
    text
}

/// Insert `value` into a set's storage, replacing any canonically equal element
///
/// Returns the position the value ended up at. An existing equal element is
/// removed first and the new value appended, so re-adding moves it to the end.
pub fn set_upsert(items: &mut Vec<Value>, value: Value) -> usize {
    items.retain(|existing| !existing.canonical_eq(&value));
    items.push(value);
    items.len() - 1
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    BigInt => BigInteger,
    BigDecimal => BigDecimal,
    String => String,
    Vec<u8> => Bytes,
    DateTime<Utc> => Date,
    Uuid => Uuid,
    IpAddr => InetAddress,
    CustomValue => Custom,
    Map => Map,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[derive(Debug)]
    struct Money(i64);

    impl CustomScalar for Money {
        fn type_name(&self) -> &'static str {
            "Money"
        }
        fn to_text(&self) -> String {
            format!("{}.{:02}", self.0 / 100, self.0 % 100)
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_value_type_tags() {
        assert_eq!(Value::Null.value_type(), ValueType::Null);
        assert_eq!(Value::from(1i32).value_type(), ValueType::Int);
        assert_eq!(Value::from(1i64).value_type(), ValueType::Long);
        assert_eq!(Value::from("x").value_type(), ValueType::String);
        assert_eq!(Value::map().value_type(), ValueType::Map);
        assert_eq!(
            Value::Custom(CustomValue::new(Money(150))).value_type(),
            ValueType::Custom("Money")
        );
    }

    #[test]
    fn test_kind_predicates() {
        assert!(Value::list().is_enumeration());
        assert!(Value::set().is_structure());
        assert!(!Value::map().is_enumeration());
        assert!(Value::from(3i8).is_number());
        assert!(Value::from(3i8).is_scalar());
        assert!(!Value::Null.is_scalar());
        assert!(Value::Null.is_empty());
        assert!(Value::map().is_empty());
        assert!(!Value::from("x").is_empty());
    }

    #[test]
    fn test_float_text_keeps_fraction() {
        assert_eq!(Value::Double(1.0).number_text().unwrap(), "1.0");
        assert_eq!(Value::Double(2.5).number_text().unwrap(), "2.5");
        assert_eq!(Value::Float(0.1).number_text().unwrap(), "0.1");
        assert_eq!(Value::Long(7).number_text().unwrap(), "7");
        assert_eq!(Value::from("7").number_text(), None);
    }

    #[test]
    fn test_canonical_eq_ignores_numeric_width() {
        assert!(Value::Int(1).canonical_eq(&Value::Long(1)));
        assert!(Value::Byte(5).canonical_eq(&Value::BigInteger(BigInt::from(5))));
        assert!(!Value::Long(1).canonical_eq(&Value::Double(1.0)));
        assert!(!Value::Long(1).canonical_eq(&Value::from("1")));
    }

    #[test]
    fn test_canonical_eq_map_order_matters() {
        let mut a = Map::new();
        a.insert("x".into(), Value::Long(1));
        a.insert("y".into(), Value::Long(2));
        let mut b = Map::new();
        b.insert("y".into(), Value::Long(2));
        b.insert("x".into(), Value::Long(1));

        assert_eq!(Value::Map(a.clone()), Value::Map(b.clone()));
        assert!(!Value::Map(a.clone()).canonical_eq(&Value::Map(b)));
        assert!(Value::Map(a.clone()).canonical_eq(&Value::Map(a)));
    }

    #[test]
    fn test_canonical_eq_enumerations_interchangeable() {
        let list = Value::List(vec![Value::Long(1), Value::from("a")]);
        let array = Value::Array(vec![Value::Int(1), Value::from("a")].into_boxed_slice());
        assert!(list.canonical_eq(&array));
    }

    #[test]
    fn test_set_upsert_moves_duplicate_to_end() {
        let mut items = vec![Value::Long(1), Value::Long(2), Value::Long(3)];
        let pos = set_upsert(&mut items, Value::Int(1));
        assert_eq!(pos, 2);
        assert_eq!(items, vec![Value::Long(2), Value::Long(3), Value::Int(1)]);
    }

    #[test]
    fn test_set_from_dedupes() {
        let set = Value::set_from(vec![
            Value::Long(1),
            Value::Long(2),
            Value::Long(1),
            Value::from("a"),
        ]);
        assert_eq!(set.len(), Some(3));
    }

    #[test]
    fn test_custom_value_downcast() {
        let custom = CustomValue::new(Money(1234));
        assert_eq!(custom.to_text(), "12.34");
        assert_eq!(custom.downcast_ref::<Money>().map(|m| m.0), Some(1234));
    }

    #[test]
    fn test_child_at_uses_iteration_order() {
        let mut m = Map::new();
        m.insert("b".into(), Value::Long(2));
        m.insert("a".into(), Value::Long(1));
        let map = Value::Map(m);
        assert_eq!(map.child_at(0), Some(&Value::Long(2)));
        assert_eq!(map.child_at(2), None);
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(Some(3i32)), Value::Int(3));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(
            Value::from(BigDecimal::from_str("1.50").unwrap()).value_type(),
            ValueType::BigDecimal
        );
        assert_eq!(Value::from(&b"ab"[..]), Value::Bytes(vec![b'a', b'b']));
    }
}
