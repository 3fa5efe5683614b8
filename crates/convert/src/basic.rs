//! The default converter set
//!
//! Every built-in target type gets one conversion function. The function is
//! registered as the target's fallback and, for the source types it handles
//! without going through text, as an exact-pair converter too. Sources
//! without a dedicated rule are rendered as text first and parsed leniently
//! (see [`crate::numeric`] and [`crate::date`]).

use crate::binary::{
    address_to_bytes, bytes_to_address, bytes_to_decimal, bytes_to_uuid, decimal_to_bytes,
    decode_base64, encode_base64, integer_to_address, integer_to_bytes, looks_like_base64,
    uuid_msb, uuid_to_bytes,
};
use crate::date::DateCoercion;
use crate::numeric::{
    bigint_low_i64, decimal_to_integer, number_text_to_bool, parse_big_decimal,
    parse_big_integer, parse_fractional, parse_integral,
};
use crate::registry::{self, ConverterRegistry};
use bigdecimal::BigDecimal;
use doctree_core::{ConversionError, Map, Value, ValueType};
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use std::net::IpAddr;
use std::str::FromStr;

type ConvertFn = fn(&Value) -> Result<Value, ConversionError>;

/// Source types with a direct (non-textual) numeric reading
const NUMERIC_SOURCES: &[ValueType] = &[
    ValueType::Bool,
    ValueType::Date,
    ValueType::Bytes,
    ValueType::Uuid,
    ValueType::InetAddress,
];

const NUMBER_TYPES: &[ValueType] = &[
    ValueType::Byte,
    ValueType::Short,
    ValueType::Int,
    ValueType::Long,
    ValueType::Float,
    ValueType::Double,
    ValueType::BigInteger,
    ValueType::BigDecimal,
];

/// Load the default converters and unquoted types into `registry`
pub fn register_defaults(registry: &mut ConverterRegistry) {
    install(
        registry,
        ValueType::String,
        to_string,
        &[
            ValueType::Bytes,
            ValueType::Date,
            ValueType::Bool,
            ValueType::InetAddress,
            ValueType::Uuid,
        ],
    );
    install(
        registry,
        ValueType::Bytes,
        to_bytes,
        &[
            ValueType::Uuid,
            ValueType::Bool,
            ValueType::Byte,
            ValueType::Date,
            ValueType::InetAddress,
        ],
    );

    install(registry, ValueType::Byte, to_byte, NUMERIC_SOURCES);
    install(registry, ValueType::Short, to_short, NUMERIC_SOURCES);
    install(registry, ValueType::Int, to_int, NUMERIC_SOURCES);
    install(registry, ValueType::Long, to_long, NUMERIC_SOURCES);
    install(registry, ValueType::Float, to_float, NUMERIC_SOURCES);
    install(registry, ValueType::Double, to_double, NUMERIC_SOURCES);
    registry.register(ValueType::Double, ValueType::Float, to_double);
    install(registry, ValueType::BigInteger, to_big_integer, NUMERIC_SOURCES);
    install(registry, ValueType::BigDecimal, to_big_decimal, NUMERIC_SOURCES);
    for from in [ValueType::Double, ValueType::Float, ValueType::BigInteger] {
        registry.register(ValueType::BigDecimal, from, to_big_decimal);
    }

    install(
        registry,
        ValueType::Bool,
        to_bool,
        &[
            ValueType::String,
            ValueType::Date,
            ValueType::Uuid,
            ValueType::Bytes,
            ValueType::InetAddress,
        ],
    );

    let mut date_sources = NUMBER_TYPES.to_vec();
    date_sources.extend([
        ValueType::Bool,
        ValueType::Bytes,
        ValueType::Uuid,
        ValueType::InetAddress,
    ]);
    install(registry, ValueType::Date, to_date, &date_sources);

    install(
        registry,
        ValueType::Uuid,
        to_uuid,
        &[ValueType::Bytes, ValueType::Bool],
    );
    install(
        registry,
        ValueType::InetAddress,
        to_address,
        &[ValueType::Bytes, ValueType::Uuid, ValueType::Date],
    );

    registry.register_fallback(ValueType::Map, to_map);
    registry.register_fallback(ValueType::List, to_list);
    registry.register_fallback(ValueType::Set, to_set);
    registry.register_fallback(ValueType::Array, to_array);

    let mut unquoted = vec![ValueType::Bool];
    unquoted.extend_from_slice(NUMBER_TYPES);
    if !DateCoercion::global().use_timestamps() {
        unquoted.push(ValueType::Date);
    }
    registry.add_unquoted_types(&unquoted);
}

fn install(registry: &mut ConverterRegistry, to: ValueType, f: ConvertFn, exact: &[ValueType]) {
    for from in exact {
        registry.register(to, *from, f);
    }
    registry.register_fallback(to, f);
}

fn invalid(value: &Value, to: ValueType, reason: &str) -> ConversionError {
    ConversionError::invalid(value.value_type(), to, reason)
}

// =============================================================================
// Text
// =============================================================================

/// Text form of any value
pub fn text_of(value: &Value) -> Result<String, ConversionError> {
    Ok(match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Bytes(b) => encode_base64(b),
        Value::Date(d) => DateCoercion::global().format(d),
        Value::Uuid(u) => u.to_string(),
        Value::InetAddress(a) => a.to_string(),
        Value::Custom(c) => c.to_text(),
        v if v.is_structure() => {
            let mut out = String::new();
            render_structure(v, &mut out)?;
            out
        }
        v => v.number_text().unwrap_or_default(),
    })
}

fn render_structure(value: &Value, out: &mut String) -> Result<(), ConversionError> {
    match value {
        Value::Map(map) => {
            out.push('{');
            for (i, (key, child)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_quoted(out, key);
                out.push(':');
                render_structure(child, out)?;
            }
            out.push('}');
        }
        Value::List(_) | Value::Set(_) | Value::Array(_) => {
            out.push('[');
            for (i, child) in value.as_slice().unwrap_or(&[]).iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_structure(child, out)?;
            }
            out.push(']');
        }
        Value::Null => out.push_str("null"),
        scalar => {
            let text = text_of(scalar)?;
            if registry::is_unquoted(scalar.value_type()) {
                out.push_str(&text);
            } else {
                push_quoted(out, &text);
            }
        }
    }
    Ok(())
}

fn push_quoted(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

fn to_string(value: &Value) -> Result<Value, ConversionError> {
    text_of(value).map(Value::String)
}

// =============================================================================
// Numbers
// =============================================================================

fn is_direct_numeric(value: &Value) -> bool {
    value.is_number()
        || matches!(
            value,
            Value::Bool(_)
                | Value::Date(_)
                | Value::Bytes(_)
                | Value::Uuid(_)
                | Value::InetAddress(_)
        )
}

fn address_integer(addr: &IpAddr) -> BigInt {
    BigInt::from_signed_bytes_be(&address_to_bytes(addr))
}

fn uuid_integer(id: &uuid::Uuid) -> BigInt {
    BigInt::from_signed_bytes_be(&uuid_to_bytes(id))
}

/// 64-bit integer reading of a value, wrapping like a narrowing cast
fn long_of(value: &Value, to: ValueType) -> Result<i64, ConversionError> {
    Ok(match value {
        Value::Bool(b) => *b as i64,
        Value::Byte(v) => *v as i64,
        Value::Short(v) => *v as i64,
        Value::Int(v) => *v as i64,
        Value::Long(v) => *v,
        Value::Float(v) => *v as i64,
        Value::Double(v) => *v as i64,
        Value::BigInteger(v) => bigint_low_i64(v),
        Value::BigDecimal(v) => bigint_low_i64(&decimal_to_integer(v)),
        Value::Date(d) => d.timestamp_millis(),
        Value::Bytes(raw) => bigint_low_i64(&decimal_to_integer(&bytes_to_decimal(raw))),
        Value::Uuid(id) => uuid_msb(id),
        Value::InetAddress(addr) => bigint_low_i64(&address_integer(addr)),
        other => {
            let text = text_of(other)?;
            parse_integral(&text).ok_or_else(|| invalid(other, to, "not an integer"))?
        }
    })
}

/// Integer reading for narrow targets; text outside the target range is rejected
fn narrow_of(value: &Value, to: ValueType, min: i64, max: i64) -> Result<i64, ConversionError> {
    let n = long_of(value, to)?;
    if !is_direct_numeric(value) && (n < min || n > max) {
        return Err(invalid(value, to, "out of range"));
    }
    Ok(n)
}

fn to_byte(value: &Value) -> Result<Value, ConversionError> {
    // Bytes read as their first byte, like a narrowing cast of the decimal
    long_of(value, ValueType::Byte).map(|n| Value::Byte(n as i8))
}

fn to_short(value: &Value) -> Result<Value, ConversionError> {
    narrow_of(value, ValueType::Short, i16::MIN as i64, i16::MAX as i64)
        .map(|n| Value::Short(n as i16))
}

fn to_int(value: &Value) -> Result<Value, ConversionError> {
    narrow_of(value, ValueType::Int, i32::MIN as i64, i32::MAX as i64).map(|n| Value::Int(n as i32))
}

fn to_long(value: &Value) -> Result<Value, ConversionError> {
    long_of(value, ValueType::Long).map(Value::Long)
}

/// Floating point reading of a value
fn double_of(value: &Value, to: ValueType) -> Result<f64, ConversionError> {
    let lossy = |n: Option<f64>| n.ok_or_else(|| invalid(value, to, "not representable"));
    match value {
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Byte(v) => Ok(*v as f64),
        Value::Short(v) => Ok(*v as f64),
        Value::Int(v) => Ok(*v as f64),
        Value::Long(v) => Ok(*v as f64),
        // Through text, so 0.1f32 widens to 0.1 rather than 0.10000000149
        Value::Float(v) => lossy(v.to_string().parse::<f64>().ok()),
        Value::Double(v) => Ok(*v),
        Value::BigInteger(v) => lossy(v.to_f64()),
        Value::BigDecimal(v) => lossy(v.to_f64()),
        Value::Date(d) => Ok(d.timestamp_millis() as f64),
        Value::Bytes(raw) => lossy(bytes_to_decimal(raw).to_f64()),
        Value::Uuid(id) => Ok(uuid_msb(id) as f64),
        Value::InetAddress(addr) => lossy(address_integer(addr).to_f64()),
        other => {
            let text = text_of(other)?;
            parse_fractional(&text).ok_or_else(|| invalid(other, to, "not a number"))
        }
    }
}

fn to_float(value: &Value) -> Result<Value, ConversionError> {
    double_of(value, ValueType::Float).map(|n| Value::Float(n as f32))
}

fn to_double(value: &Value) -> Result<Value, ConversionError> {
    double_of(value, ValueType::Double).map(Value::Double)
}

fn big_integer_of(value: &Value) -> Result<BigInt, ConversionError> {
    let to = ValueType::BigInteger;
    match value {
        Value::Bool(b) => Ok(BigInt::from(*b as u8)),
        Value::Byte(v) => Ok(BigInt::from(*v)),
        Value::Short(v) => Ok(BigInt::from(*v)),
        Value::Int(v) => Ok(BigInt::from(*v)),
        Value::Long(v) => Ok(BigInt::from(*v)),
        Value::Float(v) => {
            BigInt::from_f32(*v).ok_or_else(|| invalid(value, to, "not a finite number"))
        }
        Value::Double(v) => {
            BigInt::from_f64(*v).ok_or_else(|| invalid(value, to, "not a finite number"))
        }
        Value::BigInteger(v) => Ok(v.clone()),
        Value::BigDecimal(v) => Ok(decimal_to_integer(v)),
        Value::Date(d) => Ok(BigInt::from(d.timestamp_millis())),
        Value::Bytes(raw) => Ok(decimal_to_integer(&bytes_to_decimal(raw))),
        Value::Uuid(id) => Ok(uuid_integer(id)),
        Value::InetAddress(addr) => Ok(address_integer(addr)),
        other => {
            let text = text_of(other)?;
            parse_big_integer(&text).ok_or_else(|| invalid(other, to, "not an integer"))
        }
    }
}

fn to_big_integer(value: &Value) -> Result<Value, ConversionError> {
    big_integer_of(value).map(Value::BigInteger)
}

fn big_decimal_of(value: &Value) -> Result<BigDecimal, ConversionError> {
    let to = ValueType::BigDecimal;
    let from_text = |text: String| {
        BigDecimal::from_str(&text).map_err(|_| invalid(value, to, "not a finite number"))
    };
    match value {
        Value::Float(v) => from_text(v.to_string()),
        Value::Double(v) => from_text(v.to_string()),
        Value::BigDecimal(v) => Ok(v.clone()),
        Value::Bytes(raw) => Ok(bytes_to_decimal(raw)),
        v if is_direct_numeric(v) => big_integer_of(v).map(BigDecimal::from),
        other => {
            let text = text_of(other)?;
            parse_big_decimal(&text).ok_or_else(|| invalid(other, to, "not a number"))
        }
    }
}

fn to_big_decimal(value: &Value) -> Result<Value, ConversionError> {
    big_decimal_of(value).map(Value::BigDecimal)
}

// =============================================================================
// Booleans, dates, identifiers, addresses
// =============================================================================

fn to_bool(value: &Value) -> Result<Value, ConversionError> {
    let truth = match value {
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => true,
            "false" | "no" | "off" => false,
            _ => number_text_to_bool(s),
        },
        Value::Date(d) => d.timestamp_millis() > 0,
        Value::Uuid(id) => {
            let (msb, lsb) = id.as_u64_pair();
            msb as i64 > 0 || lsb as i64 > 0
        }
        Value::Bytes(raw) => raw.iter().any(|b| *b as i8 > 0),
        Value::InetAddress(addr) => address_to_bytes(addr).iter().any(|b| *b as i8 > 0),
        other => number_text_to_bool(&text_of(other)?),
    };
    Ok(Value::Bool(truth))
}

fn to_date(value: &Value) -> Result<Value, ConversionError> {
    let dates = DateCoercion::global();
    let millis = match value {
        Value::Bytes(raw) => bigint_low_i64(&BigInt::from_signed_bytes_be(raw)),
        v if is_direct_numeric(v) => long_of(v, ValueType::Date)?,
        other => return dates.parse(&text_of(other)?).map(Value::Date),
    };
    dates.from_millis(millis).map(Value::Date)
}

fn to_uuid(value: &Value) -> Result<Value, ConversionError> {
    let id = match value {
        Value::Bytes(raw) => bytes_to_uuid(raw),
        Value::Bool(b) => uuid::Uuid::from_u64_pair(*b as u64, 0),
        other => {
            let text = text_of(other)?;
            if text.len() == 36 {
                uuid::Uuid::parse_str(&text)
                    .map_err(|e| invalid(other, ValueType::Uuid, &e.to_string()))?
            } else {
                let n = parse_big_integer(&text)
                    .ok_or_else(|| invalid(other, ValueType::Uuid, "not a UUID or number"))?;
                bytes_to_uuid(&n.to_signed_bytes_be())
            }
        }
    };
    Ok(Value::Uuid(id))
}

fn parse_address(value: &Value, text: &str) -> Result<IpAddr, ConversionError> {
    let text = text.trim();
    let parsed = match text.split_once('/') {
        Some((host, literal)) => host.parse().or_else(|_| literal.parse()),
        None => text.parse(),
    };
    parsed.map_err(|_| invalid(value, ValueType::InetAddress, "not an IP address literal"))
}

fn to_address(value: &Value) -> Result<Value, ConversionError> {
    let addr = match value {
        Value::Bytes(raw) => bytes_to_address(raw),
        Value::Uuid(id) => integer_to_address(uuid_msb(id)),
        Value::Date(d) => integer_to_address(d.timestamp_millis()),
        v if v.is_number() || v.value_type() == ValueType::Bool => {
            integer_to_address(long_of(v, ValueType::InetAddress)?)
        }
        Value::Map(map) => {
            let host = map
                .iter()
                .find(|(k, _)| k.to_ascii_lowercase().contains("hostname"))
                .map(|(_, v)| v)
                .ok_or_else(|| invalid(value, ValueType::InetAddress, "no hostname entry"))?;
            parse_address(value, &text_of(host)?)?
        }
        other => parse_address(other, &text_of(other)?)?,
    };
    Ok(Value::InetAddress(addr))
}

// =============================================================================
// Bytes
// =============================================================================

fn to_bytes(value: &Value) -> Result<Value, ConversionError> {
    let raw = match value {
        Value::Uuid(id) => uuid_to_bytes(id),
        Value::Bool(b) => vec![*b as u8],
        Value::Byte(b) => vec![*b as u8],
        Value::Date(d) => integer_to_bytes(d.timestamp_millis()),
        Value::InetAddress(addr) => address_to_bytes(addr),
        v if v.is_number() => decimal_to_bytes(&big_decimal_of(v)?),
        Value::List(_) | Value::Set(_) | Value::Array(_) => {
            let mut raw = Vec::new();
            for item in value.as_slice().unwrap_or(&[]) {
                let byte = registry::convert_to::<i8>(item)?.unwrap_or(0);
                raw.push(byte as u8);
            }
            raw
        }
        other => {
            let text = text_of(other)?;
            match looks_like_base64(&text)
                .then(|| decode_base64(&text))
                .flatten()
            {
                Some(decoded) => decoded,
                None => text.into_bytes(),
            }
        }
    };
    Ok(Value::Bytes(raw))
}

// =============================================================================
// Structures
// =============================================================================

fn to_map(value: &Value) -> Result<Value, ConversionError> {
    let mut map = Map::new();
    match value.as_slice() {
        Some(items) => {
            for (i, item) in items.iter().enumerate() {
                map.insert(format!("key{}", i), item.clone());
            }
        }
        None => {
            map.insert("key".to_string(), value.clone());
        }
    }
    Ok(Value::Map(map))
}

fn elements(value: &Value) -> Vec<Value> {
    match value {
        Value::Map(map) => map.values().cloned().collect(),
        v => match v.as_slice() {
            Some(items) => items.to_vec(),
            None => vec![v.clone()],
        },
    }
}

fn to_list(value: &Value) -> Result<Value, ConversionError> {
    Ok(Value::List(elements(value)))
}

fn to_set(value: &Value) -> Result<Value, ConversionError> {
    Ok(Value::set_from(elements(value)))
}

fn to_array(value: &Value) -> Result<Value, ConversionError> {
    Ok(Value::Array(elements(value).into_boxed_slice()))
}
