//! Conversion registry
//!
//! Converters are looked up by `(target, source)` type pair first, then by
//! target alone (the target's *fallback*). Conversions of null always yield
//! null; conversions to [`ValueType::Any`] or to the value's own type are
//! the identity.
//!
//! A process-wide registry, pre-loaded with the default converter set,
//! backs the free functions in this module. Registrations replace earlier
//! ones for the same key and are visible to every thread afterwards.

use crate::basic;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use doctree_core::{ConversionError, Value, ValueType};
use num_bigint::BigInt;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// A single conversion function
pub type Converter = Arc<dyn Fn(&Value) -> Result<Value, ConversionError> + Send + Sync>;

// =============================================================================
// Global Converter Registry
// =============================================================================
//
// Lookups clone the converter handle and release the lock before running it,
// since converters for structured targets convert their elements recursively.

static REGISTRY: Lazy<RwLock<ConverterRegistry>> =
    Lazy::new(|| RwLock::new(ConverterRegistry::with_defaults()));

/// A table of converters keyed by type
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    exact: HashMap<(ValueType, ValueType), Converter>,
    fallback: HashMap<ValueType, Converter>,
    unquoted: HashSet<ValueType>,
}

impl ConverterRegistry {
    /// A registry with no converters at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the default converter set
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        basic::register_defaults(&mut registry);
        registry
    }

    /// Register a converter for one `(to, from)` pair
    pub fn register<F>(&mut self, to: ValueType, from: ValueType, converter: F)
    where
        F: Fn(&Value) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        self.exact.insert((to, from), Arc::new(converter));
    }

    /// Register the fallback converter for a target type
    pub fn register_fallback<F>(&mut self, to: ValueType, converter: F)
    where
        F: Fn(&Value) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        self.fallback.insert(to, Arc::new(converter));
    }

    /// Mark types whose text form is written without quotes
    pub fn add_unquoted_types(&mut self, types: &[ValueType]) {
        self.unquoted.extend(types.iter().copied());
    }

    /// Whether values of `value_type` serialize without quotes
    pub fn is_unquoted(&self, value_type: ValueType) -> bool {
        self.unquoted.contains(&value_type)
    }

    /// Every registered exact `(to, from)` pair
    pub fn exact_pairs(&self) -> Vec<(ValueType, ValueType)> {
        self.exact.keys().copied().collect()
    }

    /// Whether a fallback converter exists for `to`
    pub fn has_fallback(&self, to: ValueType) -> bool {
        self.fallback.contains_key(&to)
    }

    fn lookup(&self, to: ValueType, from: ValueType) -> Option<Converter> {
        self.exact
            .get(&(to, from))
            .or_else(|| self.fallback.get(&to))
            .cloned()
    }

    /// Convert `value` to the `to` type using this registry
    ///
    /// Nested conversions performed by the converters go through the
    /// process-wide registry.
    pub fn convert(&self, to: ValueType, value: &Value) -> Result<Value, ConversionError> {
        if let Some(done) = trivial(to, value) {
            return Ok(done);
        }
        let from = value.value_type();
        match self.lookup(to, from) {
            Some(converter) => converter(value),
            None => Err(ConversionError::NotRegistered { from, to }),
        }
    }
}

fn trivial(to: ValueType, value: &Value) -> Option<Value> {
    if value.is_null() {
        return Some(Value::Null);
    }
    if to == ValueType::Any || value.value_type() == to {
        return Some(value.clone());
    }
    None
}

/// Convert `value` to the `to` type with the process-wide registry
///
/// # Errors
///
/// [`ConversionError::NotRegistered`] when no converter applies, or the
/// converter's own error when the input is unusable.
pub fn convert(to: ValueType, value: &Value) -> Result<Value, ConversionError> {
    if let Some(done) = trivial(to, value) {
        return Ok(done);
    }
    let from = value.value_type();
    let converter = REGISTRY.read().lookup(to, from);
    match converter {
        Some(converter) => converter(value),
        None => {
            debug!(target: "doctree::convert", %from, %to, "no converter registered");
            Err(ConversionError::NotRegistered { from, to })
        }
    }
}

/// Convert `value` into a Rust type, mapping null to `None`
pub fn convert_to<T: Convertible>(value: &Value) -> Result<Option<T>, ConversionError> {
    let from = value.value_type();
    match convert(T::TYPE, value)? {
        Value::Null => Ok(None),
        converted => T::from_value(converted).map(Some).ok_or_else(|| {
            ConversionError::invalid(from, T::TYPE, "converter produced a different type")
        }),
    }
}

/// Register an exact-pair converter in the process-wide registry
pub fn register<F>(to: ValueType, from: ValueType, converter: F)
where
    F: Fn(&Value) -> Result<Value, ConversionError> + Send + Sync + 'static,
{
    debug!(target: "doctree::convert", %from, %to, "registering converter");
    REGISTRY.write().register(to, from, converter);
}

/// Register a fallback converter in the process-wide registry
pub fn register_fallback<F>(to: ValueType, converter: F)
where
    F: Fn(&Value) -> Result<Value, ConversionError> + Send + Sync + 'static,
{
    debug!(target: "doctree::convert", %to, "registering fallback converter");
    REGISTRY.write().register_fallback(to, converter);
}

/// Mark types as unquoted in the process-wide registry
pub fn add_unquoted_types(types: &[ValueType]) {
    REGISTRY.write().add_unquoted_types(types);
}

/// Whether `value_type` serializes without quotes, per the process-wide registry
pub fn is_unquoted(value_type: ValueType) -> bool {
    REGISTRY.read().is_unquoted(value_type)
}

/// Snapshot of the process-wide registry
pub fn snapshot() -> ConverterRegistry {
    REGISTRY.read().clone()
}

// =============================================================================
// Typed conversion targets
// =============================================================================

/// Rust types that can be produced by a conversion
pub trait Convertible: Sized + Into<Value> {
    /// The conversion target type
    const TYPE: ValueType;

    /// Extract the Rust value from a converted value of type [`Self::TYPE`]
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_convertible {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Convertible for $ty {
                const TYPE: ValueType = ValueType::$variant;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_convertible! {
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
}

impl Convertible for Value {
    const TYPE: ValueType = ValueType::Any;

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}
