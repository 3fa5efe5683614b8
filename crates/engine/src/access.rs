//! Typed reads
//!
//! Every getter converts the value at this position through the global
//! converter registry. A null value (or a vanished position) reads as
//! `Ok(None)`; a value the registry cannot convert is an error, never a
//! silent default.

use crate::tree::Tree;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use doctree_convert::{convert_to, Convertible};
use doctree_core::Result;
use num_bigint::BigInt;
use std::net::IpAddr;
use uuid::Uuid;

impl Tree {
    /// Value converted to `T`
    pub fn as_type<T: Convertible>(&self) -> Result<Option<T>> {
        let value = self.as_value();
        Ok(convert_to::<T>(&value)?)
    }

    /// Value as a boolean
    pub fn as_bool(&self) -> Result<Option<bool>> {
        self.as_type()
    }

    /// Value as an 8-bit integer
    pub fn as_byte(&self) -> Result<Option<i8>> {
        self.as_type()
    }

    /// Value as a 16-bit integer
    pub fn as_short(&self) -> Result<Option<i16>> {
        self.as_type()
    }

    /// Value as a 32-bit integer
    pub fn as_int(&self) -> Result<Option<i32>> {
        self.as_type()
    }

    /// Value as a 64-bit integer
    pub fn as_long(&self) -> Result<Option<i64>> {
        self.as_type()
    }

    /// Value as a single precision float
    pub fn as_float(&self) -> Result<Option<f32>> {
        self.as_type()
    }

    /// Value as a double precision float
    pub fn as_double(&self) -> Result<Option<f64>> {
        self.as_type()
    }

    /// Value as an arbitrary precision integer
    pub fn as_big_integer(&self) -> Result<Option<BigInt>> {
        self.as_type()
    }

    /// Value as an arbitrary precision decimal
    pub fn as_big_decimal(&self) -> Result<Option<BigDecimal>> {
        self.as_type()
    }

    /// Value as text
    ///
    /// Structures render as compact JSON-like text.
    pub fn as_string(&self) -> Result<Option<String>> {
        self.as_type()
    }

    /// Value as raw bytes
    ///
    /// Text that looks like Base64 is decoded; other text gives its UTF-8
    /// bytes.
    pub fn as_bytes(&self) -> Result<Option<Vec<u8>>> {
        self.as_type()
    }

    /// Value as a UTC timestamp
    pub fn as_date(&self) -> Result<Option<DateTime<Utc>>> {
        self.as_type()
    }

    /// Value as a UUID
    pub fn as_uuid(&self) -> Result<Option<Uuid>> {
        self.as_type()
    }

    /// Value as an IP address
    pub fn as_inet_address(&self) -> Result<Option<IpAddr>> {
        self.as_type()
    }

    /// Value at `path` converted to `T`, or `default` when the path is
    /// missing or holds null
    ///
    /// # Example
    ///
    /// ```
    /// use doctree_engine::Tree;
    ///
    /// let tree = Tree::parse(r#"{"port":"8080"}"#).unwrap();
    /// assert_eq!(tree.get_or("port", 80i32).unwrap(), 8080);
    /// assert_eq!(tree.get_or("timeout", 30i64).unwrap(), 30);
    /// ```
    pub fn get_or<T: Convertible>(&self, path: &str, default: T) -> Result<T> {
        match self.get(path) {
            Some(node) => Ok(node.as_type::<T>()?.unwrap_or(default)),
            None => Ok(default),
        }
    }

    /// Every child converted to `T`, in iteration order
    pub fn values_as<T: Convertible>(&self) -> Result<Vec<Option<T>>> {
        self.children().map(|child| child.as_type::<T>()).collect()
    }
}
