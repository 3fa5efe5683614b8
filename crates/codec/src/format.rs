//! Reader/writer traits and the format registry
//!
//! A format is identified by a lowercase name (`"json"`, `"debug"`, …).
//! Readers turn text or bytes into a [`Value`]; writers turn a value and an
//! optional meta value back into text or bytes. The process-wide registry
//! starts with the built-in JSON reader and writer and the debug writer.
//! JSON is the default format and cannot be removed.

use crate::debug::DebugWriter;
use crate::json::{JsonReader, JsonWriter};
use doctree_core::{Error, ParseError, Result, Value};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Name of the built-in JSON format
pub const JSON: &str = "json";

/// Name of the built-in debug dump format
pub const DEBUG: &str = "debug";

/// Parses serialized input into a value.
///
/// # Thread Safety
///
/// Readers are shared process-wide and must be `Send + Sync`.
pub trait TreeReader: Send + Sync {
    /// Format name used for registry lookup
    fn format(&self) -> &str;

    /// Parse text into a value
    fn parse(&self, text: &str) -> Result<Value>;

    /// Parse raw bytes into a value
    ///
    /// The default decodes the bytes as UTF-8 text.
    fn parse_bytes(&self, bytes: &[u8]) -> Result<Value> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            ParseError::new(format!("input is not valid UTF-8: {}", e), e.valid_up_to())
        })?;
        self.parse(text)
    }
}

/// Serializes a value (and optionally its meta value).
///
/// # Thread Safety
///
/// Writers are shared process-wide and must be `Send + Sync`.
pub trait TreeWriter: Send + Sync {
    /// Format name used for registry lookup
    fn format(&self) -> &str;

    /// Serialize to text
    ///
    /// `meta` is emitted only when `insert_meta` is set and the format has
    /// a place for it.
    fn serialize(
        &self,
        value: &Value,
        meta: Option<&Value>,
        pretty: bool,
        insert_meta: bool,
    ) -> Result<String>;

    /// Serialize to bytes
    ///
    /// The default is the compact text form as UTF-8.
    fn serialize_bytes(
        &self,
        value: &Value,
        meta: Option<&Value>,
        insert_meta: bool,
    ) -> Result<Vec<u8>> {
        self.serialize(value, meta, false, insert_meta)
            .map(String::into_bytes)
    }
}

// =============================================================================
// Format Registry
// =============================================================================

static REGISTRY: Lazy<RwLock<FormatRegistry>> =
    Lazy::new(|| RwLock::new(FormatRegistry::with_defaults()));

/// Readers and writers keyed by lowercase format name
#[derive(Clone)]
pub struct FormatRegistry {
    readers: HashMap<String, Arc<dyn TreeReader>>,
    writers: HashMap<String, Arc<dyn TreeWriter>>,
}

impl FormatRegistry {
    /// Registry holding the built-in JSON and debug formats
    pub fn with_defaults() -> Self {
        let mut registry = FormatRegistry {
            readers: HashMap::new(),
            writers: HashMap::new(),
        };
        registry.register_reader(Arc::new(JsonReader::new()));
        registry.register_writer(Arc::new(JsonWriter));
        registry.register_writer(Arc::new(DebugWriter));
        registry
    }

    /// Register a reader under its own format name, replacing any earlier one
    pub fn register_reader(&mut self, reader: Arc<dyn TreeReader>) {
        self.readers.insert(reader.format().to_lowercase(), reader);
    }

    /// Register a writer under its own format name, replacing any earlier one
    pub fn register_writer(&mut self, writer: Arc<dyn TreeWriter>) {
        self.writers.insert(writer.format().to_lowercase(), writer);
    }

    /// Reader for `format`
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFormat`] when no reader is registered under that name.
    pub fn reader(&self, format: &str) -> Result<Arc<dyn TreeReader>> {
        self.readers
            .get(&format.to_lowercase())
            .cloned()
            .ok_or_else(|| Error::UnknownFormat(format.to_string()))
    }

    /// Writer for `format`
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFormat`] when no writer is registered under that name.
    pub fn writer(&self, format: &str) -> Result<Arc<dyn TreeWriter>> {
        self.writers
            .get(&format.to_lowercase())
            .cloned()
            .ok_or_else(|| Error::UnknownFormat(format.to_string()))
    }

    /// Drop the reader and writer of `format`
    ///
    /// Returns whether anything was registered under that name.
    pub fn remove(&mut self, format: &str) -> Result<bool> {
        let key = format.to_lowercase();
        if key == JSON {
            return Err(Error::UnsupportedOperation {
                kind: "default format",
                operation: "remove",
            });
        }
        let reader = self.readers.remove(&key).is_some();
        let writer = self.writers.remove(&key).is_some();
        Ok(reader || writer)
    }

    /// Names of every format with a reader or a writer, sorted
    pub fn formats(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .readers
            .keys()
            .chain(self.writers.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Reader for `format` from the process-wide registry
pub fn reader(format: &str) -> Result<Arc<dyn TreeReader>> {
    REGISTRY.read().reader(format)
}

/// Writer for `format` from the process-wide registry
pub fn writer(format: &str) -> Result<Arc<dyn TreeWriter>> {
    REGISTRY.read().writer(format)
}

/// Add a reader to the process-wide registry
pub fn register_reader(reader: Arc<dyn TreeReader>) {
    debug!(target: "doctree::codec", format = reader.format(), "registering reader");
    REGISTRY.write().register_reader(reader);
}

/// Add a writer to the process-wide registry
pub fn register_writer(writer: Arc<dyn TreeWriter>) {
    debug!(target: "doctree::codec", format = writer.format(), "registering writer");
    REGISTRY.write().register_writer(writer);
}

/// Remove a format from the process-wide registry
pub fn remove_format(format: &str) -> Result<bool> {
    debug!(target: "doctree::codec", format, "removing format");
    REGISTRY.write().remove(format)
}

/// Names of the formats in the process-wide registry
pub fn formats() -> Vec<String> {
    REGISTRY.read().formats()
}
