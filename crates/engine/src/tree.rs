//! The `Tree` handle
//!
//! A `Tree` is a view of one position inside a shared document. Cloning a
//! `Tree` clones the handle, not the data: every clone (and every child
//! view obtained from it) reads and writes the same document. Use
//! [`Tree::deep_clone`] for an independent copy.
//!
//! Views never cache the value they point at. Each operation re-resolves
//! the view's location, so a view whose position has been removed reads
//! as null and refuses writes with [`Error::Detached`].
//!
//! Documents are single-owner: `Tree` is neither `Send` nor `Sync`.
//!
//! [`Error::Detached`]: doctree_core::Error::Detached

use crate::document::{detached, path_of, value_at, value_at_mut, Document, Step};
use doctree_codec::{reader, JSON};
use doctree_core::{config, Limits, Result, Value, ValueType, META_KEY};
use std::cell::RefCell;
use std::rc::Rc;

/// A view of one position in a hierarchical document
///
/// # Example
///
/// ```
/// use doctree_engine::Tree;
///
/// let tree = Tree::new();
/// tree.put("user.name", "Ada").unwrap();
/// tree.put("user.langs[1]", "en").unwrap();
///
/// assert_eq!(tree.get("user.name").unwrap().as_string().unwrap().as_deref(), Some("Ada"));
/// assert_eq!(tree.to_json(false).unwrap(), r#"{"user":{"name":"Ada","langs":[null,"en"]}}"#);
/// ```
#[derive(Clone)]
pub struct Tree {
    pub(crate) doc: Rc<RefCell<Document>>,
    pub(crate) location: Vec<Step>,
}

impl Tree {
    // ========== Construction ==========

    /// Empty map document
    pub fn new() -> Self {
        Self::with_limits(config::global().limits())
    }

    /// Empty map document with explicit write limits
    pub fn with_limits(limits: Limits) -> Self {
        Self::from_document(Document::new(Value::map(), None, limits))
    }

    /// Document holding `value` as its root
    pub fn from_value(value: impl Into<Value>) -> Self {
        Self::from_document(Document::new(
            value.into(),
            None,
            config::global().limits(),
        ))
    }

    /// Document holding `value` as its root and `meta` as its meta value
    pub fn with_meta(value: impl Into<Value>, meta: impl Into<Value>) -> Self {
        Self::from_document(Document::new(
            value.into(),
            Some(meta.into()),
            config::global().limits(),
        ))
    }

    /// Parse JSON text
    ///
    /// Blank input gives an empty map. A top-level `_meta` entry becomes
    /// the meta value.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_format(text, JSON)
    }

    /// Parse text in a registered format
    pub fn parse_format(text: &str, format: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        let value = reader(format)?.parse(text)?;
        Ok(Self::from_parsed(value))
    }

    /// Parse JSON bytes
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse_bytes_format(bytes, JSON)
    }

    /// Parse bytes in a registered format
    pub fn parse_bytes_format(bytes: &[u8], format: &str) -> Result<Self> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Self::new());
        }
        let value = reader(format)?.parse_bytes(bytes)?;
        Ok(Self::from_parsed(value))
    }

    fn from_parsed(mut value: Value) -> Self {
        let meta = match &mut value {
            Value::Map(map) => map.shift_remove(META_KEY),
            _ => None,
        };
        Self::from_document(Document::new(value, meta, config::global().limits()))
    }

    pub(crate) fn from_document(doc: Document) -> Self {
        Tree {
            doc: Rc::new(RefCell::new(doc)),
            location: Vec::new(),
        }
    }

    // ========== Internal access ==========

    pub(crate) fn view(&self, location: Vec<Step>) -> Tree {
        Tree {
            doc: Rc::clone(&self.doc),
            location,
        }
    }

    pub(crate) fn child_location(&self, step: Step) -> Vec<Step> {
        let mut location = self.location.clone();
        location.push(step);
        location
    }

    /// Run `f` on the current value, if the position still exists
    pub(crate) fn read<R>(&self, f: impl FnOnce(&Value) -> R) -> Option<R> {
        let doc = self.doc.borrow();
        value_at(&doc, &self.location).map(f)
    }

    /// Run `f` on the current value mutably
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Value) -> Result<R>) -> Result<R> {
        let mut doc = self.doc.borrow_mut();
        let value = value_at_mut(&mut doc, &self.location).ok_or_else(|| detached(&self.location))?;
        f(value)
    }

    // ========== Introspection ==========

    /// Copy of the value at this position (null when the position is gone)
    pub fn as_value(&self) -> Value {
        self.read(Value::clone).unwrap_or_default()
    }

    /// Runtime type of the value at this position
    pub fn value_type(&self) -> ValueType {
        self.read(Value::value_type).unwrap_or(ValueType::Null)
    }

    /// Whether the value is null (or the position no longer exists)
    pub fn is_null(&self) -> bool {
        self.read(Value::is_null).unwrap_or(true)
    }

    /// Whether this view is the document root
    pub fn is_root(&self) -> bool {
        self.location.is_empty()
    }

    /// Whether this view is the meta value or inside it
    pub fn is_meta(&self) -> bool {
        self.location.first() == Some(&Step::Meta)
    }

    /// Whether the value is a scalar or null
    pub fn is_primitive(&self) -> bool {
        !self.is_structure()
    }

    /// Whether the value is a map, list, set or array
    pub fn is_structure(&self) -> bool {
        self.read(Value::is_structure).unwrap_or(false)
    }

    /// Whether the value is a list, set or array
    pub fn is_enumeration(&self) -> bool {
        self.read(Value::is_enumeration).unwrap_or(false)
    }

    /// Whether the value is a map
    pub fn is_map(&self) -> bool {
        self.read(Value::is_map).unwrap_or(false)
    }

    /// Whether the value is a list
    pub fn is_list(&self) -> bool {
        self.read(Value::is_list).unwrap_or(false)
    }

    /// Whether the value is a set
    pub fn is_set(&self) -> bool {
        self.read(Value::is_set).unwrap_or(false)
    }

    /// Whether the value is a fixed-size array
    pub fn is_array(&self) -> bool {
        self.read(Value::is_array).unwrap_or(false)
    }

    /// Number of children; 0 for null, 1 for a scalar
    pub fn size(&self) -> usize {
        self.read(|value| match value {
            Value::Null => 0,
            other => other.len().unwrap_or(1),
        })
        .unwrap_or(0)
    }

    /// Whether [`size`](Self::size) is zero
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Name of this position within its parent
    ///
    /// Map children are named by key, positions in lists, sets and arrays
    /// by their index; the meta value is `_meta`. The root has no name.
    pub fn name(&self) -> Option<String> {
        self.location.last().map(|step| match step {
            Step::Key(k) => k.clone(),
            Step::Index(i) => i.to_string(),
            Step::Meta => META_KEY.to_string(),
        })
    }

    /// Path from the root to this position, e.g. `a.b[2].c`
    pub fn path(&self) -> String {
        path_of(&self.location, 0)
    }

    /// Path from the root, with every index shifted by `start_index`
    pub fn path_from(&self, start_index: usize) -> String {
        path_of(&self.location, start_index)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctree_core::Error;

    #[test]
    fn test_new_is_empty_map() {
        let tree = Tree::new();
        assert!(tree.is_map());
        assert!(tree.is_root());
        assert!(tree.is_empty());
        assert_eq!(tree.name(), None);
        assert_eq!(tree.path(), "");
    }

    #[test]
    fn test_parse_blank_is_empty_map() {
        assert!(Tree::parse("  \r\n").unwrap().is_map());
        assert!(Tree::parse_bytes(b"").unwrap().is_map());
    }

    #[test]
    fn test_parse_moves_meta() {
        let tree = Tree::parse(r#"{"a":1,"_meta":{"v":2}}"#).unwrap();
        assert_eq!(tree.size(), 1);
        assert!(tree.has_meta());
        assert_eq!(tree.get("_meta.v").unwrap().as_long().unwrap(), Some(2));
    }

    #[test]
    fn test_parse_unknown_format() {
        assert!(matches!(
            Tree::parse_format("x", "yaml"),
            Err(Error::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_sizes() {
        assert_eq!(Tree::from_value(Value::Null).size(), 0);
        assert_eq!(Tree::from_value(5i64).size(), 1);
        assert_eq!(Tree::parse("[1,2,3]").unwrap().size(), 3);
        assert!(Tree::from_value(5i64).is_primitive());
        assert!(Tree::from_value(Value::Null).is_primitive());
    }

    #[test]
    fn test_clone_shares_document() {
        let tree = Tree::new();
        let alias = tree.clone();
        alias.put("a", 1i64).unwrap();
        assert!(tree.exists("a"));
    }

    #[test]
    fn test_names_and_paths() {
        let tree = Tree::parse(r#"{"a":{"b":[0,{"c":1}]}}"#).unwrap();
        let c = tree.get("a.b[1].c").unwrap();
        assert_eq!(c.name().as_deref(), Some("c"));
        assert_eq!(c.path(), "a.b[1].c");
        assert_eq!(c.path_from(1), "a.b[2].c");
        assert_eq!(tree.get("a.b[1]").unwrap().name().as_deref(), Some("1"));
        assert_eq!(tree.meta().name().as_deref(), Some("_meta"));
    }

    #[test]
    fn test_stale_view_reads_null() {
        let tree = Tree::parse(r#"{"a":{"b":1}}"#).unwrap();
        let b = tree.get("a.b").unwrap();
        tree.remove("a").unwrap();
        assert!(b.is_null());
        assert_eq!(b.size(), 0);
        assert!(matches!(b.set(2i64), Err(Error::Detached { .. })));
    }
}
