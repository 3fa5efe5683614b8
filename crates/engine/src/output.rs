//! Serialization, equality and formatting
//!
//! Equality and hashing compare the compact JSON text of both sides,
//! including the meta value of root views. Two trees are equal when they
//! hold the same structure in the same order, whatever their identity.

use crate::tree::Tree;
use doctree_codec::{writer, JsonWriter, TreeWriter};
use doctree_core::Result;
use std::fmt;
use std::hash::{Hash, Hasher};

impl Tree {
    /// JSON text of the value at this position, without meta
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        JsonWriter.serialize(&self.as_value(), None, pretty, false)
    }

    /// Text in a registered format
    ///
    /// With `insert_meta`, a root view's meta value is written as a
    /// trailing `_meta` entry.
    pub fn to_string_format(&self, format: &str, pretty: bool, insert_meta: bool) -> Result<String> {
        let meta = self.root_meta();
        writer(format)?.serialize(&self.as_value(), meta.as_ref(), pretty, insert_meta)
    }

    /// Compact bytes in a registered format
    pub fn to_binary(&self, format: &str, insert_meta: bool) -> Result<Vec<u8>> {
        let meta = self.root_meta();
        writer(format)?.serialize_bytes(&self.as_value(), meta.as_ref(), insert_meta)
    }

    fn root_meta(&self) -> Option<doctree_core::Value> {
        if self.is_root() {
            self.meta_value()
        } else {
            None
        }
    }

    /// Compact JSON with meta; the identity used by `==` and `Hash`
    fn canonical_text(&self, pretty: bool) -> String {
        let meta = self.root_meta();
        JsonWriter
            .serialize(&self.as_value(), meta.as_ref(), pretty, true)
            .unwrap_or_else(|_| format!("{:?}", self.as_value()))
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_text(false) == other.canonical_text(false)
    }
}

impl Eq for Tree {}

impl Hash for Tree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_text(false).hash(state);
    }
}

/// Pretty JSON, including the meta value of root views
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_text(true))
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("path", &self.path())
            .field("value", &self.as_value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::Tree;
    use doctree_core::{Error, Value};
    use std::collections::HashSet;

    #[test]
    fn test_equality_is_structural() {
        let a = Tree::parse(r#"{"x":[1,2]}"#).unwrap();
        let b = Tree::new();
        b.put("x[0]", 1i64).unwrap();
        b.put("x[1]", 2i64).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Tree::parse(r#"{"x":[2,1]}"#).unwrap());
    }

    #[test]
    fn test_equality_depends_on_key_order() {
        let a = Tree::parse(r#"{"x":1,"y":2}"#).unwrap();
        let b = Tree::parse(r#"{"y":2,"x":1}"#).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_equality_includes_root_meta() {
        let a = Tree::parse(r#"{"x":1}"#).unwrap();
        let b = Tree::parse(r#"{"x":1,"_meta":{"m":1}}"#).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.get("x").unwrap(), b.get("x").unwrap());
    }

    #[test]
    fn test_hash_matches_equality() {
        let mut set = HashSet::new();
        set.insert(Tree::parse("[1,2]").unwrap());
        set.insert(Tree::parse("[1, 2]").unwrap());
        set.insert(Tree::parse("[2,1]").unwrap());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_is_pretty_with_meta() {
        let tree = Tree::parse(r#"{"a":1,"_meta":{"m":2}}"#).unwrap();
        assert_eq!(
            tree.to_string(),
            "{\r\n  \"a\":1,\r\n  \"_meta\":{\r\n    \"m\":2\r\n  }\r\n}"
        );
        assert_eq!(tree.get("a").unwrap().to_string(), "1");
    }

    #[test]
    fn test_other_formats() {
        let tree = Tree::parse(r#"{"a":1}"#).unwrap();
        assert_eq!(
            tree.to_string_format("debug", true, false).unwrap(),
            "Map:\r\n  a -> Number: 1"
        );
        assert_eq!(tree.to_binary("JSON", false).unwrap(), br#"{"a":1}"#.to_vec());
        assert!(matches!(
            tree.to_string_format("yaml", false, false),
            Err(Error::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_debug_shows_path() {
        let tree = Tree::parse(r#"{"a":null}"#).unwrap();
        let text = format!("{:?}", tree.get("a").unwrap());
        assert!(text.contains("path: \"a\""));
        assert!(text.contains(&format!("{:?}", Value::Null)));
    }
}
