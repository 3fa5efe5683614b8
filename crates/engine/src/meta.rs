//! The document's meta channel
//!
//! Every document carries an optional meta value next to its root. It is
//! reachable from any view through the `_meta` path segment or the methods
//! below, is left out of ordinary output, and is written last (as a
//! `_meta` entry) when output asks for it.

use crate::document::Step;
use crate::tree::Tree;
use doctree_core::Value;

impl Tree {
    /// View of the meta value, creating an empty map if there is none
    pub fn meta(&self) -> Tree {
        self.doc.borrow_mut().meta.get_or_insert_with(Value::map);
        self.view(vec![Step::Meta])
    }

    /// View of the meta value, if one exists
    pub fn meta_if_exists(&self) -> Option<Tree> {
        self.has_meta().then(|| self.view(vec![Step::Meta]))
    }

    /// Whether the document has a meta value
    pub fn has_meta(&self) -> bool {
        self.doc.borrow().meta.is_some()
    }

    /// Detach the meta value and return it as a standalone document
    pub fn remove_meta(&self) -> Option<Tree> {
        let meta = self.doc.borrow_mut().meta.take()?;
        Some(Tree::from_value(meta))
    }

    /// The meta value, for serialization
    pub(crate) fn meta_value(&self) -> Option<Value> {
        self.doc.borrow().meta.clone()
    }
}
