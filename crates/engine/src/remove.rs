//! Detaching values from the document

use crate::document::{value_at_mut, Step};
use crate::tree::Tree;
use doctree_core::{Result, TreePath, Value};

impl Tree {
    /// Take the value at this position out of its parent
    ///
    /// Removal is by the position the view holds now. The root cannot be
    /// detached.
    pub(crate) fn take(&self) -> Option<Value> {
        let (step, parent) = self.location.split_last()?;
        let mut doc = self.doc.borrow_mut();
        if *step == Step::Meta {
            return doc.meta.take();
        }
        let container = value_at_mut(&mut doc, parent)?;
        match (container, step) {
            (Value::Map(map), Step::Key(k)) => map.shift_remove(k),
            (Value::Map(map), Step::Index(i)) => map.shift_remove_index(*i).map(|(_, v)| v),
            (Value::List(items) | Value::Set(items), Step::Index(i)) if *i < items.len() => {
                Some(items.remove(*i))
            }
            (Value::Array(items), Step::Index(i)) if *i < items.len() => {
                let mut shrunk = std::mem::take(items).into_vec();
                let removed = shrunk.remove(*i);
                *items = shrunk.into_boxed_slice();
                Some(removed)
            }
            _ => None,
        }
    }

    /// Remove the value at `path`
    ///
    /// Returns the removed value as a standalone document, or `None` when
    /// nothing was there.
    ///
    /// # Example
    ///
    /// ```
    /// use doctree_engine::Tree;
    ///
    /// let tree = Tree::parse(r#"{"a":{"b":{"c":{"d":[1,2,3]}}}}"#).unwrap();
    /// tree.remove("a.b.c.d[0]").unwrap();
    /// assert_eq!(tree.to_json(false).unwrap(), r#"{"a":{"b":{"c":{"d":[2,3]}}}}"#);
    /// ```
    pub fn remove(&self, path: &str) -> Result<Option<Tree>> {
        let path: TreePath = path.parse()?;
        Ok(self
            .get_path(&path)
            .and_then(|node| node.take())
            .map(Tree::from_value))
    }

    /// Remove this position from its parent; false for the root or when
    /// the position is already gone
    pub fn remove_self(&self) -> bool {
        self.take().is_some()
    }

    /// Remove the child at `index`
    pub fn remove_at(&self, index: usize) -> Option<Tree> {
        self.child(index)?.take().map(Tree::from_value)
    }

    /// Remove the first child
    pub fn remove_first(&self) -> Option<Tree> {
        self.remove_at(0)
    }

    /// Remove the last child
    pub fn remove_last(&self) -> Option<Tree> {
        let last = self.size().checked_sub(1)?;
        self.remove_at(last)
    }

    /// Remove children matching `predicate`
    ///
    /// Stops after the first match unless `all` is set. Returns whether
    /// anything was removed.
    pub fn remove_where<P>(&self, mut predicate: P, all: bool) -> bool
    where
        P: FnMut(&Tree) -> bool,
    {
        let mut removed = false;
        let mut children = self.children();
        while let Some(child) = children.next() {
            if predicate(&child) {
                removed |= children.remove_current();
                if !all {
                    break;
                }
            }
        }
        removed
    }
}
