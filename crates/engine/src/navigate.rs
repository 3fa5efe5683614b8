//! Read-only navigation between views

use crate::document::{locate, Step};
use crate::tree::Tree;
use doctree_core::TreePath;
use tracing::debug;

impl Tree {
    /// View at `path` relative to this position
    ///
    /// Returns `None` when any step is missing, has the wrong shape for the
    /// value it meets, or when `path` is malformed. Reads never create
    /// anything.
    ///
    /// # Example
    ///
    /// ```
    /// use doctree_engine::Tree;
    ///
    /// let tree = Tree::parse(r#"{"a":{"b":{"c":{"d":[1,2,3]}}}}"#).unwrap();
    /// assert_eq!(tree.get("a.b.c.d[1]").unwrap().as_long().unwrap(), Some(2));
    /// assert!(tree.get("a.x").is_none());
    /// ```
    pub fn get(&self, path: &str) -> Option<Tree> {
        let path: TreePath = match path.parse() {
            Ok(path) => path,
            Err(e) => {
                debug!(target: "doctree::tree", path, error = %e, "malformed path on read");
                return None;
            }
        };
        self.get_path(&path)
    }

    /// View at an already parsed path
    pub fn get_path(&self, path: &TreePath) -> Option<Tree> {
        let doc = self.doc.borrow();
        let location = locate(&doc, &self.location, path)?;
        drop(doc);
        Some(self.view(location))
    }

    /// Whether something exists at `path`
    pub fn exists(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Child at position `index` in iteration order
    ///
    /// A scalar has itself as its only child.
    pub fn child(&self, index: usize) -> Option<Tree> {
        if self.is_structure() {
            self.get_path(&TreePath::root().index(index))
        } else if index == 0 && !self.is_null() {
            Some(self.clone())
        } else {
            None
        }
    }

    /// First child, if any
    pub fn first_child(&self) -> Option<Tree> {
        self.child(0)
    }

    /// Last child, if any
    pub fn last_child(&self) -> Option<Tree> {
        self.size().checked_sub(1).and_then(|last| self.child(last))
    }

    /// Enclosing view; `None` for the root
    ///
    /// The parent of the meta value is the root.
    pub fn parent(&self) -> Option<Tree> {
        self.location
            .split_last()
            .map(|(_, parent)| self.view(parent.to_vec()))
    }

    /// View of the document root
    pub fn root(&self) -> Tree {
        self.view(Vec::new())
    }

    /// Next child of the parent, in iteration order
    pub fn next_sibling(&self) -> Option<Tree> {
        let parent = self.parent()?;
        let position = self.position_in(&parent)?;
        if position + 1 < parent.size() {
            parent.child(position + 1)
        } else {
            None
        }
    }

    /// Previous child of the parent, in iteration order
    pub fn previous_sibling(&self) -> Option<Tree> {
        let parent = self.parent()?;
        let position = self.position_in(&parent)?;
        position.checked_sub(1).and_then(|prev| parent.child(prev))
    }

    /// First direct child matching `predicate`
    pub fn find<P>(&self, mut predicate: P) -> Option<Tree>
    where
        P: FnMut(&Tree) -> bool,
    {
        self.children().find(|child| predicate(child))
    }

    fn position_in(&self, parent: &Tree) -> Option<usize> {
        match self.location.last()? {
            Step::Index(i) => Some(*i),
            Step::Key(k) => parent.read(|v| v.as_map().and_then(|m| m.get_index_of(k)))?,
            Step::Meta => None,
        }
    }
}
