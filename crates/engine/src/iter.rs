//! Child iteration

use crate::tree::Tree;

/// Iterator over the children of a view
///
/// Yields one view per map entry, list, set or array element, in order. A
/// scalar yields itself once; null yields nothing. The iterator reads the
/// live document on every step, so [`remove_current`](Self::remove_current)
/// can detach the element just yielded without skipping the next one.
pub struct Children {
    parent: Tree,
    position: usize,
    removable: bool,
    scalar_done: bool,
}

impl Children {
    /// Remove the element most recently returned by `next`
    ///
    /// Returns false when nothing has been yielded yet, the element was
    /// already removed, or the parent is a scalar.
    pub fn remove_current(&mut self) -> bool {
        if !self.removable || !self.parent.is_structure() {
            return false;
        }
        self.removable = false;
        let current = self.position - 1;
        match self.parent.child(current) {
            Some(child) if child.remove_self() => {
                self.position = current;
                true
            }
            _ => false,
        }
    }
}

impl Iterator for Children {
    type Item = Tree;

    fn next(&mut self) -> Option<Tree> {
        if !self.parent.is_structure() {
            if self.scalar_done || self.parent.is_null() {
                return None;
            }
            self.scalar_done = true;
            return Some(self.parent.clone());
        }
        let child = self.parent.child(self.position)?;
        self.position += 1;
        self.removable = true;
        Some(child)
    }
}

impl Tree {
    /// Iterate over the children of this view
    ///
    /// # Example
    ///
    /// ```
    /// use doctree_engine::Tree;
    ///
    /// let tree = Tree::parse(r#"{"a":1,"b":2}"#).unwrap();
    /// let names: Vec<String> = tree.children().filter_map(|c| c.name()).collect();
    /// assert_eq!(names, ["a", "b"]);
    /// ```
    pub fn children(&self) -> Children {
        Children {
            parent: self.clone(),
            position: 0,
            removable: false,
            scalar_done: false,
        }
    }
}

impl IntoIterator for &Tree {
    type Item = Tree;
    type IntoIter = Children;

    fn into_iter(self) -> Children {
        self.children()
    }
}

#[cfg(test)]
mod tests {
    use crate::Tree;
    use doctree_core::Value;

    #[test]
    fn test_iterates_in_order() {
        let tree = Tree::parse(r#"[3,"x",null]"#).unwrap();
        let paths: Vec<String> = tree.children().map(|c| c.path()).collect();
        assert_eq!(paths, ["[0]", "[1]", "[2]"]);
    }

    #[test]
    fn test_scalar_iterates_itself() {
        let tree = Tree::parse(r#"{"a":5}"#).unwrap();
        let a = tree.get("a").unwrap();
        let items: Vec<Tree> = a.children().collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path(), "a");
        assert_eq!(Tree::from_value(Value::Null).children().count(), 0);
    }

    #[test]
    fn test_remove_during_iteration() {
        let tree = Tree::parse("[1,2,2,3]").unwrap();
        let mut children = tree.children();
        let mut seen = Vec::new();
        while let Some(child) = children.next() {
            let n = child.as_long().unwrap().unwrap();
            seen.push(n);
            if n == 2 {
                assert!(children.remove_current());
                assert!(!children.remove_current());
            }
        }
        assert_eq!(seen, [1, 2, 2, 3]);
        assert_eq!(tree.to_json(false).unwrap(), "[1,3]");
    }

    #[test]
    fn test_remove_from_array_reallocates() {
        let tree = Tree::from_value(Value::Array(
            vec![Value::Long(1), Value::Long(2)].into_boxed_slice(),
        ));
        let mut children = tree.children();
        children.next();
        assert!(children.remove_current());
        assert!(tree.is_array());
        assert_eq!(tree.size(), 1);
    }

    #[test]
    fn test_remove_before_next_is_refused() {
        let tree = Tree::parse("[1]").unwrap();
        assert!(!tree.children().remove_current());
    }

    #[test]
    fn test_for_loop_over_reference() {
        let tree = Tree::parse(r#"{"a":1,"b":2}"#).unwrap();
        let mut total = 0;
        for child in &tree {
            total += child.as_long().unwrap().unwrap();
        }
        assert_eq!(total, 3);
    }
}
