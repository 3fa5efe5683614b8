//! Deep copies and merging children from another tree

use crate::document::Document;
use crate::tree::Tree;
use doctree_core::{Result, Value};

impl Tree {
    /// Independent copy of this view as a new document
    ///
    /// Copying the root copies the meta value too.
    pub fn deep_clone(&self) -> Tree {
        let doc = self.doc.borrow();
        let meta = if self.is_root() { doc.meta.clone() } else { None };
        let limits = doc.limits;
        drop(doc);
        Tree::from_document(Document::new(self.as_value(), meta, limits))
    }

    /// Copy `source`'s children into this view
    ///
    /// Without `overwrite`, children already present are skipped: by name
    /// when this view is a map, by equal value otherwise.
    pub fn copy_from(&self, source: &Tree, overwrite: bool) -> Result<Tree> {
        if overwrite {
            return self.copy_where(source, |_| true);
        }
        let target_is_map = self.is_map();
        let existing: Vec<Tree> = self.children().collect();
        self.copy_where(source, |child| {
            if target_is_map {
                child.name().map_or(true, |name| {
                    !self.read(|v| v.as_map().map_or(false, |m| m.contains_key(&name)))
                        .unwrap_or(false)
                })
            } else {
                !existing.iter().any(|e| e == child)
            }
        })
    }

    /// Copy the children of `source` named in `fields`
    ///
    /// An empty `fields` copies everything, overwriting.
    pub fn copy_fields(&self, source: &Tree, fields: &[&str]) -> Result<Tree> {
        if fields.is_empty() {
            return self.copy_from(source, true);
        }
        self.copy_where(source, |child| {
            child
                .name()
                .map_or(false, |name| fields.contains(&name.as_str()))
        })
    }

    /// Copy the children of `source` accepted by `filter`
    ///
    /// A map receives each child under its name; anything else has the
    /// children appended.
    pub fn copy_where<F>(&self, source: &Tree, mut filter: F) -> Result<Tree>
    where
        F: FnMut(&Tree) -> bool,
    {
        let picked: Vec<(String, Value)> = source
            .children()
            .filter(|child| filter(child))
            .map(|child| (child.name().unwrap_or_default(), child.as_value()))
            .collect();
        if self.is_map() {
            self.write(|current| {
                if let Value::Map(map) = current {
                    map.extend(picked);
                }
                Ok(())
            })?;
        } else {
            for (_, value) in picked {
                self.add(value)?;
            }
        }
        Ok(self.clone())
    }
}
