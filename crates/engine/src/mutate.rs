//! Writes through a view
//!
//! All writes go straight into the shared document. Methods that store a
//! structure hand back a view of it so calls can be chained; methods that
//! store a scalar hand back the enclosing view instead.

use crate::document::{child_mut, detached, locate_or_create, pad, value_at_mut, Step};
use crate::tree::Tree;
use doctree_convert::binary::encode_base64;
use doctree_convert::convert;
use doctree_core::{
    set_upsert, Error, Limits, Map, PathSegment, Result, TreePath, Value, ValueType,
};
use tracing::debug;

/// Where a replaced set element ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SetSlot {
    /// Drop the old element and upsert the new one (moves it to the end)
    Append,
    /// Replace in place, dropping other elements equal to the new value
    Keep,
}

impl Tree {
    // ========== Replace ==========

    /// Replace the value at this position, returning where it now lives
    pub(crate) fn store(&self, value: Value, slot: SetSlot) -> Result<Vec<Step>> {
        let mut doc = self.doc.borrow_mut();
        let (step, parent) = match self.location.split_last() {
            None => {
                doc.root = value;
                return Ok(Vec::new());
            }
            Some((Step::Meta, _)) => {
                doc.meta = Some(value);
                return Ok(self.location.clone());
            }
            Some(split) => split,
        };
        let container = value_at_mut(&mut doc, parent).ok_or_else(|| detached(&self.location))?;
        match (container, step) {
            (Value::Set(items), Step::Index(i)) if *i < items.len() => {
                let position = match slot {
                    SetSlot::Append => {
                        items.remove(*i);
                        set_upsert(items, value)
                    }
                    SetSlot::Keep => replace_in_set(items, *i, value),
                };
                let mut location = parent.to_vec();
                location.push(Step::Index(position));
                Ok(location)
            }
            (container, step) => {
                let target = child_mut(container, step).ok_or_else(|| detached(&self.location))?;
                *target = value;
                Ok(self.location.clone())
            }
        }
    }

    /// Replace the value at this position
    ///
    /// Returns the enclosing view (the root returns itself). Inside a set
    /// the old element is removed and the new one upserted.
    pub fn set(&self, value: impl Into<Value>) -> Result<Tree> {
        self.store(value.into(), SetSlot::Append)?;
        Ok(self.parent().unwrap_or_else(|| self.clone()))
    }

    /// Replace the value with an empty map and return a view of it
    pub fn set_map(&self) -> Result<Tree> {
        let location = self.store(Value::map(), SetSlot::Append)?;
        Ok(self.view(location))
    }

    /// Replace the value with an empty list and return a view of it
    pub fn set_list(&self) -> Result<Tree> {
        let location = self.store(Value::list(), SetSlot::Append)?;
        Ok(self.view(location))
    }

    /// Replace the value with an empty set and return a view of it
    pub fn set_set(&self) -> Result<Tree> {
        let location = self.store(Value::set(), SetSlot::Append)?;
        Ok(self.view(location))
    }

    /// Replace the value with the Base64 text of `bytes`
    pub fn set_bytes_as_base64(&self, bytes: &[u8]) -> Result<Tree> {
        self.set(encode_base64(bytes))
    }

    /// Replace the value with a copy of `source`'s value
    ///
    /// Returns a view of the assigned position.
    pub fn assign(&self, source: &Tree) -> Result<Tree> {
        let location = self.store(source.as_value(), SetSlot::Append)?;
        Ok(self.view(location))
    }

    // ========== Append ==========

    /// Append a value
    ///
    /// Lists append; sets upsert. Null, maps and arrays are retyped to a
    /// list first (a map keeps its values). Returns a view of the new child
    /// when `value` is a structure, otherwise `self`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedOperation`] on a scalar.
    pub fn add(&self, value: impl Into<Value>) -> Result<Tree> {
        let value = value.into();
        let structure = value.is_structure();
        let step = self.write(|current| append(current, value))?;
        Ok(if structure {
            self.view(self.child_location(step))
        } else {
            self.clone()
        })
    }

    /// Append an empty map and return a view of it
    pub fn add_map(&self) -> Result<Tree> {
        self.add(Value::map())
    }

    /// Append an empty list and return a view of it
    pub fn add_list(&self) -> Result<Tree> {
        self.add(Value::list())
    }

    /// Append an empty set and return a view of it
    pub fn add_set(&self) -> Result<Tree> {
        self.add(Value::set())
    }

    /// Append the Base64 text of `bytes`
    pub fn add_bytes_as_base64(&self, bytes: &[u8]) -> Result<Tree> {
        self.add(encode_base64(bytes))
    }

    /// Insert a value at `index`
    ///
    /// Lists shift later elements; arrays are promoted to lists first; sets
    /// upsert regardless of `index`. Null or an empty map becomes a
    /// single-element list.
    ///
    /// # Errors
    ///
    /// - [`Error::IndexOutOfBounds`] when `index` is past the end
    /// - [`Error::UnsupportedOperation`] on a non-empty map or a scalar
    pub fn insert(&self, index: usize, value: impl Into<Value>) -> Result<Tree> {
        let value = value.into();
        let structure = value.is_structure();
        let step = self.write(|current| insert_at(current, index, value))?;
        Ok(if structure {
            self.view(self.child_location(step))
        } else {
            self.clone()
        })
    }

    /// Insert an empty map at `index` and return a view of it
    pub fn insert_map(&self, index: usize) -> Result<Tree> {
        self.insert(index, Value::map())
    }

    /// Insert an empty list at `index` and return a view of it
    pub fn insert_list(&self, index: usize) -> Result<Tree> {
        self.insert(index, Value::list())
    }

    /// Insert an empty set at `index` and return a view of it
    pub fn insert_set(&self, index: usize) -> Result<Tree> {
        self.insert(index, Value::set())
    }

    /// Insert the Base64 text of `bytes` at `index`
    pub fn insert_bytes_as_base64(&self, index: usize, bytes: &[u8]) -> Result<Tree> {
        self.insert(index, encode_base64(bytes))
    }

    // ========== Put by path ==========

    /// Store `value` at `path`, creating missing containers on the way
    ///
    /// # Example
    ///
    /// ```
    /// use doctree_engine::Tree;
    ///
    /// let tree = Tree::new();
    /// tree.put("a.b.c", 1i64).unwrap();
    /// assert_eq!(tree, Tree::parse(r#"{"a":{"b":{"c":1}}}"#).unwrap());
    /// ```
    pub fn put(&self, path: &str, value: impl Into<Value>) -> Result<Tree> {
        self.put_object(path, value, false)
    }

    /// Store `value` at `path`
    ///
    /// Intermediate steps are created as in [`put`](Self::put). The final
    /// step then depends on the container it lands in:
    /// - map: insert, or with `put_if_absent` keep an existing non-null value
    /// - list or array: pad with nulls and set, with `put_if_absent` keeping
    ///   a non-null slot (arrays are promoted to lists)
    /// - set: upsert
    /// - null or an empty container: retyped to fit the step
    ///
    /// An empty path replaces the value at this position. Returns a view of
    /// the stored child when it is a structure, otherwise of its parent.
    ///
    /// # Errors
    ///
    /// - [`Error::Path`] for a malformed path
    /// - [`Error::TypeMismatch`] when a step meets a scalar or a non-empty
    ///   container of the wrong kind
    /// - [`Error::IndexOutOfBounds`] for a position past the end of a
    ///   non-empty map or a set
    /// - [`Error::UnsupportedOperation`] when padding would pass the limit
    pub fn put_object(
        &self,
        path: &str,
        value: impl Into<Value>,
        put_if_absent: bool,
    ) -> Result<Tree> {
        let path: TreePath = path.parse()?;
        self.put_path(&path, value.into(), put_if_absent)
    }

    /// [`put_object`](Self::put_object) with an already parsed path
    pub fn put_path(&self, path: &TreePath, value: Value, put_if_absent: bool) -> Result<Tree> {
        let Some((parents, last)) = path.split_last() else {
            let location = self.store(value, SetSlot::Append)?;
            return Ok(self.view(location));
        };

        let mut doc = self.doc.borrow_mut();
        let parent_location = locate_or_create(&mut doc, &self.location, parents)?;
        let limits = doc.limits;

        let (location, parent_location, structure) = if last.is_meta() {
            let keep = put_if_absent && doc.meta.as_ref().map_or(false, |m| !m.is_null());
            if !keep {
                doc.meta = Some(value);
            }
            let structure = doc.meta.as_ref().map_or(false, Value::is_structure);
            (vec![Step::Meta], Vec::new(), structure)
        } else {
            let parent = value_at_mut(&mut doc, &parent_location)
                .ok_or_else(|| detached(&parent_location))?;
            let (step, structure) = put_child(parent, last, value, put_if_absent, &limits)?;
            let mut location = parent_location.clone();
            location.push(step);
            (location, parent_location, structure)
        };
        drop(doc);

        Ok(self.view(if structure { location } else { parent_location }))
    }

    /// Store an empty map at `path` and return a view of it
    ///
    /// With `put_if_absent` an existing non-null value is kept (and viewed
    /// when it is a structure).
    pub fn put_map(&self, path: &str, put_if_absent: bool) -> Result<Tree> {
        self.put_object(path, Value::map(), put_if_absent)
    }

    /// Store an empty list at `path` and return a view of it
    pub fn put_list(&self, path: &str, put_if_absent: bool) -> Result<Tree> {
        self.put_object(path, Value::list(), put_if_absent)
    }

    /// Store an empty set at `path` and return a view of it
    pub fn put_set(&self, path: &str, put_if_absent: bool) -> Result<Tree> {
        self.put_object(path, Value::set(), put_if_absent)
    }

    /// Store the Base64 text of `bytes` at `path`
    pub fn put_bytes_as_base64(&self, path: &str, bytes: &[u8]) -> Result<Tree> {
        self.put(path, encode_base64(bytes))
    }

    // ========== Retype and rename ==========

    /// Convert the value in place to `target`
    ///
    /// Null and values already of type `target` are left alone. Inside a
    /// set the converted value keeps its position and other elements equal
    /// to it are dropped.
    pub fn set_type(&self, target: ValueType) -> Result<Tree> {
        let current = self.as_value();
        if current.is_null() || current.value_type() == target {
            return Ok(self.clone());
        }
        let converted = convert(target, &current)?;
        let location = self.store(converted, SetSlot::Keep)?;
        Ok(self.view(location))
    }

    /// Rename this map entry; the renamed entry moves to the end
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedOperation`] on the root, the meta value, or a
    /// child of anything but a map.
    pub fn set_name(&self, name: &str) -> Result<Tree> {
        let (step, parent) = self.location.split_last().ok_or(Error::UnsupportedOperation {
            kind: "root",
            operation: "rename",
        })?;
        let old = match step {
            Step::Key(old) => old,
            Step::Meta => {
                return Err(Error::UnsupportedOperation {
                    kind: "meta",
                    operation: "rename",
                })
            }
            Step::Index(_) => {
                let kind = self
                    .parent()
                    .and_then(|p| p.read(Value::kind_name))
                    .unwrap_or("list");
                return Err(Error::UnsupportedOperation {
                    kind,
                    operation: "rename",
                });
            }
        };
        if old == name {
            return Ok(self.clone());
        }

        let mut doc = self.doc.borrow_mut();
        let map = match value_at_mut(&mut doc, parent) {
            Some(Value::Map(map)) => map,
            _ => return Err(detached(&self.location)),
        };
        let value = map.shift_remove(old).ok_or_else(|| detached(&self.location))?;
        map.shift_remove(name);
        map.insert(name.to_string(), value);
        drop(doc);

        let mut location = parent.to_vec();
        location.push(Step::Key(name.to_string()));
        Ok(self.view(location))
    }

    // ========== Clear ==========

    /// Empty the value
    ///
    /// Maps, lists and sets lose their children, an array becomes an empty
    /// list and a scalar becomes null.
    pub fn clear(&self) -> Result<Tree> {
        self.write(|current| {
            match current {
                Value::Map(map) => map.clear(),
                Value::List(items) | Value::Set(items) => items.clear(),
                Value::Array(_) => *current = Value::list(),
                _ => *current = Value::Null,
            }
            Ok(())
        })?;
        Ok(self.clone())
    }

    /// Clear the value at `path`, or create an empty map there
    pub fn clear_path(&self, path: &str) -> Result<Tree> {
        match self.get(path) {
            Some(node) => node.clear(),
            None => self.put_map(path, false),
        }
    }
}

// =============================================================================
// Container edits
// =============================================================================

fn append(current: &mut Value, value: Value) -> Result<Step> {
    match current {
        Value::List(items) => {
            items.push(value);
            Ok(Step::Index(items.len() - 1))
        }
        Value::Set(items) => Ok(Step::Index(set_upsert(items, value))),
        Value::Map(_) | Value::Array(_) | Value::Null => {
            if let Value::Map(map) = &*current {
                if !map.is_empty() {
                    debug!(target: "doctree::tree", entries = map.len(), "add retypes a map to a list");
                }
            }
            let mut items = take_elements(current);
            items.push(value);
            let index = items.len() - 1;
            *current = Value::List(items);
            Ok(Step::Index(index))
        }
        other => Err(Error::UnsupportedOperation {
            kind: other.kind_name(),
            operation: "add",
        }),
    }
}

fn insert_at(current: &mut Value, index: usize, value: Value) -> Result<Step> {
    let len = current.len().unwrap_or(0);
    match current {
        Value::List(_) | Value::Array(_) if index > len => {
            Err(Error::IndexOutOfBounds { index, len })
        }
        Value::List(items) => {
            items.insert(index, value);
            Ok(Step::Index(index))
        }
        Value::Array(_) => {
            let mut items = take_elements(current);
            items.insert(index, value);
            *current = Value::List(items);
            Ok(Step::Index(index))
        }
        Value::Set(items) => Ok(Step::Index(set_upsert(items, value))),
        Value::Map(_) if len > 0 => Err(Error::UnsupportedOperation {
            kind: "map",
            operation: "insert",
        }),
        Value::Map(_) | Value::Null => {
            *current = Value::List(vec![value]);
            Ok(Step::Index(0))
        }
        other => Err(Error::UnsupportedOperation {
            kind: other.kind_name(),
            operation: "insert",
        }),
    }
}

/// Store `value` under the final path segment of a put
///
/// Returns the child's step and whether the value now stored there is a
/// structure.
fn put_child(
    parent: &mut Value,
    segment: &PathSegment,
    value: Value,
    put_if_absent: bool,
    limits: &Limits,
) -> Result<(Step, bool)> {
    let structure = value.is_structure();
    match segment {
        PathSegment::Key(name) => match parent {
            Value::Map(map) => {
                if put_if_absent {
                    if let Some(existing) = map.get(name).filter(|v| !v.is_null()) {
                        return Ok((Step::Key(name.clone()), existing.is_structure()));
                    }
                }
                map.insert(name.clone(), value);
                Ok((Step::Key(name.clone()), structure))
            }
            Value::Set(items) => Ok((Step::Index(set_upsert(items, value)), structure)),
            other if other.is_empty() => {
                let mut map = Map::new();
                map.insert(name.clone(), value);
                *other = Value::Map(map);
                Ok((Step::Key(name.clone()), structure))
            }
            other => Err(Error::TypeMismatch {
                expected: "map",
                found: other.kind_name(),
            }),
        },
        PathSegment::Index(index) => {
            let index = *index;
            if parent.is_array() {
                let items = take_elements(parent);
                *parent = Value::List(items);
            }
            match parent {
                Value::List(items) => {
                    if put_if_absent {
                        if let Some(existing) = items.get(index).filter(|v| !v.is_null()) {
                            return Ok((Step::Index(index), existing.is_structure()));
                        }
                    }
                    pad(items, index, limits)?;
                    items[index] = value;
                    Ok((Step::Index(index), structure))
                }
                Value::Set(items) => Ok((Step::Index(set_upsert(items, value)), structure)),
                Value::Map(map) if !map.is_empty() => {
                    let len = map.len();
                    let (key, slot) = map
                        .get_index_mut(index)
                        .ok_or(Error::IndexOutOfBounds { index, len })?;
                    if put_if_absent && !slot.is_null() {
                        return Ok((Step::Key(key.clone()), slot.is_structure()));
                    }
                    *slot = value;
                    Ok((Step::Key(key.clone()), structure))
                }
                other if other.is_empty() => {
                    let mut items = Vec::new();
                    pad(&mut items, index, limits)?;
                    items[index] = value;
                    *other = Value::List(items);
                    Ok((Step::Index(index), structure))
                }
                other => Err(Error::TypeMismatch {
                    expected: "list",
                    found: other.kind_name(),
                }),
            }
        }
    }
}

/// Children of a structure as an owned list, leaving null behind
pub(crate) fn take_elements(value: &mut Value) -> Vec<Value> {
    match std::mem::take(value) {
        Value::Map(map) => map.into_values().collect(),
        Value::List(items) | Value::Set(items) => items,
        Value::Array(items) => items.into_vec(),
        _ => Vec::new(),
    }
}

fn replace_in_set(items: &mut Vec<Value>, index: usize, value: Value) -> usize {
    let mut position = index;
    let mut current = 0;
    items.retain(|existing| {
        let keep = current == index || !existing.canonical_eq(&value);
        if !keep && current < index {
            position -= 1;
        }
        current += 1;
        keep
    });
    items[position] = value;
    position
}
