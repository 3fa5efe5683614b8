//! Document storage and location resolution
//!
//! A document is the root value plus the optional meta value. Positions
//! inside it are addressed by a *location*: the list of [`Step`]s from the
//! root (or from the meta value, when the first step is [`Step::Meta`]).
//! Map children are always addressed by key, so a location stays valid
//! when sibling entries are added or removed.
//!
//! Resolution comes in two flavours:
//! - [`locate`] follows a path through existing values only.
//! - [`locate_or_create`] creates missing map entries and pads lists while
//!   walking, retyping null or empty containers where a step needs another
//!   container kind.

use doctree_core::{Error, Limits, Map, PathSegment, Result, TreePath, Value, META_KEY};

/// One step of a location
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Step {
    /// Map entry
    Key(String),
    /// Position in a list, set or array
    Index(usize),
    /// The meta value; only ever the first step
    Meta,
}

/// Root value, meta value and the limits applied when writing into them
#[derive(Debug, Clone)]
pub(crate) struct Document {
    pub(crate) root: Value,
    pub(crate) meta: Option<Value>,
    pub(crate) limits: Limits,
}

impl Document {
    pub(crate) fn new(root: Value, meta: Option<Value>, limits: Limits) -> Self {
        Document { root, meta, limits }
    }
}

/// Render a location in path syntax, shifting list positions by `start_index`
pub(crate) fn path_of(location: &[Step], start_index: usize) -> String {
    let segments = location
        .iter()
        .map(|step| match step {
            Step::Key(k) => PathSegment::Key(k.clone()),
            Step::Index(i) => PathSegment::Index(*i),
            Step::Meta => PathSegment::Key(META_KEY.to_string()),
        })
        .collect();
    TreePath::from_segments(segments).to_path_string_from(start_index)
}

pub(crate) fn detached(location: &[Step]) -> Error {
    Error::Detached {
        path: path_of(location, 0),
    }
}

// =============================================================================
// Lookup
// =============================================================================

/// Value at `location`, if it still exists
pub(crate) fn value_at<'d>(doc: &'d Document, location: &[Step]) -> Option<&'d Value> {
    let (mut current, rest) = match location.split_first() {
        Some((Step::Meta, rest)) => (doc.meta.as_ref()?, rest),
        _ => (&doc.root, location),
    };
    for step in rest {
        current = match step {
            Step::Key(k) => current.as_map()?.get(k)?,
            Step::Index(i) => current.child_at(*i)?,
            Step::Meta => return None,
        };
    }
    Some(current)
}

/// Mutable value at `location`, if it still exists
pub(crate) fn value_at_mut<'d>(doc: &'d mut Document, location: &[Step]) -> Option<&'d mut Value> {
    let (mut current, rest) = match location.split_first() {
        Some((Step::Meta, rest)) => (doc.meta.as_mut()?, rest),
        _ => (&mut doc.root, location),
    };
    for step in rest {
        current = child_mut(current, step)?;
    }
    Some(current)
}

pub(crate) fn child_mut<'v>(value: &'v mut Value, step: &Step) -> Option<&'v mut Value> {
    match (value, step) {
        (Value::Map(map), Step::Key(k)) => map.get_mut(k),
        (Value::Map(map), Step::Index(i)) => map.get_index_mut(*i).map(|(_, v)| v),
        (Value::List(items), Step::Index(i)) | (Value::Set(items), Step::Index(i)) => {
            items.get_mut(*i)
        }
        (Value::Array(items), Step::Index(i)) => items.get_mut(*i),
        _ => None,
    }
}

/// Follow `path` from `start` through existing values
///
/// Positional steps into maps are rewritten as key steps.
pub(crate) fn locate(doc: &Document, start: &[Step], path: &TreePath) -> Option<Vec<Step>> {
    let mut location = start.to_vec();
    let mut current = value_at(doc, start)?;
    for segment in path.segments() {
        if segment.is_meta() {
            current = doc.meta.as_ref()?;
            location = vec![Step::Meta];
            continue;
        }
        match segment {
            PathSegment::Key(k) => {
                current = current.as_map()?.get(k)?;
                location.push(Step::Key(k.clone()));
            }
            PathSegment::Index(i) => match current {
                Value::Map(map) => {
                    let (key, child) = map.get_index(*i)?;
                    location.push(Step::Key(key.clone()));
                    current = child;
                }
                other => {
                    current = other.child_at(*i)?;
                    location.push(Step::Index(*i));
                }
            },
        }
    }
    Some(location)
}

// =============================================================================
// Auto-vivification
// =============================================================================

/// Follow `segments` from `start`, creating what is missing
///
/// # Errors
///
/// - [`Error::TypeMismatch`] when a step meets a scalar or a non-empty
///   container of the wrong kind
/// - [`Error::IndexOutOfBounds`] for a position past the end of a set or a
///   non-empty map (neither can be padded)
/// - [`Error::UnsupportedOperation`] when padding would pass the index limit
/// - [`Error::Detached`] when `start` no longer exists
pub(crate) fn locate_or_create(
    doc: &mut Document,
    start: &[Step],
    segments: &[PathSegment],
) -> Result<Vec<Step>> {
    let limits = doc.limits;
    let mut location = start.to_vec();
    for segment in segments {
        if segment.is_meta() {
            doc.meta.get_or_insert_with(Value::map);
            location = vec![Step::Meta];
            continue;
        }
        let current = value_at_mut(doc, &location).ok_or_else(|| detached(&location))?;
        let step = match segment {
            PathSegment::Key(k) => {
                vivify_key(current, k)?;
                Step::Key(k.clone())
            }
            PathSegment::Index(i) => vivify_index(current, *i, &limits)?,
        };
        location.push(step);
    }
    Ok(location)
}

fn vivify_key(current: &mut Value, key: &str) -> Result<()> {
    match current {
        Value::Map(map) => {
            if !map.contains_key(key) {
                map.insert(key.to_string(), Value::map());
            }
        }
        other if other.is_empty() => {
            let mut map = Map::new();
            map.insert(key.to_string(), Value::map());
            *other = Value::Map(map);
        }
        other => {
            return Err(Error::TypeMismatch {
                expected: "map",
                found: other.kind_name(),
            })
        }
    }
    Ok(())
}

fn vivify_index(current: &mut Value, index: usize, limits: &Limits) -> Result<Step> {
    match current {
        Value::Map(map) if !map.is_empty() => match map.get_index(index) {
            Some((key, _)) => Ok(Step::Key(key.clone())),
            None => Err(Error::IndexOutOfBounds {
                index,
                len: map.len(),
            }),
        },
        Value::Set(items) => {
            if index < items.len() {
                Ok(Step::Index(index))
            } else {
                Err(Error::IndexOutOfBounds {
                    index,
                    len: items.len(),
                })
            }
        }
        Value::List(items) => {
            pad(items, index, limits)?;
            Ok(Step::Index(index))
        }
        Value::Array(items) if index < items.len() => Ok(Step::Index(index)),
        Value::Array(items) => {
            let mut list = std::mem::take(items).into_vec();
            pad(&mut list, index, limits)?;
            *current = Value::List(list);
            Ok(Step::Index(index))
        }
        other if other.is_empty() => {
            let mut list = Vec::new();
            pad(&mut list, index, limits)?;
            *other = Value::List(list);
            Ok(Step::Index(index))
        }
        other => Err(Error::TypeMismatch {
            expected: "list",
            found: other.kind_name(),
        }),
    }
}

/// Grow `items` with nulls so that `index` is a valid position
pub(crate) fn pad(items: &mut Vec<Value>, index: usize, limits: &Limits) -> Result<()> {
    if index < items.len() {
        return Ok(());
    }
    if !limits.pad_allowed(index) {
        return Err(Error::UnsupportedOperation {
            kind: "list",
            operation: "pad past the index limit",
        });
    }
    items.resize(index + 1, Value::Null);
    Ok(())
}
