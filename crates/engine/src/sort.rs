//! Reordering children

use crate::tree::Tree;
use bigdecimal::BigDecimal;
use doctree_convert::convert_to;
use doctree_core::{Result, Value};
use std::cmp::Ordering;

impl Tree {
    /// Sort children in natural order
    ///
    /// Lists, sets and arrays whose elements are all numbers sort
    /// numerically, with infinities at either end and NaN last; otherwise elements sort by their text, ignoring case.
    /// Maps sort by key, ignoring case. Sorting is stable.
    ///
    /// # Example
    ///
    /// ```
    /// use doctree_engine::Tree;
    ///
    /// let tree = Tree::parse("[3,1,2]").unwrap();
    /// tree.sort().unwrap();
    /// assert_eq!(tree.to_json(false).unwrap(), "[1,2,3]");
    /// ```
    pub fn sort(&self) -> Result<Tree> {
        if self.size() < 2 {
            return Ok(self.clone());
        }
        let value = self.as_value();
        let order = match &value {
            Value::Map(map) => {
                let keys: Vec<String> = map.keys().map(|k| k.to_lowercase()).collect();
                order_by(keys.len(), |a, b| keys[a].cmp(&keys[b]))
            }
            sequence => {
                let items = sequence.as_slice().unwrap_or(&[]);
                if items.iter().all(Value::is_number) {
                    let keys = items.iter().map(numeric_key).collect::<Result<Vec<_>>>()?;
                    order_by(keys.len(), |a, b| keys[a].cmp(&keys[b]))
                } else {
                    let keys = items
                        .iter()
                        .map(|item| {
                            convert_to::<String>(item)
                                .map(|text| text.unwrap_or_default().to_lowercase())
                        })
                        .collect::<std::result::Result<Vec<_>, _>>()?;
                    order_by(keys.len(), |a, b| keys[a].cmp(&keys[b]))
                }
            }
        };
        self.reorder(&order)?;
        Ok(self.clone())
    }

    /// Sort children with a comparator over child views
    ///
    /// Maps keep each key with its value. Sorting is stable.
    pub fn sort_by<F>(&self, mut compare: F) -> Result<Tree>
    where
        F: FnMut(&Tree, &Tree) -> Ordering,
    {
        if self.size() < 2 || !self.is_structure() {
            return Ok(self.clone());
        }
        let children: Vec<Tree> = self.children().collect();
        let order = order_by(children.len(), |a, b| compare(&children[a], &children[b]));
        self.reorder(&order)?;
        Ok(self.clone())
    }

    /// Rearrange children so that position `i` holds former child `order[i]`
    fn reorder(&self, order: &[usize]) -> Result<()> {
        self.write(|current| {
            match current {
                Value::Map(map) => {
                    let entries = permute(std::mem::take(map).into_iter().collect(), order);
                    map.extend(entries);
                }
                Value::List(items) | Value::Set(items) => {
                    *items = permute(std::mem::take(items), order);
                }
                Value::Array(items) => {
                    let sorted = permute(std::mem::take(items).into_vec(), order);
                    *items = sorted.into_boxed_slice();
                }
                _ => {}
            }
            Ok(())
        })
    }
}

/// Numeric sort key: exact for finite values
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum NumericKey {
    NegativeInfinity,
    Finite(BigDecimal),
    PositiveInfinity,
    NotANumber,
}

fn numeric_key(value: &Value) -> Result<NumericKey> {
    let float = match value {
        Value::Double(d) => Some(*d),
        Value::Float(f) => Some(f64::from(*f)),
        _ => None,
    };
    Ok(match float {
        Some(f) if f.is_nan() => NumericKey::NotANumber,
        Some(f) if f == f64::INFINITY => NumericKey::PositiveInfinity,
        Some(f) if f == f64::NEG_INFINITY => NumericKey::NegativeInfinity,
        _ => NumericKey::Finite(convert_to::<BigDecimal>(value)?.unwrap_or_default()),
    })
}

fn order_by<F>(len: usize, mut compare: F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by(|&a, &b| compare(a, b));
    order
}

fn permute<T>(items: Vec<T>, order: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut out: Vec<T> = order.iter().filter_map(|&i| slots.get_mut(i)?.take()).collect();
    // anything the order missed keeps its relative position at the end
    out.extend(slots.into_iter().flatten());
    out
}
