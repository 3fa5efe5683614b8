//! Human-readable type dump (`"debug"` format, write-only)
//!
//! ```text
//! Map:
//!   a -> Number: 1
//!   b -> Collection:
//!     0 -> Boolean: true
//! ```

use crate::format::{TreeWriter, DEBUG};
use doctree_convert::text_of;
use doctree_core::{Result, Value, META_KEY};

/// Writer producing an indented dump of value types and contents
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugWriter;

impl TreeWriter for DebugWriter {
    fn format(&self) -> &str {
        DEBUG
    }

    fn serialize(
        &self,
        value: &Value,
        meta: Option<&Value>,
        pretty: bool,
        insert_meta: bool,
    ) -> Result<String> {
        let mut out = String::with_capacity(1024);
        let indent = if pretty { Some(0) } else { None };
        match (value, meta) {
            (Value::Map(map), Some(meta)) if insert_meta => {
                let mut with_meta = map.clone();
                with_meta.insert(META_KEY.to_string(), meta.clone());
                dump(&mut out, &Value::Map(with_meta), indent)?;
            }
            _ => dump(&mut out, value, indent)?,
        }
        Ok(out.trim().to_string())
    }
}

// `None` disables indentation entirely
fn dump(out: &mut String, value: &Value, indent: Option<usize>) -> Result<()> {
    let child_indent = indent.map(|i| i + 1);
    match value {
        Value::Null => out.push_str("Null"),
        Value::Bool(b) => {
            out.push_str("Boolean: ");
            out.push_str(&b.to_string());
        }
        Value::String(s) => {
            out.push_str("String: ");
            out.push_str(s);
        }
        Value::Map(map) => {
            out.push_str("Map:\r\n");
            for (key, child) in map {
                push_indent(out, child_indent);
                out.push_str(key);
                out.push_str(" -> ");
                dump(out, child, child_indent)?;
                out.push_str("\r\n");
            }
        }
        Value::List(_) | Value::Set(_) | Value::Array(_) => {
            out.push_str(if value.is_array() {
                "Array:\r\n"
            } else {
                "Collection:\r\n"
            });
            for (pos, child) in value.as_slice().unwrap_or(&[]).iter().enumerate() {
                push_indent(out, child_indent);
                out.push_str(&pos.to_string());
                out.push_str(" -> ");
                dump(out, child, child_indent)?;
                out.push_str("\r\n");
            }
        }
        number if number.is_number() => {
            out.push_str("Number: ");
            out.push_str(&text_of(number)?);
        }
        other => {
            out.push_str(other.value_type().name());
            out.push_str(": ");
            out.push_str(&text_of(other)?);
        }
    }
    Ok(())
}

fn push_indent(out: &mut String, indent: Option<usize>) {
    for _ in 0..indent.unwrap_or(0) {
        out.push_str("  ");
    }
}
