//! JSON serializer
//!
//! Output is built in a pooled string buffer. Maps, lists, sets and arrays
//! become objects and arrays; scalars are rendered through the String
//! converter and written bare when their type is unquoted (numbers,
//! booleans), quoted otherwise. Byte arrays are therefore quoted Base64.
//! Non-finite floats have no JSON form and are written as `null`.
//!
//! Pretty output breaks the line (`\r\n`) after every opening bracket and
//! comma and indents two spaces per level. Empty containers stay `{}`/`[]`.

use crate::format::{TreeWriter, JSON};
use doctree_convert::registry;
use doctree_core::config;
use doctree_core::{Map, Pool, Result, Value, ValueType, META_KEY};
use once_cell::sync::Lazy;

static BUILDERS: Lazy<Pool<String>> =
    Lazy::new(|| Pool::new(config::global().pool_size, String::new));

pub(crate) const LINE_BREAK: &str = "\r\n";
pub(crate) const INDENT: &str = "  ";

/// The built-in JSON writer
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl TreeWriter for JsonWriter {
    fn format(&self) -> &str {
        JSON
    }

    fn serialize(
        &self,
        value: &Value,
        meta: Option<&Value>,
        pretty: bool,
        insert_meta: bool,
    ) -> Result<String> {
        let mut out = BUILDERS.acquire();
        let meta = if insert_meta { meta } else { None };
        write_value(&mut out, value, meta, if pretty { 1 } else { 0 })?;
        Ok(out.as_str().to_owned())
    }
}

/// Line break followed by `level` indentation units
pub(crate) fn push_indent(out: &mut String, level: usize) {
    out.push_str(LINE_BREAK);
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

/// Append `text` as a quoted JSON string
///
/// Only `"` and `\` are escaped; the reader accepts every other character
/// verbatim inside a string.
pub(crate) fn push_quoted(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

// `indent` is 0 for compact output, otherwise the current nesting level + 1
fn write_value(out: &mut String, value: &Value, meta: Option<&Value>, indent: usize) -> Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Map(map) => write_map(out, map, meta, indent)?,
        Value::List(_) | Value::Set(_) | Value::Array(_) => {
            write_sequence(out, value.as_slice().unwrap_or(&[]), indent)?
        }
        Value::Float(v) if !v.is_finite() => out.push_str("null"),
        Value::Double(v) if !v.is_finite() => out.push_str("null"),
        scalar => write_scalar(out, scalar)?,
    }
    Ok(())
}

fn write_map(out: &mut String, map: &Map, meta: Option<&Value>, indent: usize) -> Result<()> {
    if map.is_empty() && meta.is_none() {
        out.push_str("{}");
        return Ok(());
    }
    let child_indent = if indent == 0 { 0 } else { indent + 1 };
    out.push('{');
    if indent != 0 {
        push_indent(out, indent);
    }
    let total = map.len() + usize::from(meta.is_some());
    let entries = map
        .iter()
        .map(|(k, v)| (k.as_str(), v))
        .chain(meta.map(|m| (META_KEY, m)));
    for (pos, (key, child)) in entries.enumerate() {
        push_quoted(out, key);
        out.push(':');
        write_value(out, child, None, child_indent)?;
        if pos + 1 < total {
            out.push(',');
            if indent != 0 {
                push_indent(out, indent);
            }
        }
    }
    if indent != 0 {
        push_indent(out, indent - 1);
    }
    out.push('}');
    Ok(())
}

fn write_sequence(out: &mut String, items: &[Value], indent: usize) -> Result<()> {
    if items.is_empty() {
        out.push_str("[]");
        return Ok(());
    }
    let child_indent = if indent == 0 { 0 } else { indent + 1 };
    out.push('[');
    if indent != 0 {
        push_indent(out, indent);
    }
    for (pos, child) in items.iter().enumerate() {
        write_value(out, child, None, child_indent)?;
        if pos + 1 < items.len() {
            out.push(',');
            if indent != 0 {
                push_indent(out, indent);
            }
        }
    }
    if indent != 0 {
        push_indent(out, indent - 1);
    }
    out.push(']');
    Ok(())
}

fn write_scalar(out: &mut String, value: &Value) -> Result<()> {
    let text = match registry::convert(ValueType::String, value)? {
        Value::String(text) => text,
        Value::Null => {
            out.push_str("null");
            return Ok(());
        }
        other => format!("{:?}", other),
    };
    if registry::is_unquoted(value.value_type()) {
        out.push_str(&text);
    } else {
        push_quoted(out, &text);
    }
    Ok(())
}
