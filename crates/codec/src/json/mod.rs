//! Built-in JSON format

mod reader;
mod writer;

pub use reader::JsonReader;
pub use writer::JsonWriter;

use crate::format::{TreeReader, TreeWriter};
use doctree_core::{Result, Value};
use writer::push_indent;

/// Parse JSON text with the default reader
pub fn parse(text: &str) -> Result<Value> {
    JsonReader::new().parse(text)
}

/// Serialize a value as JSON, without meta
pub fn to_string(value: &Value, pretty: bool) -> Result<String> {
    JsonWriter.serialize(value, None, pretty, false)
}

/// Re-indent JSON text
///
/// Produces the same layout as pretty serialization. Whitespace outside
/// string literals is dropped; the text is not otherwise validated.
pub fn format(json: &str) -> String {
    if json.len() < 3 {
        return json.to_string();
    }
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len() * 2);
    let mut level = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                let close = if c == '{' { '}' } else { ']' };
                let mut next = i;
                while next < chars.len() && chars[next] <= ' ' {
                    next += 1;
                }
                out.push(c);
                if chars.get(next) == Some(&close) {
                    out.push(close);
                    i = next + 1;
                } else {
                    level += 1;
                    push_indent(&mut out, level);
                }
            }
            '}' | ']' => {
                level = level.saturating_sub(1);
                push_indent(&mut out, level);
                out.push(c);
            }
            ',' => {
                out.push(',');
                push_indent(&mut out, level);
            }
            c if c <= ' ' => {}
            c => out.push(c),
        }
    }
    out
}
