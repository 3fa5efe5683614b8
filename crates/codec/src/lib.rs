//! Serialization formats for doctree
//!
//! - format: `TreeReader`/`TreeWriter` traits and the format registry
//! - json: the built-in JSON reader and writer, plus `json::format`
//! - debug: a write-only indented type dump

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod debug;
pub mod format;
pub mod json;

pub use debug::DebugWriter;
pub use format::{
    formats, reader, register_reader, register_writer, remove_format, writer, FormatRegistry,
    TreeReader, TreeWriter, DEBUG, JSON,
};
pub use json::{JsonReader, JsonWriter};
