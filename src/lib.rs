//! doctree - hierarchical documents with path addressing
//!
//! A document is a tree of maps, lists, sets, fixed arrays and typed
//! scalars. Positions are addressed by path strings (`a.b[2].c`), values are
//! coerced between types on read, and documents round-trip through a
//! built-in JSON codec.
//!
//! # Quick Start
//!
//! ```
//! use doctree::Tree;
//!
//! let tree = Tree::parse(r#"{"server":{"ports":[80,443]}}"#)?;
//! tree.put("server.name", "edge-1")?;
//! tree.put("server.ports[2]", 8080i64)?;
//!
//! assert_eq!(tree.get_or("server.ports[1]", 0i32)?, 443);
//! assert_eq!(
//!     tree.to_json(false)?,
//!     r#"{"server":{"ports":[80,443,8080],"name":"edge-1"}}"#
//! );
//! # Ok::<(), doctree::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `doctree-core`: values, paths, errors, configuration, cache and pool
//! - `doctree-convert`: the converter registry and date coercion
//! - `doctree-codec`: reader/writer traits, the JSON codec, the debug dump
//! - `doctree-engine`: the [`Tree`] handle

pub use doctree_codec::{
    formats, json, reader, register_reader, register_writer, remove_format, writer, DebugWriter,
    FormatRegistry, JsonReader, JsonWriter, TreeReader, TreeWriter, DEBUG, JSON,
};
pub use doctree_convert::{
    add_unquoted_types, convert, convert_to, is_unquoted, register, register_fallback,
    Convertible, DateCoercion,
};
pub use doctree_core::{
    config, Config, ConversionError, CustomScalar, CustomValue, Error, Limits, Map, ParseError,
    PathParseError, PathSegment, Result, TreePath, Value, ValueType,
};
pub use doctree_engine::{Children, Tree};
