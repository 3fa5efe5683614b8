//! Value conversion for doctree
//!
//! This crate turns values of one runtime type into another:
//! - registry: the converter table, keyed by `(target, source)` with
//!   per-target fallbacks, plus the process-wide instance
//! - basic: the default converter set for every built-in type
//! - date: lenient date parsing and rendering
//! - numeric / binary: numeric-core extraction and byte encodings

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod basic;
pub mod binary;
pub mod date;
pub mod numeric;
pub mod registry;

pub use basic::text_of;
pub use date::DateCoercion;
pub use registry::{
    add_unquoted_types, convert, convert_to, is_unquoted, register, register_fallback, snapshot,
    Convertible, Converter, ConverterRegistry,
};
