//! Core types for doctree
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: payload of a tree node (scalars, maps, lists, sets, arrays)
//! - ValueType: runtime type tag driving conversions
//! - TreePath: parsed path expressions
//! - Error: error type hierarchy
//! - Config: process-wide settings (time zone, timestamp format, pool sizes)
//! - Cache / Pool: bounded memoization and scratch-object reuse

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod error;
pub mod limits;
pub mod path;
pub mod pool;
pub mod value;

pub use cache::Cache;
pub use config::{Config, ZoneSetting};
pub use error::{ConversionError, Error, ParseError, Result};
pub use limits::{Limits, MAX_NESTING_DEPTH, MAX_PAD_INDEX};
pub use path::{PathParseError, PathSegment, TreePath, META_KEY};
pub use pool::{Pool, PoolGuard, Reset};
pub use value::{set_upsert, CustomScalar, CustomValue, Map, Value, ValueType};
