//! Tree engine for doctree
//!
//! The [`Tree`] handle is a view of one position in a shared document.
//! Through it a caller can:
//! - navigate by path (`a.b[2].c`) or by position
//! - read values converted to any registered type
//! - write with auto-vivification of missing maps and lists
//! - iterate, sort, copy and remove children
//! - serialize through any registered format
//!
//! Modules are split by concern; each adds an `impl Tree` block.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod access;
mod copy;
mod document;
mod iter;
mod meta;
mod mutate;
mod navigate;
mod output;
mod remove;
mod sort;
mod tree;

pub use iter::Children;
pub use tree::Tree;
