//! Tree Semantics Test Suite
//!
//! End-to-end behaviour of the `Tree` handle through the public facade.
//!
//! ## Test Organization
//!
//! - `documented_examples.rs` - the reference scenarios: auto-vivification,
//!   padding, set upsert, put-if-absent, sorting, remove-and-reserialize
//! - `shared_views.rs` - views sharing one document, stale views, meta
//! - `properties.rs` - round-trip and path idempotence under proptest
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test tree_semantics
//! ```

mod documented_examples;
mod properties;
mod shared_views;
