//! Codec Conformance Test Suite
//!
//! Validates the built-in formats and the conversion layer they rely on.
//!
//! ## Test Organization
//!
//! - `json_reader.rs` - accepted syntax, numeric typing, positioned errors
//! - `json_writer.rs` - compact and pretty layout, quoting, meta placement
//! - `format_registry.rs` - custom readers and writers, the debug dump
//! - `conversions.rs` - registry totality, hard failures, date handling
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test codec_conformance
//! ```

mod conversions;
mod format_registry;
mod json_reader;
mod json_writer;
