//! Error types for doctree
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! "Not found" is never an error: navigation returns `Option` and callers
//! decide. Errors are reserved for operations that cannot be carried out.

use crate::path::PathParseError;
use crate::value::ValueType;
use std::io;
use thiserror::Error;

/// Result type alias for doctree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for doctree
#[derive(Debug, Error)]
pub enum Error {
    /// A structural operation that the current container kind does not allow
    #[error("Unsupported operation: cannot {operation} on a {kind}")]
    UnsupportedOperation {
        /// Container kind the operation was attempted on
        kind: &'static str,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// A path step needed a different container kind than the one found
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind the step required
        expected: &'static str,
        /// Kind actually present
        found: &'static str,
    },

    /// Positional insert outside the current bounds
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Current number of children
        len: usize,
    },

    /// The position a view refers to no longer exists in its document
    #[error("Detached view: nothing at {path}")]
    Detached {
        /// Path of the vanished position
        path: String,
    },

    /// A value could not be coerced to the requested type
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Malformed serialized input
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Malformed path expression
    #[error("Invalid path: {0}")]
    Path(#[from] PathParseError),

    /// No reader or writer registered under the given format name
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of a single value conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Neither an exact-pair nor a fallback converter exists for the target
    #[error("Unable to convert {from} to {to}: no converter registered")]
    NotRegistered {
        /// Source type
        from: ValueType,
        /// Target type
        to: ValueType,
    },

    /// A converter exists but rejected the input
    #[error("Unable to convert {from} to {to}: {reason}")]
    Invalid {
        /// Source type
        from: ValueType,
        /// Target type
        to: ValueType,
        /// What was wrong with the input
        reason: String,
    },
}

impl ConversionError {
    /// Shorthand for [`ConversionError::Invalid`]
    pub fn invalid(from: ValueType, to: ValueType, reason: impl Into<String>) -> Self {
        ConversionError::Invalid {
            from,
            to,
            reason: reason.into(),
        }
    }
}

/// Malformed serialized input, with the character position it was detected at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at position {position}: {message}")]
pub struct ParseError {
    /// What went wrong
    pub message: String,
    /// Character offset into the input
    pub position: usize,
    /// Index of the list element being read, when inside a list
    pub element: Option<usize>,
}

impl ParseError {
    /// Create an error at `position`
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
            element: None,
        }
    }

    /// Attach the index of the list element that failed
    pub fn at_element(mut self, element: usize) -> Self {
        self.element = Some(element);
        self
    }
}
