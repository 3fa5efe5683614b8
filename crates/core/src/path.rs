//! Path expressions
//!
//! A path addresses a node relative to another node. Paths are composed of
//! name segments (map entry access) and bracketed index segments (position
//! in iteration order):
//!
//! | Syntax       | Meaning                                  |
//! |--------------|------------------------------------------|
//! | `name`       | Map entry                                |
//! | `a.b`        | Nested map entries                       |
//! | `a[0]`       | Entry, then first child                  |
//! | `a.b[3].c`   | Mixed                                    |
//! | `[2]`        | Third child of the starting node         |
//! | `m[1].[0]`   | An index directly following another     |
//! | `_meta`      | The document's metadata channel          |
//! | (empty)      | The starting node itself                 |
//!
//! Whether a segment creates missing nodes or merely reads is decided by
//! the operation, not the path.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reserved segment name addressing a document's metadata channel
pub const META_KEY: &str = "_meta";

/// Error type for path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Empty name between separators
    #[error("empty name in path at position {0}")]
    EmptyKey(usize),
    /// Unclosed bracket
    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),
    /// Bracket content is not a non-negative integer
    #[error("invalid index at position {0}: {1}")]
    InvalidIndex(usize, String),
    /// Unexpected character
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
}

/// A segment in a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Map entry: `name`
    Key(String),
    /// Child position: `[0]`
    Index(usize),
}

impl PathSegment {
    /// True for the reserved `_meta` name
    pub fn is_meta(&self) -> bool {
        matches!(self, PathSegment::Key(k) if k == META_KEY)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => f.write_str(k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A parsed path expression
///
/// # Examples
///
/// ```
/// use doctree_core::path::{TreePath, PathSegment};
///
/// let path: TreePath = "a.b[3].c".parse().unwrap();
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.segments()[2], PathSegment::Index(3));
/// assert_eq!(path.to_path_string(), "a.b[3].c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TreePath {
    segments: Vec<PathSegment>,
}

impl TreePath {
    /// The empty path, addressing the starting node
    pub fn root() -> Self {
        TreePath {
            segments: Vec::new(),
        }
    }

    /// Create a path from a vector of segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        TreePath { segments }
    }

    /// Get the path segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Get the number of segments in the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is the empty path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a name segment (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment (builder pattern)
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    /// Append a name segment in place
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Append an index segment in place
    pub fn push_index(&mut self, idx: usize) {
        self.segments.push(PathSegment::Index(idx));
    }

    /// Split into the path of the parent and the final segment
    pub fn split_last(&self) -> Option<(&[PathSegment], &PathSegment)> {
        self.segments
            .split_last()
            .map(|(last, parent)| (parent, last))
    }

    /// Render the path in expression syntax
    pub fn to_path_string(&self) -> String {
        self.to_path_string_from(0)
    }

    /// Render the path, shifting every index by `start_index`
    ///
    /// `start_index = 1` produces one-based positions for display.
    pub fn to_path_string_from(&self, start_index: usize) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                PathSegment::Key(k) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(k);
                }
                PathSegment::Index(i) => {
                    out.push('[');
                    out.push_str(&(i + start_index).to_string());
                    out.push(']');
                }
            }
        }
        out
    }
}

impl FromStr for TreePath {
    type Err = PathParseError;

    /// Parse a path from a string
    ///
    /// Names may contain any character except `.`, `[` and `]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(TreePath::root());
        }

        let mut segments = Vec::new();
        let chars: Vec<char> = s.chars().collect();
        let mut i = 0;

        // Skip leading dot if present
        if chars[i] == '.' {
            i += 1;
            if i >= chars.len() {
                return Err(PathParseError::EmptyKey(i));
            }
        }

        while i < chars.len() {
            if chars[i] == '.' {
                i += 1;
                if i >= chars.len() || chars[i] == '.' {
                    return Err(PathParseError::EmptyKey(i));
                }
            }

            match chars[i] {
                '[' => {
                    let start = i;
                    i += 1;
                    let idx_start = i;

                    while i < chars.len() && chars[i] != ']' {
                        i += 1;
                    }

                    if i >= chars.len() {
                        return Err(PathParseError::UnclosedBracket(start));
                    }

                    let idx_str: String = chars[idx_start..i].iter().collect();
                    let idx = idx_str
                        .parse::<usize>()
                        .map_err(|_| PathParseError::InvalidIndex(idx_start, idx_str))?;

                    segments.push(PathSegment::Index(idx));
                    i += 1;

                    // A name may not follow an index without a separator
                    if i < chars.len() && chars[i] != '.' && chars[i] != '[' {
                        return Err(PathParseError::UnexpectedChar(chars[i], i));
                    }
                }
                ']' => return Err(PathParseError::UnexpectedChar(']', i)),
                _ => {
                    let key_start = i;
                    while i < chars.len() && !matches!(chars[i], '.' | '[' | ']') {
                        i += 1;
                    }
                    if i < chars.len() && chars[i] == ']' {
                        return Err(PathParseError::UnexpectedChar(']', i));
                    }
                    let key: String = chars[key_start..i].iter().collect();
                    segments.push(PathSegment::Key(key));
                }
            }
        }

        Ok(TreePath { segments })
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(s: &str) -> TreePath {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_empty_is_root() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_single_name() {
        assert_eq!(parse("name"), TreePath::root().key("name"));
    }

    #[test]
    fn test_parse_nested_names() {
        assert_eq!(parse("a.b.c.d").len(), 4);
    }

    #[test]
    fn test_parse_mixed() {
        assert_eq!(
            parse("a.b[3].c"),
            TreePath::root().key("a").key("b").index(3).key("c")
        );
    }

    #[test]
    fn test_parse_leading_index() {
        assert_eq!(parse("[2].x"), TreePath::root().index(2).key("x"));
    }

    #[test]
    fn test_parse_index_after_dot() {
        assert_eq!(parse("m1[1].[0]"), TreePath::root().key("m1").index(1).index(0));
    }

    #[test]
    fn test_parse_consecutive_indexes() {
        assert_eq!(parse("a[1][2]"), TreePath::root().key("a").index(1).index(2));
    }

    #[test]
    fn test_parse_names_with_punctuation() {
        assert_eq!(
            parse("hello world.x-y.$id"),
            TreePath::root().key("hello world").key("x-y").key("$id")
        );
    }

    #[test]
    fn test_parse_meta_segment() {
        let path = parse("_meta.q.w");
        assert!(path.segments()[0].is_meta());
        assert!(!path.segments()[1].is_meta());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "a[1".parse::<TreePath>(),
            Err(PathParseError::UnclosedBracket(1))
        );
        assert!(matches!(
            "a[-1]".parse::<TreePath>(),
            Err(PathParseError::InvalidIndex(2, _))
        ));
        assert!(matches!(
            "a[x]".parse::<TreePath>(),
            Err(PathParseError::InvalidIndex(..))
        ));
        assert_eq!("a..b".parse::<TreePath>(), Err(PathParseError::EmptyKey(2)));
        assert_eq!("a.".parse::<TreePath>(), Err(PathParseError::EmptyKey(2)));
        assert_eq!(
            "a]b".parse::<TreePath>(),
            Err(PathParseError::UnexpectedChar(']', 1))
        );
        assert_eq!(
            "a[0]b".parse::<TreePath>(),
            Err(PathParseError::UnexpectedChar('b', 4))
        );
    }

    #[test]
    fn test_split_last() {
        let path = parse("a.b[2]");
        let (parent, last) = path.split_last().unwrap();
        assert_eq!(parent.len(), 2);
        assert_eq!(last, &PathSegment::Index(2));
        assert!(TreePath::root().split_last().is_none());
    }

    #[test]
    fn test_to_path_string_with_offset() {
        let path = parse("a.b[0].c[2]");
        assert_eq!(path.to_path_string(), "a.b[0].c[2]");
        assert_eq!(path.to_path_string_from(1), "a.b[1].c[3]");
        assert_eq!(parse("[0].x").to_path_string(), "[0].x");
    }

    proptest! {
        #[test]
        fn prop_rendered_paths_reparse(
            parts in proptest::collection::vec(
                prop_oneof![
                    "[a-z_][a-z0-9_ -]{0,6}".prop_map(PathSegment::Key),
                    (0usize..1000).prop_map(PathSegment::Index),
                ],
                0..6,
            )
        ) {
            let path = TreePath::from_segments(parts);
            let text = path.to_path_string();
            prop_assert_eq!(text.parse::<TreePath>().unwrap(), path);
        }
    }
}
