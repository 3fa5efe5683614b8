//! Size limits enforced while building trees
//!
//! Both limits guard against inputs that would otherwise exhaust the stack
//! or memory: deeply nested serialized text, and index writes far past the
//! end of a list (which pad with nulls).

/// Maximum nesting depth accepted by readers (default)
pub const MAX_NESTING_DEPTH: usize = 512;

/// Maximum index a write may pad a list up to (default)
pub const MAX_PAD_INDEX: usize = 1_000_000;

/// Size limits for tree construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth of serialized input
    pub max_nesting_depth: usize,

    /// Largest list index a write may pad up to
    pub max_pad_index: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_nesting_depth: MAX_NESTING_DEPTH,
            max_pad_index: MAX_PAD_INDEX,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_nesting_depth: 8,
            max_pad_index: 100,
        }
    }

    /// Check a nesting depth against the limit
    pub fn depth_allowed(&self, depth: usize) -> bool {
        depth <= self.max_nesting_depth
    }

    /// Check a padding index against the limit
    pub fn pad_allowed(&self, index: usize) -> bool {
        index <= self.max_pad_index
    }
}
