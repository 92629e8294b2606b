//! Source locations carried by AST nodes and compile errors.
//!
//! The front end stamps every node with a [`Span`]; the compiler never
//! inspects it beyond copying it into a [`CompilationError`](crate::CompilationError).

use std::fmt;

/// Where a node starts in the source text, plus its byte length.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a span from a line, column, and length.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    /// Whether this span covers no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}+{}", self.line, self.col, self.len)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_is_empty() {
        assert!(Span::point(4, 2).is_empty());
        assert!(!Span::new(4, 2, 3).is_empty());
    }

    #[test]
    fn display_is_line_col() {
        assert_eq!(Span::new(3, 15, 5).to_string(), "3:15");
        assert_eq!(format!("{:?}", Span::point(1, 1)), "1:1+0");
        assert_ne!(
            format!("{:?}", Span::new(2, 4, 1)),
            format!("{:?}", Span::new(2, 4, 6))
        );
    }
}
