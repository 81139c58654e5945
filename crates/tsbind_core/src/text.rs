//! Source-text spans.
//!
//! Nodes and diagnostics carry a span so a host can map them back to the
//! original source. The binder only ever reads spans (for diagnostic
//! locations and for source-order tie-breaking during declaration merging).

use std::fmt;
use std::ops::Range;

/// Byte offset into the source text.
pub type TextPos = u32;

/// A half-open byte range in the source text.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextSpan {
    pub start: TextPos,
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self {
            start: pos,
            length: 0,
        }
    }

    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_and_contains() {
        let span = TextSpan::from_bounds(4, 10);
        assert_eq!(span.start, 4);
        assert_eq!(span.length, 6);
        assert_eq!(span.end(), 10);
        assert!(span.contains(4));
        assert!(span.contains(9));
        assert!(!span.contains(10));
    }

    #[test]
    fn empty_span() {
        let span = TextSpan::empty(7);
        assert!(span.is_empty());
        assert_eq!(span.to_range(), 7..7);
    }
}
