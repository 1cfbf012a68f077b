//! Positions and mapping segments.

use std::fmt;

use text_size::TextSize;

/// A byte offset into a source string.
pub type ByteOffset = TextSize;

/// A line/column position in a source map coordinate space.
///
/// Lines are 1-based and columns are 0-based, matching the convention used by
/// source map consumers. Positions order by line, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column.
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The original side of a mapping segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OriginalLocation {
    /// Index into the owning map's `sources` table.
    pub source: u32,
    /// Position in the original source.
    pub position: Position,
    /// Index into the owning map's `names` table.
    pub name: Option<u32>,
}

/// A single generated → original correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    /// Position in the generated output.
    pub generated: Position,
    /// Position in the original source, or `None` for a null mapping.
    pub original: Option<OriginalLocation>,
}

impl Segment {
    /// Creates a null mapping at the given generated position.
    #[inline]
    pub fn null(generated: Position) -> Self {
        Self {
            generated,
            original: None,
        }
    }

    /// Creates a segment with an original location.
    #[inline]
    pub fn mapped(generated: Position, original: OriginalLocation) -> Self {
        Self {
            generated,
            original: Some(original),
        }
    }

    /// Returns true if this segment has no original position.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.original.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 10) < Position::new(2, 0));
        assert!(Position::new(3, 4) < Position::new(3, 5));
        assert_eq!(Position::new(3, 4), Position::new(3, 4));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(12, 3).to_string(), "12:3");
    }

    #[test]
    fn test_null_segment() {
        let segment = Segment::null(Position::new(1, 0));
        assert!(segment.is_null());
    }
}
