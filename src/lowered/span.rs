//! Source spans and method-relative syntax offsets.
//!
//! These two value types anchor everything the engine produces: sequence points carry a
//! [`SourceSpan`], and every local slot identity is keyed by a [`SyntaxOffset`]. Keeping
//! the offset *method-relative* (distance from the enclosing method's syntax start, not an
//! absolute file position) is what makes slot identities survive unrelated edits elsewhere
//! in the file - the property Edit-and-Continue depends on.

use std::fmt;

/// A source span in line/column coordinates.
///
/// Lines and columns are 1-based, matching the conventions of the physical debug formats
/// the records are eventually serialized into. Line numbers are `u32`, columns `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    /// Starting line in the source file (1-based).
    pub start_line: u32,
    /// Starting column in the source file (1-based).
    pub start_col: u16,
    /// Ending line in the source file (1-based).
    pub end_line: u32,
    /// Ending column in the source file (1-based, exclusive).
    pub end_col: u16,
}

impl SourceSpan {
    /// Create a new span from start/end line and column values.
    #[must_use]
    pub fn new(start_line: u32, start_col: u16, end_line: u32, end_col: u16) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Create a span covering a single line between two columns.
    #[must_use]
    pub fn single_line(line: u32, start_col: u16, end_col: u16) -> Self {
        Self::new(line, start_col, line, end_col)
    }

    /// True if the span's end does not precede its start.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.end_line > self.start_line
            || (self.end_line == self.start_line && self.end_col >= self.start_col)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

/// A syntax position relative to the enclosing method's syntax start.
///
/// This is the second half of the Edit-and-Continue identity pair `(kind, syntax offset)`.
/// Negative values are legal: lowering hoists field and property initializers into
/// constructors, placing their declarations *before* the constructor's own syntax start.
///
/// # Examples
///
/// ```rust
/// use dotpdb::lowered::SyntaxOffset;
///
/// let a = SyntaxOffset(42);
/// let hoisted = SyntaxOffset(-8);
/// assert!(hoisted < a);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SyntaxOffset(pub i32);

impl fmt::Display for SyntaxOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_well_formed() {
        assert!(SourceSpan::new(1, 1, 1, 1).is_well_formed());
        assert!(SourceSpan::new(1, 5, 2, 1).is_well_formed());
        assert!(!SourceSpan::new(2, 1, 1, 1).is_well_formed());
        assert!(!SourceSpan::new(1, 5, 1, 4).is_well_formed());
    }

    #[test]
    fn span_display() {
        let span = SourceSpan::single_line(10, 9, 23);
        assert_eq!(span.to_string(), "(10,9)-(10,23)");
    }

    #[test]
    fn syntax_offset_ordering_accepts_negative() {
        let mut offsets = vec![SyntaxOffset(12), SyntaxOffset(-4), SyntaxOffset(0)];
        offsets.sort();
        assert_eq!(
            offsets,
            vec![SyntaxOffset(-4), SyntaxOffset(0), SyntaxOffset(12)]
        );
    }
}
