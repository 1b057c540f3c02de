//! Sequence point records: the mapping from IL offsets to source spans.
//!
//! A sequence point aligns execution with source; a *hidden* point carries no visible
//! span and exists only so stepping across compiler-synthesized control flow lands
//! correctly. Within one method's record, entries are strictly increasing in IL offset -
//! the collector enforces this as a hard invariant, not a best effort.
//!
//! # Hidden Sequence Points
//!
//! Physical formats mark a hidden point with the start line sentinel `0xFEEFEE`. The
//! logical record keeps hiddenness explicit ([`SequencePointEntry::Hidden`]) so the
//! sentinel can never leak into a user span; serializers materialize it at the boundary.

use crate::lowered::span::SourceSpan;
use crate::records::document::DocumentId;

/// Sentinel start line marking a hidden sequence point in serialized form.
pub const HIDDEN_LINE_SENTINEL: u32 = 0xFEE_FEE;

/// One sequence point of a method: either a visible span or a hidden marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencePointEntry {
    /// A visible point mapping an IL offset to a source span.
    Visible {
        /// Offset in the method's IL stream.
        il_offset: u32,
        /// The source document containing the span.
        document: DocumentId,
        /// The source span.
        span: SourceSpan,
    },
    /// A hidden point: anchors stepping, never used for breakpoint placement.
    Hidden {
        /// Offset in the method's IL stream.
        il_offset: u32,
        /// The source document the surrounding code belongs to.
        document: DocumentId,
    },
}

impl SequencePointEntry {
    /// The IL offset of this entry.
    #[must_use]
    pub fn il_offset(&self) -> u32 {
        match self {
            SequencePointEntry::Visible { il_offset, .. }
            | SequencePointEntry::Hidden { il_offset, .. } => *il_offset,
        }
    }

    /// The document this entry belongs to.
    #[must_use]
    pub fn document(&self) -> DocumentId {
        match self {
            SequencePointEntry::Visible { document, .. }
            | SequencePointEntry::Hidden { document, .. } => *document,
        }
    }

    /// True if this is a hidden point.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self, SequencePointEntry::Hidden { .. })
    }

    /// The visible span, if any.
    #[must_use]
    pub fn span(&self) -> Option<&SourceSpan> {
        match self {
            SequencePointEntry::Visible { span, .. } => Some(span),
            SequencePointEntry::Hidden { .. } => None,
        }
    }
}

/// The ordered sequence points of one method.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequencePoints(pub Vec<SequencePointEntry>);

impl SequencePoints {
    /// Returns the entry at a given IL offset, if any.
    #[must_use]
    pub fn find_by_il_offset(&self, il_offset: u32) -> Option<&SequencePointEntry> {
        self.0.iter().find(|sp| sp.il_offset() == il_offset)
    }

    /// The first entry a breakpoint may bind to: the first visible entry. Hidden entries
    /// are legal anywhere, including before it, but must never receive a breakpoint.
    #[must_use]
    pub fn first_breakpoint_entry(&self) -> Option<&SequencePointEntry> {
        self.0.iter().find(|sp| !sp.is_hidden())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the method carries no sequence points (e.g. a fully forwarded record).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
