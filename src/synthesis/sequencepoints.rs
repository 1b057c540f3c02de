//! Sequence point collection over a lowered method body.
//!
//! The collector walks the body's statements in emission order and emits one entry per
//! language-significant node: block braces, simple statements, loop and condition
//! headers, case labels, catch/finally headers. Nodes synthesized by lowering - loop
//! back-edges, switch dispatch, `using` disposal, state-machine resumption - become
//! hidden entries: they must appear so stepping over the construct lands correctly, but
//! they never receive a breakpoint.
//!
//! # Invariants enforced
//!
//! - Offsets are strictly increasing within one method; a duplicate or regressing offset
//!   is an internal invariant violation, signalling a bug in upstream lowering.
//! - Every entry occurs at evaluation-stack depth zero. `return expr;` lowering must
//!   have introduced a return-value temp (store, jump, reload) so the closing-brace
//!   entry sees an empty stack; the collector rejects the body otherwise rather than
//!   emitting a point with operands pending.
//! - A visible entry's span must be well formed.
//! - Synthesized methods containing user code carry an entry at IL offset 0; when no
//!   user statement starts there, a hidden entry is inserted so first-chance breakpoints
//!   and "run to cursor" stay reliable in the generated method.

use crate::lowered::MethodInput;
use crate::records::sequencepoint::{SequencePointEntry, SequencePoints};
use crate::Result;

/// Collects the ordered sequence points of one lowered method.
///
/// # Examples
///
/// ```rust
/// use dotpdb::lowered::{LoweredKind, LoweredStatement, MethodInput, SourceSpan};
/// use dotpdb::records::{DocumentId, MethodId};
/// use dotpdb::synthesis::SequencePointCollector;
///
/// let mut input = MethodInput::new(MethodId(0), DocumentId(0), 0x10);
/// input.body.statements.push(LoweredStatement::visible(
///     0x00,
///     LoweredKind::OpenBrace,
///     SourceSpan::single_line(1, 1, 2),
/// ));
/// input.body.statements.push(LoweredStatement::hidden(0x06, LoweredKind::SyntheticDispatch));
///
/// let points = SequencePointCollector::collect(&input)?;
/// assert_eq!(points.len(), 2);
/// assert!(points.0[1].is_hidden());
/// # Ok::<(), dotpdb::Error>(())
/// ```
pub struct SequencePointCollector;

impl SequencePointCollector {
    /// Walk the lowered body and produce its sequence points.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvariantViolation`] for duplicate or non-monotonic IL
    /// offsets, an entry at non-zero stack depth, or a malformed visible span. These are
    /// compiler bugs upstream, not user errors.
    pub fn collect(input: &MethodInput) -> Result<SequencePoints> {
        let mut entries: Vec<SequencePointEntry> = Vec::with_capacity(input.body.statements.len());
        let mut previous_offset: Option<u32> = None;

        for statement in &input.body.statements {
            if let Some(previous) = previous_offset {
                if statement.il_offset <= previous {
                    return Err(invariant_error!(
                        "sequence point offsets must be strictly increasing: {:#x} after {:#x} in {}",
                        statement.il_offset,
                        previous,
                        input.id
                    ));
                }
            }

            if statement.stack_depth != 0 {
                return Err(invariant_error!(
                    "sequence point at {:#x} in {} has evaluation stack depth {}; points are only legal on an empty stack",
                    statement.il_offset,
                    input.id,
                    statement.stack_depth
                ));
            }

            let document = statement.document.unwrap_or(input.document);
            let entry = match statement.span {
                Some(span) if !statement.kind.is_synthetic() => {
                    if !span.is_well_formed() {
                        return Err(invariant_error!(
                            "malformed span {} at {:#x} in {}",
                            span,
                            statement.il_offset,
                            input.id
                        ));
                    }
                    SequencePointEntry::Visible {
                        il_offset: statement.il_offset,
                        document,
                        span,
                    }
                }
                _ => SequencePointEntry::Hidden {
                    il_offset: statement.il_offset,
                    document,
                },
            };

            entries.push(entry);
            previous_offset = Some(statement.il_offset);
        }

        // Generated methods containing user code must anchor at offset 0.
        if input.synthesized_with_user_code && entries.first().map_or(true, |e| e.il_offset() != 0)
        {
            entries.insert(
                0,
                SequencePointEntry::Hidden {
                    il_offset: 0,
                    document: input.document,
                },
            );
        }

        Ok(SequencePoints(entries))
    }
}
