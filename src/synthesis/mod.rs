//! The synthesis engine: lowered method bodies in, debug records out.
//!
//! # Architecture
//!
//! Synthesis splits into a pure per-method phase and a stateful per-module phase. The
//! per-method passes each consume the same [`MethodInput`] and contribute one facet of
//! the method's record:
//!
//! - [`SequencePointCollector`] - ordered, validated sequence points
//! - [`ScopeTreeBuilder`] - the nested lexical scope tree
//! - [`SlotIdentityMapper`] - Edit-and-Continue slot identities
//! - [`DynamicFlagEncoder`] / [`TupleNameEncoder`] - per-local type-shape records
//! - [`LambdaClosureMapper`] - lambda/closure maps for Edit-and-Continue
//! - [`StateMachineMapper`] - kickoff forwarding and hoisted-local scopes
//!
//! Because each pass depends only on its input, the per-method phase parallelizes
//! across methods; [`crate::synthesis::assembly`] runs it on a rayon pool and then
//! resolves import forwarding in a sequential program-order fold, the only step whose
//! output depends on other methods.
//!
//! # Thread Safety
//!
//! Per-method passes are pure functions over owned inputs. The [`ForwardingCache`] is
//! single-threaded by construction; it only exists inside the sequential fold.

pub mod assembly;
pub mod dynamicflags;
pub mod imports;
pub mod lambdas;
pub mod scopes;
pub mod sequencepoints;
pub mod slots;
pub mod statemachine;
pub mod tuplenames;

pub use assembly::synthesize_module;
pub use dynamicflags::DynamicFlagEncoder;
pub use imports::{ForwardingCache, ImportsChainBuilder};
pub use lambdas::LambdaClosureMapper;
pub use scopes::ScopeTreeBuilder;
pub use sequencepoints::SequencePointCollector;
pub use slots::SlotIdentityMapper;
pub use statemachine::StateMachineMapper;
pub use tuplenames::TupleNameEncoder;

use crate::lowered::symbols::MethodRole;
use crate::lowered::MethodInput;
use crate::records::method::MethodDebugRecord;
use crate::Result;

/// Runs every per-method pass over one input and assembles the partial record.
///
/// "Partial" because import forwarding is a program-order decision; the record leaves
/// here without its import chain attached. For state-machine kickoff methods the
/// record is already final: a single pointer at the MoveNext method.
pub struct MethodDebugBuilder;

impl MethodDebugBuilder {
    /// Build the partial debug record for `input`.
    ///
    /// # Errors
    ///
    /// Propagates any invariant violation or recursion limit from the individual
    /// passes.
    pub fn build(input: &MethodInput) -> Result<MethodDebugRecord> {
        if let MethodRole::StateMachineKickoff { move_next, .. } = &input.symbols.role {
            return Ok(StateMachineMapper::kickoff_record(input.id, *move_next));
        }

        let mut record = MethodDebugRecord::new(input.id);
        record.sequence_points = SequencePointCollector::collect(input)?;

        let root = ScopeTreeBuilder::build(input)?;
        if !root.is_empty() || !root.children.is_empty() {
            record.root_scope = Some(root);
        }

        if let Some(map) = SlotIdentityMapper::map(input)? {
            record.custom_debug_info.push(map);
        }
        if let Some(flags) = DynamicFlagEncoder::encode(input)? {
            record.custom_debug_info.push(flags);
        }
        if let Some(names) = TupleNameEncoder::encode(input)? {
            record.custom_debug_info.push(names);
        }
        if let Some(map) = LambdaClosureMapper::map(input)? {
            record.custom_debug_info.push(map);
        }
        StateMachineMapper::attach(&mut record, input)?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lowered::span::SourceSpan;
    use crate::lowered::body::{LoweredKind, LoweredStatement};
    use crate::lowered::symbols::StateMachineKind;
    use crate::records::customdebuginfo::{CustomDebugInfo, CustomDebugInfoKind};
    use crate::records::document::DocumentId;
    use crate::records::method::MethodId;

    #[test]
    fn kickoff_short_circuits_to_a_pointer() {
        let mut input = MethodInput::new(MethodId(1), DocumentId(0), 0x20);
        input.symbols.role = MethodRole::StateMachineKickoff {
            move_next: MethodId(2),
            kind: StateMachineKind::Async,
        };
        // A kickoff body may still carry statements; they belong to the MoveNext side
        // and must not leak into the kickoff record.
        input.body.statements.push(LoweredStatement::visible(
            0,
            LoweredKind::OpenBrace,
            SourceSpan::single_line(1, 1, 2),
        ));

        let record = MethodDebugBuilder::build(&input).unwrap();
        assert!(record.is_fully_forwarded());
        assert!(matches!(
            record.custom_debug_info[0],
            CustomDebugInfo::StateMachineKickoff {
                move_next: MethodId(2)
            }
        ));
    }

    #[test]
    fn ordinary_method_assembles_all_facets() {
        let mut input = MethodInput::new(MethodId(0), DocumentId(0), 0x10);
        input.body.statements.push(LoweredStatement::visible(
            0x00,
            LoweredKind::Statement,
            SourceSpan::single_line(2, 9, 14),
        ));

        let record = MethodDebugBuilder::build(&input).unwrap();
        assert_eq!(record.sequence_points.len(), 1);
        // No locals, lambdas or dynamic types: no sub-records, no scope.
        assert!(record.custom_debug_info.is_empty());
        assert!(record.root_scope.is_none());
        assert!(record.find(CustomDebugInfoKind::EncLambdaMap).is_none());
    }
}
