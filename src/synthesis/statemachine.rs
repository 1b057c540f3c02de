//! State-machine method mapping.
//!
//! An async or iterator method compiles into two emitted methods: the original
//! declaration (the kickoff) and the generated MoveNext method holding the rewritten
//! body. Debug information splits accordingly:
//!
//! - The kickoff record degenerates to a single pointer at its MoveNext method. No
//!   sequence points, no scopes; everything a debugger needs lives on the MoveNext
//!   side.
//! - The MoveNext record carries ordinary sequence points and scopes, plus a scope
//!   range per hoisted local (the range over which the hoisted field should display as
//!   a named local), the link back to the kickoff, and the IL offsets of
//!   compiler-injected catch-and-rethrow dispatch the debugger must not stop inside.
//!
//! Hoisted ranges are clipped against the body's dead ranges so a hoisted value never
//! appears in scope across a segment lowering proved unreachable.

use crate::lowered::symbols::MethodRole;
use crate::lowered::MethodInput;
use crate::records::customdebuginfo::{CustomDebugInfo, HoistedLocalScope};
use crate::records::method::{MethodDebugRecord, MethodId};
use crate::Result;

/// Maps state-machine methods to their split debug records.
pub struct StateMachineMapper;

impl StateMachineMapper {
    /// Build the degenerate kickoff record: exactly one pointer at the MoveNext method.
    #[must_use]
    pub fn kickoff_record(method: MethodId, move_next: MethodId) -> MethodDebugRecord {
        let mut record = MethodDebugRecord::new(method);
        record
            .custom_debug_info
            .push(CustomDebugInfo::StateMachineKickoff { move_next });
        record
    }

    /// Attach MoveNext-side records to `record`: hoisted-local scopes and the link
    /// back to the kickoff method. A no-op for methods that are not a MoveNext body.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvariantViolation`] when a hoisted range is inverted
    /// or escapes the method body.
    pub fn attach(record: &mut MethodDebugRecord, input: &MethodInput) -> Result<()> {
        let MethodRole::StateMachineMoveNext {
            kickoff,
            catch_handler_offsets,
            ..
        } = &input.symbols.role
        else {
            return Ok(());
        };

        let mut scopes: Vec<HoistedLocalScope> = Vec::with_capacity(input.symbols.hoisted.len());
        for hoisted in &input.symbols.hoisted {
            let (start, end) = hoisted.range;
            if start > end || end > input.body.code_size {
                return Err(invariant_error!(
                    "hoisted local '{}' in {} has range [{:#x}, {:#x}) outside the body of size {:#x}",
                    hoisted.name,
                    input.id,
                    start,
                    end,
                    input.body.code_size
                ));
            }
            if let Some((start, end)) = clip_dead_edges(start, end, &input.body.dead_ranges) {
                scopes.push(HoistedLocalScope {
                    field_index: hoisted.field_index,
                    start_offset: start,
                    end_offset: end,
                });
            }
        }

        if !scopes.is_empty() {
            record
                .custom_debug_info
                .push(CustomDebugInfo::HoistedLocalScopes(scopes));
        }
        record
            .custom_debug_info
            .push(CustomDebugInfo::StateMachineLink {
                kickoff: *kickoff,
                catch_handler_offsets: catch_handler_offsets.clone(),
            });
        Ok(())
    }
}

/// Shrink `[start, end)` until neither edge lies in a dead range. Returns `None` when
/// nothing reachable remains. Interior dead segments leave the range intact; the scope
/// record is a single interval and cannot express a hole.
fn clip_dead_edges(mut start: u32, mut end: u32, dead: &[(u32, u32)]) -> Option<(u32, u32)> {
    loop {
        let mut changed = false;
        for &(dead_start, dead_end) in dead {
            if (dead_start..dead_end).contains(&start) {
                start = dead_end;
                changed = true;
            }
            if end > dead_start && end <= dead_end {
                end = dead_start;
                changed = true;
            }
        }
        if start >= end {
            return None;
        }
        if !changed {
            return Some((start, end));
        }
    }
}
