//! Edit-and-Continue slot identity mapping.
//!
//! Every long-lived physical local slot receives a `(kind, syntax offset, ordinal)`
//! identity so a debugger can match the slot across recompilations of edited source.
//! Identities derive only from the declaring syntax node's position relative to the
//! method start, so edits elsewhere in the file never invalidate them.
//!
//! Duplicate `(kind, syntax offset)` pairs happen when one construct is lowered more
//! than once (a duplicated finally body, a split loop); they are separated by a
//! deterministic ordinal assigned in physical slot order. Two *user-declared* slots with
//! the same identity and overlapping liveness cannot both originate from legal source,
//! so that case is rejected as an internal invariant violation rather than papered over.

use std::collections::HashMap;

use crate::lowered::span::SyntaxOffset;
use crate::lowered::MethodInput;
use crate::records::customdebuginfo::CustomDebugInfo;
use crate::records::slot::{LocalSlotKind, SlotIdentity};
use crate::Result;

/// Maps a method's physical local slots to Edit-and-Continue identities.
pub struct SlotIdentityMapper;

impl SlotIdentityMapper {
    /// Compute the slot identity map for `input`.
    ///
    /// Returns `None` when the method has no long-lived slots; short-lived lowering and
    /// emitter temps never appear in the map. Constants occupy no physical slot in the
    /// local signature and are likewise excluded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvariantViolation`] when two user-declared slots share
    /// the same identity while simultaneously live.
    pub fn map(input: &MethodInput) -> Result<Option<CustomDebugInfo>> {
        let mut identities: Vec<SlotIdentity> = Vec::new();
        let mut seen: HashMap<(LocalSlotKind, SyntaxOffset), Vec<usize>> = HashMap::new();

        for (index, symbol) in input.symbols.locals.iter().enumerate() {
            if !symbol.kind.is_long_lived() || symbol.is_constant() {
                continue;
            }

            let key = (symbol.kind, symbol.syntax_offset);
            let prior = seen.entry(key).or_default();

            if symbol.kind.is_user_declared() {
                for &earlier in prior.iter() {
                    let other = &input.symbols.locals[earlier];
                    let overlap = symbol.live_range.0 < other.live_range.1
                        && other.live_range.0 < symbol.live_range.1;
                    if overlap {
                        return Err(invariant_error!(
                            "user-declared slots {} and {} in {} share identity {}@{} while simultaneously live",
                            other.slot,
                            symbol.slot,
                            input.id,
                            symbol.kind,
                            symbol.syntax_offset
                        ));
                    }
                }
            }

            let ordinal = u16::try_from(prior.len()).map_err(|_| {
                invariant_error!(
                    "more than {} slots share identity {}@{} in {}",
                    u16::MAX,
                    symbol.kind,
                    symbol.syntax_offset,
                    input.id
                )
            })?;
            prior.push(index);

            identities.push(SlotIdentity {
                kind: symbol.kind,
                syntax_offset: symbol.syntax_offset,
                ordinal,
            });
        }

        if identities.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CustomDebugInfo::EncLocalSlotMap(identities)))
        }
    }
}
