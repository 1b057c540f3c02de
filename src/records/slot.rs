//! Local slot records and Edit-and-Continue slot identities.
//!
//! Every physical local slot of a compiled method - user-declared or synthesized by
//! lowering - is assigned a [`SlotIdentity`]: the `(kind, syntax offset, ordinal)` triple
//! that lets a debugger match the slot across two compilations of edited source so its
//! runtime value survives the edit. The kind set is closed; serialization matches
//! exhaustively so a new kind is a compile error until every consumer handles it.
//!
//! # Key Components
//!
//! - [`LocalSlotKind`] - closed enumeration of slot kinds with stable serialized values
//! - [`SlotIdentity`] - the Edit-and-Continue identity triple
//! - [`LocalVariableAttributes`] - per-local attribute flags
//!
//! # Thread Safety
//!
//! All types in this module are [`Send`] and [`Sync`] because they contain only owned data.

use std::fmt;

use crate::lowered::span::SyntaxOffset;

bitflags::bitflags! {
    /// Attribute flags carried by a local variable record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LocalVariableAttributes: u16 {
        /// The local is hidden from the debugger display (compiler-generated names).
        const DEBUGGER_HIDDEN = 0x0001;
    }
}

/// The closed set of local slot kinds.
///
/// Discriminants are the stable serialized values; they must never be renumbered, because
/// the Edit-and-Continue identity of a slot is `(kind, syntax offset)` and a renumbering
/// would silently break identity matching across compiler versions.
///
/// Kinds at or above [`LocalSlotKind::LoweringTemp`] are short-lived scratch slots that
/// never participate in Edit-and-Continue mapping (see [`LocalSlotKind::is_long_lived`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[repr(u8)]
pub enum LocalSlotKind {
    /// A user-declared local variable.
    UserDefined = 0,
    /// A user-declared constant.
    UserConstant = 1,
    /// The synthesized long-lived temp holding a `return expr;` result so the closing-brace
    /// sequence point can occur with an empty evaluation stack.
    ReturnValue = 2,
    /// A loop control variable temp (`for` limit/step temps).
    LoopControl = 3,
    /// The enumerator temp of a `foreach` over an enumerable.
    ForEachEnumerator = 4,
    /// The array temp of a `foreach` over an array.
    ForEachArray = 5,
    /// The array index temp of a `foreach` over an array.
    ForEachArrayIndex = 6,
    /// A `using` statement resource temp.
    UsingResource = 7,
    /// A `lock` statement resource temp.
    LockResource = 8,
    /// The `lock` statement lock-taken flag temp.
    LockTaken = 9,
    /// A pattern-matching temp introduced by `switch`/`is` lowering.
    PatternMatchTemp = 10,
    /// The value temp of a lowered `switch` dispatch.
    SwitchDispatchTemp = 11,
    /// The awaiter temp of an `await` expression.
    AwaiterTemp = 12,
    /// The synthesized closure display-class instance temp.
    DisplayClassInstance = 13,
    /// The cached state-machine instance temp in a kickoff method.
    StateMachineInstance = 14,
    /// The hoisted-state marker slot of a state-machine MoveNext method.
    StateMachineState = 15,
    /// A short-lived lowering temp. Never mapped for Edit-and-Continue.
    LoweringTemp = 254,
    /// A short-lived emitter temp. Never mapped for Edit-and-Continue.
    EmitterTemp = 255,
}

impl LocalSlotKind {
    /// Create a `LocalSlotKind` from its serialized value.
    ///
    /// # Arguments
    ///
    /// * `value` - The serialized kind value
    ///
    /// # Returns
    ///
    /// * [`Some`](LocalSlotKind) - for a known serialized value
    /// * [`None`] - for values outside the closed set
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(LocalSlotKind::UserDefined),
            1 => Some(LocalSlotKind::UserConstant),
            2 => Some(LocalSlotKind::ReturnValue),
            3 => Some(LocalSlotKind::LoopControl),
            4 => Some(LocalSlotKind::ForEachEnumerator),
            5 => Some(LocalSlotKind::ForEachArray),
            6 => Some(LocalSlotKind::ForEachArrayIndex),
            7 => Some(LocalSlotKind::UsingResource),
            8 => Some(LocalSlotKind::LockResource),
            9 => Some(LocalSlotKind::LockTaken),
            10 => Some(LocalSlotKind::PatternMatchTemp),
            11 => Some(LocalSlotKind::SwitchDispatchTemp),
            12 => Some(LocalSlotKind::AwaiterTemp),
            13 => Some(LocalSlotKind::DisplayClassInstance),
            14 => Some(LocalSlotKind::StateMachineInstance),
            15 => Some(LocalSlotKind::StateMachineState),
            254 => Some(LocalSlotKind::LoweringTemp),
            255 => Some(LocalSlotKind::EmitterTemp),
            _ => None,
        }
    }

    /// True if slots of this kind are long-lived and participate in Edit-and-Continue
    /// identity mapping.
    #[must_use]
    pub fn is_long_lived(&self) -> bool {
        !matches!(self, LocalSlotKind::LoweringTemp | LocalSlotKind::EmitterTemp)
    }

    /// True if this kind represents a user declaration rather than a synthesized temp.
    #[must_use]
    pub fn is_user_declared(&self) -> bool {
        matches!(self, LocalSlotKind::UserDefined | LocalSlotKind::UserConstant)
    }
}

/// The Edit-and-Continue identity of a local slot.
///
/// Two compilations of semantically unchanged source must reproduce identical identities
/// for every slot. The `ordinal` disambiguates the degenerate case of two temps of the
/// same kind at the same syntax offset (duplicate lowering of one construct); it is
/// assigned deterministically in physical slot order, never by perturbing the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotIdentity {
    /// The slot kind.
    pub kind: LocalSlotKind,
    /// Position of the declaring syntax node relative to the enclosing method's syntax start.
    pub syntax_offset: SyntaxOffset,
    /// Deterministic secondary ordinal among slots sharing `(kind, syntax_offset)`.
    pub ordinal: u16,
}

impl fmt::Display for SlotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ordinal == 0 {
            write!(f, "{}@{}", self.kind, self.syntax_offset)
        } else {
            write!(f, "{}@{}#{}", self.kind, self.syntax_offset, self.ordinal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trip() {
        for value in 0u8..=255 {
            if let Some(kind) = LocalSlotKind::from_u8(value) {
                assert_eq!(kind as u8, value);
            }
        }
        assert_eq!(LocalSlotKind::from_u8(16), None);
        assert_eq!(LocalSlotKind::from_u8(100), None);
    }

    #[test]
    fn long_lived_kinds() {
        assert!(LocalSlotKind::UserDefined.is_long_lived());
        assert!(LocalSlotKind::ReturnValue.is_long_lived());
        assert!(LocalSlotKind::DisplayClassInstance.is_long_lived());
        assert!(!LocalSlotKind::LoweringTemp.is_long_lived());
        assert!(!LocalSlotKind::EmitterTemp.is_long_lived());
    }

    #[test]
    fn identity_display() {
        let id = SlotIdentity {
            kind: LocalSlotKind::ForEachEnumerator,
            syntax_offset: SyntaxOffset(24),
            ordinal: 0,
        };
        assert_eq!(id.to_string(), "ForEachEnumerator@24");

        let dup = SlotIdentity { ordinal: 1, ..id };
        assert_eq!(dup.to_string(), "ForEachEnumerator@24#1");
    }
}
