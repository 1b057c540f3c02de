//! Custom debug information records: the typed sub-records beyond sequence points and
//! scopes that a method's debug record can carry.
//!
//! Each record kind is a variant of one sum type, [`CustomDebugInfo`], and serializers
//! match on it exhaustively - adding a kind is a compile error until every consumer
//! handles it. Kinds defined by the portable debug format are identified by well-known
//! GUIDs; forwarding and state-machine link records are structural and have no GUID of
//! their own.
//!
//! # Key Components
//!
//! - [`CustomDebugInfo`] - the sum type over all record kinds
//! - [`CustomDebugInfoKind`] - kind discriminants with their format GUIDs
//! - [`ForwardRecord`] - deduplication pointer at an earlier method's records
//! - [`DynamicFlagRecord`] / [`TupleNameRecord`] - per-local type-shape metadata
//! - [`HoistedLocalScope`] - hoisted-field visibility range in a MoveNext method
//!
//! # Thread Safety
//!
//! All types in this module are [`Send`] and [`Sync`] because they contain only owned data.

use uguid::{guid, Guid};

use crate::lowered::span::SyntaxOffset;
use crate::records::method::MethodId;
use crate::records::slot::SlotIdentity;

/// The record kinds a method debug record can carry, with their format GUIDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum CustomDebugInfoKind {
    /// Per-local dynamic-type flags.
    DynamicLocals,
    /// Per-local tuple element names.
    TupleElementNames,
    /// Edit-and-Continue local slot identity map.
    EncLocalSlotMap,
    /// Edit-and-Continue lambda and closure map.
    EncLambdaMap,
    /// Hoisted-local visibility ranges in a state-machine MoveNext method.
    HoistedLocalScopes,
    /// Link from a MoveNext method back to its kickoff method.
    StateMachineLink,
    /// Kickoff method's pointer at its generated MoveNext method.
    StateMachineKickoff,
    /// Deduplication forward at an earlier method's records.
    Forward,
}

impl CustomDebugInfoKind {
    /// The well-known GUID identifying this kind in the portable debug format, when the
    /// kind is GUID-addressed. Forwarding and state-machine links are structural and
    /// return [`None`].
    #[must_use]
    pub fn guid(&self) -> Option<Guid> {
        match self {
            CustomDebugInfoKind::DynamicLocals => {
                Some(guid!("83c563c4-b4f3-47d5-b824-ba5441477ea8"))
            }
            CustomDebugInfoKind::TupleElementNames => {
                Some(guid!("ed9fdf71-8879-4747-8ed3-fe5ede3ce710"))
            }
            CustomDebugInfoKind::EncLocalSlotMap => {
                Some(guid!("755f52a8-91c5-45be-b4b8-209571e552bd"))
            }
            CustomDebugInfoKind::EncLambdaMap => {
                Some(guid!("a643004c-0240-496f-a783-30d64f4979de"))
            }
            CustomDebugInfoKind::HoistedLocalScopes => {
                Some(guid!("6da9a61e-f8c7-4874-be62-68bc5630df71"))
            }
            CustomDebugInfoKind::StateMachineLink
            | CustomDebugInfoKind::StateMachineKickoff
            | CustomDebugInfoKind::Forward => None,
        }
    }
}

/// The target a per-local record attaches to: a variable slot or a named constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotOrConstant {
    /// A physical local variable slot.
    Slot(u16),
    /// A named constant (constants occupy no physical slot).
    Constant {
        /// The constant's declared name.
        name: String,
    },
}

/// Dynamic-type flags for one local or constant.
///
/// The bit sequence is a pre-order walk of the declared type shape, one bit per
/// position, set where the position is the dynamic placeholder. Capped at 64 positions:
/// a shape needing more is never truncated - the whole record is omitted instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicFlagRecord {
    /// The local or constant this record describes.
    pub target: SlotOrConstant,
    /// Flag bits; bit `i` corresponds to pre-order position `i`.
    pub flags: u64,
    /// Number of meaningful positions (1..=64).
    pub count: u8,
}

impl DynamicFlagRecord {
    /// True if pre-order position `index` is flagged dynamic.
    #[must_use]
    pub fn is_dynamic(&self, index: u8) -> bool {
        index < self.count && (self.flags >> index) & 1 == 1
    }
}

/// Tuple element names for one local or constant, scoped to the region where the name
/// binding is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleNameRecord {
    /// The local or constant this record describes.
    pub target: SlotOrConstant,
    /// One entry per pre-order position; `None` for unnamed positions.
    pub names: Vec<Option<String>>,
    /// IL offset where the name binding becomes valid.
    pub start_offset: u32,
    /// IL offset one past the end of the binding's validity.
    pub end_offset: u32,
}

/// One lambda or local function, keyed by its defining syntax offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LambdaMapEntry {
    /// Defining syntax offset relative to the enclosing method's syntax start.
    pub syntax_offset: SyntaxOffset,
    /// Index into the closure list of the closure capturing this lambda's variables,
    /// when captures required a synthesized closure object. Resolved from the defining
    /// offsets at record-building time; never an object reference.
    pub closure_ordinal: Option<u32>,
}

/// One synthesized closure, keyed by the syntax node that caused its creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureMapEntry {
    /// Defining syntax offset relative to the enclosing method's syntax start.
    pub syntax_offset: SyntaxOffset,
}

/// Visibility range of one hoisted field inside a state-machine MoveNext method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoistedLocalScope {
    /// Index of the hoisted field within the state-machine type.
    pub field_index: u32,
    /// IL offset where the field should start being treated as an in-scope local.
    pub start_offset: u32,
    /// IL offset one past the end of the visibility range.
    pub end_offset: u32,
}

/// The part of an earlier method's records a forward points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ForwardKind {
    /// The full import chain.
    Imports,
    /// The extern-alias side table.
    ExternInfo,
    /// Module-level information carried by the forward target.
    Module,
}

/// A deduplication pointer: instead of re-emitting information identical to what an
/// earlier method already carries, the record points at that method. Forwards are
/// directional - a later method may point at an earlier one, never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardRecord {
    /// What is being forwarded.
    pub kind: ForwardKind,
    /// The earlier method that carries the full information.
    pub target: MethodId,
}

/// A typed custom debug information sub-record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomDebugInfo {
    /// Deduplication forward at an earlier method.
    Forward(ForwardRecord),
    /// Dynamic-type flags for the method's locals and constants.
    DynamicLocals(Vec<DynamicFlagRecord>),
    /// Tuple element names for the method's locals and constants.
    TupleElementNames(Vec<TupleNameRecord>),
    /// Edit-and-Continue slot identity map, in physical slot order.
    EncLocalSlotMap(Vec<SlotIdentity>),
    /// Edit-and-Continue lambda and closure map.
    EncLambdaMap {
        /// Lambdas ordered by defining syntax offset.
        lambdas: Vec<LambdaMapEntry>,
        /// Closures ordered by defining syntax offset.
        closures: Vec<ClosureMapEntry>,
    },
    /// Hoisted-local visibility ranges of a MoveNext method.
    HoistedLocalScopes(Vec<HoistedLocalScope>),
    /// Link from a MoveNext method back to its kickoff method, with the IL offsets of
    /// compiler-injected catch-and-rethrow dispatch the debugger must skip.
    StateMachineLink {
        /// The original (kickoff) method.
        kickoff: MethodId,
        /// Offsets of injected exception dispatch handlers.
        catch_handler_offsets: Vec<u32>,
    },
    /// Kickoff method's pointer at its generated MoveNext method.
    StateMachineKickoff {
        /// The generated MoveNext method.
        move_next: MethodId,
    },
}

impl CustomDebugInfo {
    /// The kind of this record.
    #[must_use]
    pub fn kind(&self) -> CustomDebugInfoKind {
        match self {
            CustomDebugInfo::Forward(_) => CustomDebugInfoKind::Forward,
            CustomDebugInfo::DynamicLocals(_) => CustomDebugInfoKind::DynamicLocals,
            CustomDebugInfo::TupleElementNames(_) => CustomDebugInfoKind::TupleElementNames,
            CustomDebugInfo::EncLocalSlotMap(_) => CustomDebugInfoKind::EncLocalSlotMap,
            CustomDebugInfo::EncLambdaMap { .. } => CustomDebugInfoKind::EncLambdaMap,
            CustomDebugInfo::HoistedLocalScopes(_) => CustomDebugInfoKind::HoistedLocalScopes,
            CustomDebugInfo::StateMachineLink { .. } => CustomDebugInfoKind::StateMachineLink,
            CustomDebugInfo::StateMachineKickoff { .. } => CustomDebugInfoKind::StateMachineKickoff,
        }
    }
}
