//! The output model: format-agnostic logical debug records.
//!
//! Everything the engine produces lives here - one internal representation regardless of
//! whether the physical target is a Windows-hosted program database or the portable
//! metadata-table format. Physical serializers are selected at the emit boundary
//! ([`crate::emit`]) and never branch inside the record types.
//!
//! # Key Components
//!
//! - [`method::MethodDebugRecord`] / [`method::ModuleDebugInfo`] - aggregation roots
//! - [`sequencepoint::SequencePoints`] - IL offset to source span mappings
//! - [`scope::Scope`] - nested lexical scopes
//! - [`slot::SlotIdentity`] - Edit-and-Continue slot identities
//! - [`imports::ImportScopeRecord`] - effective import chains and their signatures
//! - [`customdebuginfo::CustomDebugInfo`] - the typed sub-record sum type
//! - [`document::DocumentRegistry`] - source document identities

pub mod customdebuginfo;
pub mod document;
pub mod imports;
pub mod method;
pub mod scope;
pub mod sequencepoint;
pub mod slot;

pub use customdebuginfo::{
    ClosureMapEntry, CustomDebugInfo, CustomDebugInfoKind, DynamicFlagRecord, ForwardKind,
    ForwardRecord, HoistedLocalScope, LambdaMapEntry, SlotOrConstant, TupleNameRecord,
};
pub use document::{ChecksumAlgorithm, Document, DocumentId, DocumentRegistry};
pub use imports::{
    AssemblyIdentity, CompilationImports, ContainerId, ExternAliasInfo, ImportContainer,
    ImportEntry, ImportGroup, ImportScopeRecord, ImportSignature,
};
pub use method::{MethodDebugRecord, MethodId, ModuleDebugInfo};
pub use scope::{Scope, ScopeConstant, ScopeLocal};
pub use sequencepoint::{SequencePointEntry, SequencePoints, HIDDEN_LINE_SENTINEL};
pub use slot::{LocalSlotKind, LocalVariableAttributes, SlotIdentity};
