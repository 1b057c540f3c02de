//! # dotpdb Prelude
//!
//! This module provides a convenient prelude for the most commonly used types of the
//! dotpdb library. Import this module to get quick access to the essential types for
//! debug information synthesis.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotpdb operations
pub use crate::Error;

/// The result type used throughout dotpdb
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Module-level synthesis driver
pub use crate::synthesis::synthesize_module;

/// Per-method record builder
pub use crate::synthesis::MethodDebugBuilder;

// ================================================================================================
// Input Model
// ================================================================================================

/// The per-method input handed to the engine
pub use crate::lowered::MethodInput;

/// Lowered body building blocks
pub use crate::lowered::{
    LexicalRegion, LoweredBody, LoweredKind, LoweredStatement, RegionKind, RegionLocal,
    RegionLocalRole, SourceSpan, SyntaxOffset,
};

/// Symbol table building blocks
pub use crate::lowered::{
    ClosureSymbol, ConstantValue, HoistedVariable, LambdaSymbol, LocalSymbol, MethodRole,
    MethodSymbols, StateMachineKind, TypeShape,
};

// ================================================================================================
// Output Records
// ================================================================================================

/// Aggregation roots
pub use crate::records::{MethodDebugRecord, MethodId, ModuleDebugInfo};

/// Sequence points
pub use crate::records::{SequencePointEntry, SequencePoints, HIDDEN_LINE_SENTINEL};

/// Lexical scopes
pub use crate::records::{Scope, ScopeConstant, ScopeLocal};

/// Edit-and-Continue slot identities
pub use crate::records::{LocalSlotKind, LocalVariableAttributes, SlotIdentity};

/// Import chains and forwarding
pub use crate::records::{
    AssemblyIdentity, CompilationImports, ContainerId, ExternAliasInfo, ImportContainer,
    ImportEntry, ImportScopeRecord,
};

/// Typed custom debug information sub-records
pub use crate::records::{CustomDebugInfo, CustomDebugInfoKind, ForwardKind, ForwardRecord};

/// Source documents
pub use crate::records::{ChecksumAlgorithm, Document, DocumentId, DocumentRegistry};

// ================================================================================================
// Emit Boundary
// ================================================================================================

/// Emit options and formats
pub use crate::emit::{DebugFormat, EmitOptions};

/// Writer contract and the canonical reference writer
pub use crate::emit::{emit_module, DebugRecordWriter, RecordInspector};

/// Reproducible-build metadata
pub use crate::emit::{DeterministicBuildInfo, ReferenceFingerprint, ReferenceImageKind};
