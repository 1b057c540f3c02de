//! The emit boundary: options, writer contract, and reproducible-build metadata.
//!
//! Records stay format-agnostic inside this crate; the types here define how they are
//! handed to a physical serializer. A writer declares its capabilities through
//! [`DebugRecordWriter`], and [`emit_module`] enforces up front that the requested
//! [`EmitOptions`] can actually be satisfied, so an emit either happens completely or
//! not at all.

pub mod deterministic;
pub mod options;
pub mod writer;

pub use deterministic::{DeterministicBuildInfo, ReferenceFingerprint, ReferenceImageKind};
pub use options::{DebugFormat, EmitOptions};
pub use writer::{
    emit_module, validate_writer_compatibility, DebugRecordWriter, RecordInspector,
};
