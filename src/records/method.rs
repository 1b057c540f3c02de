//! Method and module debug records - the aggregated output the physical writer consumes.
//!
//! One [`MethodDebugRecord`] is produced per emitted method (original method, or its
//! state-machine MoveNext counterpart). Records are assembled in program order into a
//! [`ModuleDebugInfo`], the module-wide table handed to the writer at the emit boundary.

use std::fmt;

use crate::emit::deterministic::DeterministicBuildInfo;
use crate::records::customdebuginfo::{CustomDebugInfo, CustomDebugInfoKind, ForwardRecord};
use crate::records::document::Document;
use crate::records::imports::{ExternAliasInfo, ImportScopeRecord};
use crate::records::scope::Scope;
use crate::records::sequencepoint::SequencePoints;

/// Handle identifying an emitted method within its module.
///
/// Methods are numbered in program (emission) order; forward records reference earlier
/// methods by this handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodId(pub u32);

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "method#{}", self.0)
    }
}

/// The complete debug record of one emitted method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDebugRecord {
    /// The method this record describes.
    pub method: MethodId,
    /// The root lexical scope, spanning the whole body. `None` for fully forwarded
    /// records (state-machine kickoff methods).
    pub root_scope: Option<Scope>,
    /// Ordered sequence points. Empty for fully forwarded records.
    pub sequence_points: SequencePoints,
    /// The full effective import chain, when this method emits one itself rather than
    /// forwarding to an earlier method.
    pub import_scope: Option<ImportScopeRecord>,
    /// Typed custom debug information sub-records. At most one forward record; when
    /// present, it supersedes the sub-records it makes redundant.
    pub custom_debug_info: Vec<CustomDebugInfo>,
}

impl MethodDebugRecord {
    /// Create an empty record for the given method.
    #[must_use]
    pub fn new(method: MethodId) -> Self {
        Self {
            method,
            root_scope: None,
            sequence_points: SequencePoints::default(),
            import_scope: None,
            custom_debug_info: Vec::new(),
        }
    }

    /// The forward record, if this method forwards to an earlier one.
    #[must_use]
    pub fn forward(&self) -> Option<&ForwardRecord> {
        self.custom_debug_info.iter().find_map(|info| match info {
            CustomDebugInfo::Forward(record) => Some(record),
            _ => None,
        })
    }

    /// The first sub-record of the given kind, if present.
    #[must_use]
    pub fn find(&self, kind: CustomDebugInfoKind) -> Option<&CustomDebugInfo> {
        self.custom_debug_info
            .iter()
            .find(|info| info.kind() == kind)
    }

    /// True if the record consists solely of forwarding information (no scopes, no
    /// sequence points, no locally emitted chain).
    #[must_use]
    pub fn is_fully_forwarded(&self) -> bool {
        self.root_scope.is_none()
            && self.sequence_points.is_empty()
            && self.import_scope.is_none()
            && !self.custom_debug_info.is_empty()
    }
}

/// The assembled debug information of one module, in final emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDebugInfo {
    /// Method records in program order.
    pub records: Vec<MethodDebugRecord>,
    /// Source documents referenced by the records, ordered by id.
    pub documents: Vec<Document>,
    /// Extern-alias side table: alias to assembly identity, emitted once per module.
    pub extern_aliases: Vec<ExternAliasInfo>,
    /// Reproducible-build metadata, present when deterministic output was requested.
    pub deterministic: Option<DeterministicBuildInfo>,
}

impl ModuleDebugInfo {
    /// Look up a method's record by handle.
    #[must_use]
    pub fn record(&self, method: MethodId) -> Option<&MethodDebugRecord> {
        self.records.iter().find(|record| record.method == method)
    }
}
