//! Import scope records: namespace/alias/extern-alias visibility chains per method.
//!
//! Import declarations live on lexical containers (file, namespace, nested namespace).
//! A method's *effective chain* is the concatenation of its containers' declarations from
//! innermost to outermost, each group tagged with its entry count so tools attempt the
//! innermost `using` directives first during name lookup reconstruction.
//!
//! # Deduplication
//!
//! Identical chains are emitted once. [`ImportSignature`] is the structural identity used
//! by the forwarding reduction in [`crate::synthesis::imports`]: two methods whose
//! signatures match (same entries, same order, same alias targets, same extern-alias
//! assembly identities) share one emitted chain via a forward record.
//!
//! # Thread Safety
//!
//! All types in this module are [`Send`] and [`Sync`] because they contain only owned data.

/// Handle to a lexical container registered in [`CompilationImports`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(pub u32);

/// One import declaration as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::Display)]
pub enum ImportEntry {
    /// `using Namespace;`
    Namespace {
        /// The imported namespace.
        namespace: String,
    },
    /// `using Alias = Target;`
    Alias {
        /// The alias name.
        alias: String,
        /// The aliased namespace or type.
        target: String,
    },
    /// `extern alias Name;`
    ExternAlias {
        /// The extern alias name.
        alias: String,
    },
    /// `using static Type;`
    TypeImport {
        /// The imported type.
        type_name: String,
    },
}

/// The import declarations of one lexical container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportContainer {
    /// Declarations in source declaration order.
    pub entries: Vec<ImportEntry>,
    /// The enclosing container, if any.
    pub parent: Option<ContainerId>,
}

/// Identity of a referenced assembly, recorded for extern aliases so tools can resolve
/// the alias without re-reading all references.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyIdentity {
    /// Simple assembly name.
    pub name: String,
    /// Assembly version (major, minor, build, revision).
    pub version: (u16, u16, u16, u16),
    /// Public key token, when the assembly is strong-named.
    pub public_key_token: Option<[u8; 8]>,
}

/// Side-table entry associating an extern alias with the assembly it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternAliasInfo {
    /// The alias name.
    pub alias: String,
    /// The aliased assembly's identity.
    pub assembly: AssemblyIdentity,
}

/// All import declarations of a compilation, organized by lexical container.
#[derive(Debug, Clone, Default)]
pub struct CompilationImports {
    containers: Vec<ImportContainer>,
    extern_aliases: Vec<ExternAliasInfo>,
}

impl CompilationImports {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lexical container, returning its handle.
    pub fn add_container(&mut self, container: ImportContainer) -> ContainerId {
        let id = ContainerId(u32::try_from(self.containers.len()).unwrap_or(u32::MAX));
        self.containers.push(container);
        id
    }

    /// Record an extern-alias assembly identity for the compilation.
    pub fn add_extern_alias(&mut self, info: ExternAliasInfo) {
        self.extern_aliases.push(info);
    }

    /// Look up a container by handle.
    #[must_use]
    pub fn container(&self, id: ContainerId) -> Option<&ImportContainer> {
        self.containers.get(id.0 as usize)
    }

    /// The extern-alias side table, in declaration order.
    #[must_use]
    pub fn extern_aliases(&self) -> &[ExternAliasInfo] {
        &self.extern_aliases
    }

    /// Resolve an extern alias name to its recorded assembly identity.
    #[must_use]
    pub fn resolve_extern_alias(&self, alias: &str) -> Option<&ExternAliasInfo> {
        self.extern_aliases.iter().find(|info| info.alias == alias)
    }
}

/// One level of an effective import chain: the declarations of a single container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ImportGroup {
    /// Declarations of this level, in source order.
    pub entries: Vec<ImportEntry>,
}

impl ImportGroup {
    /// Entry count of this level, as tagged in serialized chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if this level declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A method's effective import chain, innermost container first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ImportScopeRecord {
    /// Chain levels from innermost to outermost container.
    pub groups: Vec<ImportGroup>,
}

impl ImportScopeRecord {
    /// Total entry count across all levels.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(ImportGroup::len).sum()
    }

    /// True if the chain declares nothing at any level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(ImportGroup::is_empty)
    }
}

/// Structural identity of an effective import chain.
///
/// Includes the extern-alias assembly identities the chain references, so two chains
/// that spell the same alias name bound to different assemblies do not collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportSignature {
    /// The chain itself.
    pub chain: ImportScopeRecord,
    /// Assembly identities of every extern alias referenced by the chain, in chain order.
    pub extern_identities: Vec<ExternAliasInfo>,
}

impl ImportSignature {
    /// Compute the signature of a chain against the compilation's extern-alias table.
    #[must_use]
    pub fn of(chain: &ImportScopeRecord, imports: &CompilationImports) -> Self {
        let mut extern_identities = Vec::new();
        for group in &chain.groups {
            for entry in &group.entries {
                if let ImportEntry::ExternAlias { alias } = entry {
                    if let Some(info) = imports.resolve_extern_alias(alias) {
                        extern_identities.push(info.clone());
                    }
                }
            }
        }
        Self {
            chain: chain.clone(),
            extern_identities,
        }
    }

    /// True if the chain references any extern alias.
    #[must_use]
    pub fn has_extern_aliases(&self) -> bool {
        !self.extern_identities.is_empty()
    }
}
