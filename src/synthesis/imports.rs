//! Effective import chain construction and program-order forwarding.
//!
//! Chain construction is a pure per-method step: walk the method's lexical container
//! and its parents, collecting each container's declarations as one chain level,
//! innermost first. Forwarding is not pure - whether a method emits its full chain or a
//! forward at an earlier method depends on what earlier methods in program order have
//! already emitted - so it runs as a sequential fold over an explicit
//! [`ForwardingCache`] threaded through the reduction, never a global.
//!
//! Three forward kinds exist:
//!
//! - `Imports`: this method's chain is structurally identical to one an earlier method
//!   emitted; the forward replaces the whole chain and is transitive, covering
//!   module-level information the target itself forwards.
//! - `Module`: this method carries its own chain but references extern aliases whose
//!   side table an earlier method (the module carrier) already holds.
//! - `ExternInfo`: this method's chain forwards via `Imports`, but the forward target
//!   is not the module carrier, so the extern-alias side table needs its own pointer.

use std::collections::HashMap;

use crate::records::customdebuginfo::{CustomDebugInfo, ForwardKind, ForwardRecord};
use crate::records::imports::{
    CompilationImports, ContainerId, ImportGroup, ImportScopeRecord, ImportSignature,
};
use crate::records::method::{MethodDebugRecord, MethodId};
use crate::Result;

/// Program-order state of the forwarding reduction.
///
/// Owned by the assembly driver and passed by mutable reference through the sequential
/// fold; per-method phases never see it.
#[derive(Debug, Default)]
pub struct ForwardingCache {
    chains: HashMap<ImportSignature, MethodId>,
    module_carrier: Option<MethodId>,
}

impl ForwardingCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The method carrying the module-level extern-alias side table, once one exists.
    #[must_use]
    pub fn module_carrier(&self) -> Option<MethodId> {
        self.module_carrier
    }
}

/// Builds effective import chains and resolves forwarding in program order.
pub struct ImportsChainBuilder;

impl ImportsChainBuilder {
    /// Compute the effective chain for a method declared in `container`: the
    /// concatenation of the container's declarations and its ancestors', innermost
    /// level first. Containers that declare nothing still contribute a level, so the
    /// chain's group count mirrors the lexical nesting depth.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvariantViolation`] for an unknown container handle or
    /// a parent cycle.
    pub fn effective_chain(
        container: Option<ContainerId>,
        imports: &CompilationImports,
    ) -> Result<ImportScopeRecord> {
        let mut groups: Vec<ImportGroup> = Vec::new();
        let mut current = container;
        let mut hops = 0usize;

        while let Some(id) = current {
            let node = imports
                .container(id)
                .ok_or_else(|| invariant_error!("unknown import container {}", id.0))?;
            groups.push(ImportGroup {
                entries: node.entries.clone(),
            });
            current = node.parent;

            hops += 1;
            if hops > 0x1000 {
                return Err(invariant_error!(
                    "import container parent links form a cycle at {}",
                    id.0
                ));
            }
        }

        Ok(ImportScopeRecord { groups })
    }

    /// Attach import information to `record` as one step of the program-order fold.
    ///
    /// Either the full chain lands on the record, or forward records replace it per the
    /// module-level rules. The cache is updated so later methods can forward here.
    pub fn attach(
        record: &mut MethodDebugRecord,
        chain: ImportScopeRecord,
        imports: &CompilationImports,
        cache: &mut ForwardingCache,
    ) {
        if chain.is_empty() {
            record.import_scope = None;
            return;
        }

        let signature = ImportSignature::of(&chain, imports);
        let uses_extern = signature.has_extern_aliases();

        match cache.chains.get(&signature) {
            Some(&target) => {
                record.import_scope = None;
                record
                    .custom_debug_info
                    .push(CustomDebugInfo::Forward(ForwardRecord {
                        kind: ForwardKind::Imports,
                        target,
                    }));
                // The chain forward is transitive, except when the extern side table
                // lives on a different method than the forward target.
                if uses_extern {
                    if let Some(carrier) = cache.module_carrier {
                        if carrier != target {
                            record
                                .custom_debug_info
                                .push(CustomDebugInfo::Forward(ForwardRecord {
                                    kind: ForwardKind::ExternInfo,
                                    target: carrier,
                                }));
                        }
                    }
                }
            }
            None => {
                cache.chains.insert(signature, record.method);
                record.import_scope = Some(chain);

                if uses_extern {
                    match cache.module_carrier {
                        Some(carrier) => {
                            record
                                .custom_debug_info
                                .push(CustomDebugInfo::Forward(ForwardRecord {
                                    kind: ForwardKind::Module,
                                    target: carrier,
                                }));
                        }
                        None => cache.module_carrier = Some(record.method),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::imports::{AssemblyIdentity, ExternAliasInfo, ImportContainer, ImportEntry};

    fn namespace(name: &str) -> ImportEntry {
        ImportEntry::Namespace {
            namespace: name.to_string(),
        }
    }

    fn nested_imports() -> (CompilationImports, ContainerId, ContainerId) {
        let mut imports = CompilationImports::new();
        let outer = imports.add_container(ImportContainer {
            entries: vec![namespace("System")],
            parent: None,
        });
        let inner = imports.add_container(ImportContainer {
            entries: vec![namespace("System.Text")],
            parent: Some(outer),
        });
        (imports, outer, inner)
    }

    fn extern_imports() -> (CompilationImports, ContainerId) {
        let mut imports = CompilationImports::new();
        imports.add_extern_alias(ExternAliasInfo {
            alias: "Lib".to_string(),
            assembly: AssemblyIdentity {
                name: "Lib".to_string(),
                version: (1, 0, 0, 0),
                public_key_token: None,
            },
        });
        let container = imports.add_container(ImportContainer {
            entries: vec![ImportEntry::ExternAlias {
                alias: "Lib".to_string(),
            }],
            parent: None,
        });
        (imports, container)
    }

    #[test]
    fn chain_is_innermost_first() {
        let (imports, _, inner) = nested_imports();
        let chain = ImportsChainBuilder::effective_chain(Some(inner), &imports).unwrap();
        assert_eq!(chain.groups.len(), 2);
        assert_eq!(chain.groups[0].entries[0], namespace("System.Text"));
        assert_eq!(chain.groups[1].entries[0], namespace("System"));
    }

    #[test]
    fn empty_container_still_contributes_a_level() {
        let mut imports = CompilationImports::new();
        let outer = imports.add_container(ImportContainer {
            entries: vec![namespace("System")],
            parent: None,
        });
        let inner = imports.add_container(ImportContainer {
            entries: Vec::new(),
            parent: Some(outer),
        });
        let chain = ImportsChainBuilder::effective_chain(Some(inner), &imports).unwrap();
        assert_eq!(chain.groups.len(), 2);
        assert!(chain.groups[0].is_empty());
    }

    #[test]
    fn unknown_container_is_rejected() {
        let imports = CompilationImports::new();
        assert!(ImportsChainBuilder::effective_chain(Some(ContainerId(3)), &imports).is_err());
    }

    #[test]
    fn identical_chains_forward_to_first_emitter() {
        let (imports, _, inner) = nested_imports();
        let mut cache = ForwardingCache::new();

        let mut first = MethodDebugRecord::new(MethodId(0));
        let chain = ImportsChainBuilder::effective_chain(Some(inner), &imports).unwrap();
        ImportsChainBuilder::attach(&mut first, chain.clone(), &imports, &mut cache);
        assert!(first.import_scope.is_some());
        assert!(first.custom_debug_info.is_empty());

        let mut second = MethodDebugRecord::new(MethodId(1));
        ImportsChainBuilder::attach(&mut second, chain, &imports, &mut cache);
        assert!(second.import_scope.is_none());
        assert_eq!(
            second.custom_debug_info,
            vec![CustomDebugInfo::Forward(ForwardRecord {
                kind: ForwardKind::Imports,
                target: MethodId(0),
            })]
        );
    }

    #[test]
    fn different_chains_both_emit() {
        let (imports, outer, inner) = nested_imports();
        let mut cache = ForwardingCache::new();

        let mut first = MethodDebugRecord::new(MethodId(0));
        let outer_chain = ImportsChainBuilder::effective_chain(Some(outer), &imports).unwrap();
        ImportsChainBuilder::attach(&mut first, outer_chain, &imports, &mut cache);

        let mut second = MethodDebugRecord::new(MethodId(1));
        let inner_chain = ImportsChainBuilder::effective_chain(Some(inner), &imports).unwrap();
        ImportsChainBuilder::attach(&mut second, inner_chain, &imports, &mut cache);

        assert!(first.import_scope.is_some());
        assert!(second.import_scope.is_some());
        assert!(second.custom_debug_info.is_empty());
    }

    #[test]
    fn first_extern_user_becomes_module_carrier() {
        let (imports, container) = extern_imports();
        let mut cache = ForwardingCache::new();

        let mut first = MethodDebugRecord::new(MethodId(0));
        let chain = ImportsChainBuilder::effective_chain(Some(container), &imports).unwrap();
        ImportsChainBuilder::attach(&mut first, chain, &imports, &mut cache);

        assert_eq!(cache.module_carrier(), Some(MethodId(0)));
        assert!(first.custom_debug_info.is_empty());
    }

    #[test]
    fn later_extern_user_with_distinct_chain_forwards_module_info() {
        let (mut imports, container) = extern_imports();
        let other = imports.add_container(ImportContainer {
            entries: vec![
                ImportEntry::ExternAlias {
                    alias: "Lib".to_string(),
                },
                namespace("System"),
            ],
            parent: None,
        });
        let mut cache = ForwardingCache::new();

        let mut first = MethodDebugRecord::new(MethodId(0));
        let chain = ImportsChainBuilder::effective_chain(Some(container), &imports).unwrap();
        ImportsChainBuilder::attach(&mut first, chain, &imports, &mut cache);

        let mut second = MethodDebugRecord::new(MethodId(1));
        let other_chain = ImportsChainBuilder::effective_chain(Some(other), &imports).unwrap();
        ImportsChainBuilder::attach(&mut second, other_chain, &imports, &mut cache);

        assert!(second.import_scope.is_some());
        assert_eq!(
            second.custom_debug_info,
            vec![CustomDebugInfo::Forward(ForwardRecord {
                kind: ForwardKind::Module,
                target: MethodId(0),
            })]
        );
    }

    #[test]
    fn chain_forward_is_transitive_for_module_info() {
        let (imports, container) = extern_imports();
        let mut cache = ForwardingCache::new();
        let chain = ImportsChainBuilder::effective_chain(Some(container), &imports).unwrap();

        let mut first = MethodDebugRecord::new(MethodId(0));
        ImportsChainBuilder::attach(&mut first, chain.clone(), &imports, &mut cache);

        // Identical chain: the single Imports forward reaches the carrier itself, so no
        // extra extern-info pointer appears.
        let mut second = MethodDebugRecord::new(MethodId(1));
        ImportsChainBuilder::attach(&mut second, chain, &imports, &mut cache);
        assert_eq!(second.custom_debug_info.len(), 1);
        assert!(matches!(
            second.custom_debug_info[0],
            CustomDebugInfo::Forward(ForwardRecord {
                kind: ForwardKind::Imports,
                ..
            })
        ));
    }
}
