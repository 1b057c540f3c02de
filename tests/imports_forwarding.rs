//! Integration tests for import chain construction and forwarding deduplication.
//!
//! Import chains are deduplicated across a module in program order: later methods with
//! a chain structurally identical to an earlier one forward to it instead of repeating
//! it, and the extern-alias side table is carried once with pointer records from
//! everyone else who needs it.

use dotpdb::prelude::*;

fn namespace(name: &str) -> ImportEntry {
    ImportEntry::Namespace {
        namespace: name.to_string(),
    }
}

fn extern_alias(alias: &str) -> ImportEntry {
    ImportEntry::ExternAlias {
        alias: alias.to_string(),
    }
}

fn alias_info(alias: &str, assembly: &str) -> ExternAliasInfo {
    ExternAliasInfo {
        alias: alias.to_string(),
        assembly: AssemblyIdentity {
            name: assembly.to_string(),
            version: (1, 0, 0, 0),
            public_key_token: None,
        },
    }
}

fn method_in_container(id: u32, container: ContainerId) -> MethodInput {
    let mut input = MethodInput::new(MethodId(id), DocumentId(0), 0x10);
    input.body.statements.push(LoweredStatement::visible(
        0x00,
        LoweredKind::Statement,
        SourceSpan::single_line(id, 1, 10),
    ));
    input.import_container = Some(container);
    input
}

fn registry() -> DocumentRegistry {
    let documents = DocumentRegistry::new(ChecksumAlgorithm::Sha1);
    documents.register("Program.cs", b"// source");
    documents
}

/// Two methods in the same namespace share one chain: the first carries it, the
/// second emits a single chain forward and nothing else import-related.
#[test]
fn identical_chains_forward_to_the_first_carrier() -> Result<()> {
    let mut imports = CompilationImports::new();
    let container = imports.add_container(ImportContainer {
        entries: vec![namespace("System"), namespace("System.Linq")],
        parent: None,
    });

    let module = synthesize_module(
        &[
            method_in_container(1, container),
            method_in_container(2, container),
        ],
        &imports,
        &registry(),
        &EmitOptions::default(),
    )?;

    let first = &module.records[0];
    assert!(first.import_scope.is_some());
    assert!(first.forward().is_none());

    let second = &module.records[1];
    assert!(second.import_scope.is_none());
    let forward = second.forward().unwrap();
    assert_eq!(forward.kind, ForwardKind::Imports);
    assert_eq!(forward.target, MethodId(1));
    assert_eq!(second.custom_debug_info.len(), 1);
    Ok(())
}

/// Chain forwards are transitive: the third identical chain still points at the first
/// carrier, never at the second forwarder.
#[test]
fn chain_forwards_are_transitive() -> Result<()> {
    let mut imports = CompilationImports::new();
    let container = imports.add_container(ImportContainer {
        entries: vec![namespace("System")],
        parent: None,
    });

    let inputs: Vec<MethodInput> = (1..=3)
        .map(|id| method_in_container(id, container))
        .collect();
    let module = synthesize_module(&inputs, &imports, &registry(), &EmitOptions::default())?;

    assert_eq!(module.records[2].forward().unwrap().target, MethodId(1));
    Ok(())
}

/// One differing declaration breaks structural identity; both methods carry their
/// full chains.
#[test]
fn differing_chains_are_both_carried() -> Result<()> {
    let mut imports = CompilationImports::new();
    let plain = imports.add_container(ImportContainer {
        entries: vec![namespace("System")],
        parent: None,
    });
    let extended = imports.add_container(ImportContainer {
        entries: vec![namespace("System"), namespace("System.IO")],
        parent: None,
    });

    let module = synthesize_module(
        &[
            method_in_container(1, plain),
            method_in_container(2, extended),
        ],
        &imports,
        &registry(),
        &EmitOptions::default(),
    )?;

    assert!(module.records[0].import_scope.is_some());
    assert!(module.records[1].import_scope.is_some());
    assert!(module.records[1].forward().is_none());
    Ok(())
}

/// Nested namespaces produce a chain with the innermost container's declarations
/// first.
#[test]
fn chains_list_innermost_container_first() -> Result<()> {
    let mut imports = CompilationImports::new();
    let outer = imports.add_container(ImportContainer {
        entries: vec![namespace("System")],
        parent: None,
    });
    let inner = imports.add_container(ImportContainer {
        entries: vec![namespace("System.Text")],
        parent: Some(outer),
    });

    let module = synthesize_module(
        &[method_in_container(1, inner)],
        &imports,
        &registry(),
        &EmitOptions::default(),
    )?;

    let chain = module.records[0].import_scope.as_ref().unwrap();
    assert_eq!(chain.groups.len(), 2);
    assert_eq!(chain.groups[0].entries[0], namespace("System.Text"));
    assert_eq!(chain.groups[1].entries[0], namespace("System"));
    Ok(())
}

/// The first extern-alias-using method becomes the module-info carrier. A later
/// method with a different extern chain points module-level information at the
/// carrier while still carrying its own chain; a later method with a chain identical
/// to a non-carrier forwards the chain there and adds a separate extern-info pointer
/// at the carrier.
#[test]
fn extern_alias_side_table_is_carried_once() -> Result<()> {
    let mut imports = CompilationImports::new();
    imports.add_extern_alias(alias_info("corlib", "mscorlib"));
    imports.add_extern_alias(alias_info("legacy", "Vendor.Legacy"));
    let first = imports.add_container(ImportContainer {
        entries: vec![extern_alias("corlib"), namespace("System")],
        parent: None,
    });
    let second = imports.add_container(ImportContainer {
        entries: vec![extern_alias("legacy"), namespace("System.IO")],
        parent: None,
    });

    let module = synthesize_module(
        &[
            method_in_container(1, first),
            method_in_container(2, second),
            method_in_container(3, first),
            method_in_container(4, second),
        ],
        &imports,
        &registry(),
        &EmitOptions::default(),
    )?;

    // Method 1: carrier. Full chain, no forwards.
    assert!(module.records[0].import_scope.is_some());
    assert!(module.records[0].custom_debug_info.is_empty());

    // Method 2: distinct extern chain. Full chain plus a module-info pointer.
    assert!(module.records[1].import_scope.is_some());
    let module_forward = module.records[1].forward().unwrap();
    assert_eq!(module_forward.kind, ForwardKind::Module);
    assert_eq!(module_forward.target, MethodId(1));

    // Method 3: chain identical to the carrier's. One transitive chain forward is
    // enough; the extern side table lives at the forward target already.
    let third = &module.records[2];
    assert_eq!(third.custom_debug_info.len(), 1);
    assert_eq!(third.forward().unwrap().kind, ForwardKind::Imports);
    assert_eq!(third.forward().unwrap().target, MethodId(1));

    // Method 4: chain identical to method 2's, which is not the carrier. The chain
    // forward points at method 2 and a second pointer names the carrier.
    let fourth = &module.records[3];
    let kinds: Vec<(ForwardKind, MethodId)> = fourth
        .custom_debug_info
        .iter()
        .filter_map(|info| match info {
            CustomDebugInfo::Forward(record) => Some((record.kind, record.target)),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            (ForwardKind::Imports, MethodId(2)),
            (ForwardKind::ExternInfo, MethodId(1)),
        ]
    );

    // The side table itself is module-level and emitted once.
    assert_eq!(module.extern_aliases.len(), 2);
    Ok(())
}

/// A method outside any import container emits neither a chain nor a forward.
#[test]
fn methods_without_imports_emit_nothing() -> Result<()> {
    let mut input = MethodInput::new(MethodId(1), DocumentId(0), 0x10);
    input.body.statements.push(LoweredStatement::visible(
        0x00,
        LoweredKind::Statement,
        SourceSpan::single_line(1, 1, 10),
    ));

    let module = synthesize_module(
        &[input],
        &CompilationImports::new(),
        &registry(),
        &EmitOptions::default(),
    )?;
    assert!(module.records[0].import_scope.is_none());
    assert!(module.records[0].forward().is_none());
    Ok(())
}
