//! Module-level synthesis driver.
//!
//! Per-method record building is pure, so it fans out across a rayon pool; the only
//! order-dependent step, import forwarding, runs afterwards as a sequential fold in
//! program order. The split keeps the output byte-identical across runs and thread
//! counts: the parallel phase preserves input order through indexed collection, and
//! the fold threads an explicit [`ForwardingCache`] so forwarding decisions depend
//! only on program order, never on scheduling.

use rayon::prelude::*;

use crate::emit::options::EmitOptions;
use crate::lowered::symbols::MethodRole;
use crate::lowered::MethodInput;
use crate::records::document::DocumentRegistry;
use crate::records::imports::{CompilationImports, ImportScopeRecord};
use crate::records::method::{MethodDebugRecord, ModuleDebugInfo};
use crate::synthesis::imports::{ForwardingCache, ImportsChainBuilder};
use crate::synthesis::MethodDebugBuilder;
use crate::Result;

/// Synthesize the complete debug information of one module.
///
/// `methods` must be in program (emission) order; method records come out in the same
/// order, and forward records only ever point backwards within it.
///
/// # Errors
///
/// Propagates the first invariant violation or recursion limit any per-method pass
/// reports. Nothing is emitted on error; there is no partial output to clean up.
pub fn synthesize_module(
    methods: &[MethodInput],
    imports: &CompilationImports,
    documents: &DocumentRegistry,
    options: &EmitOptions,
) -> Result<ModuleDebugInfo> {
    // Parallel phase: partial records plus each method's effective chain, both pure.
    // Only kickoff records degenerate to a lone forward pointer; every other method
    // resolves its chain here, even when the record carries nothing but sub-records.
    let partial: Vec<(MethodDebugRecord, Option<ImportScopeRecord>)> = methods
        .par_iter()
        .map(|input| {
            let record = MethodDebugBuilder::build(input)?;
            let chain = match input.symbols.role {
                MethodRole::StateMachineKickoff { .. } => None,
                _ => Some(ImportsChainBuilder::effective_chain(
                    input.import_container,
                    imports,
                )?),
            };
            Ok((record, chain))
        })
        .collect::<Result<_>>()?;

    // Sequential fold: forwarding decisions in program order.
    let mut cache = ForwardingCache::new();
    let mut records: Vec<MethodDebugRecord> = Vec::with_capacity(partial.len());
    for (mut record, chain) in partial {
        if let Some(chain) = chain {
            ImportsChainBuilder::attach(&mut record, chain, imports, &mut cache);
        }
        records.push(record);
    }

    Ok(ModuleDebugInfo {
        records,
        documents: documents.snapshot(),
        extern_aliases: imports.extern_aliases().to_vec(),
        deterministic: options.deterministic.clone(),
    })
}
