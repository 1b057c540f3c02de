//! Benchmarks for debug record synthesis.
//!
//! Measures the per-method pipeline and whole-module assembly:
//! - Sequence point collection and scope tree construction for a realistic method
//! - Full per-method record building including all encoder passes
//! - Parallel module assembly across varying method counts

#![allow(unused)]
extern crate dotpdb;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use dotpdb::prelude::*;
use dotpdb::synthesis::{ScopeTreeBuilder, SequencePointCollector};
use std::hint::black_box;

/// A method with 64 statements, nested blocks every 8 statements, and a handful of
/// locals with dynamic and tuple shapes. Roughly the density of a busy handler method.
fn realistic_method(id: u32) -> MethodInput {
    let mut input = MethodInput::new(MethodId(id), DocumentId(0), 64 * 8);

    for index in 0..64u32 {
        input.body.statements.push(LoweredStatement::visible(
            index * 8,
            LoweredKind::Statement,
            SourceSpan::single_line(index + 3, 9, 60),
        ));
    }

    for block in 0..8u32 {
        input.body.regions.push(LexicalRegion {
            kind: RegionKind::Block,
            header_offset: block * 64,
            body_start: block * 64,
            end_offset: (block + 1) * 64,
            parent: None,
            locals: vec![RegionLocal {
                slot: block as u16,
                role: RegionLocalRole::Declared,
            }],
        });
    }

    for slot in 0..8u16 {
        let shape = match slot % 3 {
            0 => TypeShape::Named {
                name: "System.Collections.Generic.List".to_string(),
                args: vec![TypeShape::Dynamic],
            },
            1 => TypeShape::Tuple {
                elements: vec![
                    (Some("key".to_string()), TypeShape::Object),
                    (Some("value".to_string()), TypeShape::Object),
                ],
            },
            _ => TypeShape::Object,
        };
        input.symbols.locals.push(LocalSymbol {
            slot,
            name: Some(format!("local{slot}")),
            kind: LocalSlotKind::UserDefined,
            syntax_offset: SyntaxOffset(i32::from(slot) * 40),
            shape,
            live_range: (u32::from(slot) * 64, (u32::from(slot) + 1) * 64),
            attributes: LocalVariableAttributes::empty(),
            constant_value: None,
        });
    }

    input
}

fn setup_module(method_count: u32) -> (Vec<MethodInput>, CompilationImports, DocumentRegistry) {
    let mut imports = CompilationImports::new();
    let container = imports.add_container(ImportContainer {
        entries: vec![
            ImportEntry::Namespace {
                namespace: "System".to_string(),
            },
            ImportEntry::Namespace {
                namespace: "System.Collections.Generic".to_string(),
            },
        ],
        parent: None,
    });

    let inputs: Vec<MethodInput> = (1..=method_count)
        .map(|id| {
            let mut input = realistic_method(id);
            input.import_container = Some(container);
            input
        })
        .collect();

    let documents = DocumentRegistry::new(ChecksumAlgorithm::Sha1);
    documents.register("Program.cs", &vec![b' '; 16 * 1024]);

    (inputs, imports, documents)
}

fn bench_method_passes(c: &mut Criterion) {
    let input = realistic_method(1);

    let mut group = c.benchmark_group("method_passes");
    group.bench_function("sequence_points", |b| {
        b.iter(|| {
            let points = SequencePointCollector::collect(black_box(&input)).unwrap();
            black_box(points)
        });
    });
    group.bench_function("scope_tree", |b| {
        b.iter(|| {
            let root = ScopeTreeBuilder::build(black_box(&input)).unwrap();
            black_box(root)
        });
    });
    group.bench_function("full_record", |b| {
        b.iter(|| {
            let record = MethodDebugBuilder::build(black_box(&input)).unwrap();
            black_box(record)
        });
    });
    group.finish();
}

fn bench_module_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("module_assembly");
    for method_count in [16u32, 256, 1024] {
        let (inputs, imports, documents) = setup_module(method_count);
        let options = EmitOptions::default();

        group.throughput(Throughput::Elements(u64::from(method_count)));
        group.bench_function(format!("methods_{method_count}"), |b| {
            b.iter(|| {
                let module =
                    synthesize_module(black_box(&inputs), &imports, &documents, &options).unwrap();
                black_box(module)
            });
        });
    }
    group.finish();
}

fn bench_emission(c: &mut Criterion) {
    let (inputs, imports, documents) = setup_module(256);
    let options = EmitOptions::default();
    let module = synthesize_module(&inputs, &imports, &documents, &options).unwrap();

    let mut group = c.benchmark_group("emission");
    group.bench_function("record_inspector", |b| {
        b.iter(|| {
            let mut writer = RecordInspector::new();
            emit_module(&mut writer, black_box(&module), &options).unwrap();
            black_box(writer.into_bytes())
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_method_passes,
    bench_module_assembly,
    bench_emission
);
criterion_main!(benches);
