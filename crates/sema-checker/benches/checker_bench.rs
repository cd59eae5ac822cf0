//! Benchmarks for the checker core.
//!
//! Run with: cargo bench --bench checker_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sema_ast::builder::FileBuilder;
use sema_ast::File;
use sema_checker::{Checker, CheckerOptions};
use sema_types::{FnInfo, MethodIndex, TypeRegistry};

/// A function body of `n_stmts` sequential `let` bindings, to exercise `Checker::check_file`
/// over bodies of growing size.
fn build_file(n_stmts: usize) -> File {
    let mut b = FileBuilder::new("bench");
    let scope = b.file.symbols.file_scope();
    let mut stmts = Vec::with_capacity(n_stmts);
    for i in 0..n_stmts {
        let init = b.int_literal(i as i128);
        let (stmt, _) = b.let_stmt(&format!("v{i}"), false, Some(init));
        stmts.push(stmt);
    }
    let body = b.block(stmts);
    let result_ty = b.name_type("unit");
    b.declare_fn(scope, "bench_fn", None, vec![], result_ty, Some(body), vec![]);
    b.file
}

fn bench_check_file_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_file_throughput");
    for size in [10usize, 100, 1000].iter() {
        let file = build_file(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &file, |b, file| {
            b.iter(|| {
                let mut checker = Checker::new(CheckerOptions::default());
                black_box(checker.check_file(black_box(file)));
            })
        });
    }
    group.finish();
}

/// Overload resolution is the hottest path in C2/C3 for any method-heavy source;
/// benchmark `MethodIndex::lookup` directly against a receiver type carrying many
/// same-named-prefix overloads.
fn bench_method_index_lookup(c: &mut Criterion) {
    let mut registry = TypeRegistry::new();
    let mut index = MethodIndex::new();
    let int_any = registry.builtins().int_any;
    let names: Vec<String> = (0..64).map(|i| format!("method_{i}")).collect();
    for name in &names {
        let symbol = registry.intern_name(name);
        index.insert(
            &registry,
            int_any,
            name,
            FnInfo {
                param_keys: vec![int_any],
                variadic: vec![false],
                allow_to: vec![false],
                has_self: true,
                result: int_any,
            },
            symbol,
        );
    }

    c.bench_function("method_index_lookup", |b| {
        b.iter(|| {
            for name in &names {
                black_box(index.lookup(&registry, int_any, black_box(name)));
            }
        })
    });
}

criterion_group!(benches, bench_check_file_throughput, bench_method_index_lookup);
criterion_main!(benches);
