//! Performance benchmarks for the analysis pipeline
//!
//! Nested loops force several fixed-point passes, which is where the
//! persistent sets pay off.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use usedef::analysis::{analyze_program, ReachingDefinitions};
use usedef::ast::builder::*;
use usedef::ast::{BinOp, Stmt, StmtList};
use usedef::cfg::ControlFlowGraph;
use usedef::config::AnalysisConfig;

/// `depth` nested while loops, each declaring and bumping its own variable.
fn nested_loops(depth: usize) -> StmtList {
    let mut body: Vec<Stmt> = vec![assign("acc", binary(BinOp::Add, ident("acc"), int(1)))];
    for level in (0..depth).rev() {
        let var = format!("v{}", level);
        let mut loop_body = body;
        loop_body.push(assign(&var, binary(BinOp::Add, ident(&var), int(1))));
        body = vec![
            decl(&var),
            while_loop(binary(BinOp::Lt, ident(&var), int(10)), loop_body),
        ];
    }
    let mut stmts = vec![decl_init("acc", int(0))];
    stmts.extend(body);
    program_of(stmts)
}

/// `len` straight-line statements over a handful of variables.
fn straight_line(len: usize) -> StmtList {
    let stmts = (0..len)
        .map(|i| {
            let name = format!("x{}", i % 8);
            if i % 3 == 0 {
                decl(&name)
            } else {
                let src = format!("x{}", (i + 1) % 8);
                assign(&name, binary(BinOp::Mul, ident(&src), int(2)))
            }
        })
        .collect();
    program_of(stmts)
}

fn bench_cfg_construction(c: &mut Criterion) {
    let program = straight_line(1_000);
    c.bench_function("cfg_from_program_1000", |b| {
        b.iter(|| ControlFlowGraph::from_program(black_box(&program)).len())
    });
}

fn bench_reaching_definitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("reaching_definitions");
    for depth in [1, 4, 8] {
        let program = nested_loops(depth);
        let cfg = ControlFlowGraph::from_program(&program);
        group.bench_with_input(BenchmarkId::new("nested_loops", depth), &cfg, |b, cfg| {
            b.iter(|| ReachingDefinitions::analyze(black_box(cfg)))
        });
    }
    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let program = nested_loops(6);
    let config = AnalysisConfig::default();
    c.bench_function("analyze_program_nested_6", |b| {
        b.iter(|| analyze_program(black_box(&program), &config))
    });
}

criterion_group!(
    benches,
    bench_cfg_construction,
    bench_reaching_definitions,
    bench_full_pipeline
);
criterion_main!(benches);
