use benchmarks::{SyntheticTable, TextColumnSpec};
use catencode_rs::preprocessing::AdaptiveCategoricalEncoder;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_one_hot(c: &mut Criterion) {
    let mut group = c.benchmark_group("one_hot");
    for n_rows in [1_000, 10_000, 100_000] {
        let table = SyntheticTable::new(n_rows, 42)
            .text_column("city", TextColumnSpec::new(8).with_missing_rate(0.1))
            .build()
            .expect("synthetic table");
        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &table, |b, table| {
            let encoder = AdaptiveCategoricalEncoder::new();
            b.iter(|| encoder.encode(black_box(table)).expect("encode"));
        });
    }
    group.finish();
}

fn bench_greedy_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("greedy_search");
    group.sample_size(10);
    for n_unique in [20, 35, 50] {
        let table = SyntheticTable::new(1_000, 42)
            .text_column("listing", TextColumnSpec::new(n_unique).with_words(3))
            .build()
            .expect("synthetic table");
        group.bench_with_input(BenchmarkId::from_parameter(n_unique), &table, |b, table| {
            let encoder = AdaptiveCategoricalEncoder::new();
            b.iter(|| encoder.encode(black_box(table)).expect("encode"));
        });
    }
    group.finish();
}

fn bench_heuristic(c: &mut Criterion) {
    let mut group = c.benchmark_group("heuristic");
    group.sample_size(10);
    for n_rows in [5_000, 20_000] {
        let table = SyntheticTable::new(n_rows, 42)
            .text_column("sku", TextColumnSpec::new(n_rows / 2).with_words(1))
            .build()
            .expect("synthetic table");
        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &table, |b, table| {
            let encoder = AdaptiveCategoricalEncoder::new();
            b.iter(|| encoder.encode(black_box(table)).expect("encode"));
        });
    }
    group.finish();
}

fn bench_parallel_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("columns");
    group.sample_size(10);
    let table = SyntheticTable::new(1_500, 7)
        .text_column("a", TextColumnSpec::new(30))
        .text_column("b", TextColumnSpec::new(40))
        .text_column("c", TextColumnSpec::new(25))
        .text_column("d", TextColumnSpec::new(6))
        .build()
        .expect("synthetic table");
    for parallel in [false, true] {
        group.bench_with_input(BenchmarkId::new("parallel", parallel), &table, |b, table| {
            let encoder = AdaptiveCategoricalEncoder::new().with_parallel(parallel);
            b.iter(|| encoder.encode(black_box(table)).expect("encode"));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_one_hot,
    bench_greedy_search,
    bench_heuristic,
    bench_parallel_columns
);
criterion_main!(benches);
