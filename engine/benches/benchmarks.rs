//! Performance benchmarks for emporium-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use emporium_engine::{envelope, execute, Filter, QuerySpec, SortDirection, SortSpec};
use serde_json::{json, Value};

fn catalog(size: usize) -> Vec<Value> {
    (0..size)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Product {}", i),
                "status": if i % 3 == 0 { "draft" } else { "active" },
                "price": (i % 97) as f64 + 0.99,
                "category_ids": [i % 7, i % 11],
                "created_at": format!("2024-{:02}-{:02}T10:00:00Z", i % 12 + 1, i % 28 + 1),
            })
        })
        .collect()
}

fn bench_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute");

    for size in [100usize, 1_000, 10_000] {
        let source = catalog(size);

        group.bench_with_input(BenchmarkId::new("unfiltered", size), &source, |b, src| {
            let spec = QuerySpec::new(15);
            b.iter(|| execute(black_box(src), black_box(&spec)))
        });

        group.bench_with_input(BenchmarkId::new("filter_sort", size), &source, |b, src| {
            let spec = QuerySpec::new(15)
                .page(3)
                .filter(Filter::equals("status", "active"))
                .filter(Filter::range("price", Some(json!(10)), Some(json!(50))))
                .sort_by(SortSpec::new("price", SortDirection::Desc));
            b.iter(|| execute(black_box(src), black_box(&spec)))
        });

        group.bench_with_input(BenchmarkId::new("search", size), &source, |b, src| {
            let spec = QuerySpec::new(15).filter(Filter::search(["name"], "product 1"));
            b.iter(|| execute(black_box(src), black_box(&spec)))
        });

        group.bench_with_input(BenchmarkId::new("timestamp_sort", size), &source, |b, src| {
            let spec = QuerySpec::new(15)
                .sort_by(SortSpec::new("created_at", SortDirection::Desc).timestamp());
            b.iter(|| execute(black_box(src), black_box(&spec)))
        });
    }

    group.finish();
}

fn bench_envelope(c: &mut Criterion) {
    let source = catalog(1_000);
    let spec = QuerySpec::new(50);

    c.bench_function("laravel_envelope", |b| {
        b.iter(|| {
            let page = execute(&source, &spec).unwrap();
            serde_json::to_string(&envelope::laravel(black_box(page), "/api/products"))
        })
    });
}

criterion_group!(benches, bench_execute, bench_envelope);
criterion_main!(benches);
