//! CFI Benchmarks
//!
//! Parsing and ordering of annotation-sized CFI sets.
//!
//! Run with: `cargo bench --bench cfi_ordering`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use libros_core::cfi::{document_order, parse, range_from_points, Cfi};

/// Highlights spread over a book: spine items, paragraphs, offsets
fn annotation_cfis(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let spine = (i * 7) % 40 + 1;
            let para = (i * 13) % 200 + 1;
            let offset = (i * 31) % 500;
            format!(
                "epubcfi(/6/{}[chap{:02}]!/4/{}[p{}]/1:{})",
                spine * 2,
                spine,
                para * 2,
                para,
                offset
            )
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("cfi_parse");
    group.measurement_time(Duration::from_secs(5));

    let inputs = annotation_cfis(1000);
    group.bench_function("parse_1000", |b| {
        b.iter(|| {
            for s in &inputs {
                black_box(parse(black_box(s)).ok());
            }
        })
    });

    group.bench_function("range_from_points", |b| {
        b.iter(|| {
            black_box(range_from_points(
                black_box("epubcfi(/6/4!/4/2/10/1:3)"),
                black_box("epubcfi(/6/4!/4/2/14/3:12)"),
            ))
        })
    });

    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("cfi_sort");
    group.measurement_time(Duration::from_secs(5));

    for count in [100, 1000, 10_000] {
        let cfis: Vec<Cfi> = annotation_cfis(count)
            .iter()
            .filter_map(|s| parse(s).ok())
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &cfis, |b, cfis| {
            b.iter(|| {
                let mut sorted = cfis.clone();
                sorted.sort_by(document_order);
                black_box(sorted)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_sort);
criterion_main!(benches);
