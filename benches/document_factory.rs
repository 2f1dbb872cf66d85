//! Document generation throughput per identifier strategy
//!
//! Run with: cargo bench --bench document_factory
//!
//! The timed insert phase excludes generation, but provisioning streams
//! tens of millions of documents through the factory, so its cost still
//! bounds how fast a scenario can set up.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use idbench::{DocumentFactory, IdStrategy, PROVISION_BATCH_SIZE};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_factory");

    for &count in &[1_000usize, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        for strategy in IdStrategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.label(), count),
                &count,
                |b, &count| b.iter(|| black_box(DocumentFactory::generate(strategy, count))),
            );
        }
    }
    group.finish();
}

fn bench_generate_into(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_factory_reuse");
    group.throughput(Throughput::Elements(PROVISION_BATCH_SIZE as u64));

    for strategy in IdStrategy::ALL {
        let mut buf = Vec::with_capacity(PROVISION_BATCH_SIZE);
        group.bench_function(strategy.label(), |b| {
            b.iter(|| {
                DocumentFactory::generate_into(strategy, &mut buf, PROVISION_BATCH_SIZE);
                black_box(buf.len())
            })
        });
    }
    group.finish();
}

fn bench_identifier_bson(c: &mut Criterion) {
    let mut group = c.benchmark_group("identifier_to_bson");
    for strategy in IdStrategy::ALL {
        let id = strategy.generate();
        group.bench_function(strategy.label(), |b| b.iter(|| black_box(id.to_bson())));
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_generate,
    bench_generate_into,
    bench_identifier_bson
);
criterion_main!(benches);
