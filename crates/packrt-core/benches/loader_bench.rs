use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use packrt_core::Loader;
use packrt_test_helpers::fixtures::{graph_registry, module_name};

/// A chain m0 -> m1 -> ... -> m(n-1)
fn chain(len: usize) -> Vec<Vec<usize>> {
    (0..len)
        .map(|i| if i + 1 < len { vec![i + 1] } else { vec![] })
        .collect()
}

fn first_load_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_load");

    for len in [1, 10, 100].iter() {
        group.bench_with_input(BenchmarkId::new("chain", len), len, |b, &len| {
            b.iter(|| {
                let (registry, _counts) = graph_registry(&chain(len));
                let loader = Loader::new(registry);
                black_box(loader.load(&module_name(0)).unwrap());
            });
        });
    }

    group.finish();
}

fn cached_load_benchmark(c: &mut Criterion) {
    let (registry, _counts) = graph_registry(&chain(100));
    let loader = Loader::new(registry);
    loader.load(&module_name(0)).unwrap();
    let id = module_name(50);

    c.bench_function("cached_load", |b| {
        b.iter(|| black_box(loader.load(black_box(&id)).unwrap()));
    });
}

criterion_group!(benches, first_load_benchmark, cached_load_benchmark);
criterion_main!(benches);
