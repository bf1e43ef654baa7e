use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lrustore::LruStore;

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hit_1k", |b| {
        let mut store = LruStore::new(1000).unwrap();
        for n in 0..1000u64 {
            store.set(n, n);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(store.get(&(counter % 1000)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_set_evicting(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_evicting_1k", |b| {
        let mut store = LruStore::new(1000).unwrap();

        // Every insert past the first 1000 evicts
        let mut counter = 0u64;
        b.iter(|| {
            store.set(black_box(counter), counter);
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_get_50_set", |b| {
        let mut store = LruStore::new(100).unwrap();
        for n in 0..100u64 {
            store.set(n, n);
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter.is_multiple_of(2) {
                black_box(store.get(&(counter % 200)));
            } else {
                store.set(counter % 200, counter);
            }
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_set_evicting, bench_mixed_50_50);
criterion_main!(benches);
