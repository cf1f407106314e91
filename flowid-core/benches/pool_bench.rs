#[macro_use]
extern crate criterion;

use criterion::Criterion;

use flowid_core::alloc::BitmapAllocator;
use flowid_core::prelude::*;

fn bench_bitmap_alloc_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("bitmap_alloc_release");

    for capacity in [64usize, 4096, 65536] {
        group.throughput(criterion::Throughput::Elements(1));
        group.bench_function(format!("capacity_{}_half_full", capacity), |b| {
            let mut bitmap = BitmapAllocator::new(capacity);
            for _ in 0..capacity / 2 {
                bitmap.allocate().unwrap();
            }
            b.iter(|| {
                let index = bitmap.allocate().unwrap();
                bitmap.release(index).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_manager_alloc_free(c: &mut Criterion) {
    let config = PoolConfig::new().with_pool(
        Direction::Receive,
        IdentifierType::EmProf,
        PoolSpec::new(4096),
    );
    let manager = IdentManager::new();
    manager.bind(&config).unwrap();

    c.bench_function("manager_alloc_free", |b| {
        b.iter(|| {
            let id = manager
                .alloc(Direction::Receive, IdentifierType::EmProf)
                .unwrap();
            manager
                .free(Direction::Receive, IdentifierType::EmProf, id)
                .unwrap();
        });
    });
}

criterion_group!(benches, bench_bitmap_alloc_release, bench_manager_alloc_free);
criterion_main!(benches);
