//! Performance benchmarks for the user store.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tenant_store::{FindOptions, MemoryStore, StoreError, User, UserId, UserStore};

fn seeded_store(count: u64) -> (MemoryStore, UserStore) {
    let store = UserStore::default();
    let kv = MemoryStore::with_buckets(["usersv1", "userindexv1"]);

    kv.update(|tx| {
        for id in 1..=count {
            store.create_user(tx, &User::new(UserId(id), format!("user-{id}")))?;
        }
        Ok::<_, StoreError>(())
    })
    .unwrap();

    (kv, store)
}

/// Benchmark creating users in one transaction
fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for batch in [10u64, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("batch", batch), &batch, |b, &batch| {
            b.iter(|| {
                let (kv, store) = seeded_store(0);
                let tx = kv.begin(true);
                for id in 1..=batch {
                    store
                        .create_user(&tx, &User::new(UserId(id), format!("user-{id}")))
                        .unwrap();
                }
                black_box(tx.commit().unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark point lookups by id and by name
fn bench_lookup(c: &mut Criterion) {
    let (kv, store) = seeded_store(10_000);
    let tx = kv.begin(false);

    c.bench_function("get_user", |b| {
        b.iter(|| black_box(store.get_user(&tx, UserId(5_000)).unwrap()));
    });

    c.bench_function("get_user_by_name", |b| {
        b.iter(|| black_box(store.get_user_by_name(&tx, "user-5000").unwrap()));
    });
}

/// Benchmark listing with growing offsets
fn bench_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("list");
    let (kv, store) = seeded_store(10_000);
    let tx = kv.begin(false);

    for offset in [0usize, 1_000, 9_000] {
        group.bench_with_input(BenchmarkId::new("offset", offset), &offset, |b, &offset| {
            let opts = FindOptions::default().with_limit(100).with_offset(offset);
            b.iter(|| black_box(store.list_users(&tx, Some(opts)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_create, bench_lookup, bench_list);
criterion_main!(benches);
