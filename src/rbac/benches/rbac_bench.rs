//! Role graph benchmarks
//!
//! Measures permission resolution over deep chains and wide diamonds, with
//! and without an assertion hook.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rolegraph_rbac::{Rbac, StdPermission, StdRole};

/// Chain of `depth` roles where only the last ancestor grants "root"
fn create_chain(depth: u32) -> Rbac<StdRole<u32>> {
    let rbac = Rbac::new();
    rbac.add(StdRole::new(0).with_permission(StdPermission::new("root")))
        .unwrap();
    for i in 1..depth {
        rbac.add(StdRole::new(i)).unwrap();
        rbac.set_parent(&i, i - 1).unwrap();
    }
    rbac
}

/// One child with `width` parents that all share a single granting ancestor
fn create_diamond(width: u32) -> Rbac<StdRole<u32>> {
    let rbac = Rbac::new();
    rbac.add(StdRole::new(0).with_permission(StdPermission::new("root")))
        .unwrap();
    rbac.add(StdRole::new(u32::MAX)).unwrap();
    for i in 1..=width {
        rbac.add(StdRole::new(i)).unwrap();
        rbac.set_parent(&i, 0).unwrap();
        rbac.set_parent(&u32::MAX, i).unwrap();
    }
    rbac
}

fn bench_chain_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_resolution");

    for depth in [10u32, 100, 1000].iter() {
        let rbac = create_chain(*depth);
        let leaf = depth - 1;
        let granted = StdPermission::new("root");
        let missing = StdPermission::new("missing");

        group.bench_with_input(BenchmarkId::new("granted", depth), depth, |b, _| {
            b.iter(|| black_box(rbac.is_granted(black_box(&leaf), &granted, None)));
        });
        group.bench_with_input(BenchmarkId::new("denied", depth), depth, |b, _| {
            b.iter(|| black_box(rbac.is_granted(black_box(&leaf), &missing, None)));
        });
    }

    group.finish();
}

fn bench_diamond_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("diamond_resolution");

    for width in [10u32, 100, 1000].iter() {
        let rbac = create_diamond(*width);
        let missing = StdPermission::new("missing");

        group.bench_with_input(BenchmarkId::new("denied", width), width, |b, _| {
            b.iter(|| black_box(rbac.is_granted(black_box(&u32::MAX), &missing, None)));
        });
    }

    group.finish();
}

fn bench_with_assertion(c: &mut Criterion) {
    let rbac = create_chain(100);
    let granted = StdPermission::new("root");

    c.bench_function("chain_100_with_assertion", |b| {
        b.iter(|| {
            black_box(rbac.is_granted_with(&99, &granted, |graph, id, _| graph.contains(id)))
        });
    });
}

criterion_group!(
    benches,
    bench_chain_resolution,
    bench_diamond_resolution,
    bench_with_assertion
);
criterion_main!(benches);
