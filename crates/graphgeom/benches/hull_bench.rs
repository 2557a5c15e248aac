//! Criterion benchmarks for hull smoothing and rotating calipers.
//! Focus sizes: polygon vertex count n in {8, 32, 128}.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use graphgeom::api::{adjust_hull, cluster_hulls, draw_convex_polygon, draw_nodes, HullCfg, NodeCfg};
use graphgeom::gen::ReplayToken;

fn bench_hull(c: &mut Criterion) {
    let mut group = c.benchmark_group("hull");
    let cfg = HullCfg::default();
    for &n in &[8usize, 32, 128] {
        let Some(poly) = draw_convex_polygon(n, 0.3, ReplayToken::new(11, n as u64)) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("adjust_hull", n), &poly, |b, poly| {
            b.iter(|| adjust_hull(poly.vertices(), 90.0, &cfg))
        });
        group.bench_with_input(BenchmarkId::new("optimal_bounding_box", n), &poly, |b, poly| {
            b.iter_batched(
                || poly.clone(),
                |mut p| p.compute_optimal_bounding_box().area(),
                BatchSize::SmallInput,
            )
        });
    }

    let nodes = draw_nodes(NodeCfg::default(), ReplayToken::new(12, 0));
    group.bench_function("cluster_hulls", |b| b.iter(|| cluster_hulls(&nodes, 90.0, &cfg)));
    group.finish();
}

criterion_group!(benches, bench_hull);
criterion_main!(benches);
