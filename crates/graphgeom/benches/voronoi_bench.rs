//! Criterion benchmarks for the weighted Voronoi relaxation and its half-plane core.
//! Focus sizes: sites in {3, 8, 16, 32}.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use graphgeom::api::{clip_circle, draw_sites, layout_clusters, Poly2, VoronoiCfg};
use graphgeom::gen::ReplayToken;
use graphgeom::geom2::from_points_convex_hull_strict;

fn bench_voronoi(c: &mut Criterion) {
    let mut group = c.benchmark_group("voronoi");
    let cfg = VoronoiCfg::default();
    for &n in &[3usize, 8, 16, 32] {
        let sites = draw_sites(n, 10.0, 4.0, ReplayToken::new(7, n as u64));
        group.bench_with_input(BenchmarkId::new("layout_clusters", n), &sites, |b, sites| {
            b.iter(|| layout_clusters(sites, 10.0, &cfg))
        });
    }

    let clip: Poly2 = match from_points_convex_hull_strict(&clip_circle(10.0, cfg.angular_step)) {
        Some(p) => p,
        None => return,
    };
    group.bench_function("clip_halfspace_intersection", |b| {
        b.iter(|| clip.checked_vertices(1e-9))
    });
    group.finish();
}

criterion_group!(benches, bench_voronoi);
criterion_main!(benches);
