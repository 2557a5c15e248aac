use super::*;
use crate::gen::{draw_sites, ReplayToken};
use crate::geom2::point_in_convex;
use nalgebra::vector;

fn three_sites() -> Vec<WeightedSite> {
    vec![
        WeightedSite::new(1, 1.0, -3.0, 0.0),
        WeightedSite::new(2, 1.0, 3.0, 0.0),
        WeightedSite::new(3, 2.0, 0.0, 3.0),
    ]
}

#[test]
fn clip_circle_has_sixty_ccw_vertices() {
    let c = clip_circle(10.0, VoronoiCfg::default().angular_step);
    assert_eq!(c.len(), 60);
    assert!(signed_area(&c) > 0.0);
    assert!(c.iter().all(|p| (p.norm() - 10.0).abs() < 1e-12));
    // area of the inscribed 60-gon is just below the disk
    let disk = PI * 100.0;
    assert!(signed_area(&c) < disk && signed_area(&c) > 0.99 * disk);
}

#[test]
fn cell_areas_follow_weights() {
    let layout = layout_clusters(&three_sites(), 10.0, &VoronoiCfg::default()).unwrap();
    assert!(layout.converged);
    assert!(layout.area_error < 0.01);
    let total: f64 = signed_area(&clip_circle(10.0, PI / 30.0));
    let fractions: Vec<f64> = (0..3).map(|i| layout.cell_area(i) / total).collect();
    for (f, want) in fractions.iter().zip([0.25, 0.25, 0.5]) {
        assert!((f - want).abs() <= 0.1 * want, "fractions {fractions:?}");
    }
    // light sites get about half the heavy one's area
    let ratio = layout.cell_area(0) / layout.cell_area(2);
    assert!((ratio - 0.5).abs() < 0.05, "ratio {ratio}");
}

#[test]
fn cells_tile_the_boundary() {
    let sites = vec![
        WeightedSite::new(0, 1.0, -3.0, -1.0),
        WeightedSite::new(1, 2.0, 3.0, -1.0),
        WeightedSite::new(2, 3.0, 0.0, 3.0),
        WeightedSite::new(3, 4.0, 1.0, 1.0),
    ];
    let layout = layout_clusters(&sites, 10.0, &VoronoiCfg::default()).unwrap();
    assert!(layout.converged);
    let total = signed_area(&clip_circle(10.0, PI / 30.0));
    let covered: f64 = (0..sites.len()).map(|i| layout.cell_area(i)).sum();
    assert!((covered - total).abs() < 1e-6 * total, "covered {covered} of {total}");
    // relaxed sites sit at their cell centroids, so inside their own cell
    for (cell, site) in layout.cells.iter().zip(&layout.sites) {
        let cell = cell.as_ref().expect("non-empty cell");
        assert!(point_in_convex(site.position, cell.vertices(), 1e-6));
    }
    assert_eq!(
        layout.sites.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
}

#[test]
fn single_site_takes_everything() {
    let site = WeightedSite::new(7, 3.0, 1.0, 2.0);
    let layout = layout_clusters(&[site], 5.0, &VoronoiCfg::default()).unwrap();
    assert_eq!(layout.iterations, 1);
    assert!(layout.converged);
    assert!(layout.area_error < 1e-9);
    let total = signed_area(&clip_circle(5.0, PI / 30.0));
    assert!((layout.cell_area(0) - total).abs() < 1e-9);
    assert!(layout.sites[0].position.norm() < 1e-9);
}

#[test]
fn iteration_cap_is_respected() {
    let cfg = VoronoiCfg {
        max_iterations: 1,
        convergence_ratio: 0.0,
        ..VoronoiCfg::default()
    };
    let layout = layout_clusters(&three_sites(), 10.0, &cfg).unwrap();
    assert_eq!(layout.iterations, 1);
    assert!(!layout.converged);
}

#[test]
fn invalid_inputs_are_rejected() {
    let cfg = VoronoiCfg::default();
    assert!(matches!(layout_clusters(&[], 10.0, &cfg), Err(Error::NoSites)));
    assert!(matches!(
        layout_clusters(&three_sites(), 0.0, &cfg),
        Err(Error::InvalidRadius { .. })
    ));
    assert!(matches!(
        layout_clusters(&three_sites(), f64::NAN, &cfg),
        Err(Error::InvalidRadius { .. })
    ));

    let mut bad = three_sites();
    bad[1].weight = 0.0;
    assert!(matches!(
        layout_clusters(&bad, 10.0, &cfg),
        Err(Error::InvalidWeight { id: 2, .. })
    ));

    let mut dup = three_sites();
    dup[2].id = 1;
    assert!(matches!(
        layout_clusters(&dup, 10.0, &cfg),
        Err(Error::DuplicateSite { id: 1 })
    ));

    let mut same = three_sites();
    same[1].position = same[0].position;
    assert!(matches!(
        layout_clusters(&same, 10.0, &cfg),
        Err(Error::CoincidentSites { a: 1, b: 2 })
    ));

    let mut outside = three_sites();
    outside[0].position = vector![10.0, 0.0];
    assert!(matches!(
        layout_clusters(&outside, 10.0, &cfg),
        Err(Error::SiteOutsideBoundary { id: 1, .. })
    ));
}

#[test]
fn overweight_repair_separates_heavy_and_light() {
    let pos = vec![vector![0.0, 0.0], vector![1.0, 0.0]];
    let mut w = vec![10.0, 1.0];
    lower_overweighted(&pos, &mut w, 1e-10);
    assert!(overweight(&pos, &w, 0, 1).is_none());
    assert!(w[0] < 10.0 && w[1] == 1.0);

    let mut w = vec![10.0, 1.0];
    raise_overweighted(&pos, &mut w, 1e-10);
    assert!(overweight(&pos, &w, 0, 1).is_none());
    assert!(w[0] == 10.0 && w[1] > 1.0);
}

#[test]
fn random_layouts_reach_weight_proportional_areas() {
    let cfg = VoronoiCfg::default();
    let total = signed_area(&clip_circle(10.0, cfg.angular_step));
    for k in 0..24u64 {
        let sites = draw_sites(2 + (k % 8) as usize, 10.0, 4.0, ReplayToken::new(0x5eed, k));
        let layout = layout_clusters(&sites, 10.0, &cfg).unwrap();
        assert!(layout.converged, "draw {k}: error {}", layout.area_error);
        let weight_sum: f64 = sites.iter().map(|s| s.weight).sum();
        for (i, s) in sites.iter().enumerate() {
            let want = total * s.weight / weight_sum;
            let got = layout.cell_area(i);
            assert!((got - want).abs() <= 0.1 * want, "draw {k} site {i}: {got} vs {want}");
        }
    }
}

#[test]
fn wide_weight_spread_converges() {
    // weights from 0.1 to 5 on random positions
    let cfg = VoronoiCfg::default();
    for k in 0..12u64 {
        let mut sites = draw_sites(7, 10.0, 1.0, ReplayToken::new(42, k));
        for (i, s) in sites.iter_mut().enumerate() {
            s.weight = 0.1 + 4.9 * i as f64 / 6.0;
        }
        let layout = layout_clusters(&sites, 10.0, &cfg).unwrap();
        assert!(layout.converged, "draw {k}: error {}", layout.area_error);
        assert!(layout.cells.iter().all(Option::is_some));
    }
}

#[test]
fn area_growth_counts_bisector_edges_only() {
    // equal weights split the 60-gon along x = 0, a chord from (0, -10) to (0, 10)
    let clip = from_points_convex_hull_strict(&clip_circle(10.0, PI / 30.0)).unwrap();
    let pos = vec![vector![-1.0, 0.0], vector![1.0, 0.0]];
    let w = vec![0.0, 0.0];
    let cells = power_cells(&clip, &pos, &w, 1e-9);
    let left = cells[0].as_deref().expect("left cell");
    // chord length 20 over |2(s₁ − s₀)| = 4
    assert!((area_growth(left, 0, &pos, &w, 1e-4) - 5.0).abs() < 1e-9);
    let right = cells[1].as_deref().expect("right cell");
    assert!((area_growth(right, 1, &pos, &w, 1e-4) - 5.0).abs() < 1e-9);
}
