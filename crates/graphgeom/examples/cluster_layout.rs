//! Run the full layout pipeline on a seeded fixture and print a summary.
//!
//! Usage:
//!   cargo run -p graphgeom --example cluster_layout -- [seed]
//!
//! Prints, per module: node count, region area, smoothed hull size and convergence.

use std::collections::BTreeMap;

use graphgeom::prelude::*;

fn main() -> Result<()> {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1u64);
    let cfg = NodeCfg::default();
    let mut nodes = draw_nodes(cfg, ReplayToken::new(seed, 0));

    // one region per module, sized by node count
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for m in nodes.iter().filter_map(|n| n.module) {
        *counts.entry(m).or_default() += 1;
    }
    let sites: Vec<WeightedSite> = counts
        .iter()
        .enumerate()
        .map(|(k, (&m, &c))| {
            let t = std::f64::consts::TAU * k as f64 / counts.len() as f64;
            WeightedSite::new(m, c as f64, 5.0 * t.cos(), 5.0 * t.sin())
        })
        .collect();
    let layout = layout_clusters(&sites, 50.0, &VoronoiCfg::default())?;

    let mut areas = BTreeMap::new();
    for (site, cell) in layout.sites.iter().zip(&layout.cells) {
        if let Some(cell) = cell {
            areas.insert(site.id, cell.extent());
        }
    }
    let overlap_cfg = OverlapCfg {
        padding: 1.0,
        ..OverlapCfg::default()
    };
    remove_module_overlaps(&mut nodes, &areas, &overlap_cfg)?;
    let hulls = cluster_hulls(&nodes, 90.0, &HullCfg::default());

    println!(
        "seed={seed} nodes={} voronoi_iterations={} area_error={:.4}",
        nodes.len(),
        layout.iterations,
        layout.area_error
    );
    for (i, site) in layout.sites.iter().enumerate() {
        let hull = hulls.get(&site.id);
        println!(
            "module {:>2}: nodes={:>3} area={:>8.2} hull_vertices={:>3} converged={}",
            site.id,
            counts.get(&site.id).copied().unwrap_or(0),
            layout.cell_area(i),
            hull.map_or(0, |h| h.hull.len()),
            hull.is_some_and(|h| h.converged),
        );
    }
    Ok(())
}
