//! Weighted Voronoi (power diagram) cluster layout inside a circular boundary.
//!
//! Purpose
//! - Give every cluster a convex cell whose area is proportional to its weight.
//!
//! Model
//! - The boundary is a regular polygon approximating a circle of the given radius.
//! - The power cell of site i is the boundary H-rep intersected with
//!   `2(sⱼ − sᵢ)·x ≤ |sⱼ|² − |sᵢ|² − wⱼ + wᵢ` for every other site j, computed with the
//!   ordered half-plane intersection in `geom2::ordered`.
//! - Relaxation alternates moving sites to their cell centroids with a damped weight
//!   step `Δwᵢ = step · (target − area) / ∂areaᵢ/∂wᵢ`. Raising wᵢ by δ shifts every
//!   bisector edge of cell i outward by `δ / |2(sⱼ − sᵢ)|`, so the derivative is the sum
//!   of `edge_length / |2(sⱼ − sᵢ)|` over those edges. Only weight differences matter,
//!   so the step is additive and weights may go negative.
//! - Pairs where one weight would swallow the other site (`|sᵢ − sⱼ|² < w_heavy −
//!   w_light`) are repaired after each half step.
//!
//! Code cross-refs: `Poly2::checked_vertices`, `ConvexPolygon`, `area_centroid`

use std::collections::BTreeSet;
use std::f64::consts::{PI, TAU};

use nalgebra::Vector2;

use crate::error::{Error, Result};
use crate::geom2::{
    area_centroid, from_points_convex_hull_strict, signed_area, ConvexPolygon, GeomCfg, Hs2, Poly2,
};

/// A cluster to be laid out: weight and initial position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedSite {
    pub id: i32,
    pub weight: f64,
    pub position: Vector2<f64>,
}

impl WeightedSite {
    pub fn new(id: i32, weight: f64, x: f64, y: f64) -> Self {
        Self {
            id,
            weight,
            position: Vector2::new(x, y),
        }
    }
}

/// Relaxation configuration.
#[derive(Clone, Copy, Debug)]
pub struct VoronoiCfg {
    /// Angle between consecutive boundary vertices.
    pub angular_step: f64,
    /// Stop once `Σ|area − target| / boundary_area` drops below this.
    pub convergence_ratio: f64,
    pub max_iterations: usize,
    /// Damping of the weight step, in `(0, 1]`.
    pub weight_step: f64,
    /// Margin added when repairing an overweighted pair.
    pub overweight_margin: f64,
    pub geom: GeomCfg,
}

impl Default for VoronoiCfg {
    fn default() -> Self {
        Self {
            angular_step: PI / 30.0,
            convergence_ratio: 0.01,
            max_iterations: 100,
            weight_step: 0.5,
            overweight_margin: 1e-10,
            geom: GeomCfg::default(),
        }
    }
}

/// Final layout. `cells[i]` belongs to the i-th input site; `None` marks an empty cell.
#[derive(Clone, Debug)]
pub struct VoronoiLayout {
    pub cells: Vec<Option<ConvexPolygon>>,
    /// Sites after relaxation (moved positions, final power weights).
    pub sites: Vec<WeightedSite>,
    pub iterations: usize,
    pub area_error: f64,
    pub converged: bool,
}

impl VoronoiLayout {
    /// Area of cell `i`, zero for an empty cell.
    pub fn cell_area(&self, i: usize) -> f64 {
        self.cells[i].as_ref().map_or(0.0, |c| c.area())
    }
}

/// Counter-clockwise regular polygon of `radius` with a vertex every `angular_step`.
pub fn clip_circle(radius: f64, angular_step: f64) -> Vec<Vector2<f64>> {
    let n = ((TAU / angular_step).round() as usize).max(3);
    (0..n)
        .map(|k| {
            let t = TAU * k as f64 / n as f64;
            Vector2::new(radius * t.cos(), radius * t.sin())
        })
        .collect()
}

/// Run the weighted Voronoi relaxation for `sites` inside a circle of `radius`.
pub fn layout_clusters(
    sites: &[WeightedSite],
    radius: f64,
    cfg: &VoronoiCfg,
) -> Result<VoronoiLayout> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InvalidRadius { radius });
    }
    if sites.is_empty() {
        return Err(Error::NoSites);
    }
    let boundary = clip_circle(radius, cfg.angular_step);
    let clip = from_points_convex_hull_strict(&boundary).ok_or(Error::InvalidRadius { radius })?;
    validate_sites(sites, &clip, cfg)?;
    // bisector-edge matching tolerance
    let tol = cfg.geom.eps_pip * radius;

    let total = signed_area(&boundary);
    let weight_sum: f64 = sites.iter().map(|s| s.weight).sum();
    let targets: Vec<f64> = sites.iter().map(|s| total * s.weight / weight_sum).collect();
    let mut pos: Vec<Vector2<f64>> = sites.iter().map(|s| s.position).collect();
    let mut w = vec![total / sites.len() as f64 / 2.0; sites.len()];

    lower_overweighted(&pos, &mut w, cfg.overweight_margin);
    let mut cells = power_cells(&clip, &pos, &w, cfg.geom.eps_feas);
    let mut iterations = 0;
    let mut area_error;
    loop {
        iterations += 1;
        for (p, cell) in pos.iter_mut().zip(&cells) {
            if let Some(c) = cell.as_deref().and_then(area_centroid) {
                *p = c;
            }
        }
        raise_overweighted(&pos, &mut w, cfg.overweight_margin);
        cells = power_cells(&clip, &pos, &w, cfg.geom.eps_feas);

        let steps: Vec<f64> = cells
            .iter()
            .zip(&targets)
            .enumerate()
            .map(|(i, (cell, t))| {
                let Some(v) = cell.as_deref() else {
                    return 0.0;
                };
                let growth = area_growth(v, i, &pos, &w, tol);
                if growth > 0.0 {
                    cfg.weight_step * (t - signed_area(v).max(0.0)) / growth
                } else {
                    0.0
                }
            })
            .collect();
        for (wi, d) in w.iter_mut().zip(steps) {
            *wi += d;
        }
        lower_overweighted(&pos, &mut w, cfg.overweight_margin);
        cells = power_cells(&clip, &pos, &w, cfg.geom.eps_feas);

        area_error = cells
            .iter()
            .zip(&targets)
            .map(|(c, t)| (cell_area(c) - t).abs())
            .sum::<f64>()
            / total;
        tracing::debug!(iteration = iterations, area_error, "power diagram relaxation");
        if area_error < cfg.convergence_ratio || iterations >= cfg.max_iterations {
            break;
        }
    }
    let converged = area_error < cfg.convergence_ratio;
    if !converged {
        tracing::warn!(iterations, area_error, "weighted voronoi layout did not converge");
    }

    let cells = cells
        .into_iter()
        .zip(sites)
        .map(|(cell, s)| {
            cell.and_then(|v| match ConvexPolygon::with_cfg(v, cfg.geom) {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::debug!(site = s.id, error = %e, "dropping degenerate cell");
                    None
                }
            })
        })
        .collect();
    let sites = sites
        .iter()
        .zip(pos.iter().zip(&w))
        .map(|(s, (&position, &weight))| WeightedSite {
            id: s.id,
            weight,
            position,
        })
        .collect();
    Ok(VoronoiLayout {
        cells,
        sites,
        iterations,
        area_error,
        converged,
    })
}

fn validate_sites(sites: &[WeightedSite], clip: &Poly2, cfg: &VoronoiCfg) -> Result<()> {
    let mut seen = BTreeSet::new();
    for s in sites {
        if !s.weight.is_finite() || s.weight <= 0.0 {
            return Err(Error::InvalidWeight {
                id: s.id,
                weight: s.weight,
            });
        }
        if !seen.insert(s.id) {
            return Err(Error::DuplicateSite { id: s.id });
        }
        let p = s.position;
        if !(p.x.is_finite() && p.y.is_finite()) || !clip.contains_eps(p, -cfg.geom.eps_feas) {
            return Err(Error::SiteOutsideBoundary {
                id: s.id,
                x: p.x,
                y: p.y,
            });
        }
    }
    for (k, a) in sites.iter().enumerate() {
        for b in &sites[k + 1..] {
            if (a.position - b.position).norm() < cfg.geom.eps_len {
                return Err(Error::CoincidentSites { a: a.id, b: b.id });
            }
        }
    }
    Ok(())
}

fn cell_area(cell: &Option<Vec<Vector2<f64>>>) -> f64 {
    cell.as_deref().map_or(0.0, |v| signed_area(v).max(0.0))
}

/// Power cells in site order; `None` where the intersection is empty or degenerate.
fn power_cells(
    clip: &Poly2,
    pos: &[Vector2<f64>],
    w: &[f64],
    eps_feas: f64,
) -> Vec<Option<Vec<Vector2<f64>>>> {
    (0..pos.len())
        .map(|i| {
            let mut cell = clip.clone();
            for j in (0..pos.len()).filter(|&j| j != i) {
                let (n, c) = bisector(pos, w, i, j);
                cell.insert_halfspace(Hs2::new(n, c));
            }
            cell.checked_vertices(eps_feas)
                .map(|v| dedup_ring(v, eps_feas))
                .filter(|v| v.len() >= 3)
        })
        .collect()
}

/// Power bisector of sites i and j as `n·x ≤ c`, the side belonging to i.
fn bisector(pos: &[Vector2<f64>], w: &[f64], i: usize, j: usize) -> (Vector2<f64>, f64) {
    let n = 2.0 * (pos[j] - pos[i]);
    let c = pos[j].norm_squared() - pos[i].norm_squared() - w[j] + w[i];
    (n, c)
}

/// `∂area/∂wᵢ` of cell `i`: each edge whose midpoint lies within `tol` of a bisector
/// contributes `length / |n|`. Boundary edges do not move and contribute nothing.
fn area_growth(
    cell: &[Vector2<f64>],
    i: usize,
    pos: &[Vector2<f64>],
    w: &[f64],
    tol: f64,
) -> f64 {
    let m = cell.len();
    (0..m)
        .map(|k| {
            let (a, b) = (cell[k], cell[(k + 1) % m]);
            let mid = 0.5 * (a + b);
            (0..pos.len())
                .filter(|&j| j != i)
                .filter_map(|j| {
                    let (n, c) = bisector(pos, w, i, j);
                    let len = n.norm();
                    let dist = (n.dot(&mid) - c).abs() / len;
                    (dist <= tol).then_some((dist, len))
                })
                .min_by(|x, y| x.0.total_cmp(&y.0))
                .map_or(0.0, |(_, len)| (b - a).norm() / len)
        })
        .sum()
}

/// Drop vertices that coincide with their predecessor (nearly concurrent cuts).
fn dedup_ring(mut v: Vec<Vector2<f64>>, eps: f64) -> Vec<Vector2<f64>> {
    v.dedup_by(|a, b| (*a - *b).norm() <= eps);
    while v.len() > 1 && (v[0] - v[v.len() - 1]).norm() <= eps {
        v.pop();
    }
    v
}

// Upper bound on full pair sweeps per repair.
const MAX_REPAIR_SWEEPS: usize = 64;

/// Overweighted pair `(heavy, light, overweight)` for sites `i`, `j`, if any.
fn overweight(pos: &[Vector2<f64>], w: &[f64], i: usize, j: usize) -> Option<(usize, usize, f64)> {
    let (hi, lo) = if w[i] > w[j] { (i, j) } else { (j, i) };
    let d2 = (pos[i] - pos[j]).norm_squared();
    let ow = w[hi] - w[lo] - d2;
    (ow > 0.0).then_some((hi, lo, ow))
}

fn raise_overweighted(pos: &[Vector2<f64>], w: &mut [f64], margin: f64) {
    repair(pos, w, |w, _hi, lo, ow| w[lo] += ow + margin);
}

fn lower_overweighted(pos: &[Vector2<f64>], w: &mut [f64], margin: f64) {
    repair(pos, w, |w, hi, _lo, ow| w[hi] -= ow + margin);
}

fn repair(
    pos: &[Vector2<f64>],
    w: &mut [f64],
    mut fix: impl FnMut(&mut [f64], usize, usize, f64),
) {
    for _ in 0..MAX_REPAIR_SWEEPS {
        let mut fixed = false;
        for i in 0..w.len() {
            for j in (i + 1)..w.len() {
                if let Some((hi, lo, ow)) = overweight(pos, w, i, j) {
                    fix(w, hi, lo, ow);
                    fixed = true;
                }
            }
        }
        if !fixed {
            return;
        }
    }
}

#[cfg(test)]
mod tests;
