//! Cluster-hull adjustment: smooth the boundary polygon drawn around a module.
//!
//! Purpose
//! - `push_out`: inflate a hull slightly so it clears the node boxes it encloses.
//! - `remove_sharp_edges`: insert extra vertices before every vertex whose interior
//!   angle is below a threshold, repeating until no sharp vertex remains or a cap is hit.
//! - `cluster_hulls`: per-module pipeline over laid-out nodes (convex hull of the node
//!   boxes, adjusted in a normalized frame so the constants are scale free).
//!
//! Termination
//! - Smoothing is not guaranteed to reach a fixed point (an outward spike keeps
//!   producing new sharp vertices), so both the number of passes and the number of
//!   inserted vertices are capped. Hitting a cap sets `converged = false`.
//!
//! Code cross-refs: `geom2::{convex_hull, vertex_centroid, signed_area, Aff2}`

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use nalgebra::Vector2;

use crate::error::{Error, Result};
use crate::geom2::{convex_hull, signed_area, unit_or_zero, vertex_centroid, Aff2, Rect};
use crate::overlap::Node;

/// Hull-adjustment configuration.
#[derive(Clone, Copy, Debug)]
pub struct HullCfg {
    /// Outward displacement applied by `push_out`.
    pub push_distance: f64,
    /// Extra outward displacement of every inserted vertex.
    pub insert_epsilon: f64,
    /// Inserted vertex sits at `prev + insert_fraction · (cur − prev)`.
    pub insert_fraction: f64,
    pub max_passes: usize,
    pub max_insertions: usize,
    /// Vectors shorter than this have no direction.
    pub eps_len: f64,
}

impl Default for HullCfg {
    fn default() -> Self {
        Self {
            push_distance: 0.05,
            insert_epsilon: 0.01,
            insert_fraction: 0.75,
            max_passes: 64,
            max_insertions: 512,
            eps_len: 1e-12,
        }
    }
}

/// Result of smoothing a hull.
#[derive(Clone, Debug, PartialEq)]
pub struct HullAdjustment {
    pub hull: Vec<Vector2<f64>>,
    /// False when a pass or insertion cap stopped the smoothing early.
    pub converged: bool,
    pub insertions: usize,
}

/// Push every vertex `distance` away from the vertex centroid.
///
/// A vertex sitting on the centroid has no direction and stays put.
pub fn push_out(hull: &[Vector2<f64>], distance: f64) -> Vec<Vector2<f64>> {
    let Some(c) = vertex_centroid(hull) else {
        return Vec::new();
    };
    hull.iter()
        .map(|&p| p + distance * unit_or_zero(p - c, 1e-12))
        .collect()
}

/// Interior angle at `cur` in `[0, 2π)`, measured on the inside of a hull with the
/// given winding.
fn interior_angle(prev: Vector2<f64>, cur: Vector2<f64>, next: Vector2<f64>, ccw: bool) -> f64 {
    let a = prev - cur;
    let b = next - cur;
    let (to_prev, to_next) = (a.y.atan2(a.x), b.y.atan2(b.x));
    let d = if ccw {
        to_prev - to_next
    } else {
        to_next - to_prev
    };
    d.rem_euclid(TAU)
}

/// Number of vertices whose interior angle is below `threshold_rad`.
pub fn sharp_angle_count(hull: &[Vector2<f64>], threshold_rad: f64) -> usize {
    let n = hull.len();
    if n < 3 {
        return 0;
    }
    let ccw = signed_area(hull) >= 0.0;
    (0..n)
        .filter(|&i| {
            let (prev, next) = (hull[(i + n - 1) % n], hull[(i + 1) % n]);
            interior_angle(prev, hull[i], next, ccw) < threshold_rad
        })
        .count()
}

/// Insert a vertex before every sharp vertex until none is left.
///
/// The inserted vertex lies on the incoming edge at `insert_fraction` and is pushed
/// `insert_epsilon` outward from the centroid of the input hull. After an insertion the
/// scan skips past the vertex it just treated. The winding is read once from the
/// signed area of the input.
pub fn remove_sharp_edges(
    hull: &[Vector2<f64>],
    threshold_rad: f64,
    cfg: &HullCfg,
) -> HullAdjustment {
    let mut h = hull.to_vec();
    let Some(c) = vertex_centroid(&h).filter(|_| h.len() >= 3) else {
        return HullAdjustment {
            hull: h,
            converged: true,
            insertions: 0,
        };
    };
    let ccw = signed_area(&h) >= 0.0;
    let mut insertions = 0;
    for pass in 0..cfg.max_passes {
        let mut changed = false;
        let mut i = 0;
        while i < h.len() {
            let n = h.len();
            let (prev, cur, next) = (h[(i + n - 1) % n], h[i], h[(i + 1) % n]);
            if interior_angle(prev, cur, next, ccw) < threshold_rad {
                let q = prev + cfg.insert_fraction * (cur - prev);
                let q = q + cfg.insert_epsilon * unit_or_zero(q - c, cfg.eps_len);
                h.insert(i, q);
                insertions += 1;
                changed = true;
                i += 2;
                if insertions >= cfg.max_insertions {
                    tracing::warn!(insertions, pass, "hull smoothing hit the insertion cap");
                    return HullAdjustment {
                        hull: h,
                        converged: false,
                        insertions,
                    };
                }
            } else {
                i += 1;
            }
        }
        if !changed {
            return HullAdjustment {
                hull: h,
                converged: true,
                insertions,
            };
        }
    }
    tracing::warn!(
        insertions,
        passes = cfg.max_passes,
        "hull smoothing hit the pass cap"
    );
    HullAdjustment {
        hull: h,
        converged: false,
        insertions,
    }
}

/// `push_out` followed by `remove_sharp_edges` with a threshold in degrees.
pub fn adjust_hull(
    hull: &[Vector2<f64>],
    angle_threshold_deg: f64,
    cfg: &HullCfg,
) -> HullAdjustment {
    let pushed = push_out(hull, cfg.push_distance);
    remove_sharp_edges(&pushed, angle_threshold_deg.to_radians(), cfg)
}

/// Affine map taking `extent` onto the unit square.
///
/// A flat extent yields a singular map (zero scale on that axis).
pub fn normalization_map(extent: Rect) -> Aff2 {
    let inv = |w: f64| if w > 0.0 { 1.0 / w } else { 0.0 };
    let (sx, sy) = (inv(extent.width()), inv(extent.height()));
    Aff2::scale_translate(sx, sy, Vector2::new(-extent.x_min * sx, -extent.y_min * sy))
}

/// Adjust `hull` inside the frame given by `to_normalized`, then map the result back.
pub fn adjust_hull_in(
    hull: &[Vector2<f64>],
    angle_threshold_deg: f64,
    to_normalized: &Aff2,
    cfg: &HullCfg,
) -> Result<HullAdjustment> {
    if to_normalized.m.determinant().abs() < 1e-300 {
        return Err(Error::SingularMap);
    }
    let back = to_normalized.inverse().ok_or(Error::SingularMap)?;
    let local: Vec<_> = hull.iter().map(|&p| to_normalized.apply(p)).collect();
    let mut adj = adjust_hull(&local, angle_threshold_deg, cfg);
    for p in adj.hull.iter_mut() {
        *p = back.apply(*p);
    }
    Ok(adj)
}

fn box_corners(n: &Node) -> [Vector2<f64>; 4] {
    let s = n.size;
    [
        n.position + Vector2::new(-s, -s),
        n.position + Vector2::new(s, -s),
        n.position + Vector2::new(s, s),
        n.position + Vector2::new(-s, s),
    ]
}

/// Smoothed hull per module.
///
/// Each module's hull is the convex hull of its nodes' box corners. All hulls are
/// adjusted in the frame that maps the extent of every node box onto the unit square.
/// Nodes without a module are ignored, as are modules whose hull has fewer than three
/// vertices.
pub fn cluster_hulls(
    nodes: &[Node],
    angle_threshold_deg: f64,
    cfg: &HullCfg,
) -> BTreeMap<i32, HullAdjustment> {
    let mut out = BTreeMap::new();
    let all: Vec<Vector2<f64>> = nodes.iter().flat_map(box_corners).collect();
    let Some(extent) = Rect::enclosing(&all) else {
        return out;
    };
    let to_unit = normalization_map(extent);

    let mut modules: BTreeMap<i32, Vec<Vector2<f64>>> = BTreeMap::new();
    for n in nodes {
        if let Some(m) = n.module {
            modules.entry(m).or_default().extend(box_corners(n));
        }
    }
    for (m, pts) in modules {
        let Some(hull) = convex_hull(&pts).filter(|h| h.len() >= 3) else {
            tracing::debug!(module = m, "skipping degenerate module hull");
            continue;
        };
        match adjust_hull_in(&hull, angle_threshold_deg, &to_unit, cfg) {
            Ok(adj) => {
                out.insert(m, adj);
            }
            Err(e) => tracing::warn!(module = m, error = %e, "module hull not adjusted"),
        }
    }
    out
}
