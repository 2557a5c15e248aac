//! Overlap removal for sized graph nodes (PFS′, push-force scan).
//!
//! Purpose
//! - Move square node boxes (`position ± size`) apart until no two overlap, while keeping
//!   their orthogonal order (left/right and above/below relations survive).
//! - Optionally do this per module and squeeze each module into its target rectangle.
//!
//! Pipeline per group of movable nodes
//! 1. Coincident nodes are spread on a tiny circle so the scans have a direction.
//! 2. Pass one: horizontal scan, vertical scan; normalize into the target area if any.
//! 3. Pass two: vertical scan, horizontal scan; normalize again, or restore the group's
//!    mean position when there is no target area.
//!
//! Fixed nodes are neither moved nor considered as obstacles.
//!
//! Code cross-refs: `scan::{scan, pass}`, `force::force_between`, `Rect`

mod force;
mod scan;

use std::collections::BTreeMap;

use nalgebra::Vector2;

use crate::error::Result;
use crate::geom2::Rect;
pub use force::force_between;
use scan::{pass, Axis, Body};

/// A graph node as seen by the layout engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub position: Vector2<f64>,
    /// Half-extent of the node's square box.
    pub size: f64,
    /// Fixed nodes keep their position.
    pub fixed: bool,
    pub module: Option<i32>,
}

impl Node {
    pub fn new(id: impl Into<String>, x: f64, y: f64, size: f64) -> Self {
        Self {
            id: id.into(),
            position: Vector2::new(x, y),
            size,
            fixed: false,
            module: None,
        }
    }

    pub fn with_module(mut self, module: i32) -> Self {
        self.module = Some(module);
        self
    }

    pub fn pinned(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// True when the two boxes intersect by more than `eps` on both axes.
    pub fn overlaps(&self, other: &Node, eps: f64) -> bool {
        let s = self.size + other.size;
        let d = other.position - self.position;
        d.x.abs() < s - eps && d.y.abs() < s - eps
    }
}

/// Separation vector pushing `vj` clear of `vi` (see `force_between`).
#[inline]
pub fn force(vi: &Node, vj: &Node) -> Vector2<f64> {
    force_between(vi.position, vi.size, vj.position, vj.size)
}

/// Overlap-removal configuration.
#[derive(Clone, Copy, Debug)]
pub struct OverlapCfg {
    /// Inset applied to every target rectangle before normalizing.
    pub padding: f64,
    /// Positions closer than this (per axis) count as coincident.
    pub coincident_eps: f64,
    /// Radius of the circle coincident nodes are spread on.
    pub spread_radius: f64,
}

impl Default for OverlapCfg {
    fn default() -> Self {
        Self {
            padding: 0.0,
            coincident_eps: 1e-9,
            spread_radius: 1e-3,
        }
    }
}

/// Remove overlaps among all movable nodes, treating them as one group.
///
/// With `target`, the result is normalized into `target` inset by `cfg.padding`;
/// without it, the group's mean position is preserved.
pub fn remove_overlaps(nodes: &mut [Node], target: Option<Rect>, cfg: &OverlapCfg) -> Result<()> {
    if let Some(r) = target {
        r.validate()?;
    }
    let idx: Vec<usize> = (0..nodes.len()).filter(|&i| !nodes[i].fixed).collect();
    remove_group(nodes, &idx, target, cfg);
    Ok(())
}

/// Remove overlaps module by module.
///
/// Nodes are grouped by `module` (nodes without one form their own group). A group
/// whose module has an entry in `areas` is normalized into it.
pub fn remove_module_overlaps(
    nodes: &mut [Node],
    areas: &BTreeMap<i32, Rect>,
    cfg: &OverlapCfg,
) -> Result<()> {
    for r in areas.values() {
        r.validate()?;
    }
    let mut groups: BTreeMap<Option<i32>, Vec<usize>> = BTreeMap::new();
    for (i, n) in nodes.iter().enumerate() {
        if !n.fixed {
            groups.entry(n.module).or_default().push(i);
        }
    }
    for (module, idx) in &groups {
        let target = module.and_then(|m| areas.get(&m).copied());
        tracing::debug!(
            module = ?module,
            nodes = idx.len(),
            has_area = target.is_some(),
            "module overlap removal"
        );
        remove_group(nodes, idx, target, cfg);
    }
    Ok(())
}

/// Map the movable nodes into `rect` inset by `padding`.
///
/// Each axis is centered on the mean position and scaled so the largest deviation
/// from the mean reaches the padded half-width (half-height). Groups with no spread on
/// an axis land on the rectangle's center line.
pub fn normalize_into(nodes: &mut [Node], rect: Rect, padding: f64) {
    let idx: Vec<usize> = (0..nodes.len()).filter(|&i| !nodes[i].fixed).collect();
    let mut pts: Vec<Vector2<f64>> = idx.iter().map(|&i| nodes[i].position).collect();
    normalize_points(&mut pts, rect, padding);
    for (&i, p) in idx.iter().zip(pts) {
        nodes[i].position = p;
    }
}

fn normalize_points(pts: &mut [Vector2<f64>], rect: Rect, padding: f64) {
    if pts.is_empty() {
        return;
    }
    let inner = rect.inset(padding);
    let mean = mean(pts);
    let mut dev = Vector2::<f64>::zeros();
    for p in pts.iter() {
        dev.x = dev.x.max((p.x - mean.x).abs());
        dev.y = dev.y.max((p.y - mean.y).abs());
    }
    let half = Vector2::new(0.5 * inner.width(), 0.5 * inner.height());
    let scale = |h: f64, d: f64| if d > 0.0 { h / d } else { 0.0 };
    let (sx, sy) = (scale(half.x, dev.x), scale(half.y, dev.y));
    let c = inner.center();
    for p in pts.iter_mut() {
        let x = c.x + (p.x - mean.x) * sx;
        let y = c.y + (p.y - mean.y) * sy;
        // rounding can overshoot the edge by an ulp
        p.x = x.clamp(inner.x_min, inner.x_max);
        p.y = y.clamp(inner.y_min, inner.y_max);
    }
}

fn mean(pts: &[Vector2<f64>]) -> Vector2<f64> {
    pts.iter().fold(Vector2::zeros(), |acc, p| acc + p) / pts.len() as f64
}

fn remove_group(nodes: &mut [Node], idx: &[usize], target: Option<Rect>, cfg: &OverlapCfg) {
    if idx.is_empty() {
        return;
    }
    let mut bodies: Vec<Body> = idx
        .iter()
        .map(|&i| Body {
            pos: nodes[i].position,
            size: nodes[i].size,
        })
        .collect();
    let start_mean = mean(&bodies.iter().map(|b| b.pos).collect::<Vec<_>>());
    let spread = spread_coincident(&mut bodies, cfg);
    if spread > 0 {
        tracing::debug!(spread, "spread coincident nodes");
    }

    pass(&mut bodies, Axis::X);
    tracing::debug!(nodes = bodies.len(), first = ?Axis::X, "overlap pass");
    if let Some(r) = target {
        normalize_bodies(&mut bodies, r, cfg.padding);
    }
    pass(&mut bodies, Axis::Y);
    tracing::debug!(nodes = bodies.len(), first = ?Axis::Y, "overlap pass");
    match target {
        Some(r) => normalize_bodies(&mut bodies, r, cfg.padding),
        None => {
            let shift = start_mean - mean(&bodies.iter().map(|b| b.pos).collect::<Vec<_>>());
            for b in bodies.iter_mut() {
                b.pos += shift;
            }
        }
    }
    for (&i, b) in idx.iter().zip(&bodies) {
        nodes[i].position = b.pos;
    }
}

fn normalize_bodies(bodies: &mut [Body], rect: Rect, padding: f64) {
    let mut pts: Vec<Vector2<f64>> = bodies.iter().map(|b| b.pos).collect();
    normalize_points(&mut pts, rect, padding);
    for (b, p) in bodies.iter_mut().zip(pts) {
        b.pos = p;
    }
}

/// Spread runs of coincident bodies evenly on a circle around their shared point.
/// Returns the number of bodies moved.
fn spread_coincident(bodies: &mut [Body], cfg: &OverlapCfg) -> usize {
    let n = bodies.len();
    let mut taken = vec![false; n];
    let mut moved = 0;
    for i in 0..n {
        if taken[i] {
            continue;
        }
        let anchor = bodies[i].pos;
        let members: Vec<usize> = (i..n)
            .filter(|&j| {
                !taken[j]
                    && (bodies[j].pos.x - anchor.x).abs() <= cfg.coincident_eps
                    && (bodies[j].pos.y - anchor.y).abs() <= cfg.coincident_eps
            })
            .collect();
        if members.len() < 2 {
            continue;
        }
        let k = members.len() as f64;
        for (m, &j) in members.iter().enumerate() {
            taken[j] = true;
            let theta = std::f64::consts::TAU * m as f64 / k;
            bodies[j].pos = anchor + cfg.spread_radius * Vector2::new(theta.cos(), theta.sin());
        }
        moved += members.len();
    }
    moved
}
