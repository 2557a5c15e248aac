//! Seeded random fixtures: node layouts, weighted sites and convex polygons.
//!
//! Purpose
//! - Reproducible inputs for tests, benches and the CLI `demo` command.
//!
//! Model
//! - Every draw takes a replay token `(seed, index)` mixed into a single `StdRng`, so
//!   draw `k` of a seed can be regenerated without replaying draws `0..k`.
//! - Nodes are clustered: each module gets a random center and its nodes scatter
//!   around it, which produces the overlaps the layout code exists to remove.
//!
//! Code cross-refs: `overlap::Node`, `voronoi::WeightedSite`, `ConvexPolygon::from_points`

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom2::ConvexPolygon;
use crate::overlap::Node;
use crate::voronoi::WeightedSite;

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    /// Token for the next draw of the same seed.
    pub fn next(self) -> Self {
        Self {
            index: self.index.wrapping_add(1),
            ..self
        }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Clustered node layout.
#[derive(Clone, Copy, Debug)]
pub struct NodeCfg {
    pub count: usize,
    /// Number of modules; 0 leaves every node without a module.
    pub modules: usize,
    /// Module centers are drawn from `[-extent, extent]²`.
    pub extent: f64,
    /// Nodes scatter up to this far (per axis) from their module center.
    pub scatter: f64,
    pub size_min: f64,
    pub size_max: f64,
}

impl Default for NodeCfg {
    fn default() -> Self {
        Self {
            count: 50,
            modules: 4,
            extent: 20.0,
            scatter: 4.0,
            size_min: 0.3,
            size_max: 1.5,
        }
    }
}

/// Draw a clustered node layout. Node ids are `n0`, `n1`, ….
pub fn draw_nodes(cfg: NodeCfg, tok: ReplayToken) -> Vec<Node> {
    let mut rng = tok.to_std_rng();
    let centers: Vec<Vector2<f64>> = (0..cfg.modules.max(1))
        .map(|_| {
            Vector2::new(
                rng.gen_range(-cfg.extent..=cfg.extent),
                rng.gen_range(-cfg.extent..=cfg.extent),
            )
        })
        .collect();
    let (lo, hi) = (cfg.size_min.min(cfg.size_max), cfg.size_min.max(cfg.size_max));
    (0..cfg.count)
        .map(|i| {
            let m = rng.gen_range(0..centers.len());
            let c = centers[m];
            let x = c.x + rng.gen_range(-cfg.scatter..=cfg.scatter);
            let y = c.y + rng.gen_range(-cfg.scatter..=cfg.scatter);
            let node = Node::new(format!("n{i}"), x, y, rng.gen_range(lo..=hi));
            if cfg.modules > 0 {
                node.with_module(m as i32)
            } else {
                node
            }
        })
        .collect()
}

/// Draw `count` sites strictly inside a circle of `radius`, weights in `[1, max_weight]`.
///
/// Sites are placed at radii up to `0.8 · radius`, so they always pass validation.
pub fn draw_sites(
    count: usize,
    radius: f64,
    max_weight: f64,
    tok: ReplayToken,
) -> Vec<WeightedSite> {
    let mut rng = tok.to_std_rng();
    let w_hi = max_weight.max(1.0);
    (0..count)
        .map(|i| {
            // sqrt for uniform density over the disk
            let r = 0.8 * radius * rng.gen::<f64>().sqrt();
            let t = rng.gen::<f64>() * std::f64::consts::TAU;
            let w = rng.gen_range(1.0..=w_hi);
            WeightedSite::new(i as i32, w, r * t.cos(), r * t.sin())
        })
        .collect()
}

/// Random convex polygon: `n` jittered angles, jittered radii, convex hull.
///
/// `None` only when the hull degenerates, which needs `n < 3` in practice.
pub fn draw_convex_polygon(
    n: usize,
    radial_jitter: f64,
    tok: ReplayToken,
) -> Option<ConvexPolygon> {
    let mut rng = tok.to_std_rng();
    let n = n.max(3);
    let delta = std::f64::consts::TAU / n as f64;
    let phase = rng.gen::<f64>() * delta;
    let rj = radial_jitter.clamp(0.0, 0.9);
    let pts: Vec<Vector2<f64>> = (0..n)
        .map(|k| {
            let th = phase + k as f64 * delta + (rng.gen::<f64>() - 0.5) * 0.6 * delta;
            let r = 1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            Vector2::new(r * th.cos(), r * th.sin())
        })
        .collect();
    ConvexPolygon::from_points(&pts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_is_deterministic_and_index_sensitive() {
        let tok = ReplayToken::new(42, 0);
        let a = draw_nodes(NodeCfg::default(), tok);
        let b = draw_nodes(NodeCfg::default(), tok);
        assert_eq!(a, b);
        let c = draw_nodes(NodeCfg::default(), tok.next());
        assert_ne!(a, c);
    }

    #[test]
    fn nodes_respect_the_config() {
        let cfg = NodeCfg {
            count: 30,
            modules: 3,
            ..NodeCfg::default()
        };
        let nodes = draw_nodes(cfg, ReplayToken::new(1, 0));
        assert_eq!(nodes.len(), 30);
        for n in &nodes {
            assert!(n.size >= cfg.size_min && n.size <= cfg.size_max);
            assert!(matches!(n.module, Some(m) if (0..3).contains(&m)));
            let bound = cfg.extent + cfg.scatter;
            assert!(n.position.x.abs() <= bound && n.position.y.abs() <= bound);
        }
        let flat = draw_nodes(
            NodeCfg {
                modules: 0,
                ..cfg
            },
            ReplayToken::new(1, 0),
        );
        assert!(flat.iter().all(|n| n.module.is_none()));
    }

    #[test]
    fn sites_lie_inside_the_disk() {
        let sites = draw_sites(12, 10.0, 5.0, ReplayToken::new(9, 3));
        assert_eq!(sites.len(), 12);
        for s in &sites {
            assert!(s.position.norm() <= 8.0 + 1e-12);
            assert!((1.0..=5.0).contains(&s.weight));
        }
    }

    #[test]
    fn convex_polygons_are_valid() {
        for k in 0..20 {
            let p = draw_convex_polygon(8, 0.3, ReplayToken::new(5, k)).expect("polygon");
            assert!(p.area() > 0.0);
            assert!(p.contains(p.centroid()));
        }
    }
}
