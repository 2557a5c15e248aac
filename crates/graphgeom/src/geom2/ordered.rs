//! Strict, ordered H-representation in 2D (Poly2).
//!
//! Purpose
//! - Provide a single strict, angle‑ordered H‑rep (`Poly2`) with unit normals and
//!   coalesced parallels. Power-diagram cells are built as the clip region's H-rep
//!   plus one bisector half-plane per neighbouring site, then intersected here.
//!
//! Code cross-refs: `types::Hs2`, `util::{angle_of, canonicalize_unit}`, `voronoi`

use nalgebra::Vector2;

use super::types::Hs2;
use super::util::{angle_of, canonicalize_unit};

/// Strict, ordered H-representation in 2D.
///
/// Invariants:
/// - Unit normals (||n||=1).
/// - Angle-sorted by atan2(n.y, n.x) (stable).
/// - Parallels coalesced (keep most restrictive c for each direction).
#[derive(Clone, Debug, Default)]
pub struct Poly2 {
    pub hs: Vec<Hs2>,
}

impl Poly2 {
    /// Insert a half-space and preserve invariants (binary search by angle, coalesce parallels).
    pub fn insert_halfspace(&mut self, h: Hs2) {
        if let Some((n, c)) = canonicalize_unit(h.n, h.c) {
            let h = Hs2::new(n, c);
            let key = angle_of(n);
            let mut lo = 0usize;
            let mut hi = self.hs.len();
            while lo < hi {
                let mid = (lo + hi) / 2;
                let am = angle_of(self.hs[mid].n);
                if am <= key {
                    lo = mid + 1;
                } else {
                    hi = mid;
                }
            }
            // lo is insertion point
            if lo > 0 && (self.hs[lo - 1].n - n).norm() < 1e-9 {
                if c < self.hs[lo - 1].c {
                    self.hs[lo - 1].c = c;
                }
                return;
            }
            if lo < self.hs.len() && (self.hs[lo].n - n).norm() < 1e-9 {
                if c < self.hs[lo].c {
                    self.hs[lo].c = c;
                }
                return;
            }
            self.hs.insert(lo, h);
        }
    }

    /// Membership check with custom slack (eps).
    ///
    /// - `eps > 0` is permissive (enlarges the region).
    /// - `eps < 0` is strict (shrinks it); used to demand a site lies strictly inside.
    #[inline]
    pub fn contains_eps(&self, p: Vector2<f64>, eps: f64) -> bool {
        self.hs.iter().all(|h| h.satisfies_eps(p, eps))
    }

    /// Intersection of half-spaces using deque sweep on angle-sorted, coalesced constraints.
    pub fn halfspace_intersection_eps(&self, eps: f64) -> HalfspaceIntersection {
        hsi_ordered(&self.hs, eps)
    }

    /// Shorthand for `halfspace_intersection_eps(0.0)`.
    #[inline]
    pub fn halfspace_intersection(&self) -> HalfspaceIntersection {
        self.halfspace_intersection_eps(0.0)
    }

    /// Bounded intersection whose vertices satisfy every constraint within `eps_feas`.
    ///
    /// The deque sweep can return spurious vertices for an empty intersection; those are
    /// rejected here, so `None` means empty, unbounded or degenerate.
    pub fn checked_vertices(&self, eps_feas: f64) -> Option<Vec<Vector2<f64>>> {
        let verts = self.halfspace_intersection().vertices()?;
        let scale = verts.iter().map(|v| v.norm()).fold(1.0, f64::max);
        let tol = eps_feas * scale;
        if verts.iter().all(|v| self.contains_eps(*v, tol)) {
            Some(verts)
        } else {
            None
        }
    }

    /// Return a new poly with one additional cut (half-space) applied.
    #[inline]
    pub fn with_cut(&self, cut: Hs2) -> Poly2 {
        let mut out = self.clone();
        out.insert_halfspace(cut);
        out
    }
}

/// HPI result: empty, unbounded, or vertices.
#[derive(Clone, Debug)]
pub enum HalfspaceIntersection {
    Empty,
    Unbounded,
    Bounded(Vec<Vector2<f64>>),
}
impl HalfspaceIntersection {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, HalfspaceIntersection::Empty)
    }
    #[inline]
    pub fn is_bounded(&self) -> bool {
        matches!(self, HalfspaceIntersection::Bounded(_))
    }
    #[inline]
    pub fn vertices(self) -> Option<Vec<Vector2<f64>>> {
        if let HalfspaceIntersection::Bounded(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

fn hsi_ordered(hs: &[Hs2], eps: f64) -> HalfspaceIntersection {
    use std::collections::VecDeque;
    if hs.is_empty() {
        return HalfspaceIntersection::Unbounded;
    }
    // Opposite parallel pair n·x <= c1, (-n)·x <= c2 leaves s := n·x ∈ [-c2, c1].
    let angles: Vec<f64> = hs.iter().map(|h| angle_of(h.n)).collect();
    for (i, hi) in hs.iter().enumerate() {
        let target = wrap_angle(angles[i] + std::f64::consts::PI);
        let mut lo = 0usize;
        let mut hi_idx = angles.len();
        while lo < hi_idx {
            let mid = (lo + hi_idx) / 2;
            if angles[mid] < target {
                lo = mid + 1;
            } else {
                hi_idx = mid;
            }
        }
        if lo < angles.len() && (angles[lo] - target).abs() < 1e-12 {
            let c1 = hi.c;
            let c2 = hs[lo].c;
            if (-c1).max(-c2) > c1.min(c2) {
                return HalfspaceIntersection::Empty;
            }
        }
    }
    let mut dq: VecDeque<usize> = VecDeque::new();
    let inter =
        |i1: usize, i2: usize| -> Option<Vector2<f64>> { line_intersection(hs[i1], hs[i2]) };

    for (i, h) in hs.iter().enumerate() {
        while dq.len() >= 2 {
            let l1 = dq[dq.len() - 2];
            let l2 = dq[dq.len() - 1];
            if let Some(p) = inter(l1, l2) {
                if h.satisfies_eps(p, eps) {
                    break;
                }
            }
            dq.pop_back();
        }
        while dq.len() >= 2 {
            let f1 = dq[0];
            let f2 = dq[1];
            if let Some(p) = inter(f1, f2) {
                if h.satisfies_eps(p, eps) {
                    break;
                }
            }
            dq.pop_front();
        }
        dq.push_back(i);
    }
    while dq.len() >= 3 {
        let l1 = dq[dq.len() - 2];
        let l2 = dq[dq.len() - 1];
        if let Some(p) = line_intersection(hs[l1], hs[l2]) {
            if hs[dq[0]].satisfies_eps(p, eps) {
                break;
            }
        }
        dq.pop_back();
    }
    while dq.len() >= 3 {
        let f1 = dq[0];
        let f2 = dq[1];
        if let Some(p) = line_intersection(hs[f1], hs[f2]) {
            if hs[dq[dq.len() - 1]].satisfies_eps(p, eps) {
                break;
            }
        }
        dq.pop_front();
    }
    if dq.is_empty() {
        return HalfspaceIntersection::Empty;
    }
    if dq.len() < 3 {
        return HalfspaceIntersection::Unbounded;
    }
    let m = dq.len();
    let mut verts = Vec::with_capacity(m);
    for k in 0..m {
        let i1 = dq[k];
        let i2 = dq[(k + 1) % m];
        if let Some(p) = line_intersection(hs[i1], hs[i2]) {
            verts.push(p);
        } else {
            return HalfspaceIntersection::Unbounded;
        }
    }
    if verts.len() >= 3 {
        HalfspaceIntersection::Bounded(verts)
    } else {
        HalfspaceIntersection::Unbounded
    }
}

#[inline]
pub(crate) fn wrap_angle(a: f64) -> f64 {
    let mut x = a;
    while x <= -std::f64::consts::PI {
        x += 2.0 * std::f64::consts::PI;
    }
    while x > std::f64::consts::PI {
        x -= 2.0 * std::f64::consts::PI;
    }
    x
}

fn line_intersection(h1: Hs2, h2: Hs2) -> Option<Vector2<f64>> {
    let a = nalgebra::matrix![h1.n.x, h1.n.y; h2.n.x, h2.n.y];
    let det = a.determinant();
    if det.abs() < 1e-12 {
        return None;
    }
    let inv = a.try_inverse()?;
    let rhs = Vector2::new(h1.c, h2.c);
    Some(inv * rhs)
}
