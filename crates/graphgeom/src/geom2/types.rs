//! Basic 2D types and tolerances shared by the layout modules.
//!
//! - `GeomCfg`: centralizes epsilons for containment, degenerate lengths and feasibility.
//! - `Hs2`: closed half‑plane `n·x <= c` with helper predicates.
//! - `Affine2`: 2D affine map used to move hulls in and out of normalized space.
//! - `Rect`: axis-aligned target area for a module.
//!
//! Code cross-refs: `polygon::Polygon`, `convex::ConvexPolygon`, `ordered::Poly2`

use nalgebra::{Matrix2, Vector2};

use crate::error::{Error, Result};

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Slack for the edge-side test in point-in-polygon and convexity checks.
    pub eps_pip: f64,
    /// Vectors shorter than this are treated as zero (no direction).
    pub eps_len: f64,
    /// Feasibility slack for half-plane membership.
    pub eps_feas: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_pip: 1e-5,
            eps_len: 1e-12,
            eps_feas: 1e-9,
        }
    }
}

/// Closed half‑plane `n · x <= c` (no normalization required here).
#[derive(Clone, Copy, Debug)]
pub struct Hs2 {
    pub n: Vector2<f64>,
    pub c: f64,
}

impl Hs2 {
    #[inline]
    pub fn new(n: Vector2<f64>, c: f64) -> Self {
        Self { n, c }
    }
    #[inline]
    pub fn satisfies_eps(&self, p: Vector2<f64>, eps: f64) -> bool {
        self.n.dot(&p) <= self.c + eps
    }
}

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug)]
pub struct Affine2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Affine2 {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }
    /// Per-axis scale then translate: `x ↦ diag(sx, sy) x + t`.
    #[inline]
    pub fn scale_translate(sx: f64, sy: f64, t: Vector2<f64>) -> Self {
        Self {
            m: Matrix2::new(sx, 0.0, 0.0, sy),
            t,
        }
    }
    #[inline]
    pub fn rotation_about(theta: f64, center: Vector2<f64>) -> Self {
        let (s, c) = theta.sin_cos();
        let m = Matrix2::new(c, -s, s, c);
        Self {
            m,
            t: center - m * center,
        }
    }
    #[inline]
    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.m * p + self.t
    }
    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.m.try_inverse().map(|minv| Self {
            m: minv,
            t: -minv * self.t,
        })
    }
    /// Composition `self ∘ other`.
    #[inline]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            m: self.m * other.m,
            t: self.m * other.t + self.t,
        }
    }
}

/// Axis-aligned rectangle `[x_min, x_max] × [y_min, y_max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Rect {
    /// Checked constructor; rejects inverted or non-finite bounds.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        let r = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        r.validate()?;
        Ok(r)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(Error::InvalidRect {
                x_min: self.x_min,
                x_max: self.x_max,
                y_min: self.y_min,
                y_max: self.y_max,
            });
        }
        Ok(())
    }

    /// Smallest rectangle containing all points; `None` for an empty slice.
    pub fn enclosing(points: &[Vector2<f64>]) -> Option<Self> {
        let first = points.first()?;
        let mut r = Self {
            x_min: first.x,
            x_max: first.x,
            y_min: first.y,
            y_max: first.y,
        };
        for p in &points[1..] {
            r.x_min = r.x_min.min(p.x);
            r.x_max = r.x_max.max(p.x);
            r.y_min = r.y_min.min(p.y);
            r.y_max = r.y_max.max(p.y);
        }
        Some(r)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
    #[inline]
    pub fn center(&self) -> Vector2<f64> {
        Vector2::new(
            0.5 * (self.x_min + self.x_max),
            0.5 * (self.y_min + self.y_max),
        )
    }
    #[inline]
    pub fn contains_eps(&self, p: Vector2<f64>, eps: f64) -> bool {
        p.x >= self.x_min - eps
            && p.x <= self.x_max + eps
            && p.y >= self.y_min - eps
            && p.y <= self.y_max + eps
    }
    /// Shrink by `padding` on every side; collapses to the center line when too small.
    pub fn inset(&self, padding: f64) -> Self {
        let c = self.center();
        let hw = (0.5 * self.width() - padding).max(0.0);
        let hh = (0.5 * self.height() - padding).max(0.0);
        Self {
            x_min: c.x - hw,
            x_max: c.x + hw,
            y_min: c.y - hh,
            y_max: c.y + hh,
        }
    }
    /// Corners in counter-clockwise order starting at the lower-left.
    pub fn corners(&self) -> [Vector2<f64>; 4] {
        [
            Vector2::new(self.x_min, self.y_min),
            Vector2::new(self.x_max, self.y_min),
            Vector2::new(self.x_max, self.y_max),
            Vector2::new(self.x_min, self.y_max),
        ]
    }
}
