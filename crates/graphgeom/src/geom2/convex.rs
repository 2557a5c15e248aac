//! Convex polygons: minimum-area bounding box and containment.
//!
//! Purpose
//! - Rotating-calipers minimum-area enclosing rectangle (used for cluster extents).
//! - Edge-side point-in-polygon test for ccw convex polygons.
//!
//! Invariants
//! - Vertices are counter-clockwise and convex; checked once in `ConvexPolygon::new`.
//! - `bounding_box` is `None` until first computed and is cleared by `transform`.

use nalgebra::Vector2;

use super::polygon::Polygon;
use super::types::{Affine2, GeomCfg, Rect};
use super::util::{area_centroid, convex_hull, signed_area, unit_or_zero};
use crate::error::{Error, Result};

#[derive(Clone, Debug)]
pub struct ConvexPolygon {
    polygon: Polygon,
    bounding_box: Option<Polygon>,
    cfg: GeomCfg,
}

impl ConvexPolygon {
    /// Validate winding and convexity with default tolerances.
    pub fn new(vertices: Vec<Vector2<f64>>) -> Result<Self> {
        Self::with_cfg(vertices, GeomCfg::default())
    }

    pub fn with_cfg(vertices: Vec<Vector2<f64>>, cfg: GeomCfg) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::TooFewVertices {
                got: vertices.len(),
            });
        }
        let area = signed_area(&vertices);
        if area <= 0.0 {
            return Err(Error::Clockwise { area });
        }
        let n = vertices.len();
        for i in 0..n {
            let a = vertices[(i + n - 1) % n];
            let b = vertices[i];
            let c = vertices[(i + 1) % n];
            let turn = unit_or_zero(b - a, cfg.eps_len).perp(&unit_or_zero(c - b, cfg.eps_len));
            if turn < -cfg.eps_pip {
                return Err(Error::NotConvex { index: i });
            }
        }
        Ok(Self {
            polygon: Polygon::from_vertices(vertices),
            bounding_box: None,
            cfg,
        })
    }

    /// Convex hull of arbitrary points (ccw), then validated.
    pub fn from_points(points: &[Vector2<f64>]) -> Result<Self> {
        let hull = convex_hull(points).ok_or(Error::TooFewVertices { got: points.len() })?;
        Self::new(hull)
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector2<f64>] {
        self.polygon.vertices()
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.polygon.area()
    }

    /// Area centroid (falls back to the vertex centroid for degenerate polygons).
    pub fn centroid(&self) -> Vector2<f64> {
        area_centroid(self.vertices()).unwrap_or_else(|| self.polygon.center_uncached())
    }

    /// Axis-aligned extent of the vertices.
    pub fn extent(&self) -> Rect {
        // `new` guarantees at least three vertices.
        Rect::enclosing(self.vertices()).unwrap_or(Rect {
            x_min: 0.0,
            x_max: 0.0,
            y_min: 0.0,
            y_max: 0.0,
        })
    }

    /// Apply an orientation-preserving map; clears the bounding-box cache.
    ///
    /// Reflections would flip the winding, which breaks the ccw invariant.
    pub fn transform(&mut self, f: &Affine2) {
        assert!(
            f.m.determinant() > 0.0,
            "ConvexPolygon::transform requires an orientation-preserving map"
        );
        self.polygon.transform(f);
        self.bounding_box = None;
    }

    /// Point-in-polygon against this polygon's vertices.
    #[inline]
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        point_in_convex(p, self.vertices(), self.cfg.eps_pip)
    }

    /// Cached minimum-area bounding box, computed on first access.
    pub fn bounding_box(&mut self) -> &Polygon {
        let cfg = self.cfg;
        let polygon = &mut self.polygon;
        self.bounding_box
            .get_or_insert_with(|| optimal_bounding_box(polygon, cfg))
    }

    /// Rotating calipers: align every edge with the x axis, keep the smallest
    /// axis-aligned box, rotate it back. O(n²) over vertices.
    pub fn compute_optimal_bounding_box(&mut self) -> &Polygon {
        let best = optimal_bounding_box(&mut self.polygon, self.cfg);
        self.bounding_box.insert(best)
    }

    pub fn into_vertices(self) -> Vec<Vector2<f64>> {
        self.polygon.into_vertices()
    }
}

fn optimal_bounding_box(polygon: &mut Polygon, cfg: GeomCfg) -> Polygon {
    let center = polygon.center();
    let n = polygon.len();
    let mut best: Option<(f64, f64, Rect)> = None;
    for i in 0..n {
        let a = polygon.vertices()[i];
        let b = polygon.vertices()[(i + 1) % n];
        let dir = unit_or_zero(b - a, cfg.eps_len);
        if dir == Vector2::zeros() {
            continue;
        }
        let theta = dir.y.atan2(dir.x);
        polygon.rotate(-theta);
        let Some(r) = Rect::enclosing(polygon.rotated()) else {
            continue;
        };
        let area = r.area();
        if best.as_ref().map_or(true, |(a_best, _, _)| area < *a_best) {
            best = Some((area, theta, r));
        }
    }
    polygon.reset_rotation();
    let (theta, rect) = match best {
        Some((_, theta, r)) => (theta, r),
        // Every edge degenerate: all vertices coincide.
        None => {
            let point = Rect {
                x_min: center.x,
                x_max: center.x,
                y_min: center.y,
                y_max: center.y,
            };
            (0.0, Rect::enclosing(polygon.vertices()).unwrap_or(point))
        }
    };
    let back = Affine2::rotation_about(theta, center);
    Polygon::from_vertices(rect.corners().iter().map(|p| back.apply(*p)).collect())
}

/// Edge-side test: the point is inside when the cross product of every edge with
/// `p − edge_start` has the same sign; values within `eps` count as on the edge.
///
/// Requires consistently wound convex vertices (caller responsibility; `ConvexPolygon`
/// checks it on construction). Fewer than three vertices contain nothing.
pub fn point_in_convex(p: Vector2<f64>, vertices: &[Vector2<f64>], eps: f64) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0_f64;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let cross = (b - a).perp(&(p - a));
        if cross.abs() <= eps {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}
