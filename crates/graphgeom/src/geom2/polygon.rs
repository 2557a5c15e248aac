//! Vertex-list polygon with a working rotation copy.
//!
//! Invariants
//! - `vertices` keep insertion order (= winding order); nothing here reorders them.
//! - `center`, when `Some`, is the arithmetic mean of `vertices`. Every mutation of
//!   `vertices` clears it.
//! - `rotated` mirrors `vertices` until `rotate` is called; `reset_rotation` re-syncs it.
//!
//! The center is the *vertex* centroid, not the area centroid. For polygons with uneven
//! vertex density the two differ; rotation and push-out both use the vertex centroid.

use nalgebra::Vector2;

use super::types::Affine2;
use super::util::{signed_area, vertex_centroid};

#[derive(Clone, Debug, Default)]
pub struct Polygon {
    vertices: Vec<Vector2<f64>>,
    rotated: Vec<Vector2<f64>>,
    center: Option<Vector2<f64>>,
}

impl Polygon {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vertices(vertices: Vec<Vector2<f64>>) -> Self {
        Self {
            rotated: vertices.clone(),
            vertices,
            center: None,
        }
    }

    /// Append a vertex to both the canonical and the working copy.
    pub fn add_vertex(&mut self, x: f64, y: f64) {
        debug_assert!(x.is_finite() && y.is_finite(), "non-finite vertex ({x}, {y})");
        let p = Vector2::new(x, y);
        self.vertices.push(p);
        self.rotated.push(p);
        self.center = None;
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector2<f64>] {
        &self.vertices
    }

    /// Working copy as left by the last `rotate`.
    #[inline]
    pub fn rotated(&self) -> &[Vector2<f64>] {
        &self.rotated
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Recompute and cache the vertex centroid. Empty polygons center on the origin.
    pub fn determine_center(&mut self) -> Vector2<f64> {
        let c = vertex_centroid(&self.vertices).unwrap_or_else(Vector2::zeros);
        self.center = Some(c);
        c
    }

    /// Cached vertex centroid, computed on demand.
    #[inline]
    pub fn center(&mut self) -> Vector2<f64> {
        match self.center {
            Some(c) => c,
            None => self.determine_center(),
        }
    }

    /// Vertex centroid without touching the cache.
    #[inline]
    pub fn center_uncached(&self) -> Vector2<f64> {
        self.center
            .or_else(|| vertex_centroid(&self.vertices))
            .unwrap_or_else(Vector2::zeros)
    }

    /// Rotate the working copy by `radians` (ccw) about the center.
    ///
    /// The rotation is absolute: it is applied to the canonical vertices, so repeated
    /// calls do not accumulate.
    pub fn rotate(&mut self, radians: f64) {
        let c = self.center();
        let rot = Affine2::rotation_about(radians, c);
        self.rotated.clear();
        self.rotated.extend(self.vertices.iter().map(|p| rot.apply(*p)));
    }

    pub fn reset_rotation(&mut self) {
        self.rotated.clone_from(&self.vertices);
    }

    /// Apply `f` to the canonical vertices; resets the working copy and caches.
    pub fn transform(&mut self, f: &Affine2) {
        for p in self.vertices.iter_mut() {
            *p = f.apply(*p);
        }
        self.rotated.clone_from(&self.vertices);
        self.center = None;
    }

    /// Shoelace signed area (positive for ccw).
    #[inline]
    pub fn area(&self) -> f64 {
        signed_area(&self.vertices)
    }

    #[inline]
    pub fn is_ccw(&self) -> bool {
        self.area() > 0.0
    }

    pub fn into_vertices(self) -> Vec<Vector2<f64>> {
        self.vertices
    }
}

impl From<Vec<Vector2<f64>>> for Polygon {
    fn from(vertices: Vec<Vector2<f64>>) -> Self {
        Self::from_vertices(vertices)
    }
}
