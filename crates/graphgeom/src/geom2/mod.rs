//! 2D geometry primitives for cluster layout.
//!
//! Purpose
//! - `Polygon`: ordered vertices, vertex centroid, working rotation copy.
//! - `ConvexPolygon`: ccw convex polygon with rotating-calipers bounding box and
//!   point-in-polygon.
//! - `Poly2`: strict ordered H-rep, used to intersect power-diagram half-planes.
//! - Shared tolerances (`GeomCfg`), half-planes, affine maps and rectangles.
//!
//! Code cross-refs: `overlap`, `hull`, `voronoi`

pub mod convex;
pub mod ordered;
pub mod polygon;
mod types;
mod util;

pub use convex::{point_in_convex, ConvexPolygon};
pub use ordered::{HalfspaceIntersection, Poly2};
pub use polygon::Polygon;
pub use types::{Affine2 as Aff2, GeomCfg, Hs2, Rect};
pub use util::{
    area_centroid, convex_hull, cross, from_points_convex_hull_strict, signed_area,
    unit_or_zero, vertex_centroid,
};

#[cfg(test)]
mod tests;
