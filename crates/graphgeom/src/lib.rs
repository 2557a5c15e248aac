//! Geometry engine for clustered graph layout.
//!
//! - `geom2`: polygons, convex polygons (rotating calipers, point-in-polygon), strict
//!   ordered H-rep and the shared 2D types.
//! - `overlap`: PFS′ overlap removal for square node boxes, optionally per module.
//! - `hull`: smoothing of the boundary polygon drawn around each module.
//! - `voronoi`: weighted Voronoi (power diagram) layout of clusters in a disk.
//! - `gen`: seeded fixtures for tests, benches and the CLI.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; `api` and
//!   `prelude` are the supported import surfaces for the CLI and benches.
//!
//! Every entry point is synchronous and deterministic; inputs are plain data, so
//! independent layouts can run on separate threads.

pub mod api;
pub mod error;
pub mod gen;
pub mod geom2;
pub mod hull;
pub mod overlap;
pub mod voronoi;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};
pub use geom2::{Aff2, GeomCfg};
pub use nalgebra::{Matrix2 as Mat2, Vector2 as Vec2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::gen::{draw_convex_polygon, draw_nodes, draw_sites, NodeCfg, ReplayToken};
    pub use crate::geom2::{point_in_convex, Aff2, ConvexPolygon, GeomCfg, Polygon, Rect};
    pub use crate::hull::{adjust_hull, cluster_hulls, HullAdjustment, HullCfg};
    pub use crate::overlap::{remove_module_overlaps, remove_overlaps, Node, OverlapCfg};
    pub use crate::voronoi::{layout_clusters, VoronoiCfg, VoronoiLayout, WeightedSite};
    pub use nalgebra::{Matrix2 as Mat2, Vector2 as Vec2};
}
