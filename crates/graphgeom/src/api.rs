//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is the convenience surface the CLI and benches
//!   import from. Breaking changes are allowed and expected.

pub use crate::error::{Error, Result};
// 2D geometry
pub use crate::geom2::{
    area_centroid, convex_hull, point_in_convex, signed_area, vertex_centroid, Aff2,
    ConvexPolygon, GeomCfg, HalfspaceIntersection, Hs2, Poly2, Polygon, Rect,
};
// Overlap removal
pub use crate::overlap::{
    force, force_between, normalize_into, remove_module_overlaps, remove_overlaps, Node,
    OverlapCfg,
};
// Cluster hulls
pub use crate::hull::{
    adjust_hull, adjust_hull_in, cluster_hulls, normalization_map, push_out, remove_sharp_edges,
    sharp_angle_count, HullAdjustment, HullCfg,
};
// Weighted Voronoi layout
pub use crate::voronoi::{clip_circle, layout_clusters, VoronoiCfg, VoronoiLayout, WeightedSite};
// Fixtures
pub use crate::gen::{
    draw_convex_polygon, draw_nodes, draw_sites, NodeCfg, ReplayToken as FixtureReplay,
};
