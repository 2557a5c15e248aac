//! Input-validation errors.
//!
//! Programming errors (broken internal invariants) panic; everything a caller can
//! get wrong through the public API surfaces here instead.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("polygon needs at least 3 vertices, got {got}")]
    TooFewVertices { got: usize },
    #[error("polygon vertices are not in counter-clockwise order (signed area {area})")]
    Clockwise { area: f64 },
    #[error("polygon is not convex at vertex {index}")]
    NotConvex { index: usize },
    #[error("clip radius must be finite and positive, got {radius}")]
    InvalidRadius { radius: f64 },
    #[error("weighted layout needs at least one site")]
    NoSites,
    #[error("site {id} has invalid weight {weight} (must be finite and > 0)")]
    InvalidWeight { id: i32, weight: f64 },
    #[error("site id {id} appears more than once")]
    DuplicateSite { id: i32 },
    #[error("site {id} at ({x}, {y}) is not strictly inside the clip boundary")]
    SiteOutsideBoundary { id: i32, x: f64, y: f64 },
    #[error("sites {a} and {b} share a position")]
    CoincidentSites { a: i32, b: i32 },
    #[error("normalization map is singular")]
    SingularMap,
    #[error("invalid rectangle [{x_min}, {x_max}] x [{y_min}, {y_max}]")]
    InvalidRect {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
