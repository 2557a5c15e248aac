use nalgebra::Vector2;

/// Separation vector that pushes box `b` clear of box `a`.
///
/// Boxes are squares of half-extent `size`. The dominant axis is picked by comparing the
/// center slope with the ratio of summed half-heights to summed half-widths (exactly 1
/// for square boxes). Along the dominant axis the force is the signed overlap
/// `sign(d)·(s − |d|)`; the other component follows the center line. Non-overlapping
/// pairs yield a force pointing back toward `a`, which the scans read as "no push".
///
/// Coincident centers have no direction and give zero force.
pub fn force_between(pa: Vector2<f64>, sa: f64, pb: Vector2<f64>, sb: f64) -> Vector2<f64> {
    let d = pb - pa;
    let (adx, ady) = (d.x.abs(), d.y.abs());
    let s = sa + sb;
    // summed half-heights over summed half-widths; 1 for square boxes
    if d.x != 0.0 && ady <= adx {
        let fx = d.x.signum() * (s - adx);
        return Vector2::new(fx, fx * d.y / d.x);
    }
    if d.y != 0.0 {
        let fy = d.y.signum() * (s - ady);
        return Vector2::new(fy * d.x / d.y, fy);
    }
    Vector2::zeros()
}
