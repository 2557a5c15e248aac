//! Push-force scans (PFS′) over one group of movable boxes.
//!
//! The per-node scratch state lives in `Scratch`, a struct-of-arrays indexed like the
//! `bodies` slice. It is built from the current positions at the start of every pass, so
//! no scan can read a coordinate that was not written in this pass.

use nalgebra::Vector2;

use super::force::force_between;

/// A movable box: center and half-extent.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Body {
    pub pos: Vector2<f64>,
    pub size: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn of(self, v: Vector2<f64>) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }
}

/// Pushed lower-left corners plus the push accumulated by the running scan.
#[derive(Debug)]
pub(crate) struct Scratch {
    x: Vec<f64>,
    y: Vec<f64>,
    push_order: Vec<f64>,
}

impl Scratch {
    pub fn from_bodies(bodies: &[Body]) -> Self {
        Self {
            x: bodies.iter().map(|b| b.pos.x - b.size).collect(),
            y: bodies.iter().map(|b| b.pos.y - b.size).collect(),
            push_order: vec![0.0; bodies.len()],
        }
    }

    fn reset_push_order(&mut self) {
        self.push_order.fill(0.0);
    }

    fn corner_mut(&mut self, axis: Axis, i: usize) -> &mut f64 {
        match axis {
            Axis::X => &mut self.x[i],
            Axis::Y => &mut self.y[i],
        }
    }

    /// Centers implied by the pushed corners.
    pub fn centers(&self, bodies: &[Body]) -> Vec<Vector2<f64>> {
        assert_eq!(self.x.len(), bodies.len(), "scratch/body length mismatch");
        bodies
            .iter()
            .enumerate()
            .map(|(i, b)| Vector2::new(self.x[i] + b.size, self.y[i] + b.size))
            .collect()
    }
}

#[inline]
fn force(bodies: &[Body], a: usize, b: usize) -> Vector2<f64> {
    force_between(bodies[a].pos, bodies[a].size, bodies[b].pos, bodies[b].size)
}

/// One scan along `axis`.
///
/// Bodies are visited in center order (ties by index) in runs of equal center ("same-x
/// groups"). Each body gets the largest push demanded by an earlier body,
/// `γ'' = max(0, max_j push_j + f(j, v))`. If that would leave its center behind an
/// already placed center, the running bound σ is used instead, which keeps the
/// orthogonal order. After each run σ grows by the largest force the run exerts on the
/// bodies still to come.
pub(crate) fn scan(bodies: &[Body], axis: Axis, scratch: &mut Scratch) {
    let n = bodies.len();
    assert_eq!(scratch.push_order.len(), n, "scratch/body length mismatch");
    let center = |i: usize| axis.of(bodies[i].pos);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| center(a).total_cmp(&center(b)).then(a.cmp(&b)));

    let mut sigma = 0.0_f64;
    let mut frontier = f64::NEG_INFINITY;
    let mut i = 0;
    while i < n {
        let mut k = i;
        while k + 1 < n && center(order[k + 1]) == center(order[i]) {
            k += 1;
        }
        for &v in &order[i..=k] {
            let mut gamma = 0.0_f64;
            for &j in &order[..i] {
                gamma = gamma.max(scratch.push_order[j] + axis.of(force(bodies, j, v)));
            }
            if center(v) + gamma < frontier {
                gamma = gamma.max(sigma);
            }
            scratch.push_order[v] = gamma;
        }
        for &v in &order[i..=k] {
            let gamma = scratch.push_order[v];
            *scratch.corner_mut(axis, v) = center(v) - bodies[v].size + gamma;
            frontier = frontier.max(center(v) + gamma);
        }
        let mut delta = 0.0_f64;
        for &u in &order[i..=k] {
            for &w in &order[k + 1..] {
                delta = delta.max(axis.of(force(bodies, u, w)));
            }
        }
        sigma += delta;
        i = k + 1;
    }
}

/// Two scans in the given order, then positions = pushed corner + size.
pub(crate) fn pass(bodies: &mut [Body], first: Axis) {
    let second = match first {
        Axis::X => Axis::Y,
        Axis::Y => Axis::X,
    };
    let mut scratch = Scratch::from_bodies(bodies);
    scan(bodies, first, &mut scratch);
    scratch.reset_push_order();
    scan(bodies, second, &mut scratch);
    let centers = scratch.centers(bodies);
    for (b, c) in bodies.iter_mut().zip(centers) {
        b.pos = c;
    }
}
