//! Distance between any two geometries of one domain.
//!
//! The [`Distance`] trait supplies the method form; the free function
//! [`distance`] is the usual entry point. Every pairing of bare points,
//! trajectory points, polylines, and trajectories is covered; geometries
//! from different domains do not type-check against each other.

use tracktable_types::{Domain, Point, Polyline, Trajectory, TrajectoryPoint};

/// Shortest distance to another geometry, in the domain's length unit.
pub trait Distance<Rhs = Self> {
    fn distance(&self, other: &Rhs) -> f64;
}

/// Shortest distance between `a` and `b` in the domain's length unit.
///
/// ```
/// use tracktable::algorithm::distance;
/// use tracktable::terrestrial;
///
/// let albuquerque = terrestrial::Point::lon_lat(-106.6504, 35.0844);
/// let el_paso = terrestrial::Point::lon_lat(-106.4850, 31.7619);
/// let km = distance(&albuquerque, &el_paso);
/// assert!((km - 369.764).abs() < 0.01);
/// ```
pub fn distance<A, B>(a: &A, b: &B) -> f64
where
    A: Distance<B>,
{
    a.distance(b)
}

/// Minimum distance from a point to a chain of segments. A single-point
/// chain is treated as that point; an empty chain yields zero.
fn point_to_chain<D: Domain>(p: &Point<D>, chain: &[Point<D>]) -> f64 {
    match chain.len() {
        0 => 0.0,
        1 => D::distance(p, &chain[0]),
        _ => chain
            .windows(2)
            .map(|seg| D::point_segment_distance(p, &seg[0], &seg[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

fn chain_to_chain<D: Domain>(a: &[Point<D>], b: &[Point<D>]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.len() == 1 {
        return point_to_chain(&a[0], b);
    }
    if b.len() == 1 {
        return point_to_chain(&b[0], a);
    }
    let mut best = f64::INFINITY;
    for s in a.windows(2) {
        for t in b.windows(2) {
            best = best.min(D::segment_distance(&s[0], &s[1], &t[0], &t[1]));
            if best == 0.0 {
                return 0.0;
            }
        }
    }
    best
}

impl<D: Domain> Distance for Point<D> {
    fn distance(&self, other: &Point<D>) -> f64 {
        D::distance(self, other)
    }
}

impl<D: Domain> Distance<TrajectoryPoint<D>> for Point<D> {
    fn distance(&self, other: &TrajectoryPoint<D>) -> f64 {
        D::distance(self, other.position())
    }
}

impl<D: Domain> Distance<Point<D>> for TrajectoryPoint<D> {
    fn distance(&self, other: &Point<D>) -> f64 {
        D::distance(self.position(), other)
    }
}

impl<D: Domain> Distance for TrajectoryPoint<D> {
    fn distance(&self, other: &TrajectoryPoint<D>) -> f64 {
        D::distance(self.position(), other.position())
    }
}

impl<D: Domain> Distance<Polyline<D>> for Point<D> {
    fn distance(&self, other: &Polyline<D>) -> f64 {
        point_to_chain(self, other.points())
    }
}

impl<D: Domain> Distance<Point<D>> for Polyline<D> {
    fn distance(&self, other: &Point<D>) -> f64 {
        point_to_chain(other, self.points())
    }
}

impl<D: Domain> Distance<Polyline<D>> for TrajectoryPoint<D> {
    fn distance(&self, other: &Polyline<D>) -> f64 {
        point_to_chain(self.position(), other.points())
    }
}

impl<D: Domain> Distance<TrajectoryPoint<D>> for Polyline<D> {
    fn distance(&self, other: &TrajectoryPoint<D>) -> f64 {
        point_to_chain(other.position(), self.points())
    }
}

impl<D: Domain> Distance for Polyline<D> {
    fn distance(&self, other: &Polyline<D>) -> f64 {
        chain_to_chain(self.points(), other.points())
    }
}

impl<D: Domain> Distance<Trajectory<D>> for Point<D> {
    fn distance(&self, other: &Trajectory<D>) -> f64 {
        let positions: Vec<Point<D>> = other.positions().collect();
        point_to_chain(self, &positions)
    }
}

impl<D: Domain> Distance<Point<D>> for Trajectory<D> {
    fn distance(&self, other: &Point<D>) -> f64 {
        other.distance(self)
    }
}

impl<D: Domain> Distance<Trajectory<D>> for TrajectoryPoint<D> {
    fn distance(&self, other: &Trajectory<D>) -> f64 {
        self.position().distance(other)
    }
}

impl<D: Domain> Distance<TrajectoryPoint<D>> for Trajectory<D> {
    fn distance(&self, other: &TrajectoryPoint<D>) -> f64 {
        other.position().distance(self)
    }
}

impl<D: Domain> Distance<Polyline<D>> for Trajectory<D> {
    fn distance(&self, other: &Polyline<D>) -> f64 {
        let positions: Vec<Point<D>> = self.positions().collect();
        chain_to_chain(&positions, other.points())
    }
}

impl<D: Domain> Distance<Trajectory<D>> for Polyline<D> {
    fn distance(&self, other: &Trajectory<D>) -> f64 {
        other.distance(self)
    }
}

impl<D: Domain> Distance for Trajectory<D> {
    fn distance(&self, other: &Trajectory<D>) -> f64 {
        let a: Vec<Point<D>> = self.positions().collect();
        let b: Vec<Point<D>> = other.positions().collect();
        chain_to_chain(&a, &b)
    }
}
