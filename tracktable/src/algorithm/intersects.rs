//! Intersection predicates.
//!
//! Box-versus-geometry tests work in every domain. Chain-versus-chain and
//! point-versus-chain tests are planar and therefore only exist in the
//! two-dimensional domains; asking whether two 3D polylines cross is a
//! compile error rather than a wrong answer.

use tracktable_types::private_utils::{point_on_segment, segments_intersect};
use tracktable_types::{BoundingBox, Domain, Point, Polyline, Trajectory, TrajectoryPoint};

/// Does this geometry share at least one point with `Rhs`?
pub trait Intersects<Rhs = Self> {
    fn intersects(&self, other: &Rhs) -> bool;
}

/// Do `a` and `b` share at least one point?
pub fn intersects<A, B>(a: &A, b: &B) -> bool
where
    A: Intersects<B>,
{
    a.intersects(b)
}

/// Liang–Barsky slab clip of the parametric segment against the box;
/// valid in any dimension.
fn segment_intersects_box<D: Domain>(a: &Point<D>, b: &Point<D>, bbox: &BoundingBox<D>) -> bool {
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for i in 0..D::DIMENSION {
        let delta = b[i] - a[i];
        let (min, max) = (bbox.min_corner()[i], bbox.max_corner()[i]);
        if delta == 0.0 {
            if a[i] < min || a[i] > max {
                return false;
            }
        } else {
            let mut enter = (min - a[i]) / delta;
            let mut exit = (max - a[i]) / delta;
            if enter > exit {
                std::mem::swap(&mut enter, &mut exit);
            }
            t0 = t0.max(enter);
            t1 = t1.min(exit);
            if t0 > t1 {
                return false;
            }
        }
    }
    true
}

fn chain_intersects_box<D: Domain>(chain: &[Point<D>], bbox: &BoundingBox<D>) -> bool {
    match chain.len() {
        0 => false,
        1 => bbox.contains(&chain[0]),
        _ => chain
            .windows(2)
            .any(|seg| segment_intersects_box(&seg[0], &seg[1], bbox)),
    }
}

fn chain_contains_point<D>(chain: &[Point<D>], p: &Point<D>) -> bool
where
    D: Domain<Coords = [f64; 2]>,
{
    match chain.len() {
        0 => false,
        1 => chain[0] == *p,
        _ => chain
            .windows(2)
            .any(|seg| point_on_segment(p.coords(), seg[0].coords(), seg[1].coords())),
    }
}

fn chains_intersect<D>(a: &[Point<D>], b: &[Point<D>]) -> bool
where
    D: Domain<Coords = [f64; 2]>,
{
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a.len() == 1 {
        return chain_contains_point(b, &a[0]);
    }
    if b.len() == 1 {
        return chain_contains_point(a, &b[0]);
    }
    a.windows(2).any(|s| {
        b.windows(2).any(|t| {
            segments_intersect(
                s[0].coords(),
                s[1].coords(),
                t[0].coords(),
                t[1].coords(),
            )
        })
    })
}

impl<D: Domain> Intersects for BoundingBox<D> {
    fn intersects(&self, other: &BoundingBox<D>) -> bool {
        BoundingBox::intersects(self, other)
    }
}

impl<D: Domain> Intersects<Point<D>> for BoundingBox<D> {
    fn intersects(&self, other: &Point<D>) -> bool {
        self.contains(other)
    }
}

impl<D: Domain> Intersects<BoundingBox<D>> for Point<D> {
    fn intersects(&self, other: &BoundingBox<D>) -> bool {
        other.contains(self)
    }
}

impl<D: Domain> Intersects<TrajectoryPoint<D>> for BoundingBox<D> {
    fn intersects(&self, other: &TrajectoryPoint<D>) -> bool {
        self.contains(other.position())
    }
}

impl<D: Domain> Intersects<BoundingBox<D>> for TrajectoryPoint<D> {
    fn intersects(&self, other: &BoundingBox<D>) -> bool {
        other.contains(self.position())
    }
}

impl<D: Domain> Intersects<Polyline<D>> for BoundingBox<D> {
    fn intersects(&self, other: &Polyline<D>) -> bool {
        chain_intersects_box(other.points(), self)
    }
}

impl<D: Domain> Intersects<BoundingBox<D>> for Polyline<D> {
    fn intersects(&self, other: &BoundingBox<D>) -> bool {
        chain_intersects_box(self.points(), other)
    }
}

impl<D: Domain> Intersects<Trajectory<D>> for BoundingBox<D> {
    fn intersects(&self, other: &Trajectory<D>) -> bool {
        let positions: Vec<Point<D>> = other.positions().collect();
        chain_intersects_box(&positions, self)
    }
}

impl<D: Domain> Intersects<BoundingBox<D>> for Trajectory<D> {
    fn intersects(&self, other: &BoundingBox<D>) -> bool {
        Intersects::intersects(other, self)
    }
}

impl<D: Domain> Intersects for Point<D> {
    fn intersects(&self, other: &Point<D>) -> bool {
        self == other
    }
}

impl<D: Domain> Intersects<TrajectoryPoint<D>> for Point<D> {
    fn intersects(&self, other: &TrajectoryPoint<D>) -> bool {
        self == other.position()
    }
}

impl<D: Domain> Intersects<Point<D>> for TrajectoryPoint<D> {
    fn intersects(&self, other: &Point<D>) -> bool {
        self.position() == other
    }
}

impl<D: Domain> Intersects for TrajectoryPoint<D> {
    fn intersects(&self, other: &TrajectoryPoint<D>) -> bool {
        self.position() == other.position()
    }
}

impl<D> Intersects<Polyline<D>> for Point<D>
where
    D: Domain<Coords = [f64; 2]>,
{
    fn intersects(&self, other: &Polyline<D>) -> bool {
        chain_contains_point(other.points(), self)
    }
}

impl<D> Intersects<Point<D>> for Polyline<D>
where
    D: Domain<Coords = [f64; 2]>,
{
    fn intersects(&self, other: &Point<D>) -> bool {
        chain_contains_point(self.points(), other)
    }
}

impl<D> Intersects for Polyline<D>
where
    D: Domain<Coords = [f64; 2]>,
{
    fn intersects(&self, other: &Polyline<D>) -> bool {
        chains_intersect(self.points(), other.points())
    }
}

impl<D> Intersects<Trajectory<D>> for Polyline<D>
where
    D: Domain<Coords = [f64; 2]>,
{
    fn intersects(&self, other: &Trajectory<D>) -> bool {
        let positions: Vec<Point<D>> = other.positions().collect();
        chains_intersect(self.points(), &positions)
    }
}

impl<D> Intersects<Polyline<D>> for Trajectory<D>
where
    D: Domain<Coords = [f64; 2]>,
{
    fn intersects(&self, other: &Polyline<D>) -> bool {
        other.intersects(self)
    }
}

impl<D> Intersects for Trajectory<D>
where
    D: Domain<Coords = [f64; 2]>,
{
    fn intersects(&self, other: &Trajectory<D>) -> bool {
        let a: Vec<Point<D>> = self.positions().collect();
        let b: Vec<Point<D>> = other.positions().collect();
        chains_intersect(&a, &b)
    }
}

impl<D> Intersects<Trajectory<D>> for Point<D>
where
    D: Domain<Coords = [f64; 2]>,
{
    fn intersects(&self, other: &Trajectory<D>) -> bool {
        let positions: Vec<Point<D>> = other.positions().collect();
        chain_contains_point(&positions, self)
    }
}

impl<D> Intersects<Point<D>> for Trajectory<D>
where
    D: Domain<Coords = [f64; 2]>,
{
    fn intersects(&self, other: &Point<D>) -> bool {
        other.intersects(self)
    }
}

impl<D> Intersects<Polyline<D>> for TrajectoryPoint<D>
where
    D: Domain<Coords = [f64; 2]>,
{
    fn intersects(&self, other: &Polyline<D>) -> bool {
        chain_contains_point(other.points(), self.position())
    }
}

impl<D> Intersects<TrajectoryPoint<D>> for Polyline<D>
where
    D: Domain<Coords = [f64; 2]>,
{
    fn intersects(&self, other: &TrajectoryPoint<D>) -> bool {
        chain_contains_point(self.points(), other.position())
    }
}

impl<D> Intersects<Trajectory<D>> for TrajectoryPoint<D>
where
    D: Domain<Coords = [f64; 2]>,
{
    fn intersects(&self, other: &Trajectory<D>) -> bool {
        self.position().intersects(other)
    }
}

impl<D> Intersects<TrajectoryPoint<D>> for Trajectory<D>
where
    D: Domain<Coords = [f64; 2]>,
{
    fn intersects(&self, other: &TrajectoryPoint<D>) -> bool {
        other.position().intersects(self)
    }
}
