//! Convex hulls and hull-derived shape descriptors.
//!
//! Hulls are planar constructions, so they exist for the two-dimensional
//! domains only. The hull itself is returned as a closed ring (first
//! vertex repeated at the end) wound counter-clockwise, with strictly
//! convex vertices only. Collinear input degenerates to a two-vertex
//! chord ring, for which the descriptors report area 0, perimeter twice
//! the chord length, and aspect ratio 0.

use robust::{orient2d, Coord};
use std::cmp::Ordering;
use tracktable_types::{Cartesian2d, Domain, Point, Polyline, Spherical, Trajectory};

/// Planar domains that can measure the area enclosed by a ring of
/// vertices.
///
/// The flat domain uses the shoelace formula in native square units; the
/// spherical domain uses the Chamberlain–Duquette spherical-excess form
/// in km².
pub trait RingArea: Domain<Coords = [f64; 2]> {
    /// Area of the (unclosed) vertex ring; sign-free.
    fn ring_area(vertices: &[Point<Self>]) -> f64;
}

impl RingArea for Cartesian2d {
    fn ring_area(vertices: &[Point<Self>]) -> f64 {
        planar_ring_area(vertices).abs()
    }
}

impl RingArea for Spherical {
    fn ring_area(vertices: &[Point<Self>]) -> f64 {
        let n = vertices.len();
        let mut total = 0.0;
        for i in 0..n {
            let low = &vertices[i];
            let mid = &vertices[(i + 1) % n];
            let high = &vertices[(i + 2) % n];
            total += (high[0].to_radians() - low[0].to_radians()) * mid[1].to_radians().sin();
        }
        (total * tracktable_types::EARTH_RADIUS_KM * tracktable_types::EARTH_RADIUS_KM / 2.0).abs()
    }
}

/// Geometries whose vertex set has a convex hull.
pub trait ConvexHull {
    type Domain: RingArea;

    /// The convex hull of the vertices as a closed counter-clockwise
    /// ring.
    fn convex_hull(&self) -> Polyline<Self::Domain>;
}

impl<D: RingArea> ConvexHull for Polyline<D> {
    type Domain = D;

    fn convex_hull(&self) -> Polyline<D> {
        hull_of_points(self.points())
    }
}

impl<D: RingArea> ConvexHull for Trajectory<D> {
    type Domain = D;

    fn convex_hull(&self) -> Polyline<D> {
        let positions: Vec<Point<D>> = self.positions().collect();
        hull_of_points(&positions)
    }
}

impl<D: RingArea> ConvexHull for [Point<D>] {
    type Domain = D;

    fn convex_hull(&self) -> Polyline<D> {
        hull_of_points(self)
    }
}

impl<D: RingArea> ConvexHull for Vec<Point<D>> {
    type Domain = D;

    fn convex_hull(&self) -> Polyline<D> {
        hull_of_points(self)
    }
}

fn orientation<D: Domain<Coords = [f64; 2]>>(a: &Point<D>, b: &Point<D>, c: &Point<D>) -> f64 {
    orient2d(
        Coord { x: a[0], y: a[1] },
        Coord { x: b[0], y: b[1] },
        Coord { x: c[0], y: c[1] },
    )
}

/// Andrew's monotone chain over the lexicographically sorted distinct
/// points; strictly convex vertices only.
fn hull_of_points<D: Domain<Coords = [f64; 2]>>(points: &[Point<D>]) -> Polyline<D> {
    let mut sorted: Vec<Point<D>> = points.to_vec();
    sorted.sort_by(|a, b| {
        a[0].partial_cmp(&b[0])
            .unwrap_or(Ordering::Equal)
            .then(a[1].partial_cmp(&b[1]).unwrap_or(Ordering::Equal))
    });
    sorted.dedup();

    match sorted.len() {
        0 => return Polyline::new(Vec::new()),
        1 => return Polyline::new(vec![sorted[0]]),
        _ => {}
    }

    let mut lower: Vec<Point<D>> = Vec::new();
    for point in &sorted {
        while lower.len() >= 2
            && orientation(&lower[lower.len() - 2], &lower[lower.len() - 1], point) <= 0.0
        {
            lower.pop();
        }
        lower.push(*point);
    }

    let mut upper: Vec<Point<D>> = Vec::new();
    for point in sorted.iter().rev() {
        while upper.len() >= 2
            && orientation(&upper[upper.len() - 2], &upper[upper.len() - 1], point) <= 0.0
        {
            upper.pop();
        }
        upper.push(*point);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    let first = lower[0];
    lower.push(first);
    Polyline::new(lower)
}

/// Ring vertices without the closing duplicate.
fn ring_vertices<D: Domain<Coords = [f64; 2]>>(ring: &Polyline<D>) -> &[Point<D>] {
    let points = ring.points();
    match points.len() {
        0 | 1 => points,
        n if points[0] == points[n - 1] => &points[..n - 1],
        _ => points,
    }
}

/// Area enclosed by the convex hull, per the domain's [`RingArea`] form.
pub fn convex_hull_area<G: ConvexHull>(geometry: &G) -> f64 {
    let hull = geometry.convex_hull();
    let vertices = ring_vertices(&hull);
    if vertices.len() < 3 {
        return 0.0;
    }
    G::Domain::ring_area(vertices)
}

fn planar_ring_area<D: Domain<Coords = [f64; 2]>>(vertices: &[Point<D>]) -> f64 {
    let n = vertices.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        let p = &vertices[i];
        let q = &vertices[(i + 1) % n];
        twice_area += p[0] * q[1] - q[0] * p[1];
    }
    twice_area / 2.0
}

/// Length of the hull boundary in the domain's length unit. A chord ring
/// (collinear input) walks the chord twice.
pub fn convex_hull_perimeter<G: ConvexHull>(geometry: &G) -> f64 {
    geometry
        .convex_hull()
        .segments()
        .map(|(a, b)| G::Domain::distance(&a, &b))
        .sum()
}

/// Ratio of the smaller to the larger eigenvalue of the hull-vertex
/// covariance, in `[0, 1]`. Zero for degenerate (collinear or smaller)
/// hulls.
pub fn convex_hull_aspect_ratio<G: ConvexHull>(geometry: &G) -> f64 {
    let hull = geometry.convex_hull();
    let vertices = ring_vertices(&hull);
    if vertices.len() < 3 {
        return 0.0;
    }
    let n = vertices.len() as f64;
    let mean_x: f64 = vertices.iter().map(|v| v[0]).sum::<f64>() / n;
    let mean_y: f64 = vertices.iter().map(|v| v[1]).sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for v in vertices {
        let dx = v[0] - mean_x;
        let dy = v[1] - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    sxx /= n;
    sxy /= n;
    syy /= n;

    let half_trace = (sxx + syy) / 2.0;
    let disc = (((sxx - syy) / 2.0).powi(2) + sxy * sxy).sqrt();
    let large = half_trace + disc;
    let small = half_trace - disc;
    if large <= 0.0 {
        0.0
    } else {
        (small / large).clamp(0.0, 1.0)
    }
}

/// Area-weighted centroid of the hull polygon, on raw coordinates.
/// Degenerate hulls fall back to the vertex mean. `None` on empty input.
pub fn convex_hull_centroid<G: ConvexHull>(geometry: &G) -> Option<Point<G::Domain>> {
    let hull = geometry.convex_hull();
    let vertices = ring_vertices(&hull);
    if vertices.is_empty() {
        return None;
    }
    let signed_area = planar_ring_area(vertices);
    if signed_area.abs() < f64::EPSILON {
        let n = vertices.len() as f64;
        let mean_x = vertices.iter().map(|v| v[0]).sum::<f64>() / n;
        let mean_y = vertices.iter().map(|v| v[1]).sum::<f64>() / n;
        return Some(Point::new([mean_x, mean_y]));
    }
    let n = vertices.len();
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let p = &vertices[i];
        let q = &vertices[(i + 1) % n];
        let w = p[0] * q[1] - q[0] * p[1];
        cx += (p[0] + q[0]) * w;
        cy += (p[1] + q[1]) * w;
    }
    Some(Point::new([
        cx / (6.0 * signed_area),
        cy / (6.0 * signed_area),
    ]))
}
