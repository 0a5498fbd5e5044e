//! Ramer–Douglas–Peucker simplification.

use tracktable_types::{Domain, Point, Polyline, Trajectory};

// The RDP recursion works on (index, point) pairs so trajectory callers
// can map retained positions back to the original trajectory points.
#[derive(Copy, Clone)]
struct RdpIndex<D: Domain> {
    index: usize,
    point: Point<D>,
}

fn rdp_indices<D: Domain>(points: &[Point<D>], epsilon: f64) -> Vec<usize> {
    if points.len() <= 2 {
        return (0..points.len()).collect();
    }
    let indexed: Vec<RdpIndex<D>> = points
        .iter()
        .enumerate()
        .map(|(index, point)| RdpIndex {
            index,
            point: *point,
        })
        .collect();
    compute_rdp(&indexed, epsilon)
        .into_iter()
        .map(|entry| entry.index)
        .collect()
}

fn compute_rdp<D: Domain>(points: &[RdpIndex<D>], epsilon: f64) -> Vec<RdpIndex<D>> {
    if points.is_empty() {
        return Vec::new();
    }
    let first = points[0];
    let last = points[points.len() - 1];

    let mut dmax = 0.0;
    let mut index = 0;
    for (i, entry) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let distance = D::point_segment_distance(&entry.point, &first.point, &last.point);
        if distance > dmax {
            index = i;
            dmax = distance;
        }
    }
    if dmax > epsilon {
        let mut kept = compute_rdp(&points[..=index], epsilon);
        kept.pop();
        kept.extend_from_slice(&compute_rdp(&points[index..], epsilon));
        kept
    } else {
        vec![first, last]
    }
}

/// Simplifies a geometry with the [Ramer–Douglas–Peucker
/// algorithm](https://en.wikipedia.org/wiki/Ramer–Douglas–Peucker_algorithm).
///
/// The tolerance is a distance in the domain's length unit (kilometers in
/// the spherical domain). The first and last points always survive, and a
/// tolerance of zero or less returns the input unchanged.
pub trait Simplify {
    /// The simplified representation of the geometry.
    fn simplify(&self, tolerance: f64) -> Self;

    /// The retained indices of the input.
    fn simplify_idx(&self, tolerance: f64) -> Vec<usize>;
}

impl<D: Domain> Simplify for Polyline<D> {
    fn simplify(&self, tolerance: f64) -> Self {
        if tolerance <= 0.0 {
            return self.clone();
        }
        self.simplify_idx(tolerance)
            .into_iter()
            .map(|index| self[index])
            .collect()
    }

    fn simplify_idx(&self, tolerance: f64) -> Vec<usize> {
        if tolerance <= 0.0 {
            return (0..self.len()).collect();
        }
        rdp_indices(self.points(), tolerance)
    }
}

impl<D: Domain> Simplify for Trajectory<D> {
    /// Keeps the surviving points verbatim (object ids, timestamps, and
    /// per-point properties included) and carries over the trajectory's
    /// property map and UUID. Accumulated lengths are recomputed for the
    /// shortened chain.
    fn simplify(&self, tolerance: f64) -> Self {
        if tolerance <= 0.0 {
            return self.clone();
        }
        let mut out = Trajectory::without_uuid();
        out.set_uuid(self.uuid());
        *out.properties_mut() = self.properties().clone();
        for index in self.simplify_idx(tolerance) {
            out.push(self[index].clone());
        }
        out
    }

    fn simplify_idx(&self, tolerance: f64) -> Vec<usize> {
        if tolerance <= 0.0 {
            return (0..self.len()).collect();
        }
        let positions: Vec<Point<D>> = self.positions().collect();
        rdp_indices(&positions, tolerance)
    }
}

/// Simplifies `geometry` to within `tolerance`.
pub fn simplify<G: Simplify>(geometry: &G, tolerance: f64) -> G {
    geometry.simplify(tolerance)
}
