//! Arc length and end-to-end displacement.

use tracktable_types::{Domain, Polyline, Trajectory};

/// Total arc length in the domain's length unit.
pub trait Length {
    /// Sum of the distances between consecutive points; zero for empty
    /// and single-point geometries.
    fn length(&self) -> f64;
}

/// Straight-line displacement from the first point to the last.
pub trait EndToEndDistance {
    /// Distance between the first and last points; zero for empty and
    /// single-point geometries.
    fn end_to_end_distance(&self) -> f64;
}

impl<D: Domain> Length for Polyline<D> {
    fn length(&self) -> f64 {
        self.segments().map(|(a, b)| D::distance(&a, &b)).sum()
    }
}

impl<D: Domain> Length for Trajectory<D> {
    // The container maintains the cumulative length on every point, so
    // the total is already sitting on the last one.
    fn length(&self) -> f64 {
        self.last().map_or(0.0, |p| p.current_length())
    }
}

impl<D: Domain> EndToEndDistance for Polyline<D> {
    fn end_to_end_distance(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => D::distance(first, last),
            _ => 0.0,
        }
    }
}

impl<D: Domain> EndToEndDistance for Trajectory<D> {
    fn end_to_end_distance(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => D::distance(first.position(), last.position()),
            _ => 0.0,
        }
    }
}

/// Total arc length of `geometry`.
pub fn length<G: Length>(geometry: &G) -> f64 {
    geometry.length()
}

/// Displacement between the endpoints of `geometry`.
pub fn end_to_end_distance<G: EndToEndDistance>(geometry: &G) -> f64 {
    geometry.end_to_end_distance()
}
