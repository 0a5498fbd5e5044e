//! Scalar and point descriptors of point sets: geometric mean and
//! median, radius of gyration.
//!
//! All of these accept any iterator of bare points; trajectory callers
//! pass `trajectory.positions()`.

use tracktable_types::{Domain, Point};

const MEDIAN_TOLERANCE: f64 = 1e-9;
const MEDIAN_MAX_ITERATIONS: usize = 100;

/// Componentwise arithmetic mean of the points, on raw coordinates (even
/// in the spherical domain). `None` on empty input.
pub fn geometric_mean<D, I>(points: I) -> Option<Point<D>>
where
    D: Domain,
    I: IntoIterator<Item = Point<D>>,
{
    let mut sum = Point::origin();
    let mut count = 0usize;
    for point in points {
        sum = sum + point;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Geometric median by Weiszfeld iteration under the domain metric.
///
/// Runs to a fixed tolerance with a bounded iteration count and returns
/// the last iterate if it has not converged by then. `None` on empty
/// input.
pub fn geometric_median<D, I>(points: I) -> Option<Point<D>>
where
    D: Domain,
    I: IntoIterator<Item = Point<D>>,
{
    let points: Vec<Point<D>> = points.into_iter().collect();
    let mut current = geometric_mean(points.iter().copied())?;
    for _ in 0..MEDIAN_MAX_ITERATIONS {
        let mut weight_sum = 0.0;
        let mut weighted = Point::origin();
        for point in &points {
            // Keep the weight finite when the iterate lands on a sample.
            let distance = D::distance(&current, point).max(1e-12);
            let weight = 1.0 / distance;
            weighted = weighted + *point * weight;
            weight_sum += weight;
        }
        let next = weighted / weight_sum;
        let step = D::distance(&next, &current);
        current = next;
        if step <= MEDIAN_TOLERANCE {
            break;
        }
    }
    Some(current)
}

/// Root-mean-square domain distance of the points from their geometric
/// mean. Zero on empty input.
pub fn radius_of_gyration<D, I>(points: I) -> f64
where
    D: Domain,
    I: IntoIterator<Item = Point<D>>,
{
    let points: Vec<Point<D>> = points.into_iter().collect();
    let Some(center) = geometric_mean(points.iter().copied()) else {
        return 0.0;
    };
    let sum_squared: f64 = points
        .iter()
        .map(|point| D::distance(&center, point).powi(2))
        .sum();
    (sum_squared / points.len() as f64).sqrt()
}
