//! Axis-aligned bounding boxes.

use crate::domain::Domain;
use crate::error::Error;
use crate::point::Point;

/// An axis-aligned box described by its minimum and maximum corners.
///
/// Every dimension must satisfy `min <= max`; empty boxes cannot be
/// constructed.
///
/// ```
/// use tracktable_types::{BoundingBox, Cartesian2d, Point};
///
/// let by_corner = BoundingBox::new(Point::xy(0.0, 0.0), Point::xy(2.0, 1.0)).unwrap();
/// assert!(by_corner.contains(&Point::xy(2.0, 1.0)));
/// assert!(!by_corner.strictly_contains(&Point::xy(2.0, 1.0)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox<D: Domain> {
    min: Point<D>,
    max: Point<D>,
}

impl<D: Domain> BoundingBox<D> {
    /// Creates a box from its corners, failing when any `min` ordinate
    /// exceeds the matching `max` ordinate.
    pub fn new(min: Point<D>, max: Point<D>) -> Result<Self, Error> {
        for dimension in 0..D::DIMENSION {
            if min[dimension] > max[dimension] {
                return Err(Error::MalformedBox { dimension });
            }
        }
        Ok(BoundingBox { min, max })
    }

    /// The smallest box covering every point of the iterator, or `None`
    /// on empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point<D>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for point in iter {
            for i in 0..D::DIMENSION {
                if point[i] < min[i] {
                    min[i] = point[i];
                }
                if point[i] > max[i] {
                    max[i] = point[i];
                }
            }
        }
        Some(BoundingBox { min, max })
    }

    pub fn min_corner(&self) -> &Point<D> {
        &self.min
    }

    pub fn max_corner(&self) -> &Point<D> {
        &self.max
    }

    /// Is `point` covered by the box, border included?
    pub fn contains(&self, point: &Point<D>) -> bool {
        (0..D::DIMENSION).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    /// Is `point` in the open interior?
    pub fn strictly_contains(&self, point: &Point<D>) -> bool {
        (0..D::DIMENSION).all(|i| self.min[i] < point[i] && point[i] < self.max[i])
    }

    /// Do the two boxes share any point (touching borders included)?
    pub fn intersects(&self, other: &BoundingBox<D>) -> bool {
        (0..D::DIMENSION).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cartesian2d, Cartesian3d};

    #[test]
    fn rejects_inverted_corners() {
        let err = BoundingBox::<Cartesian2d>::new(Point::xy(0.0, 5.0), Point::xy(1.0, 4.0));
        assert_eq!(err.unwrap_err(), Error::MalformedBox { dimension: 1 });
    }

    #[test]
    fn degenerate_box_is_allowed() {
        let b = BoundingBox::new(Point::xy(1.0, 1.0), Point::xy(1.0, 1.0)).unwrap();
        assert!(b.contains(&Point::xy(1.0, 1.0)));
        assert!(!b.strictly_contains(&Point::xy(1.0, 1.0)));
    }

    #[test]
    fn containment_includes_the_border() {
        let b = BoundingBox::new(Point::xy(0.0, 0.0), Point::xy(2.0, 2.0)).unwrap();
        assert!(b.contains(&Point::xy(0.0, 2.0)));
        assert!(b.strictly_contains(&Point::xy(1.0, 1.0)));
        assert!(!b.contains(&Point::xy(2.1, 1.0)));
    }

    #[test]
    fn box_overlap() {
        let a = BoundingBox::new(Point::xy(0.0, 0.0), Point::xy(2.0, 2.0)).unwrap();
        let touching = BoundingBox::new(Point::xy(2.0, 0.0), Point::xy(3.0, 2.0)).unwrap();
        let apart = BoundingBox::new(Point::xy(5.0, 5.0), Point::xy(6.0, 6.0)).unwrap();
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn from_points_covers_all_input() {
        let b = BoundingBox::<Cartesian3d>::from_points(vec![
            Point::xyz(1.0, 5.0, -1.0),
            Point::xyz(-2.0, 3.0, 4.0),
        ])
        .unwrap();
        assert_eq!(b.min_corner(), &Point::xyz(-2.0, 3.0, -1.0));
        assert_eq!(b.max_corner(), &Point::xyz(1.0, 5.0, 4.0));
        assert!(BoundingBox::<Cartesian2d>::from_points(vec![]).is_none());
    }
}
