//! Bare domain points.

use crate::coords;
use crate::domain::{Cartesian2d, Cartesian3d, Domain, Spherical};
use approx::{AbsDiffEq, RelativeEq};
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

/// A single point in a coordinate domain.
///
/// The coordinate layout comes from the domain: `[longitude, latitude]`
/// degrees for [`Spherical`], `[x, y]` / `[x, y, z]` for the flat domains.
///
/// # Examples
///
/// ```
/// use tracktable_types::{Cartesian2d, Point};
///
/// let p: Point<Cartesian2d> = Point::new([3.0, 4.0]);
/// assert_eq!(p[0], 3.0);
/// assert_eq!(p.dimension(), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<D: Domain> {
    coords: D::Coords,
}

impl<D: Domain> Point<D> {
    /// Creates a point from raw coordinates.
    pub fn new(coords: D::Coords) -> Self {
        Point { coords }
    }

    /// The origin of the domain.
    pub fn origin() -> Self {
        Point {
            coords: D::Coords::default(),
        }
    }

    /// Raw coordinate array.
    pub fn coords(&self) -> D::Coords {
        self.coords
    }

    /// Coordinates as a slice.
    pub fn as_slice(&self) -> &[f64] {
        self.coords.as_ref()
    }

    /// Coordinates as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        self.coords.as_mut()
    }

    /// Ordinate `index`, or `None` past the domain dimension.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.as_slice().get(index).copied()
    }

    /// Replaces ordinate `index`. Panics when out of range.
    pub fn set(&mut self, index: usize, value: f64) {
        self.as_mut_slice()[index] = value;
    }

    /// Number of ordinates in this domain.
    pub fn dimension(&self) -> usize {
        D::DIMENSION
    }

    /// Dot product over raw coordinates.
    pub fn dot(&self, other: &Self) -> f64 {
        coords::dot(&self.coords, &other.coords)
    }
}

impl<D: Domain> Default for Point<D> {
    fn default() -> Self {
        Point::origin()
    }
}

impl<D: Domain<Coords = [f64; 2]>> From<[f64; 2]> for Point<D> {
    fn from(coords: [f64; 2]) -> Self {
        Point::new(coords)
    }
}

impl<D: Domain<Coords = [f64; 3]>> From<[f64; 3]> for Point<D> {
    fn from(coords: [f64; 3]) -> Self {
        Point::new(coords)
    }
}

impl Point<Spherical> {
    /// Creates a terrestrial point from longitude and latitude degrees.
    pub fn lon_lat(longitude: f64, latitude: f64) -> Self {
        Point::new([longitude, latitude])
    }

    pub fn longitude(&self) -> f64 {
        self.coords[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coords[1]
    }

    pub fn set_longitude(&mut self, longitude: f64) {
        self.coords[0] = longitude;
    }

    pub fn set_latitude(&mut self, latitude: f64) {
        self.coords[1] = latitude;
    }
}

impl Point<Cartesian2d> {
    /// Creates a flat 2D point.
    pub fn xy(x: f64, y: f64) -> Self {
        Point::new([x, y])
    }

    pub fn x(&self) -> f64 {
        self.coords[0]
    }

    pub fn y(&self) -> f64 {
        self.coords[1]
    }
}

impl Point<Cartesian3d> {
    /// Creates a flat 3D point.
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Point::new([x, y, z])
    }

    pub fn x(&self) -> f64 {
        self.coords[0]
    }

    pub fn y(&self) -> f64 {
        self.coords[1]
    }

    pub fn z(&self) -> f64 {
        self.coords[2]
    }
}

impl<D: Domain> Index<usize> for Point<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.coords.as_ref()[index]
    }
}

impl<D: Domain> IndexMut<usize> for Point<D> {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.coords.as_mut()[index]
    }
}

// Componentwise vector arithmetic over raw coordinates. Always meaningful
// in the flat domains; in the spherical domain it treats (lon, lat) as a
// flat pair, so use it with care there.

impl<D: Domain> Add for Point<D> {
    type Output = Point<D>;

    fn add(self, rhs: Point<D>) -> Point<D> {
        Point::new(coords::zip_with(&self.coords, &rhs.coords, |a, b| a + b))
    }
}

impl<D: Domain> Sub for Point<D> {
    type Output = Point<D>;

    fn sub(self, rhs: Point<D>) -> Point<D> {
        Point::new(coords::zip_with(&self.coords, &rhs.coords, |a, b| a - b))
    }
}

impl<D: Domain> Mul<f64> for Point<D> {
    type Output = Point<D>;

    fn mul(self, rhs: f64) -> Point<D> {
        Point::new(coords::map(&self.coords, |a| a * rhs))
    }
}

impl<D: Domain> Div<f64> for Point<D> {
    type Output = Point<D>;

    fn div(self, rhs: f64) -> Point<D> {
        Point::new(coords::map(&self.coords, |a| a / rhs))
    }
}

impl<D: Domain> Neg for Point<D> {
    type Output = Point<D>;

    fn neg(self) -> Point<D> {
        Point::new(coords::map(&self.coords, |a| -a))
    }
}

impl<D: Domain> AbsDiffEq for Point<D> {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<D: Domain> RelativeEq for Point<D> {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_componentwise() {
        let a = Point::xy(1.0, 2.0);
        let b = Point::xy(3.0, 5.0);
        assert_eq!(a + b, Point::xy(4.0, 7.0));
        assert_eq!(b - a, Point::xy(2.0, 3.0));
        assert_eq!(a * 2.0, Point::xy(2.0, 4.0));
        assert_eq!(b / 2.0, Point::xy(1.5, 2.5));
        assert_eq!(-a, Point::xy(-1.0, -2.0));
    }

    #[test]
    fn accessors() {
        let mut p = Point::lon_lat(-106.6504, 35.0844);
        assert_eq!(p.longitude(), -106.6504);
        p.set_latitude(36.0);
        assert_eq!(p[1], 36.0);
        assert_eq!(p.get(2), None);

        let q = Point::xyz(1.0, 2.0, 3.0);
        assert_eq!(q.z(), 3.0);
        assert_eq!(q.dimension(), 3);
    }

    #[test]
    fn origin_is_all_zero() {
        let p: Point<Cartesian3d> = Point::origin();
        assert_eq!(p.as_slice(), &[0.0, 0.0, 0.0]);
    }
}
