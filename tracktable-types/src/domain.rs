//! Coordinate domains and their primitive numeric operations.
//!
//! A [`Domain`] pairs a coordinate layout with a metric: [`Spherical`] is a
//! longitude/latitude sphere measured in kilometers along great circles,
//! while [`Cartesian2d`] and [`Cartesian3d`] are unitless Euclidean spaces.
//! Algorithms elsewhere in the crates are generic over the domain, so a
//! trajectory in one domain can never be mixed with geometry from another.

use crate::coords::{self, Coords};
use crate::point::Point;
use crate::trajectory_point::TrajectoryPoint;
use hifitime::Unit;

/// Mean earth radius in kilometers, as recommended by the IUGG.
///
/// Moritz, H. (2000). Geodetic Reference System 1980. Journal of Geodesy,
/// 74(1), 128–133. "Derived Geometric Constants: mean radius" (p133).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A coordinate space with an associated metric.
///
/// The three implementors are zero-sized markers; all state lives in the
/// geometry types parameterized by them.
pub trait Domain: Copy + Clone + std::fmt::Debug + PartialEq + 'static {
    /// Coordinate storage for this domain.
    type Coords: Coords;

    /// Number of ordinates per point.
    const DIMENSION: usize;

    /// Short lowercase name, e.g. for diagnostics.
    const NAME: &'static str;

    /// Distance between two points in the domain's length unit
    /// (kilometers for [`Spherical`], native units otherwise).
    fn distance(a: &Point<Self>, b: &Point<Self>) -> f64;

    /// Point at fraction `t` of the way from `a` to `b`, with `t` clamped
    /// to `[0, 1]`. `t = 0` and `t = 1` return the endpoints exactly.
    fn interpolate(a: &Point<Self>, b: &Point<Self>, t: f64) -> Point<Self> {
        if t <= 0.0 {
            *a
        } else if t >= 1.0 {
            *b
        } else {
            Self::extrapolate(a, b, t)
        }
    }

    /// Same construction as [`Domain::interpolate`] without the clamp:
    /// `t < 0` and `t > 1` continue past the endpoints.
    fn extrapolate(a: &Point<Self>, b: &Point<Self>, t: f64) -> Point<Self>;

    /// Interior angle at `b` between the segments `a -> b` and `b -> c`,
    /// in degrees in `[0, 180]`. Zero when any two of the three points
    /// coincide.
    fn unsigned_turn_angle(a: &Point<Self>, b: &Point<Self>, c: &Point<Self>) -> f64;

    /// Shortest distance from `p` to the segment `a -> b`.
    fn point_segment_distance(p: &Point<Self>, a: &Point<Self>, b: &Point<Self>) -> f64;

    /// Shortest distance between the segments `a1 -> a2` and `b1 -> b2`;
    /// zero when they cross.
    fn segment_distance(
        a1: &Point<Self>,
        a2: &Point<Self>,
        b1: &Point<Self>,
        b2: &Point<Self>,
    ) -> f64;
}

/// Domains that support compass navigation: a bearing between points and
/// dead reckoning along that bearing.
///
/// Implemented for [`Spherical`] (great-circle geodesy) and
/// [`Cartesian2d`] (planar offsets). There is no meaningful compass in
/// three dimensions.
pub trait CourseDomain: Domain {
    /// Azimuth from `origin` to `destination` in degrees clockwise from
    /// north, in `[0, 360)`. Undefined for coincident points.
    fn bearing(origin: &Point<Self>, destination: &Point<Self>) -> f64;

    /// Destination reached by travelling `distance` (domain length units)
    /// from `origin` along `bearing` degrees.
    fn destination(origin: &Point<Self>, bearing: f64, distance: f64) -> Point<Self>;

    /// Turn angle at `b` in degrees in `(-180, 180]`, positive clockwise
    /// (toward increasing bearing). Zero when any two of the three points
    /// coincide.
    fn signed_turn_angle(a: &Point<Self>, b: &Point<Self>, c: &Point<Self>) -> f64;
}

/// Longitude/latitude degrees on a sphere of radius [`EARTH_RADIUS_KM`];
/// distances are great-circle kilometers.
///
/// Longitude is expected in `[-180, 180]` and latitude in `[-90, 90]`.
/// Out-of-range ordinates are accepted but the spherical formulas make no
/// promises about the results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Spherical;

/// Flat two-dimensional Euclidean space, unitless.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Cartesian2d;

/// Flat three-dimensional Euclidean space, unitless.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Cartesian3d;

/// Wrap a longitude in degrees into `[-180, 180]`.
pub fn normalize_longitude(degrees: f64) -> f64 {
    if (-180.0..=180.0).contains(&degrees) {
        degrees
    } else {
        (degrees % 360.0 + 540.0) % 360.0 - 180.0
    }
}

/// Wrap an angle in degrees into `(-180, 180]`.
fn normalize_signed_degrees(degrees: f64) -> f64 {
    let wrapped = (degrees % 360.0 + 540.0) % 360.0 - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

impl Domain for Spherical {
    type Coords = [f64; 2];
    const DIMENSION: usize = 2;
    const NAME: &'static str = "terrestrial";

    /// Haversine great-circle distance in kilometers.
    fn distance(a: &Point<Self>, b: &Point<Self>) -> f64 {
        let theta1 = a.latitude().to_radians();
        let theta2 = b.latitude().to_radians();
        let delta_theta = (b.latitude() - a.latitude()).to_radians();
        let delta_lambda = (b.longitude() - a.longitude()).to_radians();
        let h = (delta_theta / 2.0).sin().powi(2)
            + theta1.cos() * theta2.cos() * (delta_lambda / 2.0).sin().powi(2);
        EARTH_RADIUS_KM * 2.0 * h.sqrt().asin()
    }

    /// Great-circle slerp. A degenerate pair collapses to `a`.
    fn extrapolate(a: &Point<Self>, b: &Point<Self>, t: f64) -> Point<Self> {
        let (ax, ay, az) = unit_vector(a);
        let (bx, by, bz) = unit_vector(b);
        let d = Self::distance(a, b) / EARTH_RADIUS_KM;
        if d == 0.0 || d.sin() == 0.0 {
            return *a;
        }
        let wa = ((1.0 - t) * d).sin() / d.sin();
        let wb = (t * d).sin() / d.sin();
        let x = wa * ax + bx * wb;
        let y = wa * ay + by * wb;
        let z = wa * az + bz * wb;
        let lat = z.atan2(x.hypot(y));
        let lon = y.atan2(x);
        Point::lon_lat(normalize_longitude(lon.to_degrees()), lat.to_degrees())
    }

    fn unsigned_turn_angle(a: &Point<Self>, b: &Point<Self>, c: &Point<Self>) -> f64 {
        if a == b || b == c || a == c {
            0.0
        } else {
            Self::signed_turn_angle(a, b, c).abs()
        }
    }

    /// Cross-track/along-track construction after Ed Williams' aviation
    /// formulary. Falls back to the nearer endpoint when the projection of
    /// `p` lies outside the arc.
    fn point_segment_distance(p: &Point<Self>, a: &Point<Self>, b: &Point<Self>) -> f64 {
        if a == b {
            return Self::distance(p, a);
        }
        let crs_ab = Self::bearing(a, b).to_radians();
        let crs_ba = if crs_ab > 0.0 {
            crs_ab - std::f64::consts::PI
        } else {
            crs_ab + std::f64::consts::PI
        };
        let crs_ad = Self::bearing(a, p).to_radians();
        let crs_bd = Self::bearing(b, p).to_radians();
        let d_crs1 = crs_ad - crs_ab;
        let d_crs2 = crs_bd - crs_ba;
        if d_crs1.cos() >= 0.0 && d_crs2.cos() >= 0.0 {
            let d1 = Self::distance(a, p);
            let xtd = ((d1 / EARTH_RADIUS_KM).sin() * d_crs1.sin()).asin().abs();
            xtd * EARTH_RADIUS_KM
        } else {
            Self::distance(p, a).min(Self::distance(p, b))
        }
    }

    /// Zero when the segments cross; otherwise the minimum of the four
    /// endpoint-to-segment distances. The crossing test runs on the raw
    /// lon/lat plane, which is adequate for the short arcs trajectories
    /// are made of.
    fn segment_distance(
        a1: &Point<Self>,
        a2: &Point<Self>,
        b1: &Point<Self>,
        b2: &Point<Self>,
    ) -> f64 {
        if crate::private_utils::segments_intersect(
            a1.coords(),
            a2.coords(),
            b1.coords(),
            b2.coords(),
        ) {
            return 0.0;
        }
        Self::point_segment_distance(a1, b1, b2)
            .min(Self::point_segment_distance(a2, b1, b2))
            .min(Self::point_segment_distance(b1, a1, a2))
            .min(Self::point_segment_distance(b2, a1, a2))
    }
}

impl CourseDomain for Spherical {
    fn bearing(origin: &Point<Self>, destination: &Point<Self>) -> f64 {
        let (lng_a, lat_a) = (origin.longitude().to_radians(), origin.latitude().to_radians());
        let (lng_b, lat_b) = (
            destination.longitude().to_radians(),
            destination.latitude().to_radians(),
        );
        let delta_lng = lng_b - lng_a;
        let s = lat_b.cos() * delta_lng.sin();
        let c = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * delta_lng.cos();
        (s.atan2(c).to_degrees() + 360.0) % 360.0
    }

    fn destination(origin: &Point<Self>, bearing: f64, distance: f64) -> Point<Self> {
        let center_lng = origin.longitude().to_radians();
        let center_lat = origin.latitude().to_radians();
        let bearing_rad = bearing.to_radians();
        let rad = distance / EARTH_RADIUS_KM;

        let lat = (center_lat.sin() * rad.cos() + center_lat.cos() * rad.sin() * bearing_rad.cos())
            .asin();
        let lng = (bearing_rad.sin() * rad.sin() * center_lat.cos())
            .atan2(rad.cos() - center_lat.sin() * lat.sin())
            + center_lng;

        Point::lon_lat(normalize_longitude(lng.to_degrees()), lat.to_degrees())
    }

    fn signed_turn_angle(a: &Point<Self>, b: &Point<Self>, c: &Point<Self>) -> f64 {
        if a == b || b == c || a == c {
            0.0
        } else {
            normalize_signed_degrees(Self::bearing(b, c) - Self::bearing(a, b))
        }
    }
}

impl Domain for Cartesian2d {
    type Coords = [f64; 2];
    const DIMENSION: usize = 2;
    const NAME: &'static str = "cartesian2d";

    fn distance(a: &Point<Self>, b: &Point<Self>) -> f64 {
        euclidean_distance(&a.coords(), &b.coords())
    }

    fn extrapolate(a: &Point<Self>, b: &Point<Self>, t: f64) -> Point<Self> {
        Point::new(euclidean_mix(&a.coords(), &b.coords(), t))
    }

    fn unsigned_turn_angle(a: &Point<Self>, b: &Point<Self>, c: &Point<Self>) -> f64 {
        euclidean_turn_angle(a, b, c)
    }

    fn point_segment_distance(p: &Point<Self>, a: &Point<Self>, b: &Point<Self>) -> f64 {
        euclidean_point_segment_distance(&p.coords(), &a.coords(), &b.coords())
    }

    fn segment_distance(
        a1: &Point<Self>,
        a2: &Point<Self>,
        b1: &Point<Self>,
        b2: &Point<Self>,
    ) -> f64 {
        euclidean_segment_distance(&a1.coords(), &a2.coords(), &b1.coords(), &b2.coords())
    }
}

impl CourseDomain for Cartesian2d {
    /// Planar compass: north is `+y`, east is `+x`.
    fn bearing(origin: &Point<Self>, destination: &Point<Self>) -> f64 {
        let dx = destination.x() - origin.x();
        let dy = destination.y() - origin.y();
        (dx.atan2(dy).to_degrees() + 360.0) % 360.0
    }

    fn destination(origin: &Point<Self>, bearing: f64, distance: f64) -> Point<Self> {
        let theta = bearing.to_radians();
        Point::xy(
            origin.x() + distance * theta.sin(),
            origin.y() + distance * theta.cos(),
        )
    }

    fn signed_turn_angle(a: &Point<Self>, b: &Point<Self>, c: &Point<Self>) -> f64 {
        if a == b || b == c || a == c {
            return 0.0;
        }
        let u = coords::zip_with(&b.coords(), &a.coords(), |x, y| x - y);
        let v = coords::zip_with(&c.coords(), &b.coords(), |x, y| x - y);
        let cross = u[0] * v[1] - u[1] * v[0];
        let dot = coords::dot(&u, &v);
        normalize_signed_degrees((-cross).atan2(dot).to_degrees())
    }
}

impl Domain for Cartesian3d {
    type Coords = [f64; 3];
    const DIMENSION: usize = 3;
    const NAME: &'static str = "cartesian3d";

    fn distance(a: &Point<Self>, b: &Point<Self>) -> f64 {
        euclidean_distance(&a.coords(), &b.coords())
    }

    fn extrapolate(a: &Point<Self>, b: &Point<Self>, t: f64) -> Point<Self> {
        Point::new(euclidean_mix(&a.coords(), &b.coords(), t))
    }

    fn unsigned_turn_angle(a: &Point<Self>, b: &Point<Self>, c: &Point<Self>) -> f64 {
        euclidean_turn_angle(a, b, c)
    }

    fn point_segment_distance(p: &Point<Self>, a: &Point<Self>, b: &Point<Self>) -> f64 {
        euclidean_point_segment_distance(&p.coords(), &a.coords(), &b.coords())
    }

    fn segment_distance(
        a1: &Point<Self>,
        a2: &Point<Self>,
        b1: &Point<Self>,
        b2: &Point<Self>,
    ) -> f64 {
        euclidean_segment_distance(&a1.coords(), &a2.coords(), &b1.coords(), &b2.coords())
    }
}

/// Point at unclamped fraction `t` from `a` to `b`.
pub fn extrapolate<D: Domain>(a: &Point<D>, b: &Point<D>, t: f64) -> Point<D> {
    D::extrapolate(a, b, t)
}

/// Point at fraction `t` from `a` to `b`, clamped to the endpoints.
pub fn interpolate<D: Domain>(a: &Point<D>, b: &Point<D>, t: f64) -> Point<D> {
    D::interpolate(a, b, t)
}

/// Azimuth from `origin` to `destination`, degrees clockwise from north.
pub fn bearing<D: CourseDomain>(origin: &Point<D>, destination: &Point<D>) -> f64 {
    D::bearing(origin, destination)
}

/// Dead-reckon a destination from `origin` along `bearing` for `distance`.
pub fn destination<D: CourseDomain>(origin: &Point<D>, bearing: f64, distance: f64) -> Point<D> {
    D::destination(origin, bearing, distance)
}

/// Signed turn angle at `b`, degrees in `(-180, 180]`, positive clockwise.
pub fn signed_turn_angle<D: CourseDomain>(a: &Point<D>, b: &Point<D>, c: &Point<D>) -> f64 {
    D::signed_turn_angle(a, b, c)
}

/// Unsigned turn angle at `b`, degrees in `[0, 180]`.
pub fn unsigned_turn_angle<D: Domain>(a: &Point<D>, b: &Point<D>, c: &Point<D>) -> f64 {
    D::unsigned_turn_angle(a, b, c)
}

/// Average speed between two trajectory points in domain length units per
/// hour. NaN when the timestamps coincide.
pub fn speed_between<D: Domain>(p: &TrajectoryPoint<D>, q: &TrajectoryPoint<D>) -> f64 {
    let hours = (q.timestamp() - p.timestamp()).to_unit(Unit::Hour);
    if hours == 0.0 {
        return f64::NAN;
    }
    D::distance(p.position(), q.position()) / hours
}

fn unit_vector(p: &Point<Spherical>) -> (f64, f64, f64) {
    let lat = p.latitude().to_radians();
    let lon = p.longitude().to_radians();
    (lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

fn euclidean_distance<C: Coords>(a: &C, b: &C) -> f64 {
    coords::squared_norm(&coords::zip_with(a, b, |x, y| x - y)).sqrt()
}

fn euclidean_mix<C: Coords>(a: &C, b: &C, t: f64) -> C {
    coords::zip_with(a, b, |x, y| x + (y - x) * t)
}

fn euclidean_turn_angle<D: Domain>(a: &Point<D>, b: &Point<D>, c: &Point<D>) -> f64 {
    if a == b || b == c || a == c {
        return 0.0;
    }
    let u = coords::zip_with(&b.coords(), &a.coords(), |x, y| x - y);
    let v = coords::zip_with(&c.coords(), &b.coords(), |x, y| x - y);
    let nu = coords::squared_norm(&u).sqrt();
    let nv = coords::squared_norm(&v).sqrt();
    if nu == 0.0 || nv == 0.0 {
        return 0.0;
    }
    let cos = (coords::dot(&u, &v) / (nu * nv)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

fn euclidean_point_segment_distance<C: Coords>(p: &C, a: &C, b: &C) -> f64 {
    let ab = coords::zip_with(b, a, |x, y| x - y);
    let len2 = coords::squared_norm(&ab);
    // Degenerate segment, treat as a point.
    if len2 == 0.0 {
        return euclidean_distance(p, a);
    }
    let ap = coords::zip_with(p, a, |x, y| x - y);
    let r = (coords::dot(&ap, &ab) / len2).clamp(0.0, 1.0);
    let closest = coords::zip_with(a, &ab, |base, delta| base + r * delta);
    euclidean_distance(p, &closest)
}

/// Closest distance between two segments via constrained quadratic
/// minimisation, valid in any dimension.
fn euclidean_segment_distance<C: Coords>(a1: &C, a2: &C, b1: &C, b2: &C) -> f64 {
    if a1 == a2 {
        return euclidean_point_segment_distance(a1, b1, b2);
    }
    if b1 == b2 {
        return euclidean_point_segment_distance(b1, a1, a2);
    }
    let u = coords::zip_with(a2, a1, |x, y| x - y);
    let v = coords::zip_with(b2, b1, |x, y| x - y);
    let w = coords::zip_with(a1, b1, |x, y| x - y);
    let a = coords::dot(&u, &u);
    let b = coords::dot(&u, &v);
    let c = coords::dot(&v, &v);
    let d = coords::dot(&u, &w);
    let e = coords::dot(&v, &w);
    let den = a * c - b * b;

    let mut sn;
    let mut sd = den;
    let mut tn;
    let mut td = den;
    if den <= f64::EPSILON {
        // Parallel segments: pin s to the start of the first segment.
        sn = 0.0;
        sd = 1.0;
        tn = e;
        td = c;
    } else {
        sn = b * e - c * d;
        tn = a * e - b * d;
        if sn < 0.0 {
            sn = 0.0;
            tn = e;
            td = c;
        } else if sn > sd {
            sn = sd;
            tn = e + b;
            td = c;
        }
    }
    if tn < 0.0 {
        tn = 0.0;
        if -d < 0.0 {
            sn = 0.0;
        } else if -d > a {
            sn = sd;
        } else {
            sn = -d;
            sd = a;
        }
    } else if tn > td {
        tn = td;
        if (-d + b) < 0.0 {
            sn = 0.0;
        } else if (-d + b) > a {
            sn = sd;
        } else {
            sn = -d + b;
            sd = a;
        }
    }
    let sc = if sn.abs() <= f64::EPSILON { 0.0 } else { sn / sd };
    let tc = if tn.abs() <= f64::EPSILON { 0.0 } else { tn / td };

    let mut gap2 = 0.0;
    for i in 0..C::DIMENSION {
        let delta = w.as_ref()[i] + sc * u.as_ref()[i] - tc * v.as_ref()[i];
        gap2 += delta * delta;
    }
    gap2.sqrt()
}
