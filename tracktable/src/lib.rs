#![warn(missing_debug_implementations)]
//! Trajectory representation and analytics across coordinate domains.
//!
//! `tracktable` re-exports the primitives of
//! [`tracktable-types`](tracktable_types) — domains, points,
//! trajectories, property maps — and layers the analytics on top:
//!
//! - [`algorithm`]: distance, intersection, length, interpolation and
//!   time lookup, Douglas–Peucker simplification, convex hulls with
//!   shape descriptors, geometric mean/median, radius of gyration
//! - [`index`]: a bulk-loadable R-tree over payload-carrying points
//! - [`cluster`]: DBSCAN over box-shaped neighborhoods
//! - [`codec`]: the versioned little-endian binary form of every entity
//! - [`generator`]: synthetic point sources and a time-ordered collator
//!
//! Everything is single-threaded and synchronous; geometries from
//! different domains never meet in one call.
//!
//! ```
//! use tracktable::algorithm::{distance, length, point_at_time_fraction};
//! use tracktable::terrestrial;
//! use tracktable::{Epoch, Point, TrajectoryPoint};
//!
//! let start = Epoch::from_gregorian_utc(2014, 3, 5, 13, 0, 0, 0);
//! let flight: terrestrial::Trajectory = [
//!     (-106.6504, 35.0844, 0.0),
//!     (-106.4850, 31.7619, 2.0),
//! ]
//! .iter()
//! .map(|&(lon, lat, hours)| {
//!     TrajectoryPoint::with_id_and_time(
//!         Point::lon_lat(lon, lat),
//!         "N601",
//!         start + tracktable::Duration::from_hours(hours),
//!     )
//! })
//! .collect();
//!
//! assert!((length(&flight) - 369.764).abs() < 0.01);
//! let midpoint = point_at_time_fraction(&flight, 0.5).unwrap();
//! assert_eq!(midpoint.object_id(), "N601");
//! # let _ = distance(flight.first().unwrap(), flight.last().unwrap());
//! ```

pub mod algorithm;
pub mod cluster;
pub mod codec;
pub mod generator;
pub mod index;

// The geometry and metadata primitives live in `tracktable-types`;
// re-export them wholesale so one dependency is enough.
pub use tracktable_types::*;

/// The most commonly used names in one import.
pub mod prelude {
    pub use crate::algorithm::{
        convex_hull_area, convex_hull_aspect_ratio, convex_hull_centroid, convex_hull_perimeter,
        distance, end_to_end_distance, geometric_mean, geometric_median, intersects, length,
        point_at_length_fraction, point_at_time, point_at_time_fraction, radius_of_gyration,
        simplify, subset_during_interval, time_at_fraction, ConvexHull, Distance,
        EndToEndDistance, Intersects, Length, Simplify,
    };
    pub use crate::cluster::{cluster_members, dbscan, dbscan_with_index};
    pub use crate::generator::{
        CircularGenerator, Collator, ConstantSpeedGenerator, GeneratorError, GridGenerator,
    };
    pub use crate::index::{Entry, MetricBall, RTree};
    pub use tracktable_types::{
        bearing, destination, interpolate, signed_turn_angle, speed_between, unsigned_turn_angle,
        BoundingBox, Cartesian2d, Cartesian3d, CourseDomain, Domain, Duration, Epoch, Point,
        Polyline, PropertyMap, PropertyValue, Spherical, Trajectory, TrajectoryPoint, Uuid,
    };
}
