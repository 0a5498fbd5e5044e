#![warn(missing_debug_implementations)]
//! The `tracktable-types` library defines the geometric and metadata
//! primitives shared by the tracktable crates.
//!
//! In most cases you will only need this crate directly if you are a crate
//! author building on the same primitives; the
//! [`tracktable`](https://crates.io/crates/tracktable) crate re-exports
//! these types and adds the trajectory analytics on top.
//!
//! ## Domains
//!
//! Every geometry lives in exactly one coordinate [`Domain`]:
//!
//! - **[`Spherical`]** — longitude/latitude degrees on an earth-radius
//!   sphere; distances are great-circle kilometers.
//! - **[`Cartesian2d`]** / **[`Cartesian3d`]** — flat Euclidean spaces in
//!   native units.
//!
//! Geometry types are generic over the domain, so mixing domains in one
//! operation is a type error rather than a runtime surprise.
//!
//! ## Types
//!
//! - **[`Point`]**: a bare coordinate tuple
//! - **[`TrajectoryPoint`]**: a point plus object id, timestamp,
//!   accumulated arc length, and a [`PropertyMap`]
//! - **[`Polyline`]**: an open chain of points
//! - **[`Trajectory`]**: a time-ordered sequence of trajectory points with
//!   its own properties and UUID
//! - **[`BoundingBox`]**: a validated min/max corner pair
//! - **[`PropertyValue`]** / **[`PropertyMap`]**: tagged values in an
//!   insertion-ordered name/value dictionary
//!
//! Timestamps are [`hifitime::Epoch`] instants with microsecond
//! resolution; helpers live in [`timestamp`].

pub mod coords;
pub mod domain;
mod error;
pub mod point;
pub mod polyline;
pub mod property;
pub mod timestamp;
pub mod trajectory;
pub mod trajectory_point;
pub mod uuid_factory;

mod bounding_box;

#[doc(hidden)]
pub mod private_utils;

pub use bounding_box::BoundingBox;
pub use coords::Coords;
pub use domain::{
    bearing, destination, extrapolate, interpolate, signed_turn_angle, speed_between,
    unsigned_turn_angle, Cartesian2d, Cartesian3d, CourseDomain, Domain, Spherical,
    EARTH_RADIUS_KM,
};
pub use error::Error;
pub use point::Point;
pub use polyline::Polyline;
pub use property::{PropertyKind, PropertyMap, PropertyValue};
pub use trajectory::Trajectory;
pub use trajectory_point::TrajectoryPoint;
pub use uuid_factory::{new_uuid, set_uuid_generator, uuid_generator, UuidGenerator};

// Re-export the externally visible identity and time types so downstream
// crates do not need to depend on them directly.
pub use hifitime::{Duration, Epoch, Unit};
pub use uuid::Uuid;

/// Concrete aliases for the longitude/latitude domain.
pub mod terrestrial {
    use crate::domain::Spherical;

    pub type Point = crate::Point<Spherical>;
    pub type TrajectoryPoint = crate::TrajectoryPoint<Spherical>;
    pub type Polyline = crate::Polyline<Spherical>;
    pub type Trajectory = crate::Trajectory<Spherical>;
    pub type BoundingBox = crate::BoundingBox<Spherical>;
}

/// Concrete aliases for the flat 2D domain.
pub mod cartesian2d {
    use crate::domain::Cartesian2d;

    pub type Point = crate::Point<Cartesian2d>;
    pub type TrajectoryPoint = crate::TrajectoryPoint<Cartesian2d>;
    pub type Polyline = crate::Polyline<Cartesian2d>;
    pub type Trajectory = crate::Trajectory<Cartesian2d>;
    pub type BoundingBox = crate::BoundingBox<Cartesian2d>;
}

/// Concrete aliases for the flat 3D domain.
pub mod cartesian3d {
    use crate::domain::Cartesian3d;

    pub type Point = crate::Point<Cartesian3d>;
    pub type TrajectoryPoint = crate::TrajectoryPoint<Cartesian3d>;
    pub type Polyline = crate::Polyline<Cartesian3d>;
    pub type Trajectory = crate::Trajectory<Cartesian3d>;
    pub type BoundingBox = crate::BoundingBox<Cartesian3d>;
}
