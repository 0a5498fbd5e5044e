//! Geometry algorithms over points, polylines, and trajectories.

pub mod convex_hull;
pub mod descriptors;
pub mod distance;
pub mod interpolation;
pub mod intersects;
pub mod length;
pub mod simplify;

pub use convex_hull::{
    convex_hull_area, convex_hull_aspect_ratio, convex_hull_centroid, convex_hull_perimeter,
    ConvexHull, RingArea,
};
pub use descriptors::{geometric_mean, geometric_median, radius_of_gyration};
pub use distance::{distance, Distance};
pub use interpolation::{
    interpolate_trajectory_points, point_at_length_fraction, point_at_time,
    point_at_time_fraction, subset_during_interval, time_at_fraction,
};
pub use intersects::{intersects, Intersects};
pub use length::{end_to_end_distance, length, EndToEndDistance, Length};
pub use simplify::{simplify, Simplify};
