//! The trajectory container.

use crate::domain::Domain;
use crate::point::Point;
use crate::property::PropertyMap;
use crate::timestamp;
use crate::trajectory_point::TrajectoryPoint;
use crate::uuid_factory;
use hifitime::{Duration, Epoch};
use std::ops::Range;
use uuid::Uuid;

/// A time-ordered sequence of [`TrajectoryPoint`]s for one moving object,
/// with its own property map and a 128-bit identity.
///
/// The container owns the per-point `current_length` accumulator: point 0
/// carries length zero and every later point carries its predecessor's
/// length plus the domain distance between the pair. Points are expected to
/// arrive in non-decreasing timestamp order; out-of-order insertions are
/// accepted as given and the accumulator simply follows insertion order.
///
/// A fresh trajectory draws a random UUID from the installed
/// [generator](crate::uuid_factory); the UUID survives clones but plays no
/// part in equality.
#[derive(Clone, Debug)]
pub struct Trajectory<D: Domain> {
    points: Vec<TrajectoryPoint<D>>,
    properties: PropertyMap,
    uuid: Uuid,
}

impl<D: Domain> Trajectory<D> {
    /// Creates an empty trajectory with a freshly generated UUID.
    pub fn new() -> Self {
        Trajectory {
            points: Vec::new(),
            properties: PropertyMap::new(),
            uuid: uuid_factory::new_uuid(),
        }
    }

    /// Creates an empty trajectory with the nil UUID; `uuid()` stays nil
    /// until one is assigned explicitly.
    pub fn without_uuid() -> Self {
        Trajectory {
            points: Vec::new(),
            properties: PropertyMap::new(),
            uuid: Uuid::nil(),
        }
    }

    /// Builds a trajectory by appending every point in order.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = TrajectoryPoint<D>>,
    {
        let mut trajectory = Trajectory::new();
        for point in points {
            trajectory.push(point);
        }
        trajectory
    }

    /// Appends a point, assigning its accumulated arc length.
    pub fn push(&mut self, point: TrajectoryPoint<D>) {
        self.points.push(point);
        self.refresh_lengths_from(self.points.len() - 1);
    }

    /// Inserts a point at `index`, shifting later points and recomputing
    /// their accumulated lengths. Panics when `index > len`.
    pub fn insert(&mut self, index: usize, point: TrajectoryPoint<D>) {
        self.points.insert(index, point);
        self.refresh_lengths_from(index);
    }

    fn refresh_lengths_from(&mut self, start: usize) {
        for k in start..self.points.len() {
            let length = if k == 0 {
                0.0
            } else {
                self.points[k - 1].current_length()
                    + D::distance(self.points[k - 1].position(), self.points[k].position())
            };
            self.points[k].set_current_length(length);
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrajectoryPoint<D>> {
        self.points.get(index)
    }

    pub fn first(&self) -> Option<&TrajectoryPoint<D>> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TrajectoryPoint<D>> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryPoint<D>> {
        self.points.iter()
    }

    pub fn points(&self) -> &[TrajectoryPoint<D>] {
        &self.points
    }

    /// Bare positions, in order.
    pub fn positions(&self) -> impl Iterator<Item = Point<D>> + '_ {
        self.points.iter().map(|p| *p.position())
    }

    /// The points in `[range.start, range.end)` as a new trajectory.
    ///
    /// The slice inherits this trajectory's property map; arc lengths are
    /// recomputed from the slice's own start and the slice draws a fresh
    /// UUID. Panics when the range is out of bounds.
    pub fn subset(&self, range: Range<usize>) -> Trajectory<D> {
        let mut out = Trajectory::new();
        out.properties = self.properties.clone();
        for point in &self.points[range] {
            out.push(point.clone());
        }
        out
    }

    pub fn start_time(&self) -> Option<Epoch> {
        self.points.first().map(|p| p.timestamp())
    }

    pub fn end_time(&self) -> Option<Epoch> {
        self.points.last().map(|p| p.timestamp())
    }

    /// Elapsed time from the first to the last point; zero when the
    /// trajectory holds fewer than two points.
    pub fn duration(&self) -> Duration {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => end - start,
            _ => Duration::from_seconds(0.0),
        }
    }

    /// The object identifier of the first point, or an empty string.
    pub fn object_id(&self) -> &str {
        self.points.first().map(|p| p.object_id()).unwrap_or("")
    }

    /// Derived identifier `<object_id>_<start>_<end>` with both instants
    /// rendered as `YYYYMMDDHHMMSS`. Recomputed on every call; an empty
    /// trajectory renders the zero instant twice.
    pub fn trajectory_id(&self) -> String {
        let start = self.start_time().unwrap_or_else(timestamp::unix_epoch);
        let end = self.end_time().unwrap_or_else(timestamp::unix_epoch);
        format!(
            "{}_{}_{}",
            self.object_id(),
            timestamp::format_compact(start),
            timestamp::format_compact(end)
        )
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn set_uuid(&mut self, uuid: Uuid) {
        self.uuid = uuid;
    }

    /// Replaces the UUID with a fresh one from the installed generator.
    pub fn regenerate_uuid(&mut self) -> Uuid {
        self.uuid = uuid_factory::new_uuid();
        self.uuid
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }
}

impl<D: Domain> Default for Trajectory<D> {
    fn default() -> Self {
        Trajectory::new()
    }
}

/// Pointwise equality plus property-map equality; the UUID is not part of
/// a trajectory's value.
impl<D: Domain> PartialEq for Trajectory<D> {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points && self.properties == other.properties
    }
}

impl<D: Domain> std::ops::Index<usize> for Trajectory<D> {
    type Output = TrajectoryPoint<D>;

    fn index(&self, index: usize) -> &TrajectoryPoint<D> {
        &self.points[index]
    }
}

impl<D: Domain> FromIterator<TrajectoryPoint<D>> for Trajectory<D> {
    fn from_iter<I: IntoIterator<Item = TrajectoryPoint<D>>>(iter: I) -> Self {
        Trajectory::from_points(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cartesian2d, Spherical};
    use approx::assert_relative_eq;
    use hifitime::Epoch;

    fn flat_point(x: f64, y: f64, minutes: i64) -> TrajectoryPoint<Cartesian2d> {
        TrajectoryPoint::with_id_and_time(
            Point::xy(x, y),
            "obj",
            Epoch::from_gregorian_utc(2020, 1, 1, 0, 0, 0, 0)
                + Duration::from_seconds(minutes as f64 * 60.0),
        )
    }

    #[test]
    fn lengths_accumulate_pairwise_distances() {
        let trajectory: Trajectory<Cartesian2d> = Trajectory::from_points(vec![
            flat_point(0.0, 0.0, 0),
            flat_point(3.0, 4.0, 1),
            flat_point(3.0, 8.0, 2),
        ]);
        assert_relative_eq!(trajectory[0].current_length(), 0.0);
        assert_relative_eq!(trajectory[1].current_length(), 5.0);
        assert_relative_eq!(trajectory[2].current_length(), 9.0);
    }

    #[test]
    fn insert_recomputes_downstream_lengths() {
        let mut trajectory: Trajectory<Cartesian2d> =
            Trajectory::from_points(vec![flat_point(0.0, 0.0, 0), flat_point(0.0, 2.0, 2)]);
        trajectory.insert(1, flat_point(0.0, 1.0, 1));
        assert_relative_eq!(trajectory[1].current_length(), 1.0);
        assert_relative_eq!(trajectory[2].current_length(), 2.0);
    }

    #[test]
    fn derived_id_renders_both_instants() {
        let mut trajectory: Trajectory<Cartesian2d> = Trajectory::new();
        trajectory.push(TrajectoryPoint::with_id_and_time(
            Point::xy(0.0, 0.0),
            "GREENFLIGHT",
            Epoch::from_gregorian_utc(2014, 3, 5, 13, 44, 6, 0),
        ));
        trajectory.push(TrajectoryPoint::with_id_and_time(
            Point::xy(1.0, 0.0),
            "GREENFLIGHT",
            Epoch::from_gregorian_utc(2014, 3, 5, 14, 0, 0, 0),
        ));
        assert_eq!(
            trajectory.trajectory_id(),
            "GREENFLIGHT_20140305134406_20140305140000"
        );
    }

    #[test]
    fn empty_trajectory_id_uses_the_zero_instant() {
        let trajectory: Trajectory<Spherical> = Trajectory::new();
        assert_eq!(trajectory.trajectory_id(), "_19700101000000_19700101000000");
    }

    #[test]
    fn uuid_assigned_preserved_and_excluded_from_equality() {
        let mut a: Trajectory<Cartesian2d> =
            Trajectory::from_points(vec![flat_point(0.0, 0.0, 0)]);
        assert!(!a.uuid().is_nil());

        let cloned = a.clone();
        assert_eq!(cloned.uuid(), a.uuid());

        let old = a.uuid();
        let new = a.regenerate_uuid();
        assert_ne!(old, new);
        assert_eq!(a, cloned); // identity is not part of the value

        let nil: Trajectory<Cartesian2d> = Trajectory::without_uuid();
        assert!(nil.uuid().is_nil());
    }

    #[test]
    fn subset_preserves_properties_not_identity() {
        let mut trajectory: Trajectory<Cartesian2d> = Trajectory::from_points(vec![
            flat_point(0.0, 0.0, 0),
            flat_point(1.0, 0.0, 1),
            flat_point(2.0, 0.0, 2),
            flat_point(3.0, 0.0, 3),
        ]);
        trajectory.properties_mut().insert("callsign", "ABC123");

        let slice = trajectory.subset(1..3);
        assert_eq!(slice.len(), 2);
        assert_eq!(slice.properties().string_property("callsign"), Some("ABC123"));
        assert_relative_eq!(slice[0].current_length(), 0.0);
        assert_relative_eq!(slice[1].current_length(), 1.0);
        assert_ne!(slice.uuid(), trajectory.uuid());
    }

    #[test]
    fn duration_and_times() {
        let trajectory: Trajectory<Cartesian2d> =
            Trajectory::from_points(vec![flat_point(0.0, 0.0, 0), flat_point(1.0, 0.0, 90)]);
        assert_relative_eq!(trajectory.duration().to_seconds(), 5400.0);

        let empty: Trajectory<Cartesian2d> = Trajectory::new();
        assert!(empty.start_time().is_none());
        assert_relative_eq!(empty.duration().to_seconds(), 0.0);
    }

    #[test]
    fn out_of_order_timestamps_are_accepted() {
        let trajectory: Trajectory<Cartesian2d> =
            Trajectory::from_points(vec![flat_point(0.0, 0.0, 10), flat_point(1.0, 0.0, 5)]);
        assert_eq!(trajectory.len(), 2);
        assert_relative_eq!(trajectory[1].current_length(), 1.0);
    }
}
