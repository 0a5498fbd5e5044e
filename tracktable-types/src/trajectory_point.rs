//! Points annotated with the metadata a moving object carries.

use crate::domain::Domain;
use crate::point::Point;
use crate::property::PropertyMap;
use crate::timestamp;
use hifitime::Epoch;

/// A [`Point`] extended with an object identifier, a timestamp, the arc
/// length accumulated so far, and a property map.
///
/// `current_length` is owned by [`Trajectory`](crate::Trajectory): the
/// container recomputes it whenever points are added, and it is zero for a
/// point that has never been inserted anywhere.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryPoint<D: Domain> {
    position: Point<D>,
    object_id: String,
    timestamp: Epoch,
    current_length: f64,
    properties: PropertyMap,
}

impl<D: Domain> TrajectoryPoint<D> {
    /// Creates a point at `position` with an empty object id, the zero
    /// instant, and no properties.
    pub fn new(position: Point<D>) -> Self {
        TrajectoryPoint {
            position,
            object_id: String::new(),
            timestamp: timestamp::unix_epoch(),
            current_length: 0.0,
            properties: PropertyMap::new(),
        }
    }

    /// Creates a fully described point. The timestamp is truncated to
    /// microsecond resolution.
    pub fn with_id_and_time(
        position: Point<D>,
        object_id: impl Into<String>,
        timestamp: Epoch,
    ) -> Self {
        TrajectoryPoint {
            position,
            object_id: object_id.into(),
            timestamp: timestamp::truncate_to_microseconds(timestamp),
            current_length: 0.0,
            properties: PropertyMap::new(),
        }
    }

    pub fn position(&self) -> &Point<D> {
        &self.position
    }

    pub fn position_mut(&mut self) -> &mut Point<D> {
        &mut self.position
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn set_object_id(&mut self, object_id: impl Into<String>) {
        self.object_id = object_id.into();
    }

    pub fn timestamp(&self) -> Epoch {
        self.timestamp
    }

    /// Sets the timestamp, truncated to microsecond resolution.
    pub fn set_timestamp(&mut self, timestamp: Epoch) {
        self.timestamp = timestamp::truncate_to_microseconds(timestamp);
    }

    /// Arc length from the start of the owning trajectory up to and
    /// including this point, in domain length units.
    pub fn current_length(&self) -> f64 {
        self.current_length
    }

    /// Overwrites the accumulated arc length. Reserved for containers and
    /// codecs; ordinary callers never need it.
    pub fn set_current_length(&mut self, length: f64) {
        self.current_length = length;
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }
}

impl<D: Domain> From<Point<D>> for TrajectoryPoint<D> {
    fn from(position: Point<D>) -> Self {
        TrajectoryPoint::new(position)
    }
}
