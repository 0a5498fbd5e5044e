//! Synthetic trajectory-point sources.
//!
//! Generators are infinite iterators of [`TrajectoryPoint`]s with an
//! advancing timestamp, parameterized over any [`CourseDomain`] — dead
//! reckoning is great-circle in the spherical domain and a planar offset
//! in the flat plane. Bound them with [`Iterator::take`] and merge
//! several with [`Collator`].

use log::debug;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use thiserror::Error;
use tracktable_types::{CourseDomain, Domain, Duration, Epoch, Point, TrajectoryPoint};

/// Configuration and exhaustion failures from the generator layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    /// A collator constructed over an empty source list.
    #[error("no generators supplied")]
    NoGenerators,

    /// Every source is exhausted.
    #[error("no generated points remain")]
    NoGeneratedPoints,

    /// The step interval must be strictly positive.
    #[error("step interval must be positive")]
    NonPositiveInterval,

    /// Speeds are distances per second and cannot be negative.
    #[error("speed must be non-negative")]
    NegativeSpeed,

    /// Grid legs must contain at least one step.
    #[error("grid leg length must be at least one step")]
    EmptyGridLeg,
}

/// A point source moving at constant speed on a constant heading.
///
/// Speed is in domain length units per second (kilometers per second in
/// the spherical domain); heading is degrees clockwise from north. The
/// first point produced is the origin at the start time.
#[derive(Debug, Clone)]
pub struct ConstantSpeedGenerator<D: CourseDomain> {
    position: Point<D>,
    heading: f64,
    speed: f64,
    interval: Duration,
    timestamp: Epoch,
    object_id: String,
}

impl<D: CourseDomain> ConstantSpeedGenerator<D> {
    pub fn new(
        object_id: impl Into<String>,
        origin: Point<D>,
        start_time: Epoch,
        interval: Duration,
        speed: f64,
        heading: f64,
    ) -> Result<Self, GeneratorError> {
        if interval.to_seconds() <= 0.0 {
            return Err(GeneratorError::NonPositiveInterval);
        }
        if speed < 0.0 {
            return Err(GeneratorError::NegativeSpeed);
        }
        Ok(ConstantSpeedGenerator {
            position: origin,
            heading,
            speed,
            interval,
            timestamp: start_time,
            object_id: object_id.into(),
        })
    }

    fn emit(&self) -> TrajectoryPoint<D> {
        TrajectoryPoint::with_id_and_time(self.position, self.object_id.clone(), self.timestamp)
    }

    fn advance(&mut self) {
        let step = self.speed * self.interval.to_seconds();
        self.position = D::destination(&self.position, self.heading, step);
        self.timestamp = self.timestamp + self.interval;
    }
}

impl<D: CourseDomain> Iterator for ConstantSpeedGenerator<D> {
    type Item = TrajectoryPoint<D>;

    fn next(&mut self) -> Option<TrajectoryPoint<D>> {
        let point = self.emit();
        self.advance();
        Some(point)
    }
}

/// A constant-speed source with a constant turn rate in degrees per
/// second; positive rates turn clockwise. In the flat plane a full
/// `360 / turn_rate` seconds of steps close back onto the origin.
#[derive(Debug, Clone)]
pub struct CircularGenerator<D: CourseDomain> {
    inner: ConstantSpeedGenerator<D>,
    turn_rate: f64,
}

impl<D: CourseDomain> CircularGenerator<D> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        object_id: impl Into<String>,
        origin: Point<D>,
        start_time: Epoch,
        interval: Duration,
        speed: f64,
        heading: f64,
        turn_rate: f64,
    ) -> Result<Self, GeneratorError> {
        Ok(CircularGenerator {
            inner: ConstantSpeedGenerator::new(
                object_id, origin, start_time, interval, speed, heading,
            )?,
            turn_rate,
        })
    }
}

impl<D: CourseDomain> Iterator for CircularGenerator<D> {
    type Item = TrajectoryPoint<D>;

    fn next(&mut self) -> Option<TrajectoryPoint<D>> {
        let point = self.inner.emit();
        self.inner.advance();
        self.inner.heading = (self.inner.heading
            + self.turn_rate * self.inner.interval.to_seconds())
        .rem_euclid(360.0);
        Some(point)
    }
}

/// A raster source: straight legs of `steps_per_leg` points joined by
/// 90° turns of alternating sense, tracing a staircase sweep.
#[derive(Debug, Clone)]
pub struct GridGenerator<D: CourseDomain> {
    inner: ConstantSpeedGenerator<D>,
    steps_per_leg: usize,
    step_in_leg: usize,
    turn_clockwise: bool,
}

impl<D: CourseDomain> GridGenerator<D> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        object_id: impl Into<String>,
        origin: Point<D>,
        start_time: Epoch,
        interval: Duration,
        speed: f64,
        heading: f64,
        steps_per_leg: usize,
    ) -> Result<Self, GeneratorError> {
        if steps_per_leg == 0 {
            return Err(GeneratorError::EmptyGridLeg);
        }
        Ok(GridGenerator {
            inner: ConstantSpeedGenerator::new(
                object_id, origin, start_time, interval, speed, heading,
            )?,
            steps_per_leg,
            step_in_leg: 0,
            turn_clockwise: true,
        })
    }
}

impl<D: CourseDomain> Iterator for GridGenerator<D> {
    type Item = TrajectoryPoint<D>;

    fn next(&mut self) -> Option<TrajectoryPoint<D>> {
        let point = self.inner.emit();
        self.inner.advance();
        self.step_in_leg += 1;
        if self.step_in_leg == self.steps_per_leg {
            self.step_in_leg = 0;
            let turn = if self.turn_clockwise { 90.0 } else { -90.0 };
            self.inner.heading = (self.inner.heading + turn).rem_euclid(360.0);
            self.turn_clockwise = !self.turn_clockwise;
        }
        Some(point)
    }
}

struct Pending<D: Domain> {
    timestamp: Epoch,
    source: usize,
    point: TrajectoryPoint<D>,
}

impl<D: Domain> PartialEq for Pending<D> {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.source == other.source
    }
}

impl<D: Domain> Eq for Pending<D> {}

impl<D: Domain> PartialOrd for Pending<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<D: Domain> Ord for Pending<D> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then(self.source.cmp(&other.source))
    }
}

impl<D: Domain> std::fmt::Debug for Pending<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pending")
            .field("timestamp", &self.timestamp)
            .field("source", &self.source)
            .finish()
    }
}

/// Merges several point sources into one stream ordered by timestamp,
/// ties broken by source position.
///
/// Sources are pulled lazily, one look-ahead point each, so infinite
/// generators are fine as long as they are bounded with `take` before
/// the collator is drained.
pub struct Collator<D: Domain> {
    sources: Vec<Box<dyn Iterator<Item = TrajectoryPoint<D>>>>,
    heap: BinaryHeap<Reverse<Pending<D>>>,
}

impl<D: Domain> Collator<D> {
    /// Fails with [`GeneratorError::NoGenerators`] on an empty source
    /// list.
    pub fn new(
        sources: Vec<Box<dyn Iterator<Item = TrajectoryPoint<D>>>>,
    ) -> Result<Self, GeneratorError> {
        if sources.is_empty() {
            return Err(GeneratorError::NoGenerators);
        }
        let mut collator = Collator {
            sources,
            heap: BinaryHeap::new(),
        };
        for source in 0..collator.sources.len() {
            collator.refill(source);
        }
        debug!("collator merging {} sources", collator.sources.len());
        Ok(collator)
    }

    fn refill(&mut self, source: usize) {
        if let Some(point) = self.sources[source].next() {
            self.heap.push(Reverse(Pending {
                timestamp: point.timestamp(),
                source,
                point,
            }));
        }
    }

    /// The globally next point, or [`GeneratorError::NoGeneratedPoints`]
    /// once every source has run dry.
    pub fn next_point(&mut self) -> Result<TrajectoryPoint<D>, GeneratorError> {
        let Reverse(pending) = self.heap.pop().ok_or(GeneratorError::NoGeneratedPoints)?;
        self.refill(pending.source);
        Ok(pending.point)
    }
}

impl<D: Domain> Iterator for Collator<D> {
    type Item = TrajectoryPoint<D>;

    fn next(&mut self) -> Option<TrajectoryPoint<D>> {
        self.next_point().ok()
    }
}

impl<D: Domain> std::fmt::Debug for Collator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collator")
            .field("sources", &self.sources.len())
            .field("queued", &self.heap.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tracktable_types::{Cartesian2d, Spherical, Trajectory};

    fn start() -> Epoch {
        Epoch::from_gregorian_utc(2020, 6, 1, 0, 0, 0, 0)
    }

    #[test]
    fn constant_speed_track_is_straight_and_evenly_spaced() {
        let generator = ConstantSpeedGenerator::new(
            "walker",
            Point::xy(0.0, 0.0),
            start(),
            Duration::from_seconds(60.0),
            2.0,
            90.0,
        )
        .expect("valid configuration");
        let points: Vec<_> = generator.take(4).collect();
        assert_eq!(points[0].position(), &Point::xy(0.0, 0.0));
        assert_relative_eq!(points[3].position().x(), 360.0, epsilon = 1e-9);
        assert_relative_eq!(points[3].position().y(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(
            (points[1].timestamp() - points[0].timestamp()).to_seconds(),
            60.0
        );
        assert_eq!(points[2].object_id(), "walker");
    }

    #[test]
    fn spherical_track_covers_the_expected_ground() {
        let albuquerque = Point::lon_lat(-106.6504, 35.0844);
        let las_cruces = Point::lon_lat(-106.7794, 32.3199);
        let heading = tracktable_types::bearing(&albuquerque, &las_cruces);
        let generator = ConstantSpeedGenerator::new(
            "flight",
            albuquerque,
            start(),
            Duration::from_seconds(60.0),
            0.042, // 42 m/s in km/s
            heading,
        )
        .expect("valid configuration");
        let trajectory: Trajectory<Spherical> = generator.take(100).collect();
        let crow_flies = Spherical::distance(
            trajectory.first().expect("non-empty").position(),
            trajectory.last().expect("non-empty").position(),
        );
        assert_relative_eq!(crow_flies, 99.0 * 0.042 * 60.0, epsilon = 0.05);
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        let zero_interval = ConstantSpeedGenerator::<Cartesian2d>::new(
            "x",
            Point::xy(0.0, 0.0),
            start(),
            Duration::from_seconds(0.0),
            1.0,
            0.0,
        );
        assert_eq!(zero_interval.unwrap_err(), GeneratorError::NonPositiveInterval);

        let negative_speed = ConstantSpeedGenerator::<Cartesian2d>::new(
            "x",
            Point::xy(0.0, 0.0),
            start(),
            Duration::from_seconds(1.0),
            -1.0,
            0.0,
        );
        assert_eq!(negative_speed.unwrap_err(), GeneratorError::NegativeSpeed);

        let empty_leg = GridGenerator::<Cartesian2d>::new(
            "x",
            Point::xy(0.0, 0.0),
            start(),
            Duration::from_seconds(1.0),
            1.0,
            0.0,
            0,
        );
        assert_eq!(empty_leg.unwrap_err(), GeneratorError::EmptyGridLeg);
    }

    #[test]
    fn circular_track_closes_in_the_flat_plane() {
        // 36 degrees per second over one-second steps: ten steps walk a
        // full polygon back to the origin.
        let generator = CircularGenerator::new(
            "loop",
            Point::xy(0.0, 0.0),
            start(),
            Duration::from_seconds(1.0),
            5.0,
            0.0,
            36.0,
        )
        .expect("valid configuration");
        let points: Vec<_> = generator.take(11).collect();
        assert_relative_eq!(points[10].position().x(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(points[10].position().y(), 0.0, epsilon = 1e-9);
        // The loop surrounds points distinct from the origin.
        assert!(points[5].position().y() > 1.0 || points[5].position().x() > 1.0);
    }

    #[test]
    fn grid_track_alternates_turns() {
        let generator = GridGenerator::new(
            "mower",
            Point::xy(0.0, 0.0),
            start(),
            Duration::from_seconds(1.0),
            1.0,
            90.0,
            3,
        )
        .expect("valid configuration");
        let points: Vec<_> = generator.take(7).collect();
        // Three steps east, turn south, three steps, turn back east.
        assert_relative_eq!(points[3].position().x(), 3.0, epsilon = 1e-9);
        assert_relative_eq!(points[3].position().y(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(points[6].position().x(), 3.0, epsilon = 1e-9);
        assert_relative_eq!(points[6].position().y(), -3.0, epsilon = 1e-9);
    }

    #[test]
    fn collator_merges_in_time_order() {
        let early = ConstantSpeedGenerator::<Cartesian2d>::new(
            "early",
            Point::xy(0.0, 0.0),
            start(),
            Duration::from_seconds(60.0),
            1.0,
            0.0,
        )
        .expect("valid configuration");
        let late = ConstantSpeedGenerator::<Cartesian2d>::new(
            "late",
            Point::xy(100.0, 0.0),
            start() + Duration::from_seconds(30.0),
            Duration::from_seconds(60.0),
            1.0,
            0.0,
        )
        .expect("valid configuration");

        let mut collator = Collator::new(vec![
            Box::new(early.take(3)) as Box<dyn Iterator<Item = _>>,
            Box::new(late.take(3)),
        ])
        .expect("non-empty source list");

        let mut stamps = Vec::new();
        let mut ids = Vec::new();
        while let Ok(point) = collator.next_point() {
            stamps.push(point.timestamp());
            ids.push(point.object_id().to_owned());
        }
        assert_eq!(stamps.len(), 6);
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ids, ["early", "late", "early", "late", "early", "late"]);
        assert_eq!(
            collator.next_point().unwrap_err(),
            GeneratorError::NoGeneratedPoints
        );
    }

    #[test]
    fn collator_requires_sources() {
        let none: Vec<Box<dyn Iterator<Item = TrajectoryPoint<Cartesian2d>>>> = Vec::new();
        assert!(matches!(
            Collator::new(none),
            Err(GeneratorError::NoGenerators)
        ));
    }
}
