//! Looking up positions along a trajectory by arc length, by elapsed
//! time, or by instant.
//!
//! All of these walk the trajectory's cumulative-length accumulator or its
//! timestamps, so they expect the usual non-decreasing time order.

use std::cmp::Ordering;
use tracktable_types::{
    Domain, Duration, Epoch, PropertyMap, PropertyValue, Trajectory, TrajectoryPoint,
};

/// Blends two trajectory points at fraction `t`, clamped to `[0, 1]`.
///
/// The position follows the domain metric (great-circle or linear), the
/// timestamp and accumulated length are blended linearly, the object id
/// comes from `a`, and properties are merged: numeric and timestamp values
/// present on both sides interpolate (integers round to nearest), anything
/// else is taken from the nearer endpoint, and one-sided keys are kept.
pub fn interpolate_trajectory_points<D: Domain>(
    a: &TrajectoryPoint<D>,
    b: &TrajectoryPoint<D>,
    t: f64,
) -> TrajectoryPoint<D> {
    if t <= 0.0 {
        return a.clone();
    }
    if t >= 1.0 {
        return b.clone();
    }
    let position = D::extrapolate(a.position(), b.position(), t);
    let mut out = TrajectoryPoint::with_id_and_time(
        position,
        a.object_id(),
        lerp_epoch(a.timestamp(), b.timestamp(), t),
    );
    out.set_current_length(a.current_length() + (b.current_length() - a.current_length()) * t);
    *out.properties_mut() = interpolate_property_maps(a.properties(), b.properties(), t);
    out
}

fn lerp_epoch(a: Epoch, b: Epoch, t: f64) -> Epoch {
    a + Duration::from_total_nanoseconds(((b - a).total_nanoseconds() as f64 * t) as i128)
}

fn interpolate_property_maps(a: &PropertyMap, b: &PropertyMap, t: f64) -> PropertyMap {
    let mut out = PropertyMap::new();
    for (name, left) in a.iter() {
        let value = match (left, b.get(name)) {
            (PropertyValue::Real(x), Some(PropertyValue::Real(y))) => {
                PropertyValue::Real(x + (y - x) * t)
            }
            (PropertyValue::Integer(x), Some(PropertyValue::Integer(y))) => {
                PropertyValue::Integer((*x as f64 + (*y - *x) as f64 * t).round() as i64)
            }
            (PropertyValue::Timestamp(x), Some(PropertyValue::Timestamp(y))) => {
                PropertyValue::Timestamp(lerp_epoch(*x, *y, t))
            }
            (_, Some(right)) => {
                if t <= 0.5 {
                    left.clone()
                } else {
                    right.clone()
                }
            }
            (_, None) => left.clone(),
        };
        out.insert(name, value);
    }
    for (name, right) in b.iter() {
        if !out.contains(name) {
            out.insert(name, right.clone());
        }
    }
    out
}

/// The point at arc-length fraction `fraction` of the trajectory.
///
/// `fraction` is clamped to `[0, 1]`; 0 and 1 return the first and last
/// points exactly. `None` on an empty trajectory.
pub fn point_at_length_fraction<D: Domain>(
    trajectory: &Trajectory<D>,
    fraction: f64,
) -> Option<TrajectoryPoint<D>> {
    let first = trajectory.first()?;
    let f = fraction.clamp(0.0, 1.0);
    if f == 0.0 {
        return Some(first.clone());
    }
    let last = trajectory.last()?;
    let total = last.current_length();
    if f == 1.0 || total == 0.0 {
        return Some(last.clone());
    }
    let target = f * total;
    let (before, after, local) = locate_length(trajectory, target)?;
    let mut point = interpolate_trajectory_points(before, after, local);
    point.set_current_length(target);
    Some(point)
}

/// The point at time fraction `fraction` of the trajectory's duration.
///
/// Same endpoint and clamping behavior as [`point_at_length_fraction`].
pub fn point_at_time_fraction<D: Domain>(
    trajectory: &Trajectory<D>,
    fraction: f64,
) -> Option<TrajectoryPoint<D>> {
    let first = trajectory.first()?;
    let f = fraction.clamp(0.0, 1.0);
    if f == 0.0 {
        return Some(first.clone());
    }
    if f == 1.0 {
        return Some(trajectory.last()?.clone());
    }
    let duration = trajectory.duration();
    let offset =
        Duration::from_total_nanoseconds((duration.total_nanoseconds() as f64 * f) as i128);
    point_at_time(trajectory, first.timestamp() + offset)
}

/// The instant at arc-length fraction `fraction`: the inverse of
/// [`point_at_length_fraction`] on the time axis.
pub fn time_at_fraction<D: Domain>(trajectory: &Trajectory<D>, fraction: f64) -> Option<Epoch> {
    let first = trajectory.first()?;
    let f = fraction.clamp(0.0, 1.0);
    if f == 0.0 {
        return Some(first.timestamp());
    }
    let last = trajectory.last()?;
    let total = last.current_length();
    if f == 1.0 || total == 0.0 {
        return Some(last.timestamp());
    }
    let (before, after, local) = locate_length(trajectory, f * total)?;
    Some(lerp_epoch(before.timestamp(), after.timestamp(), local))
}

/// The trajectory's state at instant `when`.
///
/// Instants between two samples interpolate position, time, and
/// properties; instants outside the trajectory's span clamp silently to
/// the nearest endpoint. `None` on an empty trajectory.
pub fn point_at_time<D: Domain>(
    trajectory: &Trajectory<D>,
    when: Epoch,
) -> Option<TrajectoryPoint<D>> {
    let first = trajectory.first()?;
    let last = trajectory.last()?;
    if when <= first.timestamp() {
        return Some(first.clone());
    }
    if when >= last.timestamp() {
        return Some(last.clone());
    }
    match trajectory
        .points()
        .binary_search_by(|point| point.timestamp().cmp(&when))
    {
        Ok(index) => Some(trajectory[index].clone()),
        Err(index) => {
            let before = &trajectory[index - 1];
            let after = &trajectory[index];
            let span = (after.timestamp() - before.timestamp()).to_seconds();
            if span <= 0.0 {
                return Some(before.clone());
            }
            let local = (when - before.timestamp()).to_seconds() / span;
            Some(interpolate_trajectory_points(before, after, local))
        }
    }
}

/// The slice of the trajectory lying within `[start, end]`.
///
/// The result holds points synthesized at the (clamped) interval
/// endpoints plus every original point strictly between them, and
/// inherits the parent's property map. An interval that misses the
/// trajectory's span entirely yields an empty trajectory.
pub fn subset_during_interval<D: Domain>(
    trajectory: &Trajectory<D>,
    start: Epoch,
    end: Epoch,
) -> Trajectory<D> {
    let mut out = Trajectory::new();
    *out.properties_mut() = trajectory.properties().clone();
    let (Some(span_start), Some(span_end)) = (trajectory.start_time(), trajectory.end_time())
    else {
        return out;
    };
    if end < start || end < span_start || start > span_end {
        return out;
    }
    let s = start.max(span_start);
    let e = end.min(span_end);
    if let Some(head) = point_at_time(trajectory, s) {
        out.push(head);
    }
    for point in trajectory.iter() {
        if point.timestamp() > s && point.timestamp() < e {
            out.push(point.clone());
        }
    }
    if let Some(tail) = point_at_time(trajectory, e) {
        out.push(tail);
    }
    out
}

/// Finds the segment whose cumulative length covers `target` and the
/// local fraction within it.
fn locate_length<D: Domain>(
    trajectory: &Trajectory<D>,
    target: f64,
) -> Option<(&TrajectoryPoint<D>, &TrajectoryPoint<D>, f64)> {
    let points = trajectory.points();
    let index = match points.binary_search_by(|point| {
        point
            .current_length()
            .partial_cmp(&target)
            .unwrap_or(Ordering::Less)
    }) {
        Ok(index) => index,
        Err(index) => index,
    };
    if index == 0 {
        let first = points.first()?;
        return Some((first, first, 0.0));
    }
    if index >= points.len() {
        let last = points.last()?;
        return Some((last, last, 0.0));
    }
    let before = &points[index - 1];
    let after = &points[index];
    let segment = after.current_length() - before.current_length();
    if segment <= 0.0 {
        Some((after, after, 0.0))
    } else {
        Some((before, after, (target - before.current_length()) / segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tracktable_types::{Cartesian2d, Point};

    fn sample() -> Trajectory<Cartesian2d> {
        let start = Epoch::from_gregorian_utc(2020, 1, 1, 0, 0, 0, 0);
        Trajectory::from_points(vec![
            TrajectoryPoint::with_id_and_time(Point::xy(0.0, 0.0), "obj", start),
            TrajectoryPoint::with_id_and_time(
                Point::xy(4.0, 1.0),
                "obj",
                start + Duration::from_hours(2.0),
            ),
            TrajectoryPoint::with_id_and_time(
                Point::xy(8.0, 0.0),
                "obj",
                start + Duration::from_hours(4.0),
            ),
        ])
    }

    #[test]
    fn time_fraction_hits_samples_and_midpoints() {
        let trajectory = sample();
        let halfway = point_at_time_fraction(&trajectory, 0.5).expect("non-empty");
        assert_eq!(halfway.position(), &Point::xy(4.0, 1.0));

        let quarter = point_at_time_fraction(&trajectory, 0.25).expect("non-empty");
        assert_relative_eq!(quarter.position().x(), 2.0);
        assert_relative_eq!(quarter.position().y(), 0.5);
    }

    #[test]
    fn length_fraction_endpoints_are_exact() {
        let trajectory = sample();
        assert_eq!(
            &point_at_length_fraction(&trajectory, 0.0).expect("non-empty"),
            trajectory.first().expect("non-empty")
        );
        assert_eq!(
            &point_at_length_fraction(&trajectory, 1.0).expect("non-empty"),
            trajectory.last().expect("non-empty")
        );
        // Out-of-range fractions clamp.
        assert_eq!(
            &point_at_length_fraction(&trajectory, 7.0).expect("non-empty"),
            trajectory.last().expect("non-empty")
        );
    }

    #[test]
    fn length_fraction_interpolates_between_samples() {
        let trajectory = sample();
        let halfway = point_at_length_fraction(&trajectory, 0.5).expect("non-empty");
        // Both segments have equal length, so the halfway point is the
        // middle sample.
        assert_relative_eq!(halfway.position().x(), 4.0);
        assert_relative_eq!(halfway.position().y(), 1.0);
        assert_relative_eq!(
            halfway.current_length(),
            trajectory.last().expect("non-empty").current_length() / 2.0
        );
    }

    #[test]
    fn time_at_fraction_inverts_length_fraction() {
        let trajectory = sample();
        let t = time_at_fraction(&trajectory, 0.5).expect("non-empty");
        let start = trajectory.start_time().expect("non-empty");
        assert_relative_eq!((t - start).to_seconds(), 7200.0, epsilon = 1.0);
    }

    #[test]
    fn point_at_time_clamps_outside_the_span() {
        let trajectory = sample();
        let before = trajectory.start_time().expect("non-empty") - Duration::from_hours(5.0);
        let after = trajectory.end_time().expect("non-empty") + Duration::from_hours(5.0);
        assert_eq!(
            &point_at_time(&trajectory, before).expect("non-empty"),
            trajectory.first().expect("non-empty")
        );
        assert_eq!(
            &point_at_time(&trajectory, after).expect("non-empty"),
            trajectory.last().expect("non-empty")
        );
        assert!(point_at_time(&Trajectory::<Cartesian2d>::new(), before).is_none());
    }

    #[test]
    fn properties_blend_between_samples() {
        let start = Epoch::from_gregorian_utc(2020, 1, 1, 0, 0, 0, 0);
        let mut a = TrajectoryPoint::with_id_and_time(Point::xy(0.0, 0.0), "obj", start);
        a.properties_mut().insert("speed", 10.0);
        a.properties_mut().insert("count", 4i64);
        a.properties_mut().insert("phase", "climb");
        let mut b = TrajectoryPoint::with_id_and_time(
            Point::xy(1.0, 0.0),
            "obj",
            start + Duration::from_hours(1.0),
        );
        b.properties_mut().insert("speed", 20.0);
        b.properties_mut().insert("count", 8i64);
        b.properties_mut().insert("phase", "cruise");

        let mixed = interpolate_trajectory_points(&a, &b, 0.75);
        assert_relative_eq!(
            mixed.properties().real_property("speed").expect("present"),
            17.5
        );
        assert_eq!(mixed.properties().integer_property("count"), Some(7));
        assert_eq!(mixed.properties().string_property("phase"), Some("cruise"));
        assert_eq!(mixed.object_id(), "obj");
    }

    #[test]
    fn interval_subset_synthesizes_endpoints() {
        let trajectory = sample();
        let start = trajectory.start_time().expect("non-empty");
        let slice = subset_during_interval(
            &trajectory,
            start + Duration::from_hours(1.0),
            start + Duration::from_hours(3.0),
        );
        assert_eq!(slice.len(), 3);
        assert_relative_eq!(slice[0].position().x(), 2.0);
        assert_relative_eq!(slice[0].position().y(), 0.5);
        assert_eq!(slice[1].position(), &Point::xy(4.0, 1.0));
        assert_relative_eq!(slice[2].position().x(), 6.0);
        assert_relative_eq!(slice[2].position().y(), 0.5);
    }

    #[test]
    fn interval_subset_clamps_and_keeps_properties() {
        let mut trajectory = sample();
        trajectory.properties_mut().insert("callsign", "N123");
        let start = trajectory.start_time().expect("non-empty");

        let everything = subset_during_interval(
            &trajectory,
            start - Duration::from_hours(10.0),
            start + Duration::from_hours(10.0),
        );
        assert_eq!(everything.len(), 3);
        assert_eq!(
            everything.properties().string_property("callsign"),
            Some("N123")
        );

        let nothing = subset_during_interval(
            &trajectory,
            start - Duration::from_hours(10.0),
            start - Duration::from_hours(9.0),
        );
        assert!(nothing.is_empty());
        assert_eq!(
            nothing.properties().string_property("callsign"),
            Some("N123")
        );
    }
}
