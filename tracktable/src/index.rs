//! A bulk-loadable spatial index over payload-carrying points.
//!
//! [`RTree`] wraps an [`rstar`] R*-tree over [`Entry`] values — a position
//! plus an opaque payload — and exposes the box and nearest-neighbor
//! queries the rest of the crate builds on. Mutation requires exclusive
//! access; any number of readers may query a tree concurrently as long as
//! nobody is writing.

use rstar::{PointDistance, RTree as RStarTree, RTreeObject, AABB};
use std::cmp::Ordering;
use tracktable_types::{
    BoundingBox, Cartesian2d, Cartesian3d, Domain, Point, Spherical, EARTH_RADIUS_KM,
};

/// Domains that can cover a metric ball with axis-aligned coordinate
/// boxes.
///
/// Raw-coordinate distance is not monotonic with every domain metric — a
/// lon/lat degree is not a kilometer, and the chart wraps at the
/// antimeridian and converges at the poles — so nearest-neighbor queries
/// bound the true metric ball with coordinate boxes and rank the
/// candidates inside by the domain metric.
pub trait MetricBall: Domain {
    /// Boxes that jointly cover every point whose domain distance from
    /// `center` is at most `radius`.
    fn ball_bounds(center: &Point<Self>, radius: f64) -> Vec<BoundingBox<Self>>;
}

fn euclidean_ball<D: Domain>(center: &Point<D>, radius: f64) -> Vec<BoundingBox<D>> {
    let mut min = *center;
    let mut max = *center;
    for i in 0..D::DIMENSION {
        min[i] -= radius;
        max[i] += radius;
    }
    vec![BoundingBox::from_points([min, max]).expect("a two-corner point set is never empty")]
}

impl MetricBall for Cartesian2d {
    fn ball_bounds(center: &Point<Self>, radius: f64) -> Vec<BoundingBox<Self>> {
        euclidean_ball(center, radius)
    }
}

impl MetricBall for Cartesian3d {
    fn ball_bounds(center: &Point<Self>, radius: f64) -> Vec<BoundingBox<Self>> {
        euclidean_ball(center, radius)
    }
}

impl MetricBall for Spherical {
    /// Bounding boxes of the spherical cap of great-circle radius
    /// `radius` kilometers: a latitude band, widened to every longitude
    /// when the cap reaches a pole and split in two when it crosses the
    /// antimeridian.
    fn ball_bounds(center: &Point<Self>, radius: f64) -> Vec<BoundingBox<Self>> {
        let band = |lon_lo: f64, lat_lo: f64, lon_hi: f64, lat_hi: f64| {
            BoundingBox::from_points([
                Point::lon_lat(lon_lo, lat_lo),
                Point::lon_lat(lon_hi, lat_hi),
            ])
            .expect("a two-corner point set is never empty")
        };
        let rho = (radius / EARTH_RADIUS_KM).to_degrees();
        if rho >= 180.0 {
            return vec![band(-180.0, -90.0, 180.0, 90.0)];
        }
        let lat_lo = center.latitude() - rho;
        let lat_hi = center.latitude() + rho;
        if lat_hi >= 90.0 || lat_lo <= -90.0 {
            // The cap contains a pole, so every longitude is inside.
            return vec![band(-180.0, lat_lo.max(-90.0), 180.0, lat_hi.min(90.0))];
        }
        let half_span = (rho.to_radians().sin() / center.latitude().to_radians().cos())
            .min(1.0)
            .asin()
            .to_degrees();
        let lon_lo = center.longitude() - half_span;
        let lon_hi = center.longitude() + half_span;
        if lon_lo < -180.0 {
            vec![
                band(-180.0, lat_lo, lon_hi, lat_hi),
                band(lon_lo + 360.0, lat_lo, 180.0, lat_hi),
            ]
        } else if lon_hi > 180.0 {
            vec![
                band(lon_lo, lat_lo, 180.0, lat_hi),
                band(-180.0, lat_lo, lon_hi - 360.0, lat_hi),
            ]
        } else {
            vec![band(lon_lo, lat_lo, lon_hi, lat_hi)]
        }
    }
}

/// One indexed value: a position and whatever payload travels with it.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<D: Domain, P = ()> {
    pub position: Point<D>,
    pub payload: P,
}

impl<D: Domain, P> Entry<D, P> {
    pub fn new(position: Point<D>, payload: P) -> Self {
        Entry { position, payload }
    }
}

impl<D: Domain> Entry<D, ()> {
    /// An entry with no payload.
    pub fn point(position: Point<D>) -> Self {
        Entry {
            position,
            payload: (),
        }
    }
}

impl<D: Domain, P> RTreeObject for Entry<D, P> {
    type Envelope = AABB<D::Coords>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position.coords())
    }
}

impl<D: Domain, P> PointDistance for Entry<D, P> {
    fn distance_2(&self, point: &D::Coords) -> f64 {
        self.position
            .as_slice()
            .iter()
            .zip(point.as_ref())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }
}

/// The spatial index.
///
/// Bulk construction via [`RTree::from_points`] yields the same logical
/// contents as repeated [`RTree::insert`] calls, usually in a better
/// balanced shape.
#[derive(Debug, Clone)]
pub struct RTree<D: Domain, P = ()> {
    tree: RStarTree<Entry<D, P>>,
}

impl<D: Domain, P> Default for RTree<D, P> {
    fn default() -> Self {
        RTree::new()
    }
}

impl<D: Domain, P> RTree<D, P> {
    pub fn new() -> Self {
        RTree {
            tree: RStarTree::new(),
        }
    }

    /// Bulk-loads the entries.
    pub fn from_points<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Entry<D, P>>,
    {
        RTree {
            tree: RStarTree::bulk_load(entries.into_iter().collect()),
        }
    }

    pub fn insert(&mut self, entry: Entry<D, P>) {
        self.tree.insert(entry);
    }

    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = Entry<D, P>>,
    {
        for entry in entries {
            self.tree.insert(entry);
        }
    }

    /// Removes one entry equal to `entry` (element-wise comparison, not
    /// geometric). Returns whether anything was removed.
    pub fn remove(&mut self, entry: &Entry<D, P>) -> bool
    where
        P: PartialEq,
    {
        self.tree.remove(entry).is_some()
    }

    /// Removes one matching element per item of `entries`; returns how
    /// many were removed.
    pub fn remove_all<'a, I>(&mut self, entries: I) -> usize
    where
        P: PartialEq + 'a,
        I: IntoIterator<Item = &'a Entry<D, P>>,
        D: 'a,
    {
        entries
            .into_iter()
            .filter(|entry| self.remove(entry))
            .count()
    }

    pub fn clear(&mut self) {
        self.tree = RStarTree::new();
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<D, P>> {
        self.tree.iter()
    }

    fn query_envelope(bounds: &BoundingBox<D>) -> AABB<D::Coords> {
        AABB::from_corners(bounds.min_corner().coords(), bounds.max_corner().coords())
    }

    /// Entries whose position is covered by `bounds`, border included.
    pub fn find_points_inside_box(&self, bounds: &BoundingBox<D>) -> Vec<&Entry<D, P>> {
        self.tree
            .locate_in_envelope(&Self::query_envelope(bounds))
            .collect()
    }

    /// Entries strictly inside `bounds` (open interior).
    pub fn find_points_strictly_inside_box(&self, bounds: &BoundingBox<D>) -> Vec<&Entry<D, P>> {
        self.tree
            .locate_in_envelope(&Self::query_envelope(bounds))
            .filter(|entry| bounds.strictly_contains(&entry.position))
            .collect()
    }

    /// Entries whose geometry is not disjoint from `bounds`. For point
    /// entries this is the same set as [`RTree::find_points_inside_box`].
    pub fn intersects_box(&self, bounds: &BoundingBox<D>) -> Vec<&Entry<D, P>> {
        self.tree
            .locate_in_envelope_intersecting(&Self::query_envelope(bounds))
            .collect()
    }

    /// The `k` entries closest to `query`, ascending by domain distance.
    /// A stored entry at the query position is part of the answer.
    ///
    /// The search seeds a radius from the `k` raw-coordinate nearest
    /// candidates — a ball already holding `k` entries bounds the true
    /// answer — then gathers everything inside that ball's
    /// [`MetricBall::ball_bounds`] cover and ranks it by the domain
    /// metric. Chart distance alone would misrank across the
    /// antimeridian and near the poles.
    pub fn find_nearest_neighbors(&self, query: &Point<D>, k: usize) -> Vec<&Entry<D, P>>
    where
        D: MetricBall,
    {
        if k == 0 {
            return Vec::new();
        }
        if self.len() <= k {
            let mut all: Vec<&Entry<D, P>> = self.tree.iter().collect();
            sort_by_domain_distance(query, &mut all);
            return all;
        }
        let radius = self
            .tree
            .nearest_neighbor_iter(&query.coords())
            .take(k)
            .map(|entry| D::distance(query, &entry.position))
            .fold(0.0, f64::max);
        let mut found: Vec<&Entry<D, P>> = D::ball_bounds(query, radius)
            .iter()
            .flat_map(|bounds| self.tree.locate_in_envelope(&Self::query_envelope(bounds)))
            .collect();
        if found.len() < k {
            // Degenerate cover (coincident raw representations); fall
            // back to ranking the whole tree.
            found = self.tree.iter().collect();
        }
        sort_by_domain_distance(query, &mut found);
        found.truncate(k);
        found
    }
}

fn sort_by_domain_distance<D: Domain, P>(query: &Point<D>, entries: &mut [&Entry<D, P>]) {
    entries.sort_by(|a, b| {
        D::distance(query, &a.position)
            .partial_cmp(&D::distance(query, &b.position))
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracktable_types::{Cartesian2d, Spherical};

    fn grid_tree() -> RTree<Cartesian2d, usize> {
        let mut entries = Vec::new();
        let mut payload = 0;
        for x in 0..5 {
            for y in 0..5 {
                entries.push(Entry::new(Point::xy(x as f64, y as f64), payload));
                payload += 1;
            }
        }
        RTree::from_points(entries)
    }

    #[test]
    fn box_query_includes_the_border() {
        let tree = grid_tree();
        let bounds =
            BoundingBox::new(Point::xy(1.0, 1.0), Point::xy(3.0, 3.0)).expect("valid box");
        assert_eq!(tree.find_points_inside_box(&bounds).len(), 9);
        assert_eq!(tree.find_points_strictly_inside_box(&bounds).len(), 1);
        assert_eq!(tree.intersects_box(&bounds).len(), 9);
    }

    #[test]
    fn bulk_load_matches_incremental_inserts(){
        let bulk = grid_tree();
        let mut incremental: RTree<Cartesian2d, usize> = RTree::new();
        let mut payload = 0;
        for x in 0..5 {
            for y in 0..5 {
                incremental.insert(Entry::new(Point::xy(x as f64, y as f64), payload));
                payload += 1;
            }
        }
        assert_eq!(bulk.len(), incremental.len());
        let bounds =
            BoundingBox::new(Point::xy(0.0, 0.0), Point::xy(1.0, 4.0)).expect("valid box");
        let mut a: Vec<usize> = bulk
            .find_points_inside_box(&bounds)
            .iter()
            .map(|e| e.payload)
            .collect();
        let mut b: Vec<usize> = incremental
            .find_points_inside_box(&bounds)
            .iter()
            .map(|e| e.payload)
            .collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn nearest_neighbors_ascend_and_include_self() {
        let tree = grid_tree();
        let query = Point::xy(2.0, 2.0);
        let neighbors = tree.find_nearest_neighbors(&query, 5);
        assert_eq!(neighbors.len(), 5);
        assert_eq!(neighbors[0].position, query);
        let distances: Vec<f64> = neighbors
            .iter()
            .map(|e| Cartesian2d::distance(&query, &e.position))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn nearest_neighbors_on_a_sphere_use_kilometers() {
        let tree: RTree<Spherical, &str> = RTree::from_points(vec![
            Entry::new(Point::lon_lat(-106.4850, 31.7619), "el paso"),
            Entry::new(Point::lon_lat(-98.6544, 29.4813), "san antonio"),
            Entry::new(Point::lon_lat(-106.7794, 32.3199), "las cruces"),
        ]);
        let albuquerque = Point::lon_lat(-106.6504, 35.0844);
        let neighbors = tree.find_nearest_neighbors(&albuquerque, 2);
        assert_eq!(neighbors[0].payload, "las cruces");
        assert_eq!(neighbors[1].payload, "el paso");
    }

    #[test]
    fn spherical_nearest_ranks_by_great_circle_not_chart_distance() {
        // Chart distance prefers the southern point (19.6 degrees of
        // raw separation against 170.0), but along great circles the
        // polar point is ~122 km away against ~2113 km.
        let tree: RTree<Spherical, &str> = RTree::from_points(vec![
            Entry::new(Point::lon_lat(170.0, 89.9), "near the pole"),
            Entry::new(Point::lon_lat(5.0, 70.0), "down south"),
            Entry::new(Point::lon_lat(20.0, 40.0), "mid latitudes"),
        ]);
        let query = Point::lon_lat(0.0, 89.0);
        let nearest = tree.find_nearest_neighbors(&query, 1);
        assert_eq!(nearest.len(), 1);
        assert_eq!(nearest[0].payload, "near the pole");

        let two = tree.find_nearest_neighbors(&query, 2);
        assert_eq!(two[0].payload, "near the pole");
        assert_eq!(two[1].payload, "down south");
    }

    #[test]
    fn spherical_nearest_crosses_the_antimeridian() {
        let tree: RTree<Spherical, &str> = RTree::from_points(vec![
            Entry::new(Point::lon_lat(-179.8, 0.2), "across the dateline"),
            Entry::new(Point::lon_lat(170.0, 0.0), "same side"),
            Entry::new(Point::lon_lat(0.0, 0.0), "far away"),
            Entry::new(Point::lon_lat(-90.0, 45.0), "farther still"),
        ]);
        let query = Point::lon_lat(179.5, 0.0);
        let nearest = tree.find_nearest_neighbors(&query, 2);
        assert_eq!(nearest[0].payload, "across the dateline");
        assert_eq!(nearest[1].payload, "same side");
    }

    #[test]
    fn cap_cover_splits_and_widens() {
        // A cap crossing the antimeridian covers both edge strips.
        let split = Spherical::ball_bounds(&Point::lon_lat(179.5, 0.0), 1100.0);
        assert_eq!(split.len(), 2);
        let across = Point::lon_lat(-179.8, 0.2);
        assert!(split.iter().any(|bounds| bounds.contains(&across)));

        // A cap reaching the pole spans every longitude.
        let polar = Spherical::ball_bounds(&Point::lon_lat(0.0, 89.0), 2200.0);
        assert_eq!(polar.len(), 1);
        assert!(polar[0].contains(&Point::lon_lat(170.0, 89.9)));
        assert!(!polar[0].contains(&Point::lon_lat(0.0, 40.0)));
    }

    #[test]
    fn remove_compares_elementwise() {
        let mut tree = grid_tree();
        let present = Entry::new(Point::xy(0.0, 0.0), 0usize);
        let wrong_payload = Entry::new(Point::xy(0.0, 0.0), 99usize);
        assert!(!tree.remove(&wrong_payload));
        assert!(tree.remove(&present));
        assert!(!tree.remove(&present));
        assert_eq!(tree.len(), 24);
    }

    #[test]
    fn clear_empties_the_tree() {
        let mut tree = grid_tree();
        assert!(!tree.is_empty());
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }
}
