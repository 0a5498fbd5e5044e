//! Density-based clustering with box-shaped neighborhoods.
//!
//! The classic DBSCAN state machine (Ester, Kriegel, Sander & Xu 1996)
//! over the crate's [`RTree`]: a point whose axis-aligned neighborhood
//! box holds at least the minimum cluster size (itself included) founds
//! or extends a cluster; everything unreachable that way lands in the
//! reserved noise cluster `0`. Real clusters are numbered from 1 in the
//! order they are first created, and labels come back in input order.

use crate::index::{Entry, RTree};
use log::debug;
use std::collections::VecDeque;
use tracktable_types::{BoundingBox, Domain, Error, Point};

/// The cluster identifier reserved for noise.
pub const NOISE_CLUSTER: usize = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PointState {
    Unvisited,
    Noise,
    Queued,
    Clustered(usize),
}

/// Labels `points` with cluster identifiers.
///
/// `half_span` gives the per-dimension half-width of the axis-aligned
/// neighborhood box around each point; every component must be
/// non-negative. With `euclidean_refine` set, box neighbors outside the
/// inscribed ellipsoid (normalized squared offset above one) are
/// discarded before counting.
///
/// Returns one label per input point, in input order: `0` for noise,
/// cluster ids from 1 upward in creation order. Empty input produces an
/// empty label vector. The spatial index is built once per call; reuse
/// [`dbscan_with_index`] when clustering the same point set repeatedly.
pub fn dbscan<D: Domain>(
    points: &[Point<D>],
    half_span: &Point<D>,
    min_cluster_size: usize,
    euclidean_refine: bool,
) -> Result<Vec<usize>, Error> {
    let index = RTree::from_points(
        points
            .iter()
            .enumerate()
            .map(|(position_index, point)| Entry::new(*point, position_index)),
    );
    dbscan_with_index(&index, points, half_span, min_cluster_size, euclidean_refine)
}

/// [`dbscan`] against a caller-supplied index whose payloads are indices
/// into `points`. Building the index dominates the runtime on small
/// inputs, so this is the entry point when the same set is clustered
/// with several parameter choices.
pub fn dbscan_with_index<D: Domain>(
    index: &RTree<D, usize>,
    points: &[Point<D>],
    half_span: &Point<D>,
    min_cluster_size: usize,
    euclidean_refine: bool,
) -> Result<Vec<usize>, Error> {
    for dimension in 0..D::DIMENSION {
        if half_span[dimension] < 0.0 {
            return Err(Error::NegativeHalfSpan { dimension });
        }
    }

    let n = points.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if min_cluster_size == 0 || min_cluster_size > n {
        return Ok(vec![NOISE_CLUSTER; n]);
    }

    let neighborhood = |center: &Point<D>| -> Vec<usize> {
        let bounds = BoundingBox::from_points([*center - *half_span, *center + *half_span])
            .expect("a two-corner point set is never empty");
        index
            .find_points_inside_box(&bounds)
            .into_iter()
            .filter(|entry| {
                !euclidean_refine || within_ellipsoid(center, &entry.position, half_span)
            })
            .map(|entry| entry.payload)
            .collect()
    };

    let mut states = vec![PointState::Unvisited; n];
    let mut cluster_count = 0usize;

    let mut neighbors_buf: Vec<usize> = Vec::with_capacity(min_cluster_size);
    let mut queue: VecDeque<usize> = VecDeque::new();

    for point_index in 0..n {
        if states[point_index] != PointState::Unvisited {
            continue;
        }

        queue.clear();
        queue.extend(neighborhood(&points[point_index]));

        if queue.len() < min_cluster_size {
            states[point_index] = PointState::Noise;
            continue;
        }

        // Found a core point; grow a new cluster from it.
        cluster_count += 1;
        let cluster_id = cluster_count;
        states[point_index] = PointState::Clustered(cluster_id);

        for &neighbor in &queue {
            if matches!(states[neighbor], PointState::Unvisited | PointState::Noise) {
                states[neighbor] = PointState::Queued;
            }
        }

        // Breadth-first expansion; iterative so deep clusters cannot
        // overflow the stack.
        while let Some(current) = queue.pop_front() {
            if states[current] != PointState::Queued {
                continue;
            }
            states[current] = PointState::Clustered(cluster_id);

            neighbors_buf.clear();
            neighbors_buf.extend(neighborhood(&points[current]));

            if neighbors_buf.len() >= min_cluster_size {
                for &neighbor in &neighbors_buf {
                    if matches!(states[neighbor], PointState::Unvisited | PointState::Noise) {
                        queue.push_back(neighbor);
                        states[neighbor] = PointState::Queued;
                    }
                }
            }
        }
    }

    debug!(
        "dbscan: {} points -> {} clusters (min size {}, refine {})",
        n, cluster_count, min_cluster_size, euclidean_refine
    );

    Ok(states
        .into_iter()
        .map(|state| match state {
            PointState::Clustered(id) => id,
            _ => NOISE_CLUSTER,
        })
        .collect())
}

fn within_ellipsoid<D: Domain>(
    center: &Point<D>,
    candidate: &Point<D>,
    half_span: &Point<D>,
) -> bool {
    let mut norm = 0.0;
    for i in 0..D::DIMENSION {
        let offset = candidate[i] - center[i];
        let span = half_span[i];
        if span == 0.0 {
            if offset != 0.0 {
                return false;
            }
        } else {
            norm += (offset / span) * (offset / span);
        }
    }
    norm <= 1.0
}

/// Reshapes per-point labels into per-cluster membership lists, ordered
/// by ascending cluster id; index 0 holds the noise points.
pub fn cluster_members(labels: &[usize]) -> Vec<Vec<usize>> {
    let clusters = labels.iter().copied().max().map_or(0, |top| top + 1);
    let mut members = vec![Vec::new(); clusters];
    for (point_index, &label) in labels.iter().enumerate() {
        members[label].push(point_index);
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracktable_types::Cartesian2d;

    fn two_blobs() -> Vec<Point<Cartesian2d>> {
        vec![
            Point::xy(0.0, 0.0),
            Point::xy(1.0, 0.0),
            Point::xy(0.0, 1.0),
            Point::xy(10.0, 10.0),
            Point::xy(11.0, 10.0),
            Point::xy(10.0, 11.0),
        ]
    }

    fn span(x: f64, y: f64) -> Point<Cartesian2d> {
        Point::xy(x, y)
    }

    #[test]
    fn empty_input_yields_no_labels() {
        let labels = dbscan::<Cartesian2d>(&[], &span(1.0, 1.0), 2, false).expect("valid spans");
        assert!(labels.is_empty());
    }

    #[test]
    fn two_clusters_in_creation_order() {
        let labels = dbscan(&two_blobs(), &span(2.0, 2.0), 2, false).expect("valid spans");
        assert_eq!(labels, vec![1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn outlier_lands_in_the_noise_cluster() {
        let mut points = two_blobs();
        points.push(Point::xy(100.0, -50.0));
        let labels = dbscan(&points, &span(2.0, 2.0), 2, false).expect("valid spans");
        assert_eq!(labels[6], NOISE_CLUSTER);
        assert_eq!(&labels[..6], &[1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn border_points_join_but_do_not_found_clusters() {
        let points = vec![
            Point::xy(0.0, 0.0),
            Point::xy(1.0, 0.0),
            Point::xy(0.5, 0.5),
            Point::xy(2.0, 0.0), // reachable only through the core
        ];
        let labels = dbscan(&points, &span(1.5, 1.5), 3, false).expect("valid spans");
        assert_eq!(labels, vec![1, 1, 1, 1]);
    }

    #[test]
    fn min_size_larger_than_input_is_all_noise() {
        let labels = dbscan(&two_blobs(), &span(2.0, 2.0), 10, false).expect("valid spans");
        assert!(labels.iter().all(|&label| label == NOISE_CLUSTER));
    }

    #[test]
    fn ellipsoid_refinement_prunes_box_corners() {
        // The pair sits inside each other's boxes but outside the
        // inscribed ellipses (normalized squared offset 1.62).
        let points = vec![Point::xy(0.0, 0.0), Point::xy(0.9, 0.9)];
        let boxed = dbscan(&points, &span(1.0, 1.0), 2, false).expect("valid spans");
        assert_eq!(boxed, vec![1, 1]);

        let refined = dbscan(&points, &span(1.0, 1.0), 2, true).expect("valid spans");
        assert_eq!(refined, vec![NOISE_CLUSTER, NOISE_CLUSTER]);
    }

    #[test]
    fn negative_half_span_is_rejected() {
        let err = dbscan(&two_blobs(), &span(1.0, -1.0), 2, false).unwrap_err();
        assert_eq!(err, Error::NegativeHalfSpan { dimension: 1 });
    }

    #[test]
    fn reused_index_matches_fresh_runs() {
        let points = two_blobs();
        let index = RTree::from_points(
            points
                .iter()
                .enumerate()
                .map(|(position_index, point)| Entry::new(*point, position_index)),
        );
        let fresh = dbscan(&points, &span(2.0, 2.0), 2, false).expect("valid spans");
        let reused = dbscan_with_index(&index, &points, &span(2.0, 2.0), 2, false)
            .expect("valid spans");
        assert_eq!(fresh, reused);
    }

    #[test]
    fn membership_lists_group_by_cluster() {
        let labels = vec![1, 1, 0, 2, 1, 2];
        let members = cluster_members(&labels);
        assert_eq!(members.len(), 3);
        assert_eq!(members[0], vec![2]);
        assert_eq!(members[1], vec![0, 1, 4]);
        assert_eq!(members[2], vec![3, 5]);
        assert!(cluster_members(&[]).is_empty());
    }
}
