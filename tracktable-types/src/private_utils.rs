// Planar predicates shared between the domain kernel and the algorithm
// crate. This hidden module is public so the `tracktable` crate can reuse
// them without duplication; they are _not_ meant for public consumption.

/// Does `p` lie on the closed segment `a -> b`?
pub fn point_on_segment(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> bool {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let tx = if dx == 0.0 { None } else { Some((p[0] - a[0]) / dx) };
    let ty = if dy == 0.0 { None } else { Some((p[1] - a[1]) / dy) };
    match (tx, ty) {
        // Degenerate segment
        (None, None) => p == a,
        // Horizontal segment
        (Some(t), None) => p[1] == a[1] && (0.0..=1.0).contains(&t),
        // Vertical segment
        (None, Some(t)) => p[0] == a[0] && (0.0..=1.0).contains(&t),
        (Some(t_x), Some(t_y)) => (t_x - t_y).abs() <= f64::EPSILON && (0.0..=1.0).contains(&t_x),
    }
}

/// Do the closed segments `p1 -> p2` and `q1 -> q2` share a point?
///
/// Uses Cramer's rule for the general position case and falls back to
/// collinear-overlap checks for parallel input.
pub fn segments_intersect(p1: [f64; 2], p2: [f64; 2], q1: [f64; 2], q2: [f64; 2]) -> bool {
    let a1 = p2[0] - p1[0];
    let a2 = p2[1] - p1[1];
    let b1 = q1[0] - q2[0];
    let b2 = q1[1] - q2[1];
    let c1 = q1[0] - p1[0];
    let c2 = q1[1] - p1[1];

    let d = a1 * b2 - a2 * b1;
    if d == 0.0 {
        // Parallel: they can only meet if collinear and overlapping.
        let cross = a1 * c2 - a2 * c1;
        if cross != 0.0 {
            return false;
        }
        point_on_segment(q1, p1, p2)
            || point_on_segment(q2, p1, p2)
            || point_on_segment(p1, q1, q2)
            || point_on_segment(p2, q1, q2)
    } else {
        let s = (c1 * b2 - c2 * b1) / d;
        let t = (a1 * c2 - a2 * c1) / d;
        (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t)
    }
}
