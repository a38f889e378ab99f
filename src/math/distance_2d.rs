use super::Point2;

/// Parameter of the orthogonal projection of `point` on the line through
/// `a` and `b`, `0` at `a` and `1` at `b`. Degenerate segments return 0.
#[must_use]
pub fn projection_ratio(point: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < 1e-20 {
        return 0.0;
    }
    (point - a).dot(&d) / len_sq
}

/// Closest point to `point` on the segment from `a` to `b`.
#[must_use]
pub fn closest_point_on_segment(point: &Point2, a: &Point2, b: &Point2) -> Point2 {
    let t = projection_ratio(point, a, b).clamp(0.0, 1.0);
    a + (b - a) * t
}

/// Returns the minimum distance from `point` to the segment from `a` to `b`.
#[must_use]
pub fn point_to_segment_dist(point: &Point2, a: &Point2, b: &Point2) -> f64 {
    (point - closest_point_on_segment(point, a, b)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pt;

    #[test]
    fn distance_to_segment_interior_and_ends() {
        let a = pt(0.0, 0.0);
        let b = pt(10.0, 0.0);
        assert!((point_to_segment_dist(&pt(5.0, 3.0), &a, &b) - 3.0).abs() < 1e-12);
        assert!((point_to_segment_dist(&pt(13.0, 4.0), &a, &b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_segment_uses_endpoint() {
        let a = pt(1.0, 1.0);
        assert!((point_to_segment_dist(&pt(4.0, 5.0), &a, &a) - 5.0).abs() < 1e-12);
        assert!(projection_ratio(&pt(4.0, 5.0), &a, &a).abs() < 1e-12);
    }
}
