use super::distance_2d::point_to_segment_dist;
use super::intersect_2d::segments_intersect;
use super::Point2;

/// Computes the signed area of a polygon (shoelace formula).
///
/// With the y axis pointing down, a positive area means the points turn
/// clockwise on screen.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `points` ordered so that their signed area is positive.
#[must_use]
pub fn with_positive_area(points: &[Point2]) -> Vec<Point2> {
    let mut oriented = points.to_vec();
    if signed_area(points) < 0.0 {
        oriented.reverse();
    }
    oriented
}

/// Even-odd containment test of `point` in the closed polygon `points`.
#[must_use]
pub fn contains_point(points: &[Point2], point: &Point2) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &points[i];
        let pj = &points[j];
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Returns `true` if `point` is inside the polygon or closer than `margin`
/// to one of its edges.
///
/// When `closed` is `false`, the edge from the last point back to the first
/// is ignored and only the proximity test applies.
#[must_use]
pub fn contains_point_with_margin(
    points: &[Point2],
    point: &Point2,
    margin: f64,
    closed: bool,
) -> bool {
    if closed && contains_point(points, point) {
        return true;
    }
    distance_to_outline(points, point, closed) <= margin
}

/// Smallest distance between `point` and the outline of `points`.
#[must_use]
pub fn distance_to_outline(points: &[Point2], point: &Point2, closed: bool) -> f64 {
    match points.len() {
        0 => f64::INFINITY,
        1 => (points[0] - point).norm(),
        n => {
            let edge_count = if closed { n } else { n - 1 };
            (0..edge_count)
                .map(|i| {
                    let a = &points[i];
                    let b = &points[(i + 1) % n];
                    point_to_segment_dist(point, a, b)
                })
                .fold(f64::INFINITY, f64::min)
        }
    }
}

/// Axis-aligned bounding box `(min, max)` of `points`, or `None` when empty.
#[must_use]
pub fn bounding_box(points: &[Point2]) -> Option<(Point2, Point2)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

/// Returns `true` if the closed polygon (or open polyline when `closed` is
/// `false`) intersects the axis-aligned rectangle spanned by `corner0` and
/// `corner1`.
#[must_use]
pub fn intersects_rectangle(
    points: &[Point2],
    corner0: &Point2,
    corner1: &Point2,
    closed: bool,
) -> bool {
    let min = Point2::new(corner0.x.min(corner1.x), corner0.y.min(corner1.y));
    let max = Point2::new(corner0.x.max(corner1.x), corner0.y.max(corner1.y));
    let inside_rect =
        |p: &Point2| p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y;
    if points.iter().any(inside_rect) {
        return true;
    }
    let rectangle = [
        min,
        Point2::new(max.x, min.y),
        max,
        Point2::new(min.x, max.y),
    ];
    if closed && rectangle.iter().any(|corner| contains_point(points, corner)) {
        return true;
    }
    let n = points.len();
    let edge_count = if closed { n } else { n.saturating_sub(1) };
    (0..edge_count).any(|i| {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        (0..4).any(|k| segments_intersect(a, b, &rectangle[k], &rectangle[(k + 1) % 4]))
    })
}

/// Removes consecutive duplicates and points aligned with their neighbours
/// from a closed polygon.
#[must_use]
pub fn remove_aligned_points(points: &[Point2], tolerance: f64) -> Vec<Point2> {
    let mut result: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if result
            .last()
            .is_none_or(|last: &Point2| (last - p).norm() > tolerance)
        {
            result.push(*p);
        }
    }
    while result.len() > 1 && (result[0] - result[result.len() - 1]).norm() <= tolerance {
        result.pop();
    }

    let mut changed = true;
    while changed && result.len() > 3 {
        changed = false;
        let n = result.len();
        for i in 0..n {
            let prev = result[(i + n - 1) % n];
            let next = result[(i + 1) % n];
            if point_to_segment_dist(&result[i], &prev, &next) <= tolerance {
                result.remove(i);
                changed = true;
                break;
            }
        }
    }
    result
}

/// Corners of a rectangle of size `width` × `depth` centered on `center`
/// and rotated by `angle`, starting at the back left corner.
#[must_use]
pub fn rectangle_points(center: &Point2, width: f64, depth: f64, angle: f64) -> [Point2; 4] {
    let (sin, cos) = angle.sin_cos();
    let corner = |dx: f64, dy: f64| {
        Point2::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos,
        )
    };
    let hw = width / 2.0;
    let hd = depth / 2.0;
    [
        corner(-hw, -hd),
        corner(hw, -hd),
        corner(hw, hd),
        corner(-hw, hd),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{pt, TOLERANCE};

    fn square() -> Vec<Point2> {
        vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)]
    }

    #[test]
    fn signed_area_depends_on_orientation() {
        let mut points = square();
        assert!((signed_area(&points) - 100.0).abs() < TOLERANCE);
        points.reverse();
        assert!((signed_area(&points) + 100.0).abs() < TOLERANCE);
        assert!(signed_area(&points[..2]).abs() < TOLERANCE);
    }

    #[test]
    fn containment() {
        let points = square();
        assert!(contains_point(&points, &pt(5.0, 5.0)));
        assert!(!contains_point(&points, &pt(15.0, 5.0)));
        assert!(contains_point_with_margin(&points, &pt(11.0, 5.0), 1.5, true));
        assert!(!contains_point_with_margin(&points, &pt(5.0, 5.0), 1.0, false));
    }

    #[test]
    fn rectangle_intersection() {
        let points = square();
        assert!(intersects_rectangle(&points, &pt(-5.0, -5.0), &pt(1.0, 1.0), true));
        // Rectangle fully inside the polygon.
        assert!(intersects_rectangle(&points, &pt(4.0, 4.0), &pt(6.0, 6.0), true));
        // Edge crossing without contained vertices.
        assert!(intersects_rectangle(&points, &pt(-1.0, 4.0), &pt(11.0, 6.0), true));
        assert!(!intersects_rectangle(&points, &pt(20.0, 20.0), &pt(30.0, 30.0), true));
    }

    #[test]
    fn aligned_points_removed() {
        let points = vec![
            pt(0.0, 0.0),
            pt(5.0, 0.0),
            pt(10.0, 0.0),
            pt(10.0, 10.0),
            pt(10.0, 10.0),
            pt(0.0, 10.0),
            pt(0.0, 0.0),
        ];
        let cleaned = remove_aligned_points(&points, 1e-6);
        assert_eq!(cleaned.len(), 4);
    }

    #[test]
    fn rotated_rectangle() {
        let corners = rectangle_points(&pt(0.0, 0.0), 20.0, 10.0, std::f64::consts::FRAC_PI_2);
        assert!((corners[0].x - 5.0).abs() < 1e-9);
        assert!((corners[0].y + 10.0).abs() < 1e-9);
        let (min, max) = bounding_box(&corners).unwrap();
        assert!((max.x - min.x - 10.0).abs() < 1e-9);
        assert!((max.y - min.y - 20.0).abs() < 1e-9);
    }
}
