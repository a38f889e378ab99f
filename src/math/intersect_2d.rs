use super::Point2;

/// Slope above which a line is considered vertical.
const VERTICAL_SLOPE: f64 = 4000.0;

/// Intersection of the infinite line through `p1`, `p2` with the infinite
/// line through `p3`, `p4`.
///
/// Slopes are compared with explicit thresholds: a line steeper than
/// 4000 is handled as vertical, and lines whose slopes differ by less than
/// 1e-5 (or by a ratio below 1.004) are parallel. Returns `None` for
/// parallel lines and for any non-finite result.
#[must_use]
pub fn line_intersection(p1: &Point2, p2: &Point2, p3: &Point2, p4: &Point2) -> Option<Point2> {
    let alpha1 = (p2.y - p1.y) / (p2.x - p1.x);
    let beta1 = p2.y - alpha1 * p2.x;
    let alpha2 = (p4.y - p3.y) / (p4.x - p3.x);
    let beta2 = p4.y - alpha2 * p4.x;

    let vertical1 = !alpha1.is_finite() || alpha1.abs() > VERTICAL_SLOPE;
    let vertical2 = !alpha2.is_finite() || alpha2.abs() > VERTICAL_SLOPE;

    let point = if vertical1 && vertical2 {
        return None;
    } else if vertical1 {
        Point2::new(p1.x, alpha2 * p1.x + beta2)
    } else if vertical2 {
        Point2::new(p3.x, alpha1 * p3.x + beta1)
    } else {
        let same_sign = alpha1.signum() == alpha2.signum();
        let ratio = if alpha1.abs() > alpha2.abs() {
            alpha1 / alpha2
        } else {
            alpha2 / alpha1
        };
        if (alpha1 - alpha2).abs() <= 1e-5 || (same_sign && ratio <= 1.004) {
            return None;
        }
        let x = (beta2 - beta1) / (alpha1 - alpha2);
        Point2::new(x, alpha1 * x + beta1)
    };

    (point.x.is_finite() && point.y.is_finite()).then_some(point)
}

/// Returns `true` if the two closed segments touch or cross.
#[must_use]
pub fn segments_intersect(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    relative_ccw(a0, a1, b0) * relative_ccw(a0, a1, b1) <= 0
        && relative_ccw(b0, b1, a0) * relative_ccw(b0, b1, a1) <= 0
}

/// Indicates where `point` lies with respect to the segment `start`→`end`.
///
/// Returns 1 or -1 depending on the side of the line the point is on, and 0
/// when the point lies on the segment itself. Points collinear with the
/// segment but beyond one of its ends get the sign of that end.
#[must_use]
pub fn relative_ccw(start: &Point2, end: &Point2, point: &Point2) -> i32 {
    let x2 = end.x - start.x;
    let y2 = end.y - start.y;
    let mut px = point.x - start.x;
    let mut py = point.y - start.y;
    let mut ccw = px * y2 - py * x2;
    if ccw == 0.0 {
        ccw = px * x2 + py * y2;
        if ccw > 0.0 {
            px -= x2;
            py -= y2;
            ccw = px * x2 + py * y2;
            if ccw < 0.0 {
                ccw = 0.0;
            }
        }
    }
    if ccw < 0.0 {
        -1
    } else {
        i32::from(ccw > 0.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::pt;

    #[test]
    fn perpendicular_lines_intersect() {
        let p = line_intersection(&pt(0.0, 0.0), &pt(10.0, 0.0), &pt(5.0, -5.0), &pt(5.0, 5.0))
            .unwrap();
        assert!((p.x - 5.0).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }

    #[test]
    fn oblique_lines_intersect() {
        let p = line_intersection(&pt(0.0, 0.0), &pt(1.0, 1.0), &pt(0.0, 2.0), &pt(2.0, 0.0))
            .unwrap();
        assert!((p.x - 1.0).abs() < 1e-9);
        assert!((p.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn parallel_lines_have_no_intersection() {
        assert!(
            line_intersection(&pt(0.0, 0.0), &pt(10.0, 1.0), &pt(0.0, 5.0), &pt(10.0, 6.0))
                .is_none()
        );
        assert!(
            line_intersection(&pt(0.0, 0.0), &pt(0.0, 10.0), &pt(5.0, 0.0), &pt(5.0, 10.0))
                .is_none()
        );
    }

    #[test]
    fn relative_ccw_sides() {
        let a = pt(0.0, 0.0);
        let b = pt(10.0, 0.0);
        assert_eq!(relative_ccw(&a, &b, &pt(5.0, 5.0)), -relative_ccw(&a, &b, &pt(5.0, -5.0)));
        assert_eq!(relative_ccw(&a, &b, &pt(5.0, 0.0)), 0);
        assert_eq!(relative_ccw(&a, &b, &pt(15.0, 0.0)), 1);
        assert_eq!(relative_ccw(&a, &b, &pt(-5.0, 0.0)), -1);
    }

    #[test]
    fn crossing_segments() {
        assert!(segments_intersect(&pt(0.0, 0.0), &pt(10.0, 10.0), &pt(0.0, 10.0), &pt(10.0, 0.0)));
        assert!(!segments_intersect(&pt(0.0, 0.0), &pt(1.0, 1.0), &pt(5.0, 0.0), &pt(6.0, 0.0)));
    }
}
