//! Circle and arc math for curved walls.
//!
//! A wall arc is described by its two ends and a signed *arc extent* in
//! radians. With the y axis pointing down, the points of the arc are
//! `center + radius * (cos φ, sin φ)` with `φ` going from the start angle to
//! `start_angle - extent`.

use std::f64::consts::{PI, TAU};

use super::{normalize_angle, Point2, TOLERANCE};

/// Angle step used to tessellate arcs.
const ARC_STEP: f64 = PI / 36.0;

/// Center of the circle going through the three given points, or `None`
/// when they are aligned.
#[must_use]
pub fn circumscribed_circle_center(a: &Point2, b: &Point2, c: &Point2) -> Option<Point2> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < TOLERANCE {
        return None;
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    (ux.is_finite() && uy.is_finite()).then(|| Point2::new(ux, uy))
}

/// Center of the circle supporting an arc of `extent` radians joining
/// `start` to `end`.
#[must_use]
pub fn arc_circle_center(start: &Point2, end: &Point2, extent: f64) -> Point2 {
    let chord = (end - start).norm();
    let center_angle = if extent.abs() > PI {
        -(PI + extent) / 2.0
    } else {
        (PI - extent) / 2.0
    };
    let center_to_chord = center_angle.tan() * chord / 2.0;
    let middle = Point2::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
    let angle = (start.x - end.x).atan2(end.y - start.y);
    Point2::new(
        middle.x + center_to_chord * angle.cos(),
        middle.y + center_to_chord * angle.sin(),
    )
}

/// Signed arc extent of the arc joining `start` to `end` through `point`.
///
/// Returns `None` when the three points are aligned, meaning a straight wall.
#[must_use]
pub fn arc_extent_through(start: &Point2, end: &Point2, point: &Point2) -> Option<f64> {
    let center = circumscribed_circle_center(start, end, point)?;
    let start_angle = (start.y - center.y).atan2(start.x - center.x);
    let end_angle = (end.y - center.y).atan2(end.x - center.x);
    let point_angle = (point.y - center.y).atan2(point.x - center.x);
    let ccw_sweep = normalize_angle(end_angle - start_angle);
    let to_point = normalize_angle(point_angle - start_angle);
    let sweep = if to_point < ccw_sweep {
        ccw_sweep
    } else {
        ccw_sweep - TAU
    };
    Some(-sweep)
}

/// Radius of the arc of `extent` radians joining `start` to `end`.
#[must_use]
pub fn arc_radius(start: &Point2, end: &Point2, extent: f64) -> f64 {
    let center = arc_circle_center(start, end, extent);
    (start - center).norm()
}

/// Points of the arc of `extent` radians joining `start` to `end`, moved
/// radially by `radial_offset` (positive away from the center).
///
/// The first and last points are the (offset) ends of the arc.
#[must_use]
pub fn arc_points(start: &Point2, end: &Point2, extent: f64, radial_offset: f64) -> Vec<Point2> {
    let center = arc_circle_center(start, end, extent);
    let radius = (start - center).norm() + radial_offset;
    let start_angle = (start.y - center.y).atan2(start.x - center.x);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = ((extent.abs() / ARC_STEP).ceil() as usize).max(2);
    (0..=steps)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / steps as f64;
            let angle = start_angle - extent * t;
            Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// Length of the arc of `extent` radians joining `start` to `end`.
#[must_use]
pub fn arc_length(start: &Point2, end: &Point2, extent: f64) -> f64 {
    arc_radius(start, end, extent) * extent.abs()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::pt;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn quarter_arc_center() {
        let c = arc_circle_center(&pt(0.0, 0.0), &pt(100.0, 0.0), FRAC_PI_2);
        assert!((c.x - 50.0).abs() < 1e-9, "cx={}", c.x);
        assert!((c.y + 50.0).abs() < 1e-9, "cy={}", c.y);
        let mirrored = arc_circle_center(&pt(0.0, 0.0), &pt(100.0, 0.0), -FRAC_PI_2);
        assert!((mirrored.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn extent_through_middle_point() {
        let radius = 50.0 * 2.0_f64.sqrt();
        let middle = pt(50.0, -50.0 + radius);
        let extent = arc_extent_through(&pt(0.0, 0.0), &pt(100.0, 0.0), &middle).unwrap();
        assert!((extent - FRAC_PI_2).abs() < 1e-9, "extent={extent}");
    }

    #[test]
    fn extent_matches_center() {
        let start = pt(10.0, 20.0);
        let end = pt(200.0, -40.0);
        let through = pt(80.0, 90.0);
        let extent = arc_extent_through(&start, &end, &through).unwrap();
        let expected = circumscribed_circle_center(&start, &end, &through).unwrap();
        let center = arc_circle_center(&start, &end, extent);
        assert!((center - expected).norm() < 1e-6);
        let points = arc_points(&start, &end, extent, 0.0);
        assert!((points[0] - start).norm() < 1e-6);
        assert!((points[points.len() - 1] - end).norm() < 1e-6);
    }

    #[test]
    fn aligned_points_have_no_extent() {
        assert!(arc_extent_through(&pt(0.0, 0.0), &pt(10.0, 0.0), &pt(5.0, 0.0)).is_none());
    }

    #[test]
    fn semicircle_length() {
        let length = arc_length(&pt(0.0, 0.0), &pt(100.0, 0.0), PI);
        assert!((length - 50.0 * PI).abs() < 1e-6);
    }
}
