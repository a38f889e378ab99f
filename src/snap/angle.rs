use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use crate::config::LengthUnit;
use crate::math::Point2;

/// Tangents beyond this value are treated as vertical directions.
const MAX_TANGENT: f64 = 1e10;
/// Tangents below this value are treated as horizontal directions.
const MIN_TANGENT: f64 = 1e-10;

/// A point whose direction from a pivot is rounded to the closest angle
/// step, and whose distance to the pivot is rounded to the length unit grid.
///
/// Angles are counted counterclockwise on screen, the y axis pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointWithAngleMagnetism {
    point: Point2,
    angle: f64,
}

impl PointWithAngleMagnetism {
    /// Magnetizes `point` around `pivot`.
    ///
    /// `max_length_delta` is the largest length change the user won't
    /// notice, usually a few pixels converted to centimeters, and
    /// `step_count` the number of allowed directions on a full turn.
    #[must_use]
    pub fn new(
        pivot: &Point2,
        point: &Point2,
        unit: LengthUnit,
        max_length_delta: f64,
        step_count: u32,
    ) -> Self {
        let dx = point.x - pivot.x;
        let dy = point.y - pivot.y;
        if dx == 0.0 && dy == 0.0 {
            return Self {
                point: *point,
                angle: 0.0,
            };
        }
        if dx == 0.0 || dy == 0.0 {
            // Axis aligned directions only need their length magnetized.
            let length = unit.magnetized_length(dx.abs().max(dy.abs()), max_length_delta);
            let (point, angle) = if dx == 0.0 {
                let angle = if dy < 0.0 { FRAC_PI_2 } else { -FRAC_PI_2 };
                (Point2::new(pivot.x, pivot.y + length * dy.signum()), angle)
            } else {
                let angle = if dx > 0.0 { 0.0 } else { PI };
                (Point2::new(pivot.x + length * dx.signum(), pivot.y), angle)
            };
            return Self { point, angle };
        }

        let step = TAU / f64::from(step_count.max(1));
        let angle = (-dy).atan2(dx);
        let previous = (angle / step).floor() * step;
        // The two step directions bracketing the raw direction, ordered so
        // that `first` is the one reached moving along the x axis.
        let (first, second) = if angle.tan() > 0.0 {
            (previous, previous + step)
        } else {
            (previous + step, previous)
        };
        let (tan_first, tan_second) = (first.tan(), second.tan());

        // Compare the candidates in the first quadrant: one keeps the raw x
        // distance on the first direction, the other keeps the raw y distance
        // on the second direction.
        let x_first = dx.abs();
        let y_second = dy.abs();
        let x_second = if tan_second.abs() > MIN_TANGENT {
            y_second / tan_second.abs()
        } else {
            0.0
        };
        let y_first = if tan_first.abs() < MAX_TANGENT {
            x_first * tan_first.abs()
        } else {
            0.0
        };
        let (snapped, magnetism_angle) = if (x_second - x_first).abs() < (y_first - y_second).abs() {
            (Point2::new(pivot.x - dy / tan_second, point.y), second)
        } else {
            (Point2::new(point.x, pivot.y - dx * tan_first), first)
        };

        let length = unit.magnetized_length((snapped - pivot).norm(), max_length_delta);
        let (sin, cos) = magnetism_angle.sin_cos();
        Self {
            point: Point2::new(pivot.x + length * cos, pivot.y - length * sin),
            angle: magnetism_angle,
        }
    }

    #[must_use]
    pub fn point(&self) -> Point2 {
        self.point
    }

    /// Magnetized direction from the pivot, counterclockwise on screen.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

/// Rounds `angle` to the closest multiple of `step`.
#[must_use]
pub fn round_angle(angle: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return angle;
    }
    (angle / step).round() * step
}

/// Projects `point` on the closest horizontal, vertical or diagonal line
/// going through `pivot`.
#[must_use]
pub fn point_with_alignment(pivot: &Point2, point: &Point2) -> Point2 {
    let offset = point - pivot;
    if offset.norm() == 0.0 {
        return *point;
    }
    let angle = round_angle(offset.y.atan2(offset.x), FRAC_PI_4);
    let (sin, cos) = angle.sin_cos();
    let length = offset.x * cos + offset.y * sin;
    Point2::new(pivot.x + length * cos, pivot.y + length * sin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pt;
    use approx::assert_relative_eq;

    const STEPS: u32 = 24;

    #[test]
    fn horizontal_points_only_snap_length() {
        let snapped =
            PointWithAngleMagnetism::new(&pt(0.0, 0.0), &pt(401.3, 0.0), LengthUnit::Centimeter, 4.0, STEPS);
        assert_relative_eq!(snapped.point().x, 401.0, epsilon = 1e-9);
        assert_relative_eq!(snapped.point().y, 0.0);
        assert_relative_eq!(snapped.angle(), 0.0);
    }

    #[test]
    fn vertical_points_keep_their_direction() {
        let snapped =
            PointWithAngleMagnetism::new(&pt(400.0, 0.0), &pt(400.0, 298.7), LengthUnit::Centimeter, 4.0, STEPS);
        assert_relative_eq!(snapped.point().x, 400.0);
        assert_relative_eq!(snapped.point().y, 299.0, epsilon = 1e-9);
        assert_relative_eq!(snapped.angle(), -FRAC_PI_2);
    }

    #[test]
    fn nearly_horizontal_direction_is_flattened() {
        let snapped =
            PointWithAngleMagnetism::new(&pt(0.0, 0.0), &pt(300.0, 4.0), LengthUnit::Centimeter, 4.0, STEPS);
        assert_relative_eq!(snapped.point().y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(snapped.point().x, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn diagonal_direction_snaps_to_45_degrees() {
        let snapped =
            PointWithAngleMagnetism::new(&pt(0.0, 0.0), &pt(100.0, -98.0), LengthUnit::Centimeter, 4.0, STEPS);
        assert_relative_eq!(snapped.angle(), FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(snapped.point().x, -snapped.point().y, epsilon = 1e-9);
    }

    #[test]
    fn rounding_angles() {
        assert_relative_eq!(round_angle(0.2, FRAC_PI_4 / 3.0), FRAC_PI_4 / 3.0);
        assert_relative_eq!(round_angle(-0.1, FRAC_PI_4 / 3.0), 0.0);
    }

    #[test]
    fn alignment_projects_on_the_closest_axis() {
        let aligned = point_with_alignment(&pt(10.0, 10.0), &pt(110.0, 17.0));
        assert_relative_eq!(aligned.x, 110.0, epsilon = 1e-9);
        assert_relative_eq!(aligned.y, 10.0, epsilon = 1e-9);
        let diagonal = point_with_alignment(&pt(0.0, 0.0), &pt(50.0, 54.0));
        assert_relative_eq!(diagonal.x, diagonal.y, epsilon = 1e-9);
    }
}
