use crate::config::LengthUnit;
use crate::math::Point2;
use crate::plan::{Plan, WallId};

use super::angle::PointWithAngleMagnetism;

/// Tangents beyond this value are treated as vertical directions.
const MAX_TANGENT: f64 = 1e10;
/// Tangents below this value are treated as horizontal directions.
const MIN_TANGENT: f64 = 1e-10;

/// A wall point magnetized by angle around a pivot, then aligned on the
/// abscissa or ordinate of a nearby wall end.
///
/// A point away from its pivot stays on the magnetized direction: it slides
/// along it until it meets the alignment line, provided the aligned point is
/// within the margin. A point on its pivot takes the abscissa and ordinate
/// of the closest aligned wall ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPointWithAngleMagnetism {
    point: Point2,
    angle: f64,
}

impl WallPointWithAngleMagnetism {
    /// Magnetizes `point` drawn from `pivot`.
    ///
    /// `edited` is the wall being drawn or resized, whose own ends are
    /// ignored as alignment targets.
    #[must_use]
    pub fn new(
        plan: &Plan,
        edited: Option<WallId>,
        pivot: &Point2,
        point: &Point2,
        unit: LengthUnit,
        margin: f64,
        step_count: u32,
    ) -> Self {
        let magnetized = PointWithAngleMagnetism::new(pivot, point, unit, margin, step_count);
        let angle = magnetized.angle();
        let mut result = magnetized.point();
        let edited_wall = edited.and_then(|id| plan.wall(id));
        let is_edited_point =
            |p: &Point2| edited_wall.is_some_and(|w| w.start == *p || w.end == *p);

        // Closest wall end sharing almost the same x, then the same y.
        let mut vertical: Option<(f64, Point2)> = None;
        let mut horizontal: Option<(f64, Point2)> = None;
        let level = plan.selected_level();
        for (id, wall) in plan.walls().iter() {
            if Some(id) == edited || !plan.is_wall_at_level(wall, level) {
                continue;
            }
            for end in [wall.start, wall.end] {
                if is_edited_point(&end) {
                    continue;
                }
                let (dx, dy) = ((result.x - end.x).abs(), (result.y - end.y).abs());
                if dx < margin && vertical.is_none_or(|(d, _)| dy < d) {
                    vertical = Some((dy, end));
                }
                if dy < margin && horizontal.is_none_or(|(d, _)| dx < d) {
                    horizontal = Some((dx, end));
                }
            }
        }

        if point != pivot {
            // Stay on the line y = slope * x + intercept of the direction.
            let slope = -angle.tan();
            let intercept = (slope.abs() < MAX_TANGENT).then(|| pivot.y - slope * pivot.x);
            let at_y = |y: f64| match intercept {
                Some(intercept) if slope.abs() > MIN_TANGENT => {
                    Some(Point2::new((y - intercept) / slope, y))
                }
                Some(_) => None,
                None => Some(Point2::new(pivot.x, y)),
            };
            let at_x = |x: f64| intercept.map(|intercept| Point2::new(x, slope * x + intercept));
            let candidates = [
                horizontal.and_then(|(_, target)| at_y(target.y)),
                vertical.and_then(|(_, target)| at_x(target.x)),
            ];
            let aligned = candidates
                .into_iter()
                .flatten()
                .find(|candidate| (*candidate - result).norm_squared() <= margin * margin);
            if let Some(candidate) = aligned {
                result = candidate;
            }
        } else {
            if let Some((_, target)) = horizontal {
                result.y = target.y;
            }
            if let Some((_, target)) = vertical {
                result.x = target.x;
            }
        }
        Self {
            point: result,
            angle,
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::pt;
    use crate::plan::Wall;
    use approx::assert_relative_eq;

    #[test]
    fn free_point_aligns_on_wall_ends() {
        let mut plan = Plan::new();
        plan.add_wall(Wall::new(pt(0.0, 0.0), pt(0.0, 300.0), 10.0, None));
        let snapped = WallPointWithAngleMagnetism::new(
            &plan,
            None,
            &pt(200.0, 302.0),
            &pt(200.0, 302.0),
            LengthUnit::Centimeter,
            4.0,
            24,
        );
        assert_relative_eq!(snapped.point().y, 300.0);
        assert_relative_eq!(snapped.point().x, 200.0);
    }

    #[test]
    fn drawn_wall_end_slides_to_the_alignment() {
        let mut plan = Plan::new();
        plan.add_wall(Wall::new(pt(0.0, 0.0), pt(0.0, 300.0), 10.0, None));
        let edited = plan.add_wall(Wall::new(pt(400.0, 0.0), pt(400.0, 297.0), 10.0, None));
        let snapped = WallPointWithAngleMagnetism::new(
            &plan,
            Some(edited),
            &pt(400.0, 0.0),
            &pt(400.0, 297.6),
            LengthUnit::Centimeter,
            4.0,
            24,
        );
        assert_relative_eq!(snapped.point().x, 400.0, epsilon = 1e-9);
        assert_relative_eq!(snapped.point().y, 300.0, epsilon = 1e-6);
    }

    #[test]
    fn first_segment_ignores_distant_wall_ends() {
        let mut plan = Plan::new();
        plan.add_wall(Wall::new(pt(2000.0, 3.0), pt(2500.0, 3.0), 10.0, None));
        let snapped = WallPointWithAngleMagnetism::new(
            &plan,
            None,
            &pt(0.0, 0.0),
            &pt(300.0, 1.0),
            LengthUnit::Centimeter,
            4.0,
            24,
        );
        assert_relative_eq!(snapped.point().y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(snapped.point().x, 300.0, epsilon = 1e-9);
        assert_relative_eq!(snapped.angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn first_segment_slides_to_a_close_alignment() {
        let mut plan = Plan::new();
        plan.add_wall(Wall::new(pt(302.0, 100.0), pt(302.0, 400.0), 10.0, None));
        let snapped = WallPointWithAngleMagnetism::new(
            &plan,
            None,
            &pt(0.0, 0.0),
            &pt(299.0, 1.0),
            LengthUnit::Centimeter,
            4.0,
            24,
        );
        assert_relative_eq!(snapped.point().x, 302.0, epsilon = 1e-9);
        assert_relative_eq!(snapped.point().y, 0.0, epsilon = 1e-9);
    }
}
