use crate::math::polygon_2d::{contains_point_with_margin, intersects_rectangle, rectangle_points};
use crate::math::{direction_angle, Point2};

/// The compass rose shown in the plan, unique per plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Compass {
    pub x: f64,
    pub y: f64,
    pub diameter: f64,
    /// Angle between the plan vertical axis and the north, in radians.
    pub north_direction: f64,
    pub visible: bool,
}

impl Default for Compass {
    fn default() -> Self {
        Self {
            x: -100.0,
            y: 50.0,
            diameter: 100.0,
            north_direction: 0.0,
            visible: true,
        }
    }
}

impl Compass {
    #[must_use]
    pub fn center(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Corners of the square enclosing the compass rose.
    #[must_use]
    pub fn points(&self) -> [Point2; 4] {
        rectangle_points(&self.center(), self.diameter, self.diameter, self.north_direction)
    }

    #[must_use]
    pub fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        contains_point_with_margin(&self.points(), point, margin, true)
    }

    #[must_use]
    pub fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        intersects_rectangle(&self.points(), c0, c1, true)
    }

    /// Returns `true` if `point` is on the rotation indicator at the north tip.
    #[must_use]
    pub fn is_rotation_indicator_at(&self, point: &Point2, margin: f64) -> bool {
        let points = self.points();
        let tip = Point2::from((points[0].coords + points[1].coords) / 2.0);
        (tip - point).norm() <= margin
    }

    /// Returns `true` if `point` is on the resize indicator at the east side.
    #[must_use]
    pub fn is_resize_indicator_at(&self, point: &Point2, margin: f64) -> bool {
        let points = self.points();
        let side = Point2::from((points[1].coords + points[2].coords) / 2.0);
        (side - point).norm() <= margin
    }

    /// North direction making the compass point toward `point`.
    #[must_use]
    pub fn north_direction_toward(&self, point: &Point2) -> f64 {
        direction_angle(&self.center(), point) + std::f64::consts::FRAC_PI_2
    }
}
