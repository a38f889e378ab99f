use std::f64::consts::PI;

use crate::math::polygon_2d::{contains_point_with_margin, intersects_rectangle, rectangle_points};
use crate::math::Point2;

/// Width of the virtual visitor body in the plan.
pub const CAMERA_WIDTH: f64 = 46.6;
/// Depth of the virtual visitor body in the plan.
pub const CAMERA_DEPTH: f64 = 18.6;

/// The observer camera, the virtual visitor walking in the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    /// Elevation of the eyes.
    pub z: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub field_of_view: f64,
    /// `true` when the plan displays the visitor, in virtual visit mode.
    pub visible: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 50.0,
            z: 170.0,
            yaw: 7.0 * PI / 4.0,
            pitch: PI / 16.0,
            field_of_view: 63f64.to_radians(),
            visible: false,
        }
    }
}

impl Camera {
    #[must_use]
    pub fn location(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Corners of the visitor body, rotated by the yaw.
    #[must_use]
    pub fn points(&self) -> [Point2; 4] {
        rectangle_points(&self.location(), CAMERA_WIDTH, CAMERA_DEPTH, self.yaw)
    }

    #[must_use]
    pub fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        contains_point_with_margin(&self.points(), point, margin, true)
    }

    #[must_use]
    pub fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        intersects_rectangle(&self.points(), c0, c1, true)
    }
}
