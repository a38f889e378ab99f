use nalgebra::{Rotation3, Vector3};

use crate::math::polygon_2d::{contains_point_with_margin, intersects_rectangle, rectangle_points};
use crate::math::{Point2, Vector2};

use super::level::LevelId;

slotmap::new_key_type! {
    /// Unique identifier for a piece of furniture, door, window or group.
    pub struct PieceId;
}

/// Extra data of doors and windows.
///
/// `wall_thickness` and `wall_distance` are ratios of the piece depth: the
/// part of the piece that fits in a wall starts `wall_distance * depth` away
/// from the piece back and is `wall_thickness * depth` thick.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorOrWindow {
    pub bound_to_wall: bool,
    pub wall_thickness: f64,
    pub wall_distance: f64,
}

impl Default for DoorOrWindow {
    fn default() -> Self {
        Self {
            bound_to_wall: false,
            wall_thickness: 1.0,
            wall_distance: 0.0,
        }
    }
}

/// A piece of furniture, a door or window, or a group of pieces.
///
/// `x` and `y` locate the center of the piece. Groups list their children,
/// which live in the plan arena but not in its draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub elevation: f64,
    pub angle: f64,
    pub pitch: f64,
    pub roll: f64,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub level: Option<LevelId>,
    pub movable: bool,
    pub resizable: bool,
    pub deformable: bool,
    pub visible: bool,
    pub horizontally_rotatable: bool,
    pub model_mirrored: bool,
    pub door_or_window: Option<DoorOrWindow>,
    /// Explicit base plan membership; doors and windows always belong to it.
    pub part_of_base_plan: bool,
    pub name_visible: bool,
    pub name_offset: Vector2,
    pub name_angle: f64,
    pub children: Vec<PieceId>,
}

impl Piece {
    /// Creates a movable, resizable piece at `(x, y)`.
    #[must_use]
    pub fn new(name: impl Into<String>, x: f64, y: f64, width: f64, depth: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            elevation: 0.0,
            angle: 0.0,
            pitch: 0.0,
            roll: 0.0,
            width,
            depth,
            height,
            level: None,
            movable: true,
            resizable: true,
            deformable: true,
            visible: true,
            horizontally_rotatable: true,
            model_mirrored: false,
            door_or_window: None,
            part_of_base_plan: false,
            name_visible: false,
            name_offset: Vector2::zeros(),
            name_angle: 0.0,
            children: Vec::new(),
        }
    }

    /// Creates a door or window.
    #[must_use]
    pub fn door_or_window(
        name: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        depth: f64,
        height: f64,
        data: DoorOrWindow,
    ) -> Self {
        Self {
            door_or_window: Some(data),
            ..Self::new(name, x, y, width, depth, height)
        }
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    #[must_use]
    pub fn is_door_or_window(&self) -> bool {
        self.door_or_window.is_some()
    }

    /// Returns `true` for a door or window bound to a wall.
    #[must_use]
    pub fn is_bound_to_wall(&self) -> bool {
        self.door_or_window.as_ref().is_some_and(|d| d.bound_to_wall)
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    #[must_use]
    pub fn is_part_of_base_plan(&self) -> bool {
        self.part_of_base_plan || self.is_door_or_window()
    }

    /// Returns `true` if the piece is rotated around a horizontal axis.
    #[must_use]
    pub fn is_horizontally_rotated(&self) -> bool {
        self.pitch != 0.0 || self.roll != 0.0
    }

    /// Width, depth and height of the box enclosing the piece once rotated
    /// by its pitch and roll.
    #[must_use]
    pub fn size_in_plan(&self) -> (f64, f64, f64) {
        if !self.is_horizontally_rotated() {
            return (self.width, self.depth, self.height);
        }
        let rotation = Rotation3::from_euler_angles(self.pitch, self.roll, 0.0);
        let mut extent = Vector3::<f64>::zeros();
        for sx in [-0.5, 0.5] {
            for sy in [-0.5, 0.5] {
                for sz in [-0.5, 0.5] {
                    let corner =
                        rotation * Vector3::new(sx * self.width, sy * self.depth, sz * self.height);
                    extent.x = extent.x.max(corner.x.abs());
                    extent.y = extent.y.max(corner.y.abs());
                    extent.z = extent.z.max(corner.z.abs());
                }
            }
        }
        (2.0 * extent.x, 2.0 * extent.y, 2.0 * extent.z)
    }

    #[must_use]
    pub fn width_in_plan(&self) -> f64 {
        self.size_in_plan().0
    }

    #[must_use]
    pub fn depth_in_plan(&self) -> f64 {
        self.size_in_plan().1
    }

    #[must_use]
    pub fn height_in_plan(&self) -> f64 {
        self.size_in_plan().2
    }

    /// Elevation of the top of the piece above its level.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.elevation + self.height_in_plan()
    }

    /// Corners of the piece footprint: back left, back right, front right,
    /// front left.
    #[must_use]
    pub fn points(&self) -> [Point2; 4] {
        let (width, depth, _) = self.size_in_plan();
        rectangle_points(&self.center(), width, depth, self.angle)
    }

    /// Location of the piece name.
    #[must_use]
    pub fn name_location(&self) -> Point2 {
        self.center() + self.name_offset
    }

    /// Returns `true` if `point` is inside the footprint or closer than
    /// `margin` to it.
    #[must_use]
    pub fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        contains_point_with_margin(&self.points(), point, margin, true)
    }

    /// Returns `true` if the footprint intersects the given rectangle.
    #[must_use]
    pub fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        intersects_rectangle(&self.points(), c0, c1, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn size_in_plan_follows_pitch() {
        let mut piece = Piece::new("bed", 0.0, 0.0, 100.0, 200.0, 50.0);
        assert_relative_eq!(piece.depth_in_plan(), 200.0);
        piece.pitch = FRAC_PI_2;
        let (width, depth, height) = piece.size_in_plan();
        assert_relative_eq!(width, 100.0, epsilon = 1e-9);
        assert_relative_eq!(depth, 50.0, epsilon = 1e-9);
        assert_relative_eq!(height, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn doors_belong_to_base_plan() {
        let door = Piece::door_or_window("door", 0.0, 0.0, 90.0, 10.0, 210.0, DoorOrWindow::default());
        assert!(door.is_part_of_base_plan());
        assert!(!door.is_bound_to_wall());
        assert!(!Piece::new("chair", 0.0, 0.0, 40.0, 40.0, 90.0).is_part_of_base_plan());
    }
}
