use crate::math::polygon_2d::{
    bounding_box, contains_point_with_margin, intersects_rectangle, signed_area,
};
use crate::math::{Point2, Vector2};

use super::level::LevelId;

slotmap::new_key_type! {
    /// Unique identifier for a room in the plan.
    pub struct RoomId;
}

/// A room outline with its floor and ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub name: Option<String>,
    pub points: Vec<Point2>,
    /// Offset of the name from the room center.
    pub name_offset: Vector2,
    pub name_angle: f64,
    /// Offset of the area text from the room center.
    pub area_offset: Vector2,
    pub area_angle: f64,
    pub area_visible: bool,
    pub floor_visible: bool,
    pub ceiling_visible: bool,
    pub level: Option<LevelId>,
}

impl Room {
    /// Creates a room with visible floor and ceiling.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self {
            name: None,
            points,
            name_offset: Vector2::new(0.0, -40.0),
            name_angle: 0.0,
            area_offset: Vector2::zeros(),
            area_angle: 0.0,
            area_visible: true,
            floor_visible: true,
            ceiling_visible: true,
            level: None,
        }
    }

    /// Surface of the room.
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area(&self.points).abs()
    }

    /// Returns `true` if the points turn clockwise on screen.
    #[must_use]
    pub fn is_clockwise(&self) -> bool {
        signed_area(&self.points) > 0.0
    }

    /// Center of the bounding box of the room points.
    #[must_use]
    pub fn center(&self) -> Point2 {
        bounding_box(&self.points).map_or_else(Point2::origin, |(min, max)| {
            Point2::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0)
        })
    }

    /// Location of the room name.
    #[must_use]
    pub fn name_location(&self) -> Point2 {
        self.center() + self.name_offset
    }

    /// Location of the room area text.
    #[must_use]
    pub fn area_location(&self) -> Point2 {
        self.center() + self.area_offset
    }

    /// Returns `true` if `point` is inside the room or closer than `margin`
    /// to its outline.
    #[must_use]
    pub fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        contains_point_with_margin(&self.points, point, margin, true)
    }

    /// Index of the room point closer than `margin` to `point`.
    #[must_use]
    pub fn point_index_at(&self, point: &Point2, margin: f64) -> Option<usize> {
        self.points
            .iter()
            .position(|p| (p - point).norm() <= margin)
    }

    /// Returns `true` if the room intersects the given rectangle.
    #[must_use]
    pub fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        intersects_rectangle(&self.points, c0, c1, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pt;

    #[test]
    fn room_center_and_area() {
        let room = Room::new(vec![pt(0.0, 0.0), pt(400.0, 0.0), pt(400.0, 300.0), pt(0.0, 300.0)]);
        assert!((room.area() - 120_000.0).abs() < 1e-6);
        assert!(room.is_clockwise());
        assert!((room.center() - pt(200.0, 150.0)).norm() < 1e-9);
        assert_eq!(room.point_index_at(&pt(401.0, 299.0), 2.0), Some(2));
        assert!(room.contains_point(&pt(10.0, 10.0), 0.0));
    }
}
