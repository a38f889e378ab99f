use crate::math::arc_2d::{arc_length, arc_points};
use crate::math::intersect_2d::line_intersection;
use crate::math::polygon_2d::{contains_point_with_margin, intersects_rectangle};
use crate::math::{direction_angle, Point2};

use super::level::LevelId;

slotmap::new_key_type! {
    /// Unique identifier for a wall in the plan.
    pub struct WallId;
}

/// Arc extents smaller than this are drawn as straight walls.
const MIN_ARC_EXTENT: f64 = 1e-6;

/// Baseboard glued on one side of a wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseboard {
    pub thickness: f64,
    pub height: f64,
    pub color: Option<u32>,
}

/// Styling of one side of a wall.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WallSide {
    pub color: Option<u32>,
    pub texture: Option<String>,
    pub shininess: f64,
    pub baseboard: Option<Baseboard>,
}

/// A wall segment, possibly curved, joined at most to one wall at each end.
///
/// Joins are mutual: if `wall_at_start` of A is B, then B refers to A at its
/// start or at its end, and the shared points are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub start: Point2,
    pub end: Point2,
    pub thickness: f64,
    /// Height at start, `None` to use the plan default height.
    pub height: Option<f64>,
    /// Height at end for sloping walls.
    pub height_at_end: Option<f64>,
    /// Signed curvature in radians, `None` for a straight wall.
    pub arc_extent: Option<f64>,
    pub left_side: WallSide,
    pub right_side: WallSide,
    pub wall_at_start: Option<WallId>,
    pub wall_at_end: Option<WallId>,
    pub level: Option<LevelId>,
}

impl Wall {
    /// Creates an unjoined straight wall.
    #[must_use]
    pub fn new(start: Point2, end: Point2, thickness: f64, height: Option<f64>) -> Self {
        Self {
            start,
            end,
            thickness,
            height,
            height_at_end: None,
            arc_extent: None,
            left_side: WallSide::default(),
            right_side: WallSide::default(),
            wall_at_start: None,
            wall_at_end: None,
            level: None,
        }
    }

    /// Returns the arc extent if the wall is noticeably curved.
    #[must_use]
    pub fn effective_arc_extent(&self) -> Option<f64> {
        self.arc_extent.filter(|e| e.abs() > MIN_ARC_EXTENT)
    }

    /// Length of the wall, measured along its arc when curved.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self.effective_arc_extent() {
            Some(extent) => arc_length(&self.start, &self.end, extent),
            None => (self.end - self.start).norm(),
        }
    }

    /// Direction of the segment joining the wall ends.
    #[must_use]
    pub fn angle(&self) -> f64 {
        direction_angle(&self.start, &self.end)
    }

    /// Highest point of the wall above its level.
    #[must_use]
    pub fn max_height(&self, default_height: f64) -> f64 {
        let height = self.height.unwrap_or(default_height);
        self.height_at_end.map_or(height, |h| h.max(height))
    }

    /// Footprint of the wall ignoring its joins.
    ///
    /// Points go along the left side from start to end, then back along the
    /// right side.
    #[must_use]
    pub fn unjoined_points(&self) -> Vec<Point2> {
        self.side_points(self.thickness / 2.0, self.thickness / 2.0)
    }

    /// Footprint of the wall widened by its baseboards.
    #[must_use]
    pub fn points_with_baseboards(&self) -> Vec<Point2> {
        let left = self.left_side.baseboard.as_ref().map_or(0.0, |b| b.thickness);
        let right = self.right_side.baseboard.as_ref().map_or(0.0, |b| b.thickness);
        self.side_points(self.thickness / 2.0 + left, self.thickness / 2.0 + right)
    }

    fn side_points(&self, left_half: f64, right_half: f64) -> Vec<Point2> {
        if let Some(extent) = self.effective_arc_extent() {
            // With a positive extent the left side is the inner arc.
            let (left_offset, right_offset) = if extent > 0.0 {
                (-left_half, right_half)
            } else {
                (left_half, -right_half)
            };
            let mut points = arc_points(&self.start, &self.end, extent, left_offset);
            let mut right = arc_points(&self.start, &self.end, extent, right_offset);
            right.reverse();
            points.extend(right);
            return points;
        }
        let (sin, cos) = self.angle().sin_cos();
        let left = (left_half * sin, left_half * cos);
        let right = (right_half * sin, right_half * cos);
        vec![
            Point2::new(self.start.x + left.0, self.start.y - left.1),
            Point2::new(self.end.x + left.0, self.end.y - left.1),
            Point2::new(self.end.x - right.0, self.end.y + right.1),
            Point2::new(self.start.x - right.0, self.start.y + right.1),
        ]
    }

    /// Footprint of the wall with its corners mitered against the walls
    /// joined at its ends.
    ///
    /// `id` is the id of this wall, used to find which end of each neighbour
    /// is joined to it.
    #[must_use]
    pub fn points(&self, id: WallId, at_start: Option<&Wall>, at_end: Option<&Wall>) -> Vec<Point2> {
        let mut points = self.unjoined_points();
        if self.effective_arc_extent().is_some() {
            return points;
        }
        if let Some(neighbour) = at_start.filter(|n| n.effective_arc_extent().is_none()) {
            let limit = 2.0 * self.thickness.max(neighbour.thickness);
            let other = neighbour.unjoined_points();
            let (left, right) = if neighbour.wall_at_end == Some(id) {
                ((other[1], other[0]), (other[2], other[3]))
            } else if neighbour.wall_at_start == Some(id) {
                ((other[2], other[3]), (other[0], other[1]))
            } else {
                return points;
            };
            let (l0, l1, r0, r1) = (points[0], points[1], points[3], points[2]);
            miter(&mut points[0], &l1, &left, limit, &l0);
            miter(&mut points[3], &r1, &right, limit, &r0);
        }
        if let Some(neighbour) = at_end.filter(|n| n.effective_arc_extent().is_none()) {
            let limit = 2.0 * self.thickness.max(neighbour.thickness);
            let other = neighbour.unjoined_points();
            let (left, right) = if neighbour.wall_at_start == Some(id) {
                ((other[0], other[1]), (other[3], other[2]))
            } else if neighbour.wall_at_end == Some(id) {
                ((other[3], other[2]), (other[0], other[1]))
            } else {
                return points;
            };
            let (l0, l1, r0, r1) = (points[1], points[0], points[2], points[3]);
            miter(&mut points[1], &l1, &left, limit, &l0);
            miter(&mut points[2], &r1, &right, limit, &r0);
        }
        points
    }

    /// Returns `true` if `point` is inside the given footprint or closer
    /// than `margin` to it.
    #[must_use]
    pub fn footprint_contains(points: &[Point2], point: &Point2, margin: f64) -> bool {
        contains_point_with_margin(points, point, margin, true)
    }

    /// Returns `true` if the given footprint intersects the rectangle.
    #[must_use]
    pub fn footprint_intersects_rectangle(points: &[Point2], c0: &Point2, c1: &Point2) -> bool {
        intersects_rectangle(points, c0, c1, true)
    }
}

/// Moves `corner` to the intersection of the side line through `corner` and
/// `other_end` with the neighbour side line, unless that point lies farther
/// than `limit` from the original corner.
fn miter(
    corner: &mut Point2,
    other_end: &Point2,
    neighbour_side: &(Point2, Point2),
    limit: f64,
    original: &Point2,
) {
    if let Some(p) = line_intersection(original, other_end, &neighbour_side.0, &neighbour_side.1) {
        if (p - original).norm() <= limit {
            *corner = p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pt;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    #[test]
    fn straight_wall_footprint() {
        let wall = Wall::new(pt(0.0, 0.0), pt(400.0, 0.0), 10.0, None);
        let points = wall.unjoined_points();
        assert_eq!(points.len(), 4);
        // Left side is on the negative y side with the y axis pointing down.
        assert_relative_eq!(points[0].y, -5.0, epsilon = 1e-9);
        assert_relative_eq!(points[2].y, 5.0, epsilon = 1e-9);
        assert_relative_eq!(wall.length(), 400.0, epsilon = 1e-9);
    }

    #[test]
    fn joined_corner_is_mitered() {
        let mut ids: SlotMap<WallId, ()> = SlotMap::with_key();
        let id1 = ids.insert(());
        let id2 = ids.insert(());
        let mut w1 = Wall::new(pt(0.0, 0.0), pt(400.0, 0.0), 10.0, None);
        let mut w2 = Wall::new(pt(400.0, 0.0), pt(400.0, 300.0), 10.0, None);
        w1.wall_at_end = Some(id2);
        w2.wall_at_start = Some(id1);
        let points = w1.points(id1, None, Some(&w2));
        assert_relative_eq!(points[1].x, 405.0, epsilon = 1e-9);
        assert_relative_eq!(points[1].y, -5.0, epsilon = 1e-9);
        assert_relative_eq!(points[2].x, 395.0, epsilon = 1e-9);
        assert_relative_eq!(points[2].y, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn curved_wall_length_and_points() {
        let mut wall = Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, None);
        wall.arc_extent = Some(std::f64::consts::PI);
        assert_relative_eq!(wall.length(), 50.0 * std::f64::consts::PI, epsilon = 1e-6);
        let points = wall.unjoined_points();
        assert!(points.len() > 8);
    }

    #[test]
    fn baseboards_widen_footprint() {
        let mut wall = Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, None);
        wall.left_side.baseboard = Some(Baseboard {
            thickness: 1.0,
            height: 7.0,
            color: None,
        });
        let points = wall.points_with_baseboards();
        assert_relative_eq!(points[0].y, -6.0, epsilon = 1e-9);
        assert_relative_eq!(points[3].y, 5.0, epsilon = 1e-9);
    }
}
