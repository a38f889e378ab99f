use crate::math::polygon_2d::{contains_point_with_margin, intersects_rectangle};
use crate::math::{direction_angle, Point2, Vector2};

use super::level::LevelId;

slotmap::new_key_type! {
    /// Unique identifier for a dimension line in the plan.
    pub struct DimensionLineId;
}

/// A measure between two points, drawn `offset` away from them.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionLine {
    pub start: Point2,
    pub end: Point2,
    /// Signed distance of the measure line from the measured segment.
    pub offset: f64,
    pub level: Option<LevelId>,
}

impl DimensionLine {
    #[must_use]
    pub fn new(start: Point2, end: Point2, offset: f64) -> Self {
        Self {
            start,
            end,
            offset,
            level: None,
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Displacement from the measured points to the measure line.
    #[must_use]
    pub fn offset_vector(&self) -> Vector2 {
        let (sin, cos) = direction_angle(&self.start, &self.end).sin_cos();
        Vector2::new(-sin * self.offset, cos * self.offset)
    }

    /// Start, start on the measure line, end on the measure line, end.
    #[must_use]
    pub fn points(&self) -> [Point2; 4] {
        let offset = self.offset_vector();
        [self.start, self.start + offset, self.end + offset, self.end]
    }

    #[must_use]
    pub fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        contains_point_with_margin(&self.points(), point, margin, true)
    }

    #[must_use]
    pub fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        intersects_rectangle(&self.points(), c0, c1, true)
    }

    /// Returns `true` if `point` is at the start of the measure line.
    #[must_use]
    pub fn is_start_at(&self, point: &Point2, margin: f64) -> bool {
        (self.start + self.offset_vector() - point).norm() <= margin
    }

    /// Returns `true` if `point` is at the end of the measure line.
    #[must_use]
    pub fn is_end_at(&self, point: &Point2, margin: f64) -> bool {
        (self.end + self.offset_vector() - point).norm() <= margin
    }

    /// Returns `true` if `point` is at the middle of the measure line.
    #[must_use]
    pub fn is_middle_point_at(&self, point: &Point2, margin: f64) -> bool {
        let middle = Point2::from((self.start.coords + self.end.coords) / 2.0) + self.offset_vector();
        (middle - point).norm() <= margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pt;

    #[test]
    fn offset_is_on_the_left_of_a_horizontal_measure() {
        let line = DimensionLine::new(pt(0.0, 0.0), pt(100.0, 0.0), 20.0);
        let points = line.points();
        assert!((points[1] - pt(0.0, 20.0)).norm() < 1e-9);
        assert!(line.is_middle_point_at(&pt(50.0, 21.0), 2.0));
        assert!(line.is_end_at(&pt(100.0, 20.0), 0.5));
        assert!(line.contains_point(&pt(50.0, 10.0), 0.0));
    }
}
