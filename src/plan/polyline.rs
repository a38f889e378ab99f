use crate::math::polygon_2d::{contains_point, distance_to_outline, intersects_rectangle};
use crate::math::Point2;

use super::level::LevelId;

slotmap::new_key_type! {
    /// Unique identifier for a polyline in the plan.
    pub struct PolylineId;
}

/// A free-hand line made of connected segments, optionally closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point2>,
    pub thickness: f64,
    pub closed: bool,
    pub color: Option<u32>,
    pub level: Option<LevelId>,
}

impl Polyline {
    #[must_use]
    pub fn new(points: Vec<Point2>, thickness: f64) -> Self {
        Self {
            points,
            thickness,
            closed: false,
            color: None,
            level: None,
        }
    }

    /// Returns `true` if `point` lies on the stroke of the polyline, or
    /// inside it when closed.
    #[must_use]
    pub fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        if self.closed && contains_point(&self.points, point) {
            return true;
        }
        distance_to_outline(&self.points, point, self.closed) <= margin + self.thickness / 2.0
    }

    /// Index of the polyline point closer than `margin` to `point`.
    #[must_use]
    pub fn point_index_at(&self, point: &Point2, margin: f64) -> Option<usize> {
        self.points
            .iter()
            .position(|p| (p - point).norm() <= margin)
    }

    #[must_use]
    pub fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        intersects_rectangle(&self.points, c0, c1, self.closed)
    }

    /// Length of the polyline stroke.
    #[must_use]
    pub fn length(&self) -> f64 {
        let open: f64 = self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) if self.points.len() > 2 => open + (first - last).norm(),
            _ => open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pt;

    #[test]
    fn stroke_contains_points_within_thickness() {
        let polyline = Polyline::new(vec![pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0)], 4.0);
        assert!(polyline.contains_point(&pt(50.0, 1.5), 0.0));
        assert!(!polyline.contains_point(&pt(50.0, 50.0), 1.0));
        assert!((polyline.length() - 200.0).abs() < 1e-9);
        let mut closed = polyline.clone();
        closed.closed = true;
        assert!(closed.contains_point(&pt(80.0, 20.0), 0.0));
    }
}
