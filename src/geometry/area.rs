use i_float::int::point::IntPoint;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay::{Overlay, ShapeType};
use i_overlay::core::overlay_rule::OverlayRule;

use crate::math::polygon_2d::{contains_point, remove_aligned_points, signed_area};
use crate::math::Point2;

/// Fixed-point scale used to feed the overlay engine (1/1000 cm).
const SCALE: f64 = 1000.0;

/// Tolerance used to clean the contours returned by the overlay engine.
const CLEAN_TOLERANCE: f64 = 2.0 / SCALE;

/// A planar region made of shapes, each shape being an outer contour
/// followed by its holes.
///
/// Areas are immutable: boolean operations return new areas.
#[derive(Debug, Clone, Default)]
pub struct Area {
    shapes: Vec<Vec<Vec<Point2>>>,
}

impl Area {
    /// Creates an empty area.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an area from a single closed polygon. Degenerate polygons
    /// give an empty area.
    #[must_use]
    pub fn from_polygon(points: &[Point2]) -> Self {
        Self::union_all(std::iter::once(points))
    }

    /// Union of all the given closed polygons.
    ///
    /// Polygons are oriented consistently before being merged with a
    /// non-zero fill rule, so that overlapping polygons never cancel out.
    #[must_use]
    pub fn union_all<'a, I>(polygons: I) -> Self
    where
        I: IntoIterator<Item = &'a [Point2]>,
    {
        let contours: Vec<Vec<IntPoint>> = polygons
            .into_iter()
            .filter(|points| points.len() >= 3 && signed_area(points).abs() > f64::EPSILON)
            .map(|points| {
                let mut contour = to_int_contour(points);
                if signed_area(points) < 0.0 {
                    contour.reverse();
                }
                contour
            })
            .collect();
        if contours.is_empty() {
            return Self::new();
        }
        let capacity = contours.iter().map(Vec::len).sum();
        let mut overlay = Overlay::new(capacity);
        for contour in &contours {
            overlay.add_contour(contour, ShapeType::Subject);
        }
        Self::from_int_shapes(overlay.overlay(OverlayRule::Subject, FillRule::NonZero))
    }

    /// Returns the union of this area with `other`.
    #[must_use]
    pub fn union(&self, other: &Area) -> Area {
        self.combine(other, OverlayRule::Union)
    }

    /// Returns the part of this area also covered by `other`.
    #[must_use]
    pub fn intersect(&self, other: &Area) -> Area {
        self.combine(other, OverlayRule::Intersect)
    }

    /// Returns the part of this area not covered by `other`.
    #[must_use]
    pub fn subtract(&self, other: &Area) -> Area {
        self.combine(other, OverlayRule::Difference)
    }

    /// Returns `true` if this area and `other` share a region of non-zero size.
    #[must_use]
    pub fn intersects(&self, other: &Area) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Returns `true` if the area covers no surface.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Even-odd containment test over every contour of the area.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        self.paths()
            .filter(|contour| contains_point(contour, point))
            .count()
            % 2
            == 1
    }

    /// Surface of the area, holes excluded.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.shapes
            .iter()
            .map(|shape| {
                let mut contours = shape.iter();
                let outer = contours.next().map_or(0.0, |c| signed_area(c).abs());
                outer - contours.map(|c| signed_area(c).abs()).sum::<f64>()
            })
            .sum()
    }

    /// Closed point sequences of every contour, outer contours and holes alike.
    pub fn paths(&self) -> impl Iterator<Item = &[Point2]> + '_ {
        self.shapes.iter().flatten().map(Vec::as_slice)
    }

    /// Outer contour followed by holes, for each disjoint shape of the area.
    #[must_use]
    pub fn shapes(&self) -> &[Vec<Vec<Point2>>] {
        &self.shapes
    }

    fn combine(&self, other: &Area, rule: OverlayRule) -> Area {
        let subject: Vec<Vec<IntPoint>> = self.paths().map(to_int_contour).collect();
        let clip: Vec<Vec<IntPoint>> = other.paths().map(to_int_contour).collect();
        let capacity = subject.iter().chain(&clip).map(Vec::len).sum();
        let mut overlay = Overlay::new(capacity);
        for contour in &subject {
            overlay.add_contour(contour, ShapeType::Subject);
        }
        for contour in &clip {
            overlay.add_contour(contour, ShapeType::Clip);
        }
        Self::from_int_shapes(overlay.overlay(rule, FillRule::EvenOdd))
    }

    fn from_int_shapes<S, C>(int_shapes: S) -> Self
    where
        S: IntoIterator<Item = C>,
        C: IntoIterator<Item = Vec<IntPoint>>,
    {
        let shapes = int_shapes
            .into_iter()
            .filter_map(|shape| {
                let contours: Vec<Vec<Point2>> = shape
                    .into_iter()
                    .map(|contour| {
                        let points: Vec<Point2> = contour.iter().map(from_int).collect();
                        remove_aligned_points(&points, CLEAN_TOLERANCE)
                    })
                    .filter(|contour| contour.len() >= 3)
                    .collect();
                (!contours.is_empty()).then_some(contours)
            })
            .collect();
        Self { shapes }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_int(point: &Point2) -> IntPoint {
    let x = (point.x * SCALE).round().clamp(f64::from(i32::MIN), f64::from(i32::MAX));
    let y = (point.y * SCALE).round().clamp(f64::from(i32::MIN), f64::from(i32::MAX));
    IntPoint::new(x as i32, y as i32)
}

fn to_int_contour(points: &[Point2]) -> Vec<IntPoint> {
    let mut contour: Vec<IntPoint> = points.iter().map(to_int).collect();
    contour.dedup();
    if contour.len() > 1 && contour.first() == contour.last() {
        contour.pop();
    }
    contour
}

fn from_int(point: &IntPoint) -> Point2 {
    Point2::new(f64::from(point.x) / SCALE, f64::from(point.y) / SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pt;
    use approx::assert_relative_eq;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point2> {
        vec![
            pt(x, y),
            pt(x + size, y),
            pt(x + size, y + size),
            pt(x, y + size),
        ]
    }

    #[test]
    fn union_of_overlapping_squares() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 5.0, 10.0);
        let area = Area::union_all([a.as_slice(), b.as_slice()]);
        assert_relative_eq!(area.area(), 175.0, epsilon = 1e-6);
        assert_eq!(area.shapes().len(), 1);
    }

    #[test]
    fn opposite_orientations_do_not_cancel() {
        let a = square(0.0, 0.0, 10.0);
        let mut b = square(0.0, 0.0, 10.0);
        b.reverse();
        let area = Area::union_all([a.as_slice(), b.as_slice()]);
        assert_relative_eq!(area.area(), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn intersect_and_subtract() {
        let a = Area::from_polygon(&square(0.0, 0.0, 10.0));
        let b = Area::from_polygon(&square(5.0, 0.0, 10.0));
        assert_relative_eq!(a.intersect(&b).area(), 50.0, epsilon = 1e-6);
        assert_relative_eq!(a.subtract(&b).area(), 50.0, epsilon = 1e-6);
        assert_relative_eq!(a.union(&b).area(), 150.0, epsilon = 1e-6);
        assert!(a.intersects(&b));
        let far = Area::from_polygon(&square(50.0, 50.0, 1.0));
        assert!(!a.intersects(&far));
    }

    #[test]
    fn ring_has_a_hole() {
        let outer = Area::from_polygon(&square(0.0, 0.0, 30.0));
        let inner = Area::from_polygon(&square(10.0, 10.0, 10.0));
        let ring = outer.subtract(&inner);
        assert_eq!(ring.paths().count(), 2);
        assert!(ring.contains(&pt(5.0, 5.0)));
        assert!(!ring.contains(&pt(15.0, 15.0)));
        assert_relative_eq!(ring.area(), 800.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_polygon_is_empty() {
        assert!(Area::from_polygon(&[pt(0.0, 0.0), pt(1.0, 1.0)]).is_empty());
        assert!(Area::from_polygon(&[pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 2.0)]).is_empty());
    }
}
