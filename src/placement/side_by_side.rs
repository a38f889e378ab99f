use crate::geometry::Area;
use crate::math::polygon_2d::bounding_box;
use crate::math::{rotate_point, Point2, Vector2};
use crate::plan::{Piece, PieceId, Plan};
use crate::rooms::GeometryCache;

/// Returns the center that puts `piece` side by side with the piece it
/// overlaps most, once that piece is enlarged by `margin`.
///
/// The overlap decides whether `piece` stands in front of or behind the
/// reference piece, or at its left or right. `piece` then slides along the
/// matching axis of the reference piece until both footprints touch.
/// Returns `None` when no piece is close enough, or when the slide would
/// leave both pieces without a common side.
pub fn adjust_piece_side_by_side_at(
    plan: &Plan,
    cache: &mut GeometryCache,
    piece: &Piece,
    ignored: &[PieceId],
    margin: f64,
) -> Option<Point2> {
    let piece_area = Area::from_polygon(&piece.points());
    let level = plan.selected_level();
    let candidates: Vec<PieceId> = plan
        .furniture()
        .iter()
        .filter(|(id, other)| {
            !ignored.contains(id) && other.visible && plan.is_piece_at_level(other, level)
        })
        .map(|(id, _)| id)
        .collect();
    let mut reference: Option<(f64, PieceId)> = None;
    for id in candidates {
        let contour = Area::from_polygon(cache.piece_contour(plan, id, margin));
        let surface = contour.intersect(&piece_area).area();
        if surface > 0.0 && reference.is_none_or(|(best, _)| surface > best) {
            reference = Some((surface, id));
        }
    }
    let reference = plan.piece(reference?.1)?;

    // Work in the frame of the reference piece, centered on it.
    let center = reference.center();
    let to_local = |p: &Point2| rotate_point(p, &center, -reference.angle) - center.coords;
    let local: Vec<Point2> = piece.points().iter().map(to_local).collect();
    let (min, max) = bounding_box(&local)?;
    let (width, depth, _) = reference.size_in_plan();
    let (half_width, half_depth) = (width / 2.0, depth / 2.0);

    // Quarters of the plane cut by the diagonals of the reference piece,
    // long enough to reach any piece within the margin.
    let reach = margin + piece.width_in_plan() + piece.depth_in_plan();
    let scale = 1.0 + reach / half_width.min(half_depth).max(f64::EPSILON);
    let corners = reference.points().map(|corner| center + (corner - center) * scale);
    let quarter = |a: usize, b: usize| Area::from_polygon(&[center, corners[a], corners[b]]);
    let front_or_back = quarter(0, 1)
        .intersect(&piece_area)
        .area()
        + quarter(2, 3).intersect(&piece_area).area();
    let left_or_right = quarter(3, 0)
        .intersect(&piece_area)
        .area()
        + quarter(1, 2).intersect(&piece_area).area();

    let shift = if front_or_back >= left_or_right {
        if max.x <= -half_width || min.x >= half_width {
            return None;
        }
        let dy = if min.y + max.y < 0.0 {
            -half_depth - max.y
        } else {
            half_depth - min.y
        };
        Vector2::new(0.0, dy)
    } else {
        if max.y <= -half_depth || min.y >= half_depth {
            return None;
        }
        let dx = if min.x + max.x < 0.0 {
            -half_width - max.x
        } else {
            half_width - min.x
        };
        Vector2::new(dx, 0.0)
    };
    let (sin, cos) = reference.angle.sin_cos();
    let shift = Vector2::new(shift.x * cos - shift.y * sin, shift.x * sin + shift.y * cos);
    Some(piece.center() + shift)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn piece_slides_next_to_its_neighbour() {
        let mut plan = Plan::new();
        plan.add_piece(Piece::new("cupboard", 100.0, 100.0, 60.0, 40.0, 200.0));
        let chair = Piece::new("chair", 148.0, 100.0, 40.0, 40.0, 80.0);
        let mut cache = GeometryCache::new();
        let center = adjust_piece_side_by_side_at(&plan, &mut cache, &chair, &[], 20.0).unwrap();
        assert_relative_eq!(center.x, 150.0, epsilon = 1e-9);
        assert_relative_eq!(center.y, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn piece_in_front_slides_against_the_front() {
        let mut plan = Plan::new();
        plan.add_piece(Piece::new("desk", 100.0, 100.0, 120.0, 60.0, 75.0));
        let chair = Piece::new("chair", 110.0, 140.0, 40.0, 40.0, 80.0);
        let mut cache = GeometryCache::new();
        let center = adjust_piece_side_by_side_at(&plan, &mut cache, &chair, &[], 20.0).unwrap();
        assert_relative_eq!(center.x, 110.0, epsilon = 1e-9);
        assert_relative_eq!(center.y, 150.0, epsilon = 1e-9);
    }

    #[test]
    fn lonely_piece_is_not_moved() {
        let mut plan = Plan::new();
        plan.add_piece(Piece::new("desk", 100.0, 100.0, 120.0, 60.0, 75.0));
        let chair = Piece::new("chair", 400.0, 400.0, 40.0, 40.0, 80.0);
        let mut cache = GeometryCache::new();
        assert!(adjust_piece_side_by_side_at(&plan, &mut cache, &chair, &[], 20.0).is_none());
    }
}
