use crate::error::Result;
use crate::geometry::Area;
use crate::math::intersect_2d::line_intersection;
use crate::math::polygon_2d::{contains_point, remove_aligned_points, signed_area, with_positive_area};
use crate::math::{direction_angle, Point2, Vector2};
use crate::plan::{Plan, Room, WallId};
use crate::topology::{join_walls, CreateWall, WallEnd};

use super::cache::GeometryCache;

/// Distance under which consecutive room points are merged.
const ALIGNMENT_TOLERANCE: f64 = 0.01;

/// Builds the room enclosed by walls around `point`.
///
/// The smallest closed outline of the walls area containing `point` is
/// used, extended through the doors and windows standing on the floor that
/// cross its walls. Returns `None` if `point` is in a wall or outside any
/// closed outline.
pub fn create_room_at(plan: &Plan, cache: &mut GeometryCache, point: &Point2) -> Option<Room> {
    if cache.walls_area(plan).contains(point) {
        return None;
    }
    let smallest = cache
        .room_paths(plan)
        .iter()
        .filter(|path| contains_point(path, point))
        .min_by(|a, b| signed_area(a).abs().total_cmp(&signed_area(b).abs()))?
        .clone();
    let walls_area = cache.walls_area(plan).clone();
    let mut room_area = Area::from_polygon(&smallest);
    let level = plan.selected_level();
    for (_, piece) in plan.furniture().iter() {
        if !piece.is_door_or_window()
            || piece.elevation != 0.0
            || !plan.is_piece_at_level(piece, level)
        {
            continue;
        }
        let doorstep = Area::from_polygon(&piece.points()).intersect(&walls_area);
        if !doorstep.is_empty() {
            room_area = room_area.union(&doorstep);
        }
    }
    // Doorsteps not touching the room end up in other shapes of the union.
    let outline = room_area
        .shapes()
        .iter()
        .filter_map(|shape| shape.first())
        .find(|contour| contains_point(contour, point))
        .cloned()
        .unwrap_or(smallest);
    let points = remove_aligned_points(&with_positive_area(&outline), ALIGNMENT_TOLERANCE);
    if points.len() < 3 {
        return None;
    }
    let mut room = Room::new(points);
    room.level = level;
    Some(room)
}

/// Surrounds a room with walls placed outside of its sides, joined in a
/// loop, and returns their ids in the order of the room sides.
///
/// # Errors
///
/// Returns a geometry error if the room outline is degenerate.
pub fn create_walls_around_room(
    plan: &mut Plan,
    room_points: &[Point2],
    thickness: f64,
    height: Option<f64>,
) -> Result<Vec<WallId>> {
    let points = remove_aligned_points(&with_positive_area(room_points), ALIGNMENT_TOLERANCE);
    let count = points.len();
    if count < 3 {
        return Ok(Vec::new());
    }
    // With a positive area the outside of each side is on its left.
    let half = thickness / 2.0;
    let sides: Vec<(Point2, Point2)> = (0..count)
        .map(|i| {
            let (start, end) = (points[i], points[(i + 1) % count]);
            let (sin, cos) = direction_angle(&start, &end).sin_cos();
            let offset = Vector2::new(sin * half, -cos * half);
            (start + offset, end + offset)
        })
        .collect();
    let corners: Vec<Point2> = (0..count)
        .map(|i| {
            let previous = &sides[(i + count - 1) % count];
            let current = &sides[i];
            line_intersection(&previous.0, &previous.1, &current.0, &current.1)
                .unwrap_or(current.0)
        })
        .collect();
    let mut walls = Vec::with_capacity(count);
    for i in 0..count {
        let mut create = CreateWall::new(corners[i], corners[(i + 1) % count], thickness, height);
        if let Some(&previous) = walls.last() {
            create = create.join_start(previous, WallEnd::End);
        }
        walls.push(create.execute(plan)?);
    }
    if let (Some(&first), Some(&last)) = (walls.first(), walls.last()) {
        join_walls(plan, last, WallEnd::End, first, WallEnd::Start)?;
    }
    tracing::debug!(count, "walls created around room");
    Ok(walls)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::pt;
    use crate::plan::{DoorOrWindow, Piece};
    use crate::topology::joins_are_consistent;
    use approx::assert_relative_eq;

    fn rectangle_of_walls(plan: &mut Plan) -> Vec<WallId> {
        let room = [pt(5.0, 5.0), pt(395.0, 5.0), pt(395.0, 295.0), pt(5.0, 295.0)];
        create_walls_around_room(plan, &room, 10.0, None).unwrap()
    }

    #[test]
    fn walls_around_room_are_centered_outside() {
        let mut plan = Plan::new();
        let walls = rectangle_of_walls(&mut plan);
        assert_eq!(walls.len(), 4);
        assert!(joins_are_consistent(&plan, &walls));
        let first = plan.wall(walls[0]).unwrap();
        assert_relative_eq!(first.start.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(first.start.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(first.end.x, 400.0, epsilon = 1e-9);
        assert_eq!(first.wall_at_start, Some(walls[3]));
    }

    #[test]
    fn room_is_the_inside_of_the_walls() {
        let mut plan = Plan::new();
        rectangle_of_walls(&mut plan);
        let mut cache = GeometryCache::new();
        let room = create_room_at(&plan, &mut cache, &pt(200.0, 150.0)).unwrap();
        assert_eq!(room.points.len(), 4);
        assert_relative_eq!(room.area(), 390.0 * 290.0, epsilon = 1e-3);
        assert!(create_room_at(&plan, &mut cache, &pt(0.0, 150.0)).is_none());
        assert!(create_room_at(&plan, &mut cache, &pt(-50.0, 150.0)).is_none());
        assert!(cache.is_floor_visible_at(&plan, &pt(200.0, 150.0)));
        assert!(!cache.is_floor_visible_at(&plan, &pt(0.0, 150.0)));
    }

    #[test]
    fn doorstep_extends_the_room() {
        let mut plan = Plan::new();
        rectangle_of_walls(&mut plan);
        let door = Piece::door_or_window(
            "door",
            200.0,
            0.0,
            80.0,
            10.0,
            210.0,
            DoorOrWindow {
                bound_to_wall: true,
                ..DoorOrWindow::default()
            },
        );
        plan.add_piece(door);
        let mut cache = GeometryCache::new();
        let room = create_room_at(&plan, &mut cache, &pt(200.0, 150.0)).unwrap();
        assert_eq!(room.points.len(), 8);
        assert_relative_eq!(room.area(), 390.0 * 290.0 + 80.0 * 10.0, epsilon = 1e-3);
    }
}
