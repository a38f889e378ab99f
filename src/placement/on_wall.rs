use crate::geometry::Area;
use crate::math::intersect_2d::relative_ccw;
use crate::math::polygon_2d::rectangle_points;
use crate::math::{Point2, Vector2};
use crate::plan::{Piece, Plan, Wall, WallId, WallSide};

/// Placement of a piece against a wall, to be applied by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPlacement {
    pub wall: WallId,
    /// New center of the piece.
    pub center: Point2,
    pub angle: f64,
    /// New depth of a door or window fitted in the wall.
    pub depth: Option<f64>,
    /// `true` when a door or window now fits in the wall.
    pub bound_to_wall: bool,
}

/// Looks for the wall `piece` is dropped on at `point` and returns where
/// the piece should go to stick to it.
///
/// The piece is turned to face away from the wall when `force_orientation`
/// is set, when it's a door or window, or when `point` is on the wall.
/// Otherwise it keeps its angle and only slides against the wall side
/// facing it. Doors and windows are resized to fit the wall thickness.
/// Curved walls are ignored.
#[must_use]
pub fn adjust_piece_on_wall_at(
    plan: &Plan,
    piece: &Piece,
    point: &Point2,
    force_orientation: bool,
    margin: f64,
) -> Option<WallPlacement> {
    let with_baseboards = !piece.is_door_or_window() && piece.elevation == 0.0;
    let (id, wall) = reference_wall(plan, piece, point, force_orientation, with_baseboards, margin)?;
    let (left_face, right_face) = face_offsets(wall, with_baseboards);
    let (sin, cos) = wall.angle().sin_cos();
    let direction = Vector2::new(cos, sin);
    let left_normal = Vector2::new(sin, -cos);
    // Points on the left side of the wall have a positive relative CCW
    // with the y axis pointing down.
    let on_left = relative_ccw(&wall.start, &wall.end, point) > 0;
    let (normal, face) = if on_left {
        (left_normal, left_face)
    } else {
        (-left_normal, right_face)
    };
    let along = wall.start + direction * (point - wall.start).dot(&direction);

    let orient = force_orientation
        || piece.is_door_or_window()
        || Wall::footprint_contains(&plan.wall_points(id), point, margin);
    if !orient {
        return Some(WallPlacement {
            wall: id,
            center: slide_against(piece, point, &wall.start, &normal, face),
            angle: piece.angle,
            depth: None,
            bound_to_wall: false,
        });
    }

    let angle = (-normal.x).atan2(normal.y);
    if let Some(door) = &piece.door_or_window {
        let depth = if door.wall_thickness > 0.0 {
            wall.thickness / door.wall_thickness
        } else {
            piece.depth
        };
        let offset = depth / 2.0 - depth * door.wall_distance - depth * door.wall_thickness / 2.0;
        return Some(WallPlacement {
            wall: id,
            center: along + normal * offset,
            angle,
            depth: Some(depth),
            bound_to_wall: true,
        });
    }
    let (_, depth, _) = piece.size_in_plan();
    Some(WallPlacement {
        wall: id,
        center: along + normal * (face + depth / 2.0),
        angle,
        depth: None,
        bound_to_wall: false,
    })
}

/// Wall under `point`, or else the wall overlapping most the piece
/// footprint enlarged by `margin`.
fn reference_wall<'a>(
    plan: &'a Plan,
    piece: &Piece,
    point: &Point2,
    force_orientation: bool,
    with_baseboards: bool,
    margin: f64,
) -> Option<(WallId, &'a Wall)> {
    let level = plan.selected_level();
    let candidates: Vec<(WallId, &Wall, Vec<Point2>)> = plan
        .walls()
        .iter()
        .filter(|(_, wall)| {
            plan.is_wall_at_level(wall, level)
                && wall.effective_arc_extent().is_none()
                && wall.start != wall.end
        })
        .map(|(id, wall)| {
            let points = if with_baseboards {
                wall.points_with_baseboards()
            } else {
                plan.wall_points(id)
            };
            (id, wall, points)
        })
        .collect();

    if force_orientation || !piece.is_door_or_window() {
        for tolerance in [0.0, margin] {
            if let Some((id, wall, _)) = candidates
                .iter()
                .find(|(_, _, points)| Wall::footprint_contains(points, point, tolerance))
            {
                return Some((*id, *wall));
            }
        }
    }

    let (width, depth, _) = piece.size_in_plan();
    let enlarged = Area::from_polygon(&rectangle_points(
        &piece.center(),
        width + 2.0 * margin,
        depth + 2.0 * margin,
        piece.angle,
    ));
    candidates
        .iter()
        .map(|(id, wall, points)| (*id, *wall, Area::from_polygon(points).intersect(&enlarged).area()))
        .filter(|(_, _, surface)| *surface > 0.0)
        .max_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(id, wall, _)| (id, wall))
}

/// Distances from the wall middle line to its left and right faces.
fn face_offsets(wall: &Wall, with_baseboards: bool) -> (f64, f64) {
    let half = wall.thickness / 2.0;
    if !with_baseboards {
        return (half, half);
    }
    let baseboard = |side: &WallSide| side.baseboard.as_ref().map_or(0.0, |b| b.thickness);
    (half + baseboard(&wall.left_side), half + baseboard(&wall.right_side))
}

/// Moves the piece centered at `center` along `normal` until its footprint
/// touches the wall face `face` away from the wall line.
fn slide_against(
    piece: &Piece,
    center: &Point2,
    wall_start: &Point2,
    normal: &Vector2,
    face: f64,
) -> Point2 {
    let (width, depth, _) = piece.size_in_plan();
    let corners = rectangle_points(center, width, depth, piece.angle);
    let nearest = corners
        .iter()
        .map(|corner| (corner - wall_start).dot(normal))
        .fold(f64::INFINITY, f64::min);
    center + normal * (face - nearest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{normalize_angle, pt};
    use crate::plan::DoorOrWindow;
    use approx::assert_relative_eq;

    fn plan_with_wall() -> (Plan, WallId) {
        let mut plan = Plan::new();
        let wall = plan.add_wall(Wall::new(pt(0.0, 0.0), pt(400.0, 0.0), 10.0, None));
        (plan, wall)
    }

    #[test]
    fn door_fits_in_the_wall() {
        let (plan, wall) = plan_with_wall();
        let door = Piece::door_or_window(
            "door",
            200.0,
            3.0,
            80.0,
            20.0,
            210.0,
            DoorOrWindow {
                wall_thickness: 0.5,
                ..DoorOrWindow::default()
            },
        );
        let placement = adjust_piece_on_wall_at(&plan, &door, &pt(200.0, 3.0), false, 4.0).unwrap();
        assert_eq!(placement.wall, wall);
        assert!(placement.bound_to_wall);
        assert_relative_eq!(placement.depth.unwrap(), 20.0);
        assert_relative_eq!(normalize_angle(placement.angle), 0.0, epsilon = 1e-12);
        // The door back lies on the far face of the wall.
        assert_relative_eq!(placement.center.x, 200.0, epsilon = 1e-9);
        assert_relative_eq!(placement.center.y, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn piece_dropped_on_a_wall_turns_its_back_to_it() {
        let (plan, _) = plan_with_wall();
        let table = Piece::new("table", 100.0, -2.0, 60.0, 40.0, 75.0);
        let placement = adjust_piece_on_wall_at(&plan, &table, &pt(100.0, -2.0), false, 4.0).unwrap();
        assert_relative_eq!(placement.center.y, -25.0, epsilon = 1e-9);
        assert_relative_eq!(normalize_angle(placement.angle), std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn piece_near_a_wall_slides_against_it() {
        let (plan, _) = plan_with_wall();
        let mut table = Piece::new("table", 100.0, 22.0, 60.0, 40.0, 75.0);
        table.angle = 0.3;
        let placement = adjust_piece_on_wall_at(&plan, &table, &pt(100.0, 22.0), false, 4.0).unwrap();
        assert_relative_eq!(placement.angle, 0.3);
        let moved = Piece {
            x: placement.center.x,
            y: placement.center.y,
            ..table
        };
        let nearest = moved.points().iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert_relative_eq!(nearest, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn far_pieces_are_left_alone() {
        let (plan, _) = plan_with_wall();
        let table = Piece::new("table", 100.0, 200.0, 60.0, 40.0, 75.0);
        assert!(adjust_piece_on_wall_at(&plan, &table, &pt(100.0, 200.0), false, 4.0).is_none());
    }
}
