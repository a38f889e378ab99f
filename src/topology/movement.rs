use crate::error::TopologyError;
use crate::math::{Point2, Vector2};
use crate::plan::{ItemId, PieceId, Plan, WallId};

use super::joined_wall::{joined_end, WallEnd};

/// Moves the end `end` of a wall to `point`, dragging the matching end of
/// its joined neighbour unless the neighbour belongs to `moved`.
///
/// # Errors
///
/// Returns `TopologyError::ItemNotFound` for an unknown wall.
pub fn move_wall_point(
    plan: &mut Plan,
    id: WallId,
    end: WallEnd,
    point: Point2,
    moved: &[WallId],
) -> Result<(), TopologyError> {
    let wall = plan.wall(id).ok_or(TopologyError::ItemNotFound("wall"))?;
    let previous = end.point(wall);
    let neighbour = end
        .joined(wall)
        .filter(|n| !moved.contains(n))
        .and_then(|n| plan.wall(n).and_then(|w| joined_end(w, id, &previous)).map(|e| (n, e)));
    plan.update_wall(id, |wall| end.set_point(wall, point))?;
    if let Some((neighbour, neighbour_end)) = neighbour {
        plan.update_wall(neighbour, |wall| neighbour_end.set_point(wall, point))?;
    }
    Ok(())
}

/// Moves the start point of a wall, see [`move_wall_point`].
///
/// # Errors
///
/// Returns `TopologyError::ItemNotFound` for an unknown wall.
pub fn move_wall_start_point(
    plan: &mut Plan,
    id: WallId,
    point: Point2,
    moved: &[WallId],
) -> Result<(), TopologyError> {
    move_wall_point(plan, id, WallEnd::Start, point, moved)
}

/// Moves the end point of a wall, see [`move_wall_point`].
///
/// # Errors
///
/// Returns `TopologyError::ItemNotFound` for an unknown wall.
pub fn move_wall_end_point(
    plan: &mut Plan,
    id: WallId,
    point: Point2,
    moved: &[WallId],
) -> Result<(), TopologyError> {
    move_wall_point(plan, id, WallEnd::End, point, moved)
}

/// Translates a set of items.
///
/// Walls joined to a moved wall but not moved themselves follow the shared
/// end point, so joins are never broken by a move.
#[derive(Debug, Clone)]
pub struct MoveItems {
    items: Vec<ItemId>,
    delta: Vector2,
}

impl MoveItems {
    #[must_use]
    pub fn new(items: Vec<ItemId>, dx: f64, dy: f64) -> Self {
        Self {
            items,
            delta: Vector2::new(dx, dy),
        }
    }

    /// Applies the translation.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ItemNotFound` if an item is unknown.
    pub fn execute(&self, plan: &mut Plan) -> Result<(), TopologyError> {
        if self.delta.x == 0.0 && self.delta.y == 0.0 {
            return Ok(());
        }
        let delta = self.delta;
        let walls: Vec<WallId> = self.items.iter().filter_map(|i| i.as_wall()).collect();
        for &item in &self.items {
            match item {
                ItemId::Wall(id) => {
                    let wall = plan.wall(id).ok_or(TopologyError::ItemNotFound("wall"))?;
                    let (start, end) = (wall.start + delta, wall.end + delta);
                    move_wall_point(plan, id, WallEnd::Start, start, &walls)?;
                    move_wall_point(plan, id, WallEnd::End, end, &walls)?;
                }
                ItemId::Room(id) => plan.update_room(id, |room| {
                    for point in &mut room.points {
                        *point += delta;
                    }
                })?,
                ItemId::Piece(id) => move_piece(plan, id, delta)?,
                ItemId::Polyline(id) => plan.update_polyline(id, |polyline| {
                    for point in &mut polyline.points {
                        *point += delta;
                    }
                })?,
                ItemId::DimensionLine(id) => plan.update_dimension_line(id, |line| {
                    line.start += delta;
                    line.end += delta;
                })?,
                ItemId::Label(id) => plan.update_label(id, |label| {
                    label.x += delta.x;
                    label.y += delta.y;
                })?,
                ItemId::Compass => plan.update_compass(|compass| {
                    compass.x += delta.x;
                    compass.y += delta.y;
                }),
                ItemId::Camera => plan.update_camera(|camera| {
                    camera.x += delta.x;
                    camera.y += delta.y;
                }),
            }
        }
        tracing::trace!(count = self.items.len(), dx = delta.x, dy = delta.y, "items moved");
        Ok(())
    }
}

/// Moves a piece and the pieces it groups.
///
/// # Errors
///
/// Returns `TopologyError::ItemNotFound` for an unknown piece.
pub fn move_piece(plan: &mut Plan, id: PieceId, delta: Vector2) -> Result<(), TopologyError> {
    let children = plan
        .piece(id)
        .ok_or(TopologyError::ItemNotFound("piece"))?
        .children
        .clone();
    plan.update_piece(id, |piece| {
        piece.x += delta.x;
        piece.y += delta.y;
    })?;
    for child in children {
        move_piece(plan, child, delta)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::pt;
    use crate::plan::Wall;
    use crate::topology::join_walls;

    #[test]
    fn unselected_neighbour_follows_moved_wall() {
        let mut plan = Plan::new();
        let a = plan.add_wall(Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, None));
        let b = plan.add_wall(Wall::new(pt(100.0, 0.0), pt(100.0, 100.0), 10.0, None));
        join_walls(&mut plan, a, WallEnd::End, b, WallEnd::Start).unwrap();
        MoveItems::new(vec![ItemId::Wall(a)], 0.0, -20.0)
            .execute(&mut plan)
            .unwrap();
        assert_eq!(plan.wall(a).unwrap().end, pt(100.0, -20.0));
        assert_eq!(plan.wall(b).unwrap().start, pt(100.0, -20.0));
        assert_eq!(plan.wall(b).unwrap().end, pt(100.0, 100.0));
    }

    #[test]
    fn moving_both_walls_keeps_them_rigid() {
        let mut plan = Plan::new();
        let a = plan.add_wall(Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, None));
        let b = plan.add_wall(Wall::new(pt(100.0, 0.0), pt(100.0, 100.0), 10.0, None));
        join_walls(&mut plan, a, WallEnd::End, b, WallEnd::Start).unwrap();
        MoveItems::new(vec![ItemId::Wall(a), ItemId::Wall(b)], 10.0, 10.0)
            .execute(&mut plan)
            .unwrap();
        assert_eq!(plan.wall(b).unwrap().start, pt(110.0, 10.0));
        assert_eq!(plan.wall(b).unwrap().end, pt(110.0, 110.0));
        assert_eq!(plan.wall(a).unwrap().end, plan.wall(b).unwrap().start);
    }
}
