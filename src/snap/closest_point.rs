use crate::math::Point2;
use crate::plan::{Plan, Room, RoomId};
use crate::rooms::GeometryCache;

/// A point moved on the closest point of the walls outlines or of the rooms
/// visible at the selected level, when one lies within a margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMagnetizedToClosestWallOrRoomPoint {
    point: Point2,
    magnetized: bool,
}

impl PointMagnetizedToClosestWallOrRoomPoint {
    /// Looks for the closest candidate of `point` within `margin`.
    ///
    /// `edited` names a room point being moved, which must not attract
    /// itself.
    pub fn new(
        plan: &Plan,
        cache: &mut GeometryCache,
        point: &Point2,
        margin: f64,
        edited: Option<(RoomId, usize)>,
    ) -> Self {
        let mut closest: Option<(f64, Point2)> = None;
        let mut consider = |candidate: &Point2| {
            let distance = (candidate - point).norm_squared();
            if closest.is_none_or(|(d, _)| distance < d) {
                closest = Some((distance, *candidate));
            }
        };

        for path in cache.room_paths(plan) {
            path.iter().for_each(&mut consider);
        }
        let level = plan.selected_level();
        for (_, wall) in plan.walls().iter() {
            if plan.is_wall_at_level(wall, level) {
                consider(&wall.start);
                consider(&wall.end);
            }
        }
        for (id, room) in detectable_rooms(plan) {
            for (index, room_point) in room.points.iter().enumerate() {
                if edited != Some((id, index)) {
                    consider(room_point);
                }
            }
        }

        match closest {
            Some((distance, candidate)) if distance <= margin * margin => Self {
                point: candidate,
                magnetized: true,
            },
            _ => Self {
                point: *point,
                magnetized: false,
            },
        }
    }

    #[must_use]
    pub fn point(&self) -> Point2 {
        self.point
    }

    /// Returns `true` if the point moved on an existing point.
    #[must_use]
    pub fn is_magnetized(&self) -> bool {
        self.magnetized
    }
}

/// Rooms of the selected level, and rooms of the level below seen through
/// their ceiling.
fn detectable_rooms(plan: &Plan) -> impl Iterator<Item = (RoomId, &Room)> + '_ {
    let level = plan.selected_level();
    let below = level.and_then(|id| plan.level_below(id));
    plan.rooms().iter().filter(move |(_, room)| {
        room.level == level || (below.is_some() && room.level == below && room.ceiling_visible)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pt;
    use crate::plan::{Level, Wall};

    #[test]
    fn wall_ends_attract_close_points() {
        let mut plan = Plan::new();
        plan.add_wall(Wall::new(pt(0.0, 0.0), pt(400.0, 0.0), 10.0, None));
        let mut cache = GeometryCache::new();
        let snapped =
            PointMagnetizedToClosestWallOrRoomPoint::new(&plan, &mut cache, &pt(402.0, 1.0), 4.0, None);
        assert!(snapped.is_magnetized());
        assert_eq!(snapped.point(), pt(400.0, 0.0));

        let free =
            PointMagnetizedToClosestWallOrRoomPoint::new(&plan, &mut cache, &pt(200.0, 50.0), 4.0, None);
        assert!(!free.is_magnetized());
        assert_eq!(free.point(), pt(200.0, 50.0));
    }

    #[test]
    fn edited_room_point_is_ignored() {
        let mut plan = Plan::new();
        let room = plan.add_room(Room::new(vec![pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0)]));
        let mut cache = GeometryCache::new();
        let snapped = PointMagnetizedToClosestWallOrRoomPoint::new(
            &plan,
            &mut cache,
            &pt(101.0, 1.0),
            4.0,
            Some((room, 1)),
        );
        assert!(!snapped.is_magnetized());
    }

    #[test]
    fn rooms_below_are_detected_through_their_ceiling() {
        let mut plan = Plan::new();
        let ground = plan.add_level(Level::new("0", 0.0, 12.0, 250.0));
        let upper = plan.add_level(Level::new("1", 250.0, 12.0, 250.0));
        let mut room = Room::new(vec![pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0)]);
        room.level = Some(ground);
        plan.add_room(room);
        plan.set_selected_level(Some(upper));
        let mut cache = GeometryCache::new();
        let snapped =
            PointMagnetizedToClosestWallOrRoomPoint::new(&plan, &mut cache, &pt(99.0, 99.0), 4.0, None);
        assert!(snapped.is_magnetized());
        assert_eq!(snapped.point(), pt(100.0, 100.0));
    }
}
