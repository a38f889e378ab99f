use crate::error::TopologyError;
use crate::math::Point2;
use crate::plan::{LevelId, Plan, Wall, WallId};

/// One end of a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallEnd {
    Start,
    End,
}

impl WallEnd {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }

    /// Point of `wall` at this end.
    #[must_use]
    pub fn point(self, wall: &Wall) -> Point2 {
        match self {
            Self::Start => wall.start,
            Self::End => wall.end,
        }
    }

    /// Wall joined to `wall` at this end.
    #[must_use]
    pub fn joined(self, wall: &Wall) -> Option<WallId> {
        match self {
            Self::Start => wall.wall_at_start,
            Self::End => wall.wall_at_end,
        }
    }

    pub(crate) fn set_point(self, wall: &mut Wall, point: Point2) {
        match self {
            Self::Start => wall.start = point,
            Self::End => wall.end = point,
        }
    }

    pub(crate) fn set_joined(self, wall: &mut Wall, joined: Option<WallId>) {
        match self {
            Self::Start => wall.wall_at_start = joined,
            Self::End => wall.wall_at_end = joined,
        }
    }
}

/// Returns the end of `neighbour` joined to the wall `id`.
///
/// When both ends of `neighbour` are joined to `id` (a loop of two walls),
/// the end closest to `at` wins.
#[must_use]
pub fn joined_end(neighbour: &Wall, id: WallId, at: &Point2) -> Option<WallEnd> {
    match (neighbour.wall_at_start == Some(id), neighbour.wall_at_end == Some(id)) {
        (true, true) => {
            if (neighbour.start - at).norm() <= (neighbour.end - at).norm() {
                Some(WallEnd::Start)
            } else {
                Some(WallEnd::End)
            }
        }
        (true, false) => Some(WallEnd::Start),
        (false, true) => Some(WallEnd::End),
        (false, false) => None,
    }
}

/// Joins the end `a_end` of wall `a` to the end `b_end` of wall `b`.
///
/// The point of `b` is aligned on the point of `a` so that both walls
/// share exactly the same coordinates.
///
/// # Errors
///
/// Returns `TopologyError::ItemNotFound` for unknown walls and
/// `TopologyError::InvalidJoin` if a wall is joined to itself or if one of
/// the ends is already joined to another wall.
pub fn join_walls(
    plan: &mut Plan,
    a: WallId,
    a_end: WallEnd,
    b: WallId,
    b_end: WallEnd,
) -> Result<(), TopologyError> {
    if a == b {
        return Err(TopologyError::InvalidJoin("a wall can't be joined to itself".to_owned()));
    }
    let wall_a = plan.wall(a).ok_or(TopologyError::ItemNotFound("wall"))?;
    let wall_b = plan.wall(b).ok_or(TopologyError::ItemNotFound("wall"))?;
    if a_end.joined(wall_a).is_some_and(|w| w != b) || b_end.joined(wall_b).is_some_and(|w| w != a)
    {
        return Err(TopologyError::InvalidJoin(format!(
            "{a_end:?} of {a:?} or {b_end:?} of {b:?} is already joined"
        )));
    }
    let point = a_end.point(wall_a);
    plan.update_wall(a, |wall| a_end.set_joined(wall, Some(b)))?;
    plan.update_wall(b, |wall| {
        b_end.set_joined(wall, Some(a));
        b_end.set_point(wall, point);
    })?;
    tracing::trace!(?a, ?a_end, ?b, ?b_end, "walls joined");
    Ok(())
}

/// Breaks the joins of a wall on both sides.
///
/// # Errors
///
/// Returns `TopologyError::ItemNotFound` for an unknown wall.
pub fn detach_wall(plan: &mut Plan, id: WallId) -> Result<(), TopologyError> {
    let wall = plan.wall(id).ok_or(TopologyError::ItemNotFound("wall"))?.clone();
    for end in [WallEnd::Start, WallEnd::End] {
        let Some(neighbour_id) = end.joined(&wall) else {
            continue;
        };
        let neighbour_end = plan
            .wall(neighbour_id)
            .and_then(|n| joined_end(n, id, &end.point(&wall)));
        if let Some(neighbour_end) = neighbour_end {
            plan.update_wall(neighbour_id, |n| neighbour_end.set_joined(n, None))?;
        }
    }
    plan.update_wall(id, |wall| {
        wall.wall_at_start = None;
        wall.wall_at_end = None;
    })
}

/// Snapshot of the location, level and joins of a wall.
///
/// Restoring a snapshot puts the wall back where it was and re-links the
/// neighbours it was joined to, on the ends they were joined at.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedWall {
    id: WallId,
    start: Point2,
    end: Point2,
    arc_extent: Option<f64>,
    level: Option<LevelId>,
    wall_at_start: Option<(WallId, WallEnd)>,
    wall_at_end: Option<(WallId, WallEnd)>,
}

impl JoinedWall {
    /// Captures the current state of a wall.
    #[must_use]
    pub fn capture(plan: &Plan, id: WallId) -> Option<Self> {
        let wall = plan.wall(id)?;
        let neighbour = |end: WallEnd| {
            let neighbour_id = end.joined(wall)?;
            let neighbour = plan.wall(neighbour_id)?;
            joined_end(neighbour, id, &end.point(wall)).map(|e| (neighbour_id, e))
        };
        Some(Self {
            id,
            start: wall.start,
            end: wall.end,
            arc_extent: wall.arc_extent,
            level: wall.level,
            wall_at_start: neighbour(WallEnd::Start),
            wall_at_end: neighbour(WallEnd::End),
        })
    }

    #[must_use]
    pub fn id(&self) -> WallId {
        self.id
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.end
    }

    #[must_use]
    pub fn wall_at_start(&self) -> Option<WallId> {
        self.wall_at_start.map(|(id, _)| id)
    }

    #[must_use]
    pub fn wall_at_end(&self) -> Option<WallId> {
        self.wall_at_end.map(|(id, _)| id)
    }

    /// Neighbours joined at the start and at the end of the wall, with the
    /// end of each neighbour joined to it.
    #[must_use]
    pub fn neighbours(&self) -> [Option<(WallId, WallEnd)>; 2] {
        [self.wall_at_start, self.wall_at_end]
    }

    /// Restores the wall location and its joins on both sides.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ItemNotFound` if the wall or one of its
    /// former neighbours is unknown.
    pub fn restore(&self, plan: &mut Plan) -> Result<(), TopologyError> {
        plan.update_wall(self.id, |wall| {
            wall.start = self.start;
            wall.end = self.end;
            wall.arc_extent = self.arc_extent;
            wall.level = self.level;
        })?;
        self.restore_joins(plan)
    }

    /// Restores the joins of the wall only.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ItemNotFound` if the wall or one of its
    /// former neighbours is unknown.
    pub fn restore_joins(&self, plan: &mut Plan) -> Result<(), TopologyError> {
        let id = self.id;
        plan.update_wall(id, |wall| {
            wall.wall_at_start = self.wall_at_start.map(|(n, _)| n);
            wall.wall_at_end = self.wall_at_end.map(|(n, _)| n);
        })?;
        for (joined, point) in [(self.wall_at_start, self.start), (self.wall_at_end, self.end)] {
            if let Some((neighbour, end)) = joined {
                plan.update_wall(neighbour, |n| {
                    end.set_joined(n, Some(id));
                    end.set_point(n, point);
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::pt;

    fn two_walls(plan: &mut Plan) -> (WallId, WallId) {
        let a = plan.add_wall(Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, None));
        let b = plan.add_wall(Wall::new(pt(100.0, 0.5), pt(100.0, 100.0), 10.0, None));
        (a, b)
    }

    #[test]
    fn join_is_mutual_and_aligns_points() {
        let mut plan = Plan::new();
        let (a, b) = two_walls(&mut plan);
        join_walls(&mut plan, a, WallEnd::End, b, WallEnd::Start).unwrap();
        let wall_a = plan.wall(a).unwrap();
        let wall_b = plan.wall(b).unwrap();
        assert_eq!(wall_a.wall_at_end, Some(b));
        assert_eq!(wall_b.wall_at_start, Some(a));
        assert_eq!(wall_a.end, wall_b.start);
    }

    #[test]
    fn occupied_ends_are_rejected() {
        let mut plan = Plan::new();
        let (a, b) = two_walls(&mut plan);
        let c = plan.add_wall(Wall::new(pt(100.0, 0.0), pt(200.0, 0.0), 10.0, None));
        join_walls(&mut plan, a, WallEnd::End, b, WallEnd::Start).unwrap();
        assert!(join_walls(&mut plan, a, WallEnd::End, c, WallEnd::Start).is_err());
        assert!(join_walls(&mut plan, a, WallEnd::Start, a, WallEnd::End).is_err());
    }

    #[test]
    fn detach_then_restore_snapshot() {
        let mut plan = Plan::new();
        let (a, b) = two_walls(&mut plan);
        join_walls(&mut plan, a, WallEnd::End, b, WallEnd::Start).unwrap();
        let snapshot = JoinedWall::capture(&plan, a).unwrap();
        detach_wall(&mut plan, a).unwrap();
        assert_eq!(plan.wall(b).unwrap().wall_at_start, None);
        plan.update_wall(a, |w| w.end = pt(90.0, 0.0)).unwrap();
        snapshot.restore(&mut plan).unwrap();
        assert_eq!(plan.wall(a).unwrap().end, pt(100.0, 0.0));
        assert_eq!(plan.wall(b).unwrap().wall_at_start, Some(a));
    }

    #[test]
    fn two_wall_loop_picks_the_closest_end() {
        let mut plan = Plan::new();
        let a = plan.add_wall(Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, None));
        let b = plan.add_wall(Wall::new(pt(100.0, 0.0), pt(0.0, 0.0), 10.0, None));
        join_walls(&mut plan, a, WallEnd::End, b, WallEnd::Start).unwrap();
        join_walls(&mut plan, a, WallEnd::Start, b, WallEnd::End).unwrap();
        let wall_b = plan.wall(b).unwrap();
        assert_eq!(joined_end(wall_b, a, &pt(0.0, 0.0)), Some(WallEnd::End));
        assert_eq!(joined_end(wall_b, a, &pt(100.0, 0.0)), Some(WallEnd::Start));
    }

    #[test]
    fn deleted_wall_cannot_be_joined() {
        let mut plan = Plan::new();
        let (a, b) = two_walls(&mut plan);
        plan.delete_wall(b).unwrap();
        assert!(plan.wall(b).is_none());
        assert!(matches!(
            join_walls(&mut plan, a, WallEnd::End, b, WallEnd::Start),
            Err(TopologyError::ItemNotFound("wall"))
        ));
        assert_eq!(plan.wall(a).unwrap().wall_at_end, None);
    }
}
